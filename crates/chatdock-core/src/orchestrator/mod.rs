//! Widget orchestration: the synchronous rule engine and its async driver.

pub mod machine;
pub mod runtime;
pub mod timer;

pub use machine::{Command, WidgetMachine};
pub use runtime::{WidgetHandle, WidgetRuntime};
pub use timer::{ScopedTimer, TimerKind};
