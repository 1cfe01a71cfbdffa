//! Widget orchestration logic for chatdock.
//!
//! Defines the ports the infrastructure layer implements ([`session::SessionStorage`],
//! [`backend::WidgetBackend`]) and the rules that decide visibility, polling,
//! data loading, and session extension. Depends only on `chatdock-types`,
//! never on `chatdock-infra` or any HTTP/filesystem crate.

pub mod backend;
pub mod clock;
pub mod extension;
pub mod loaders;
pub mod office_hours;
pub mod orchestrator;
pub mod poller;
pub mod resume;
pub mod session;
pub mod state;
pub mod visibility;
