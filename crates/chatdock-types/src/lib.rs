//! Shared domain types for chatdock.
//!
//! Chat identity and messages, widget state values (reachability, loaded-ness
//! sentinels, notice, configuration), static settings, and error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, chrono-tz, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod widget;
