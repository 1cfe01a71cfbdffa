//! Infrastructure layer for chatdock.
//!
//! Contains implementations of the ports defined in `chatdock-core`:
//! session storage (in-memory and file-backed), the HTTP widget backend,
//! plus configuration loading and data directory resolution.

pub mod config;
pub mod http;
pub mod session;
