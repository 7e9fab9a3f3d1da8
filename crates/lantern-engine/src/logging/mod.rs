//! Logging setup.
//!
//! The engine logs through the `log` facade only; binaries pick the backend by
//! calling `init_logging` once at startup.

mod init;

pub use init::{init_logging, LoggingConfig};
