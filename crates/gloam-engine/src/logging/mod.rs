//! Logger setup for hosts embedding the render surface.
//!
//! The crate itself only emits through the `log` facade; nothing here runs
//! unless the host calls [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
