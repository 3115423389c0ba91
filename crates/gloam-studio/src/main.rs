//! Gloam studio: a bare winit window hosting one render surface.
//!
//! Useful for checking a driver by eye. The surface clears to a slowly
//! cycling color; close the window to run the teardown path.

mod runtime;
mod scene;

use gloam_engine::logging::{init_logging, LoggingConfig};

use crate::runtime::{Runtime, StudioConfig};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig {
        relative_timestamps: true,
        ..Default::default()
    });

    Runtime::run(StudioConfig::from_env())
}
