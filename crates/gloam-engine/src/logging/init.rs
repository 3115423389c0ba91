use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "gloam_engine=debug,glutin=warn").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    /// Used when neither `env_filter` nor `RUST_LOG` is set.
    pub default_level: log::LevelFilter,
    pub write_style: env_logger::WriteStyle,
    /// Prefix records with elapsed time instead of wall-clock time. Handy
    /// when reading frame pacing out of the log.
    pub relative_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: log::LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
            relative_timestamps: false,
        }
    }
}

impl LoggingConfig {
    /// The filter string that will be applied, if any.
    fn effective_filter(&self) -> Option<String> {
        let non_blank = |f: &String| !f.trim().is_empty();
        self.env_filter
            .clone()
            .filter(non_blank)
            .or_else(|| std::env::var("RUST_LOG").ok().filter(non_blank))
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Subsequent calls are ignored. If the host already installed another
/// logger, that one is kept.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match config.effective_filter() {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(config.default_level);
            }
        }

        builder.write_style(config.write_style);
        if config.relative_timestamps {
            builder.format_timestamp(None);
            let start = std::time::Instant::now();
            builder.format(move |buf, record| {
                use std::io::Write;
                let t = start.elapsed();
                writeln!(
                    buf,
                    "[{:>4}.{:03} {:<5} {}] {}",
                    t.as_secs(),
                    t.subsec_millis(),
                    record.level(),
                    record.target(),
                    record.args()
                )
            });
        }

        if builder.try_init().is_err() {
            log::debug!("a logger was already installed; keeping it");
            return;
        }
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig {
            env_filter: Some("gloam_engine=trace".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_filter().as_deref(), Some("gloam_engine=trace"));
    }

    #[test]
    fn blank_filter_is_ignored() {
        let config = LoggingConfig {
            env_filter: Some("  ".into()),
            ..Default::default()
        };
        // Falls through to RUST_LOG, which may or may not be set.
        assert_ne!(config.effective_filter().as_deref(), Some("  "));
    }

    #[test]
    fn init_is_idempotent() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig {
            default_level: log::LevelFilter::Trace,
            ..Default::default()
        });
    }
}
