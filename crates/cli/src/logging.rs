use tawqit_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

const FALLBACK_DIRECTIVE: &str = "info";

/// Logging settings from the loaded config, or the defaults when the config
/// is invalid. The command reports the config error itself.
pub fn resolve_logging_config() -> LoggingConfig {
    AppConfig::load(LoadOptions::default()).map(|config| config.logging).unwrap_or_default()
}

/// Installs the global subscriber. Logs go to stderr so command payloads on
/// stdout stay machine-readable. Repeated calls are ignored.
pub fn init_logging(logging: &LoggingConfig) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(build_filter(&logging.level, rust_log.as_deref()));

    let _ = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// `RUST_LOG` directives win over `logging.level`; unparseable directives
/// fall back to `info`.
fn build_filter(level: &str, rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_DIRECTIVE))
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::build_filter;

    #[test]
    fn configured_level_sets_the_filter() {
        let filter = build_filter("debug", None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn rust_log_overrides_configured_level() {
        let filter = build_filter("info", Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        let blank = build_filter("error", Some("  "));
        assert_eq!(blank.max_level_hint(), Some(LevelFilter::ERROR));
    }
}
