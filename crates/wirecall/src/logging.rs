use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// All diagnostics go to stderr; stdout carries command output only.
///
/// `WIRECALL_LOG` overrides the `--log-level` flag, so trace output
/// can be turned on for a whole script without editing each
/// invocation. Unrecognized values fall back to the flag.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let level = env_level_override()
        .and_then(|raw| parse_level(&raw))
        .unwrap_or(level);

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(LevelFilter::from(level))
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}

fn env_level_override() -> Option<String> {
    std::env::var("WIRECALL_LOG").ok()
}

fn parse_level(raw: &str) -> Option<LogLevel> {
    LogLevel::from_str(raw.trim(), true).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_override_is_case_insensitive() {
        assert!(matches!(parse_level("debug"), Some(LogLevel::Debug)));
        assert!(matches!(parse_level("TRACE"), Some(LogLevel::Trace)));
        assert!(matches!(parse_level(" warn "), Some(LogLevel::Warn)));
    }

    #[test]
    fn unrecognized_level_is_ignored() {
        assert!(parse_level("verbose").is_none());
        assert!(parse_level("").is_none());
    }
}
