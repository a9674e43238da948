//! Logging Infrastructure
//!
//! `tracing-subscriber` with an env filter; optional daily rolling file output.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "academy_server=info,tower_http=info";

/// Build the env filter.
///
/// `RUST_LOG` wins; otherwise `log_level` applies to this crate, falling back
/// to [`DEFAULT_FILTER`].
pub fn env_filter(log_level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_directives(log_level).into())
}

fn fallback_directives(log_level: Option<&str>) -> String {
    match log_level {
        Some(level) => format!("academy_server={level},tower_http={level}"),
        None => DEFAULT_FILTER.to_string(),
    }
}

/// Initialize the global subscriber
pub fn init_logger(log_level: Option<&str>, log_dir: Option<&str>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_thread_ids(false)
        .with_line_number(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "academy-server");
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("LOG_DIR {dir} is not writable, logging to stdout");
    }

    subscriber.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_directives() {
        assert_eq!(
            fallback_directives(Some("debug")),
            "academy_server=debug,tower_http=debug"
        );
        assert_eq!(fallback_directives(None), DEFAULT_FILTER);
    }
}
