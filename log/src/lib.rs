//! Logging setup for gapedit with file output and optional stdout.
//!
//! Logs always go to a file at `warn` level, or at the requested level when one
//! is set through the environment. Stdout logging is enabled when `GAPEDIT_LOG`
//! or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`GAPEDIT_LOG`** (highest priority): a bare level such as `debug` applies
//!    to every gapedit crate; anything with `=`, `:` or `,` is used verbatim
//! 2. **`RUST_LOG`**: standard tracing environment variable
//! 3. **Default**: `warn` globally, `info` for gapedit crates
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/gapedit/logs/gapedit-<pid>.log`
//! - macOS: `~/Library/Application Support/gapedit/logs/gapedit-12345.log`
//! - Linux: `~/.local/share/gapedit/logs/gapedit-12345.log`
//!
//! Override with `--log-file <path>`. A path with an extension names the file;
//! one without names the directory.

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CRATES: [&str; 5] = [
    "gapedit",
    "gapedit_bin",
    "gapedit_text",
    "gapedit_indent",
    "gapedit_log",
];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program;
/// dropping it flushes and stops the background file writer.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter());

    let stdout_enabled = env_set("GAPEDIT_LOG") || env_set("RUST_LOG") || cfg!(debug_assertions);
    let stdout_layer = stdout_enabled.then(|| fmt::layer().with_filter(create_filter()));

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Stdout only, and safe to call from every test: a second call is ignored.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn env_set(name: &str) -> bool {
    env::var_os(name).is_some()
}

/// Split an override into directory and file name, or pick the default location.
fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("gapedit-{}.log", std::process::id());

    match override_path {
        Some(path) if path.extension().is_some() => {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or(filename);
            (dir, name)
        },
        Some(dir) => (dir, filename),
        None => {
            let dir = dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gapedit")
                .join("logs");
            (dir, filename)
        },
    }
}

/// File filter: the user's level if one is set, otherwise `warn`.
fn create_file_filter() -> EnvFilter {
    if env_set("GAPEDIT_LOG") || env_set("RUST_LOG") {
        return create_filter();
    }
    EnvFilter::new("warn")
}

/// `GAPEDIT_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> EnvFilter {
    if let Ok(level) = env::var("GAPEDIT_LOG") {
        return EnvFilter::new(expand_gapedit_log(&level));
    }
    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }
    EnvFilter::new(expand_gapedit_log("info"))
}

/// `debug` becomes `warn,gapedit=debug,gapedit_text=debug,...`; advanced
/// directives pass through untouched.
fn expand_gapedit_log(value: &str) -> String {
    if value.contains(['=', ':', ',']) {
        return value.to_string();
    }
    let mut filter = String::from("warn");
    for name in CRATES {
        filter.push_str(&format!(",{name}={value}"));
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_expands_to_every_crate() {
        let filter = expand_gapedit_log("trace");
        assert!(filter.starts_with("warn,"));
        for name in CRATES {
            assert!(filter.contains(&format!("{name}=trace")), "{filter}");
        }
    }

    #[test]
    fn directives_pass_through() {
        assert_eq!(
            expand_gapedit_log("gapedit_text=trace"),
            "gapedit_text=trace"
        );
        assert_eq!(expand_gapedit_log("info,gapedit=debug"), "info,gapedit=debug");
    }

    #[test]
    fn override_with_extension_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.log");
        let (resolved_dir, name) = resolve_log_path(Some(path));
        assert_eq!(resolved_dir, dir.path());
        assert_eq!(name, "session.log");
    }

    #[test]
    fn override_without_extension_names_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (resolved_dir, name) = resolve_log_path(Some(dir.path().to_path_buf()));
        assert_eq!(resolved_dir, dir.path());
        assert_eq!(name, format!("gapedit-{}.log", std::process::id()));
    }

    #[test]
    fn bare_file_name_lands_in_working_directory() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("out.log")));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "out.log");
    }

    #[test]
    fn default_location_is_under_gapedit_logs() {
        let (dir, name) = resolve_log_path(None);
        assert!(dir.ends_with("gapedit/logs"));
        assert!(name.starts_with("gapedit-"));
    }

    #[test]
    fn test_init_is_repeatable() {
        test();
        test();
        tracing::info!("logging twice does not panic");
    }
}
