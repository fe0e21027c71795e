//! Logging setup for arbor: a log file per process plus an optional stderr layer.
//!
//! The file always receives `warn` and above, or the user's filter when one is set. Stderr is
//! used instead of stdout so that the JSON written by `arbor` subcommands stays clean.
//!
//! ## Environment Variables
//!
//! 1. **`ARBOR_LOG`** (highest priority). A bare level such as `debug` applies to every arbor
//!    crate; anything containing `=`, `:` or `,` is used as a full filter.
//! 2. **`RUST_LOG`**, used as-is.
//! 3. **Default**: `warn` globally, `info` for arbor crates.
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/arbor/logs/arbor-<pid>.log`
//! - macOS: `~/Library/Application Support/arbor/logs/arbor-12345.log`
//! - Linux: `~/.local/share/arbor/logs/arbor-12345.log`
//!
//! Override with `--log-file <path>` or `ARBOR_LOG_FILE`. A path with an extension names the file
//! itself, anything else is treated as the directory.

use snafu::{ResultExt, Snafu};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

const ARBOR_CRATES: &[&str] = &["arbor_core", "arbor_syntax", "arbor_bin", "arbor_log"];

#[derive(Debug, Snafu)]
pub enum LogError {
    #[snafu(display("failed to create log directory {}", path.display()))]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("invalid log filter `{directives}`"))]
    Filter {
        directives: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[snafu(display("a global subscriber is already installed"))]
    Install {
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default)]
pub struct LogConfig {
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// Stderr output is enabled when `ARBOR_LOG` or `RUST_LOG` is set, and always in debug builds.
/// Dropping the returned [`LogGuard`] flushes and stops the background file writer.
pub fn init(config: LogConfig) -> Result<LogGuard, LogError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);
    std::fs::create_dir_all(&log_dir).context(CreateDirSnafu { path: &log_dir })?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let user_filter = user_directives();
    let file_directives = user_filter.clone().unwrap_or_else(|| "warn".to_string());
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(build_filter(&file_directives)?);

    let stderr_layer = if user_filter.is_some() || cfg!(debug_assertions) {
        let directives = user_filter.unwrap_or_else(default_directives);
        Some(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(build_filter(&directives)?),
        )
    } else {
        None
    };

    Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context(InstallSnafu)?;

    tracing::debug!(log_file = %log_dir.join(&filename).display(), "logging initialized");

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Writes to the test harness' captured output only. Safe to call from every test; later calls
/// are ignored once a subscriber is installed.
pub fn test() {
    let directives = user_directives().unwrap_or_else(default_directives);
    let Ok(filter) = EnvFilter::try_new(directives) else {
        return;
    };
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("arbor-{}.log", std::process::id());

    match override_path {
        Some(path) if path.extension().is_some() => {
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            (dir, name)
        },
        Some(dir) => (dir, filename),
        None => {
            let dir = dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("arbor")
                .join("logs");
            (dir, filename)
        },
    }
}

fn build_filter(directives: &str) -> Result<EnvFilter, LogError> {
    EnvFilter::try_new(directives).context(FilterSnafu { directives })
}

/// Directives requested through the environment, `ARBOR_LOG` first.
fn user_directives() -> Option<String> {
    directives_from(env::var("ARBOR_LOG").ok(), env::var("RUST_LOG").ok())
}

fn directives_from(arbor_log: Option<String>, rust_log: Option<String>) -> Option<String> {
    if let Some(arbor_log) = arbor_log {
        return Some(expand_arbor_log(&arbor_log));
    }
    rust_log
}

fn default_directives() -> String {
    expand_arbor_log("info")
}

/// `ARBOR_LOG=debug` becomes `warn,arbor_core=debug,...`; filter syntax passes through.
fn expand_arbor_log(arbor_log: &str) -> String {
    if arbor_log.contains('=') || arbor_log.contains(':') || arbor_log.contains(',') {
        return arbor_log.to_string();
    }

    let mut directives = String::from("warn");
    for krate in ARBOR_CRATES {
        directives.push_str(&format!(",{krate}={arbor_log}"));
    }
    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_expands_to_every_crate() {
        assert_eq!(
            expand_arbor_log("debug"),
            "warn,arbor_core=debug,arbor_syntax=debug,arbor_bin=debug,arbor_log=debug"
        );
    }

    #[test]
    fn filter_syntax_passes_through() {
        assert_eq!(expand_arbor_log("arbor_core=trace"), "arbor_core=trace");
        assert_eq!(expand_arbor_log("info,arbor_bin=off"), "info,arbor_bin=off");
    }

    #[test]
    fn arbor_log_wins_over_rust_log() {
        assert_eq!(
            directives_from(Some("trace".into()), Some("error".into())).as_deref(),
            Some("warn,arbor_core=trace,arbor_syntax=trace,arbor_bin=trace,arbor_log=trace")
        );
        assert_eq!(
            directives_from(None, Some("error".into())).as_deref(),
            Some("error")
        );
        assert_eq!(directives_from(None, None), None);
    }

    #[test]
    fn default_directives_parse() {
        assert!(build_filter(&default_directives()).is_ok());
    }

    #[test]
    fn invalid_directives_are_reported() {
        let err = build_filter("arbor_core=notalevel").expect_err("bad level");
        assert!(matches!(err, LogError::Filter { .. }));
    }

    #[test]
    fn override_with_extension_names_the_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("session.log");
        let (dir, name) = resolve_log_path(Some(path));
        assert_eq!(dir, tmp.path());
        assert_eq!(name, "session.log");
    }

    #[test]
    fn override_without_extension_is_a_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let (dir, name) = resolve_log_path(Some(tmp.path().to_path_buf()));
        assert_eq!(dir, tmp.path());
        assert_eq!(name, format!("arbor-{}.log", std::process::id()));
    }

    #[test]
    fn bare_file_name_lands_in_current_dir() {
        let (dir, name) = resolve_log_path(Some(PathBuf::from("arbor.log")));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, "arbor.log");
    }

    #[test]
    fn init_creates_the_log_directory() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let log_dir = tmp.path().join("nested").join("logs");
        let guard = init(LogConfig {
            log_file_path: Some(log_dir.join("run.log")),
        })
        .expect("first init in this process");

        assert!(log_dir.is_dir());
        assert_eq!(guard.log_file, log_dir.join("run.log"));
    }
}
