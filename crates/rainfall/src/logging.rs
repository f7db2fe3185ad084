#![forbid(unsafe_code)]

//! File logging setup.
//!
//! The terminal belongs to the renderer, so logs only go to the file named
//! by `RAINFALL_LOG_FILE`. Filter directives come from `RAINFALL_LOG`.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Variable naming the log file.
pub const LOG_FILE_ENV: &str = "RAINFALL_LOG_FILE";

/// Variable holding filter directives.
pub const LOG_FILTER_ENV: &str = "RAINFALL_LOG";

const DEFAULT_FILTER: &str = "info";

/// Build the filter from `directives`, falling back to `info`.
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber when `RAINFALL_LOG_FILE` is set.
///
/// Returns the log path on success. Failures are reported on stderr and
/// leave logging disabled.
pub fn init_from_env() -> Option<PathBuf> {
    let path = PathBuf::from(std::env::var_os(LOG_FILE_ENV)?);
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let directives = std::env::var(LOG_FILTER_ENV).ok();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter_from(directives.as_deref()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    installed.then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_info() {
        assert_eq!(filter_from(None).to_string(), "info");
    }

    #[test]
    fn custom_directives_are_kept() {
        let filter = filter_from(Some("rainfall_runtime=trace"));
        assert_eq!(filter.to_string(), "rainfall_runtime=trace");
    }

    #[test]
    fn invalid_directives_fall_back() {
        assert_eq!(filter_from(Some("rainfall=loud")).to_string(), "info");
    }
}
