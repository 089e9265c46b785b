//! Logger setup for the `scout` binary.
//!
//! Logs always go to a file (`./scout.log` unless overridden); `-v` mirrors
//! them to stderr so stdout stays reserved for results.

use std::path::PathBuf;

use engine_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;

pub(crate) fn initialize(verbose: u8, log_file: Option<PathBuf>) {
    let (level, destination) = log_setup(verbose, log_file);
    engine_logging::initialize(level, destination);
}

fn log_setup(verbose: u8, log_file: Option<PathBuf>) -> (LevelFilter, LogDestination) {
    let path = log_file.unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    match verbose {
        0 => (LevelFilter::Info, LogDestination::File(path)),
        1 => (LevelFilter::Info, LogDestination::Both(path)),
        2 => (LevelFilter::Debug, LogDestination::Both(path)),
        _ => (LevelFilter::Trace, LogDestination::Both(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_selects_level_and_terminal_mirror() {
        let file = PathBuf::from(DEFAULT_LOG_FILE);
        assert_eq!(
            log_setup(0, None),
            (LevelFilter::Info, LogDestination::File(file.clone()))
        );
        assert_eq!(
            log_setup(2, None),
            (LevelFilter::Debug, LogDestination::Both(file))
        );
        assert_eq!(log_setup(9, None).0, LevelFilter::Trace);
    }

    #[test]
    fn explicit_log_file_is_used() {
        let custom = PathBuf::from("/tmp/scout-test.log");
        let (_, destination) = log_setup(1, Some(custom.clone()));
        assert_eq!(destination, LogDestination::Both(custom));
    }
}
