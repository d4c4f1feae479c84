//! Logger setup for the binary.

use log::LevelFilter;

/// Maps the number of `-v` flags to a log level.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initializes `env_logger` writing to stderr.
///
/// The level comes from the command line only; no environment variable is
/// read. Calling this twice is harmless.
pub fn init_logger(verbosity: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for_verbosity(verbosity))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(7), LevelFilter::Trace);
    }

    #[test]
    fn test_init_logger_twice_does_not_panic() {
        init_logger(0);
        init_logger(3);
    }
}
