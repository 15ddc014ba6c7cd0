//! Utilities: logging setup (verbosity flags -> env_logger level).
//!
//! Key items:
//!   derive_level / init_logging

/// Logging helpers.
pub mod logging {
    use log::LevelFilter;

    /// Environment variable that overrides the flag-derived filter (env_logger syntax).
    pub const LOG_ENV: &str = "SUPERVISOR_LOG";

    /// `-q` -> errors only, default -> warnings, `-v` -> info, `-vv` -> debug, more -> trace.
    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Error;
        }
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Install the global logger. Output goes to stderr; stdout carries the report.
    pub fn init_logging(level: LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_env(LOG_ENV)
            .format_timestamp_millis()
            .target(env_logger::Target::Stderr)
            .try_init();
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn quiet_wins_over_verbose() {
            assert_eq!(derive_level(3, true), LevelFilter::Error);
        }

        #[test]
        fn verbosity_steps() {
            assert_eq!(derive_level(0, false), LevelFilter::Warn);
            assert_eq!(derive_level(1, false), LevelFilter::Info);
            assert_eq!(derive_level(2, false), LevelFilter::Debug);
            assert_eq!(derive_level(9, false), LevelFilter::Trace);
        }
    }
}

pub use logging::{derive_level, init_logging};
