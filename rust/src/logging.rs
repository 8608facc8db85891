//! Logging macros for the planner with verbosity level control.
//!
//! Nothing is formatted when the level is below the threshold.
//! - 0: SILENT
//! - 1: CHANGES (placements, term advances, graph summaries)
//! - 2: CHECKS (why a course was deferred or a move rejected)
//! - 3: DEBUG (catalog batches, worklist internals)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_CHANGES: u8 = 1;
pub const VERBOSITY_CHECKS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at CHANGES level (verbosity >= 1).
#[macro_export]
macro_rules! log_changes {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHANGES {
            eprintln!("[planner] {}", format_args!($($arg)*));
        }
    };
}

/// Log at CHECKS level (verbosity >= 2).
#[macro_export]
macro_rules! log_checks {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_CHECKS {
            eprintln!("[planner]   {}", format_args!($($arg)*));
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!("[planner]     {}", format_args!($($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(VERBOSITY_SILENT < VERBOSITY_CHANGES);
        assert!(VERBOSITY_CHANGES < VERBOSITY_CHECKS);
        assert!(VERBOSITY_CHECKS < VERBOSITY_DEBUG);
    }

    #[test]
    fn test_arguments_only_evaluated_at_enabled_levels() {
        let evaluated = std::cell::Cell::new(0);
        let count = || {
            evaluated.set(evaluated.get() + 1);
            "A"
        };

        let verbosity = VERBOSITY_SILENT;
        log_changes!(verbosity, "placed {} in term {}", count(), 1);
        log_checks!(verbosity, "deferred {}", count());
        log_debug!(verbosity, "worklist {}", count());
        assert_eq!(evaluated.get(), 0);

        let verbosity = VERBOSITY_CHECKS;
        log_changes!(verbosity, "placed {} in term {}", count(), 1);
        log_checks!(verbosity, "deferred {}", count());
        log_debug!(verbosity, "worklist {}", count());
        assert_eq!(evaluated.get(), 2);
    }
}
