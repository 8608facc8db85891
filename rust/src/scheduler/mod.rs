//! Term scheduler: constraints, per-term loads and the greedy placement loop.

mod constraints;
mod core;
mod state;

pub use constraints::{ConstraintSet, NegativeConstraint, PositiveConstraint};
pub use self::core::{
    overflow_courses, schedule_courses, ScheduleOutcome, SchedulerError, TermScheduler,
};
pub use state::TermLoads;
