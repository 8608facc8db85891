//! Planner configuration.

/// Options controlling a scheduling run.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Spread each track's courses across terms in proportion to its share
    /// of the remaining work (first pass only).
    pub balance_tracks_evenly: bool,
    /// Run the second, unbalanced pass that fills gaps left by the first.
    pub backfill: bool,
    /// Let the backfill pass place courses at or past the graduation
    /// deadline. Such courses are still reported as overflow.
    ///
    /// Off by default so every placement in a result stays before
    /// `terms_to_graduate`; anything that does not fit is left unscheduled
    /// in overflow instead. Turn it on to get a suggested term for those
    /// courses anyway.
    pub backfill_past_deadline: bool,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            balance_tracks_evenly: true,
            backfill: true,
            backfill_past_deadline: false,
            verbosity: 0,
        }
    }
}

impl PlannerConfig {
    /// Same configuration with track balancing switched on or off.
    pub fn with_balancing(mut self, enabled: bool) -> Self {
        self.balance_tracks_evenly = enabled;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }
}
