//! A small counter set, matching the scope the specification actually calls
//! for: no performance counters beyond the cycle counter itself, but still a
//! minimal retirement/trap tally useful for the fatal-error dump.

/// Per-run counters. Not exposed as CSRs (the cycle counter is the only CSR
/// the guest can read); this exists purely for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Instructions successfully retired (traps do not count).
    pub instructions_retired: u64,
    /// Traps delivered to the guest (includes the timer interrupt).
    pub traps_taken: u64,
    /// `run` batches executed.
    pub batches_run: u64,
}

impl Stats {
    /// A fresh, all-zero counter set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            instructions_retired: 0,
            traps_taken: 0,
            batches_run: 0,
        }
    }
}
