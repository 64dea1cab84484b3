//! Tunable constants and defaults for the scheduling model.
//!
//! Every constant here can be overridden at `Scheduler` construction time;
//! the values below are only ever used as fallbacks.

/// Number of periods in one hour. A period is the model's atomic time slot.
pub const PERIODS_PER_HOUR: u32 = 2;

/// Distance, in periods, between candidate shift start times.
pub const SHIFT_START_INTERVAL: u32 = 1;

/// Shift length used when callers don't enumerate a specific length.
pub const DEFAULT_SHIFT_IN_PERIODS: u32 = 16;

/// Shortest shift the enumerator will ever propose (absent IS_IN_SCHOOL).
pub const MIN_SHIFT_IN_PERIODS: u32 = 8;

/// Longest shift the enumerator will ever propose.
pub const MAX_SHIFT_IN_PERIODS: u32 = 16;

/// Shortest shift allowed for an employee flagged IS_IN_SCHOOL.
pub const SCHOOL_MIN_SHIFT_IN_PERIODS: u32 = 2 * PERIODS_PER_HOUR;

/// Default cap on shifts worked within any rolling 7-day window.
pub const DEFAULT_WEEKLY_MAXIMUM_SHIFTS: u32 = 5;

/// Longest run of consecutive workdays permitted for any employee.
pub const MAX_CONSECUTIVE_WORKDAYS: u32 = 7;

/// Default solver relative-gap tolerance: stop once within 15% of the best bound.
pub const DEFAULT_OPT_ACCURACY: f64 = 0.15;

/// Tag value for `Preference::Undesirable`. Kept numerically equal to
/// `PREFERENCE_VIOLATION_WEIGHT` on purpose (see module docs on `Preference`),
/// but the two are distinct named constants so the "tag" and "multiplier"
/// uses never get silently conflated again.
pub const PREFERENCE_UNDESIRABLE_TAG: u32 = 8;

/// Objective multiplier applied to a shift that touches an UNDESIRABLE period.
pub const PREFERENCE_VIOLATION_WEIGHT: f64 = 8.0;

/// Weekday index constants, Monday = 0.
pub const WEEKDAY_MON: u32 = 0;
pub const WEEKDAY_FRI: u32 = 4;
pub const WEEKDAY_SAT: u32 = 5;
pub const WEEKDAY_SUN: u32 = 6;

/// Upper/lower bounds for randomly generated 8-digit employee ids.
pub const ID_LOWER_BOUND: u32 = 10_000_000;
pub const ID_UPPER_BOUND: u32 = 99_999_999;

/// Bounded retry count for random id generation before giving up.
pub const MAX_ID_GENERATION_ATTEMPTS: u32 = 2500;

/// Weights for the four objective terms. Must sum to (approximately) 1.0;
/// `Scheduler::new` falls back to [`Weights::default`] and logs a warning
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Weights {
    pub preference: f64,
    pub day_pairs_off: f64,
    pub weekends_off: f64,
    pub excess_workforce: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            preference: 0.25,
            day_pairs_off: 0.25,
            weekends_off: 0.25,
            excess_workforce: 0.25,
        }
    }
}

impl Weights {
    /// True if the four terms sum to 1.0 within floating-point tolerance.
    pub fn is_normalized(&self) -> bool {
        const TOLERANCE: f64 = 1e-9;
        let sum = self.preference + self.day_pairs_off + self.weekends_off + self.excess_workforce;
        (sum - 1.0).abs() < TOLERANCE
    }
}

/// Solver- and calendar-related knobs a `Scheduler` is built with.
///
/// Mirrors the constructor-level overrides named in the external-interface
/// contract: everything here has a sensible default so a `Scheduler` can be
/// built from just a roster and a demand matrix.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub weights: Weights,
    /// Weekday index (0 = Monday) that day 0 of the schedule falls on.
    pub start_day: u32,
    pub shift_start_interval: u32,
    pub accuracy: f64,
    pub time_limit_secs: Option<u64>,
    pub debug: bool,
    /// Seed for the RNG used to pick the weekly paired-day-off reward term.
    /// Fixing this makes two runs over the same roster produce an isomorphic
    /// model (see `Scheduler::new` docs).
    pub objective_seed: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            start_day: WEEKDAY_MON,
            shift_start_interval: SHIFT_START_INTERVAL,
            accuracy: DEFAULT_OPT_ACCURACY,
            time_limit_secs: None,
            debug: false,
            objective_seed: 0,
        }
    }
}
