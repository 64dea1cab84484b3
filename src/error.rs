//! Error type for the scheduling core.
//!
//! Kept as a hand-written enum rather than pulled in through a derive macro,
//! matching the error style already used elsewhere in this source tree (see
//! `RoutingError` in the vehicle-routing crate this package was split from).

use std::fmt;

/// Everything that can go wrong building or solving a schedule.
///
/// `Timeout` is deliberately absent: hitting the solver's time limit still
/// returns a solution (see `SolverStatus::Timeout`), it is not a failure.
#[derive(Debug)]
pub enum SchedulerError {
    /// The roster or demand matrix was malformed in a way the model builder
    /// refuses to paper over: a duplicate employee id, an out-of-range
    /// weekday, a day with no eligible opener/closer, etc.
    Construction(String),
    /// The solver proved the model has no feasible solution.
    Infeasible,
    /// The solver backend itself failed (not an infeasibility verdict).
    Solver(String),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::Construction(msg) => write!(f, "model construction error: {msg}"),
            SchedulerError::Infeasible => write!(f, "solver reported the model is infeasible"),
            SchedulerError::Solver(msg) => write!(f, "solver error: {msg}"),
        }
    }
}

impl std::error::Error for SchedulerError {}
