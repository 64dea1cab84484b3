//! Orchestration: wires the domain, shift enumerator, variable factory,
//! objective/constraint builders and solver backend together, and reports
//! the solved schedule back out.

use tracing::{debug, info, warn};

use crate::backend::{CbcBackend, SolverBackend, SolverStatus, SolvedModel};
use crate::config::{SchedulerConfig, WEEKDAY_SUN};
use crate::constraints::{build_constraints, check_opener_closer_feasibility};
use crate::domain::{DemandMatrix, Roster};
use crate::error::SchedulerError;
use crate::model::Model;
use crate::objective::build_objective;
use crate::shifts::enumerate_shifts;
use crate::variables::{build_variables, VariableTables};

/// Owns a roster, a demand matrix and the knobs to build and solve a
/// schedule for them. Construction enumerates every employee's candidate
/// shifts and runs the fail-fast opener/closer check; [`Scheduler::run`]
/// builds the model and hands it to a [`SolverBackend`].
pub struct Scheduler {
    roster: Roster,
    demand: DemandMatrix,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(mut roster: Roster, demand: DemandMatrix, mut config: SchedulerConfig) -> Result<Self, SchedulerError> {
        if config.start_day > WEEKDAY_SUN {
            return Err(SchedulerError::Construction(format!(
                "start_day must be in 0..=6, got {}",
                config.start_day
            )));
        }
        if !config.weights.is_normalized() {
            warn!(
                weights = ?config.weights,
                "objective weights do not sum to 1.0, falling back to defaults"
            );
            config.weights = crate::config::Weights::default();
        }

        for employee in roster.iter_mut() {
            enumerate_shifts(employee, &demand, config.shift_start_interval);
        }
        debug!(employees = roster.count(), days = demand.len(), "shift enumeration done");

        check_opener_closer_feasibility(&roster, &demand)?;

        Ok(Self { roster, demand, config })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Builds the ILP and solves it, returning a decoded report.
    ///
    /// `time_limit_secs` overrides `self.config.time_limit_secs` for this
    /// call only.
    pub fn run(&self, time_limit_secs: Option<u64>) -> Result<ScheduleReport, SchedulerError> {
        self.run_with(&CbcBackend, time_limit_secs)
    }

    pub fn run_with(&self, backend: &impl SolverBackend, time_limit_secs: Option<u64>) -> Result<ScheduleReport, SchedulerError> {
        let mut model = Model::new();
        let tables = build_variables(&mut model, &self.roster, &self.demand, self.config.start_day);
        debug!(variables = model.variables.len(), "variables created");

        build_objective(
            &mut model,
            &self.roster,
            &self.demand,
            &tables,
            &self.config.weights,
            self.config.objective_seed,
        );
        build_constraints(&mut model, &self.roster, &self.demand, &tables);
        debug!(constraints = model.constraints.len(), "model fully built");

        let time_limit = time_limit_secs.or(self.config.time_limit_secs);
        info!(accuracy = self.config.accuracy, ?time_limit, "solve started");
        let solved = backend
            .solve(&model, self.config.accuracy, time_limit)
            .map_err(SchedulerError::Solver)?;
        info!(status = ?solved.status, objective = solved.objective_value, "solve finished");

        if solved.status == SolverStatus::Infeasible {
            return Err(SchedulerError::Infeasible);
        }

        Ok(decode_report(&self.roster, &self.demand, &model, &tables, &solved))
    }
}

/// One employee's realized schedule: which shift (if any) they work on
/// each day, and the resulting weekly hour totals.
#[derive(Debug, Clone)]
pub struct EmployeeSchedule {
    pub employee_id: u32,
    /// `day -> Some(shift_index)` if working, `None` if the day is off.
    pub assignments: Vec<Option<usize>>,
    pub weekly_hours: Vec<u32>,
}

#[derive(Debug, Clone)]
pub struct ScheduleReport {
    pub status: SolverStatus,
    pub objective_value: f64,
    pub employees: Vec<EmployeeSchedule>,
    pub total_excess_periods: u32,
}

fn decode_report(
    roster: &Roster,
    demand: &DemandMatrix,
    _model: &Model,
    tables: &VariableTables,
    solved: &SolvedModel,
) -> ScheduleReport {
    let n_days = demand.len();
    let mut employees = Vec::with_capacity(roster.count());

    for employee in roster.iter() {
        let mut assignments = vec![None; n_days];
        for day in 0..n_days {
            for (k, _) in employee.shifts_on(day).iter().enumerate() {
                let var = tables.x[&(employee.id, day, k)];
                if solved.int_value(var) == 1 {
                    assignments[day] = Some(k);
                    break;
                }
            }
        }

        let mut weekly_hours = Vec::new();
        for week_start in (0..n_days).step_by(7) {
            let week_end = (week_start + 7).min(n_days);
            let periods: usize = (week_start..week_end)
                .filter_map(|d| assignments[d].map(|k| employee.shifts_on(d)[k].len()))
                .sum();
            weekly_hours.push(periods as u32 / crate::config::PERIODS_PER_HOUR);
        }

        employees.push(EmployeeSchedule {
            employee_id: employee.id,
            assignments,
            weekly_hours,
        });
    }

    let total_excess_periods: u32 = tables
        .excess
        .values()
        .map(|&var| solved.int_value(var).max(0) as u32)
        .sum();

    ScheduleReport {
        status: solved.status,
        objective_value: solved.objective_value,
        employees,
        total_excess_periods,
    }
}

/// A variable name decoded back into its family and integer fields, per the
/// grammar in the external-interfaces documentation. Used by tests that
/// check the encode/decode round trip rather than by the solver path
/// itself, which keeps handles around and never needs to re-parse names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedVarName {
    Shift { eid: u32, day: usize, k: usize },
    DayOff { eid: u32, day: usize },
    PairOff { eid: u32, day: usize },
    WeekendOff { eid: u32, weekend: usize },
    Excess { day: usize, period: usize },
}

pub fn parse_variable_name(name: &str) -> Option<ParsedVarName> {
    let (tag, rest) = name.split_at(1);
    match tag {
        "x" => {
            let mut parts = rest.split(':');
            let eid = parts.next()?.parse().ok()?;
            let day = parts.next()?.parse().ok()?;
            let k = parts.next()?.parse().ok()?;
            Some(ParsedVarName::Shift { eid, day, k })
        }
        "d" => {
            let mut parts = rest.split(':');
            let eid = parts.next()?.parse().ok()?;
            let day = parts.next()?.parse().ok()?;
            Some(ParsedVarName::DayOff { eid, day })
        }
        "p" => {
            let mut parts = rest.split(':');
            let eid = parts.next()?.parse().ok()?;
            let range = parts.next()?;
            let day = range.split('-').next()?.parse().ok()?;
            Some(ParsedVarName::PairOff { eid, day })
        }
        "w" => {
            let mut parts = rest.split(':');
            let eid = parts.next()?.parse().ok()?;
            let weekend = parts.next()?.parse().ok()?;
            Some(ParsedVarName::WeekendOff { eid, weekend })
        }
        "y" => {
            let mut parts = rest.split(':');
            let day = parts.next()?.parse().ok()?;
            let period = parts.next()?.parse().ok()?;
            Some(ParsedVarName::Excess { day, period })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_family() {
        assert_eq!(
            parse_variable_name("x12345678:3:2"),
            Some(ParsedVarName::Shift { eid: 12345678, day: 3, k: 2 })
        );
        assert_eq!(
            parse_variable_name("d12345678:3"),
            Some(ParsedVarName::DayOff { eid: 12345678, day: 3 })
        );
        assert_eq!(
            parse_variable_name("p12345678:3-4"),
            Some(ParsedVarName::PairOff { eid: 12345678, day: 3 })
        );
        assert_eq!(
            parse_variable_name("w12345678:1"),
            Some(ParsedVarName::WeekendOff { eid: 12345678, weekend: 1 })
        );
        assert_eq!(parse_variable_name("y3:7"), Some(ParsedVarName::Excess { day: 3, period: 7 }));
    }

    #[test]
    fn rejects_unknown_family_tags() {
        assert_eq!(parse_variable_name("z1:2"), None);
    }
}
