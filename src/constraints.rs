//! Constraint builder: coverage, capability, hours, shift-count, streak and
//! weekend constraints (C1-C11).

use crate::config::MAX_CONSECUTIVE_WORKDAYS;
use crate::domain::{Capability, DemandMatrix, Roster};
use crate::error::SchedulerError;
use crate::model::{LinExpr, Model};
use crate::variables::VariableTables;

/// Checks, before any variable exists, that every day with at least one
/// period has a capable opener and closer among the roster's enumerated
/// shifts. Surfaces as a construction error rather than an opaque
/// solver-reported infeasibility (§4.5 tie-breaks).
pub fn check_opener_closer_feasibility(roster: &Roster, demand: &DemandMatrix) -> Result<(), SchedulerError> {
    for (day, periods) in demand.iter().enumerate() {
        if periods.is_empty() {
            continue;
        }
        // A day too short to admit any shift at all (e.g. P_d below
        // MIN_SHIFT_IN_PERIODS) has no possible assignment for anyone;
        // requiring a capable opener/closer on it would make every such day
        // infeasible outright instead of the intended "forced day off,
        // solvable iff demand is zero" outcome (C4/C1).
        if roster.iter().all(|e| e.shifts_on(day).is_empty()) {
            continue;
        }
        let day_len = periods.len();
        let has_opener = roster.iter().any(|e| {
            e.capabilities.contains(Capability::CAN_OPEN)
                && e.shifts_on(day).iter().any(|s| s.start == 0)
        });
        if !has_opener {
            return Err(SchedulerError::Construction(format!(
                "day {day} has no eligible opener among the roster's admissible shifts"
            )));
        }
        let has_closer = roster.iter().any(|e| {
            e.capabilities.contains(Capability::CAN_CLOSE)
                && e.shifts_on(day).iter().any(|s| s.end == day_len)
        });
        if !has_closer {
            return Err(SchedulerError::Construction(format!(
                "day {day} has no eligible closer among the roster's admissible shifts"
            )));
        }
    }
    Ok(())
}

/// Adds constraints C1-C7 and C10-C11 to `model`. C8/C9 (the pair-off and
/// weekend-off AND-linearizations) are emitted by
/// [`crate::variables::build_variables`] at the moment those variables are
/// created, since they are definitional rather than scheduling constraints.
pub fn build_constraints(model: &mut Model, roster: &Roster, demand: &DemandMatrix, tables: &VariableTables) {
    build_coverage_and_capability(model, roster, demand, tables);
    for employee in roster.iter() {
        build_employee_constraints(model, employee, demand, tables);
    }
}

fn build_coverage_and_capability(model: &mut Model, roster: &Roster, demand: &DemandMatrix, tables: &VariableTables) {
    for (day, periods) in demand.iter().enumerate() {
        for (period, &required) in periods.iter().enumerate() {
            let mut lhs = LinExpr::default();
            for employee in roster.iter() {
                for (k, shift) in employee.shifts_on(day).iter().enumerate() {
                    if shift.contains(period) {
                        let var = tables.x[&(employee.id, day, k)];
                        lhs.add_term(var, 1.0);
                    }
                }
            }
            let excess = tables.excess[&(day, period)];
            lhs.add_term(excess, -1.0);
            model.add_named_eq(format!("C1:d{day}:p{period}"), lhs, required as f64);
        }

        if periods.is_empty() || roster.iter().all(|e| e.shifts_on(day).is_empty()) {
            continue;
        }
        let day_len = periods.len();

        let mut opening = LinExpr::default();
        let mut closing = LinExpr::default();
        for employee in roster.iter() {
            for (k, shift) in employee.shifts_on(day).iter().enumerate() {
                let var = tables.x[&(employee.id, day, k)];
                if employee.capabilities.contains(Capability::CAN_OPEN) && shift.start == 0 {
                    opening.add_term(var, 1.0);
                }
                if employee.capabilities.contains(Capability::CAN_CLOSE) && shift.end == day_len {
                    closing.add_term(var, 1.0);
                }
            }
        }
        model.add_named_geq(format!("C2:d{day}"), opening, 1.0);
        model.add_named_geq(format!("C3:d{day}"), closing, 1.0);
    }
}

fn build_employee_constraints(
    model: &mut Model,
    employee: &crate::domain::Employee,
    demand: &DemandMatrix,
    tables: &VariableTables,
) {
    let n_days = demand.len();

    for day in 0..n_days {
        let mut lhs = LinExpr::default();
        for (k, _) in employee.shifts_on(day).iter().enumerate() {
            lhs.add_term(tables.x[&(employee.id, day, k)], 1.0);
        }
        lhs.add_term(tables.day_off[&(employee.id, day)], 1.0);
        model.add_named_eq(format!("C4:{}:d{day}", employee.id), lhs, 1.0);
    }

    for day in 0..n_days {
        if day % 7 != 6 {
            continue;
        }
        let first = day.saturating_sub(6);
        let mut hours = LinExpr::default();
        let mut shift_count = LinExpr::default();
        for d in first..=day {
            for (k, shift) in employee.shifts_on(d).iter().enumerate() {
                let var = tables.x[&(employee.id, d, k)];
                hours.add_term(var, shift.len() as f64);
                shift_count.add_term(var, 1.0);
            }
        }
        if employee.min_hours == employee.max_hours {
            model.add_named_eq(
                format!("C5:{}:w{day}", employee.id),
                hours,
                employee.min_hours as f64,
            );
        } else {
            model.add_named_geq(
                format!("C5lo:{}:w{day}", employee.id),
                hours.clone(),
                employee.min_hours as f64,
            );
            model.add_named_leq(
                format!("C5hi:{}:w{day}", employee.id),
                hours,
                employee.max_hours as f64,
            );
        }
        model.add_named_leq(
            format!("C6:{}:w{day}", employee.id),
            shift_count,
            employee.max_shifts as f64,
        );
    }

    let streak_start = MAX_CONSECUTIVE_WORKDAYS.saturating_sub(employee.streak) as usize;
    for day in streak_start..n_days {
        let first = day.saturating_sub(MAX_CONSECUTIVE_WORKDAYS as usize);
        let mut lhs = LinExpr::default();
        for i in first..=day {
            lhs.add_term(tables.day_off[&(employee.id, i)], 1.0);
        }
        model.add_named_geq(format!("C7:{}:d{day}", employee.id), lhs, 1.0);
    }

    for &j in &employee.weekends_config.single {
        if let Some(&var) = tables.weekend_off.get(&(employee.id, j)) {
            model.add_named_eq(format!("C10:{}:w{j}", employee.id), LinExpr::from(var), 1.0);
        }
    }

    for (minimum, indices) in &employee.weekends_config.groups {
        let mut lhs = LinExpr::default();
        for &j in indices {
            if let Some(&var) = tables.weekend_off.get(&(employee.id, j)) {
                lhs.add_term(var, 1.0);
            }
        }
        model.add_named_geq(format!("C11:{}", employee.id), lhs, *minimum as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Contract, Employee};
    use crate::shifts::enumerate_shifts;

    fn demand(days: usize, periods: usize, need: u32) -> DemandMatrix {
        vec![vec![need; periods]; days]
    }

    #[test]
    fn fails_fast_without_an_opener() {
        let mut roster = Roster::new();
        let mut e = Employee::new(10_000_000, "A", Contract::FullTime, 76);
        let d = demand(1, 16, 1);
        enumerate_shifts(&mut e, &d, 1);
        roster.add(e);
        assert!(matches!(
            check_opener_closer_feasibility(&roster, &d),
            Err(SchedulerError::Construction(_))
        ));
    }

    #[test]
    fn passes_with_a_capable_opener_and_closer() {
        let mut roster = Roster::new();
        let mut e = Employee::new(10_000_000, "A", Contract::FullTime, 76)
            .with_capabilities(Capability::CAN_OPEN | Capability::CAN_CLOSE);
        let d = demand(1, 16, 1);
        enumerate_shifts(&mut e, &d, 1);
        roster.add(e);
        assert!(check_opener_closer_feasibility(&roster, &d).is_ok());
    }

    #[test]
    fn skips_days_with_zero_periods() {
        let roster = Roster::new();
        let d: DemandMatrix = vec![vec![]];
        assert!(check_opener_closer_feasibility(&roster, &d).is_ok());
    }

    #[test]
    fn skips_days_too_short_to_admit_any_shift() {
        let mut roster = Roster::new();
        let mut e = Employee::new(10_000_000, "A", Contract::FullTime, 76);
        let d: DemandMatrix = vec![vec![0; 4]];
        enumerate_shifts(&mut e, &d, 1);
        assert!(e.shifts_on(0).is_empty());
        roster.add(e);
        assert!(check_opener_closer_feasibility(&roster, &d).is_ok());
    }
}
