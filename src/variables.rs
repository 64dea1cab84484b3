//! Variable factory: turns a roster and demand matrix into the five
//! families of decision variables and the side tables needed to look them
//! back up while building the objective and constraints.

use std::collections::HashMap;

use crate::config::{WEEKDAY_FRI, WEEKDAY_SAT};
use crate::domain::{DemandMatrix, Roster};
use crate::model::{Model, VarHandle, VarKind};

/// A weekend is 1 or 2 underlying day-pair indices (the `d` of `p{eid}:{d}-{d+1}`).
/// Two indices for a full Fri/Sat + Sat/Sun weekend, one for a half-weekend
/// at either edge of the schedule.
pub type WeekendGroup = Vec<usize>;

/// Every variable handle the model builder created, keyed for lookup by the
/// objective and constraint builders.
#[derive(Debug, Default)]
pub struct VariableTables {
    pub x: HashMap<(u32, usize, usize), VarHandle>,
    pub day_off: HashMap<(u32, usize), VarHandle>,
    pub pair_off: HashMap<(u32, usize), VarHandle>,
    pub weekend_off: HashMap<(u32, usize), VarHandle>,
    pub excess: HashMap<(usize, usize), VarHandle>,
    /// Weekend index -> underlying day-pair indices, shared by every employee.
    pub weekend_groups: Vec<WeekendGroup>,
}

impl VariableTables {
    pub fn x_vars_for(&self, eid: u32, day: usize) -> impl Iterator<Item = (usize, VarHandle)> + '_ {
        self.x
            .iter()
            .filter(move |((e, d, _), _)| *e == eid && *d == day)
            .map(|((_, _, k), &v)| (*k, v))
    }
}

fn weekday_of(start_day: u32, day: usize) -> u32 {
    (start_day + day as u32) % 7
}

/// Builds the weekend groups implied by `start_day` and the schedule length.
///
/// Endpoints are days whose weekday is Friday or Saturday. Consecutive
/// endpoints normally chunk into `[fri_d, sat_d]` pairs, one weekend per
/// chunk. If the schedule starts on a Saturday the very first endpoint has
/// no preceding Friday in range, so it is recorded alone as a half-weekend
/// before the regular chunking resumes; a trailing unmatched endpoint at
/// the far end of the schedule is likewise recorded alone.
pub fn build_weekend_groups(start_day: u32, n_days: usize) -> Vec<WeekendGroup> {
    let pair_starts: Vec<usize> = (0..n_days)
        .filter(|&d| {
            d + 1 < n_days && matches!(weekday_of(start_day, d), w if w == WEEKDAY_FRI || w == WEEKDAY_SAT)
        })
        .collect();

    let mut groups = Vec::new();
    let mut i = 0;
    if start_day == WEEKDAY_SAT && pair_starts.first().map(|&d| weekday_of(start_day, d)) == Some(WEEKDAY_SAT) {
        groups.push(vec![pair_starts[0]]);
        i = 1;
    }
    while i < pair_starts.len() {
        if i + 1 < pair_starts.len() {
            groups.push(vec![pair_starts[i], pair_starts[i + 1]]);
            i += 2;
        } else {
            groups.push(vec![pair_starts[i]]);
            i += 1;
        }
    }
    groups
}

/// Creates every decision variable named in the model documentation and
/// wires up `model.add_and_linearization` for the `p` family (§C8) and
/// `model.add_or_linearization` for the `w` family (§C9).
pub fn build_variables(model: &mut Model, roster: &Roster, demand: &DemandMatrix, start_day: u32) -> VariableTables {
    let n_days = demand.len();
    let mut tables = VariableTables {
        weekend_groups: build_weekend_groups(start_day, n_days),
        ..VariableTables::default()
    };

    for employee in roster.iter() {
        for day in 0..n_days {
            for (k, _shift) in employee.shifts_on(day).iter().enumerate() {
                let name = format!("x{}:{}:{}", employee.id, day, k);
                let handle = model.add_var(name, VarKind::Binary);
                tables.x.insert((employee.id, day, k), handle);
            }
            let name = format!("d{}:{}", employee.id, day);
            let handle = model.add_var(name, VarKind::Binary);
            tables.day_off.insert((employee.id, day), handle);
        }
    }

    for employee in roster.iter() {
        for day in 0..n_days.saturating_sub(1) {
            let name = format!("p{}:{}-{}", employee.id, day, day + 1);
            let handle = model.add_var(name, VarKind::Binary);
            tables.pair_off.insert((employee.id, day), handle);
            let d_today = tables.day_off[&(employee.id, day)];
            let d_tomorrow = tables.day_off[&(employee.id, day + 1)];
            model.add_and_linearization(handle, &[d_today, d_tomorrow]);
        }
    }

    for employee in roster.iter() {
        for (j, group) in tables.weekend_groups.iter().enumerate() {
            let name = format!("w{}:{}", employee.id, j);
            let handle = model.add_var(name, VarKind::Binary);
            tables.weekend_off.insert((employee.id, j), handle);
            // A weekend is off if *either* of its day-pairs is off (C9: OR,
            // not AND) — a Fri-Sat gap and a Sat-Sun gap both count as "this
            // weekend was taken off", they don't both have to hold. For a
            // single-pair group this degenerates to a plain equality (w = p),
            // which is exactly the half-weekend rule.
            let pairs: Vec<VarHandle> = group.iter().map(|&d| tables.pair_off[&(employee.id, d)]).collect();
            model.add_or_linearization(handle, &pairs);
        }
    }

    for (day, periods) in demand.iter().enumerate() {
        for period in 0..periods.len() {
            let name = format!("y{}:{}", day, period);
            let handle = model.add_var(name, VarKind::NonNegativeInteger);
            tables.excess.insert((day, period), handle);
        }
    }

    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WEEKDAY_MON;

    #[test]
    fn monday_start_single_week_has_one_full_weekend() {
        // Mon=0..Sun=6: Fri=4, Sat=5. pair_starts candidates need d+1<7: d=4,5 qualify (d=5 -> 6 <7 ok).
        let groups = build_weekend_groups(WEEKDAY_MON, 7);
        assert_eq!(groups, vec![vec![4, 5]]);
    }

    #[test]
    fn saturday_start_begins_with_half_weekend() {
        let groups = build_weekend_groups(WEEKDAY_SAT, 14);
        // day0 weekday = SAT -> half weekend [0]; next Fri at weekday offset 6 -> day6, Sat day7.
        assert_eq!(groups[0], vec![0]);
        assert!(groups.iter().any(|g| g == &vec![6, 7]));
    }

    #[test]
    fn two_week_monday_start_has_two_weekends() {
        let groups = build_weekend_groups(WEEKDAY_MON, 14);
        assert_eq!(groups, vec![vec![4, 5], vec![11, 12]]);
    }
}
