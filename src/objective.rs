//! Objective builder: the four weighted terms minimized by the solver.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Weights, PREFERENCE_VIOLATION_WEIGHT};
use crate::domain::{DemandMatrix, Roster};
use crate::model::{LinExpr, Model};
use crate::shifts::touches_undesirable;
use crate::variables::VariableTables;

/// Adds every objective term to `model`.
///
/// The paired-days-off reward (term 2) draws one random pair per employee
/// per complete week using an RNG seeded from `seed`, so two calls with the
/// same seed over the same roster/demand build byte-identical objectives.
pub fn build_objective(
    model: &mut Model,
    roster: &Roster,
    demand: &DemandMatrix,
    tables: &VariableTables,
    weights: &Weights,
    seed: u64,
) {
    let n_days = demand.len();
    let mut rng = StdRng::seed_from_u64(seed);

    for employee in roster.iter() {
        for day in 0..n_days {
            for (k, shift) in employee.shifts_on(day).iter().enumerate() {
                let factor = if touches_undesirable(employee, day, *shift) {
                    PREFERENCE_VIOLATION_WEIGHT
                } else {
                    1.0
                };
                let var = tables.x[&(employee.id, day, k)];
                model.add_to_objective(LinExpr::term(var, weights.preference * factor));
            }

            if day % 7 == 6 {
                let is_last_day = day == n_days - 1;
                // Mirrors the reference implementation's range construction
                // exactly: a complete week normally excludes its own final
                // pair index (day - 1) from the draw; the schedule's last
                // week includes it.
                let (lo, hi) = if is_last_day {
                    (day as i64 - 6, day as i64 - 1)
                } else {
                    (day as i64 - 6, day as i64 - 2)
                };
                if lo >= 0 && lo <= hi {
                    let chosen = rng.gen_range(lo..=hi) as usize;
                    if let Some(&pair_var) = tables.pair_off.get(&(employee.id, chosen)) {
                        model.add_to_objective(LinExpr::term(pair_var, -weights.day_pairs_off));
                    }
                }
            }
        }

        for j in 0..tables.weekend_groups.len() {
            if let Some(&var) = tables.weekend_off.get(&(employee.id, j)) {
                model.add_to_objective(LinExpr::term(var, -weights.weekends_off));
            }
        }
    }

    for &var in tables.excess.values() {
        model.add_to_objective(LinExpr::term(var, weights.excess_workforce));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Contract, Employee};
    use crate::shifts::enumerate_shifts;
    use crate::variables::build_variables;

    #[test]
    fn same_seed_produces_identical_objective() {
        let mut roster = Roster::new();
        let mut e = Employee::new(10_000_000, "A", Contract::FullTime, 76);
        let demand: DemandMatrix = vec![vec![1; 16]; 14];
        enumerate_shifts(&mut e, &demand, 1);
        roster.add(e);

        let mut model1 = Model::new();
        let tables1 = build_variables(&mut model1, &roster, &demand, 0);
        build_objective(&mut model1, &roster, &demand, &tables1, &Weights::default(), 42);

        let mut model2 = Model::new();
        let tables2 = build_variables(&mut model2, &roster, &demand, 0);
        build_objective(&mut model2, &roster, &demand, &tables2, &Weights::default(), 42);

        assert_eq!(model1.objective.terms.len(), model2.objective.terms.len());
        assert_eq!(model1.objective.constant, model2.objective.constant);
    }
}
