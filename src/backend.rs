//! The only module in this crate allowed to name a concrete solver vendor.
//!
//! Everything above this layer (variables, objective, constraints) talks to
//! [`Model`] and never imports `good_lp` directly, so swapping solvers means
//! writing a new `SolverBackend` impl, not touching the model-building code.

use std::collections::HashMap;

use good_lp::{variable, Expression, Solution, SolverModel};

use crate::model::{ConstraintOp, Model, VarHandle, VarKind};

/// Outcome of a solve, independent of the vendor's own status enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    Timeout,
}

/// A solved model: variable values keyed by the same [`VarHandle`]s the
/// caller built the model with, plus the realized objective value.
#[derive(Debug, Clone)]
pub struct SolvedModel {
    pub status: SolverStatus,
    pub objective_value: f64,
    values: HashMap<VarHandle, f64>,
}

impl SolvedModel {
    pub fn value(&self, var: VarHandle) -> f64 {
        self.values.get(&var).copied().unwrap_or(0.0)
    }

    /// Rounds to the nearest integer; binary/integer variables can come back
    /// with tiny floating-point noise (e.g. `0.999999998`).
    pub fn int_value(&self, var: VarHandle) -> i64 {
        self.value(var).round() as i64
    }
}

/// Everything the model builder assumes of its solver (§10.4/§6 of the
/// model documentation): create a minimization problem, declare variables
/// with bounds and category, add linear constraints, solve within a
/// relative-gap and time budget, then query values back out.
pub trait SolverBackend {
    fn solve(&self, model: &Model, gap_rel: f64, time_limit_secs: Option<u64>) -> Result<SolvedModel, String>;
}

/// [`SolverBackend`] implemented on top of `good_lp`'s CBC binding.
#[derive(Debug, Default)]
pub struct CbcBackend;

impl SolverBackend for CbcBackend {
    fn solve(&self, model: &Model, gap_rel: f64, time_limit_secs: Option<u64>) -> Result<SolvedModel, String> {
        let mut builder = good_lp::variables!();
        let mut handles = Vec::with_capacity(model.variables.len());
        for spec in &model.variables {
            let def = match spec.kind {
                VarKind::Binary => variable().binary(),
                VarKind::NonNegativeInteger => variable().integer().min(0.0),
            };
            handles.push(builder.add(def));
        }

        let objective = to_expression(&model.objective, &handles);
        let mut problem = builder.minimise(objective).using(good_lp::default_solver);
        problem.set_parameter("ratioGap", &gap_rel.to_string());
        if let Some(limit) = time_limit_secs {
            problem.set_parameter("sec", &limit.to_string());
        }

        let mut with_constraints = problem;
        for constraint in &model.constraints {
            let lhs = to_expression(&constraint.lhs, &handles);
            let built = match constraint.op {
                ConstraintOp::Eq => lhs.eq(constraint.rhs),
                ConstraintOp::Leq => lhs.leq(constraint.rhs),
                ConstraintOp::Geq => lhs.geq(constraint.rhs),
            };
            with_constraints = with_constraints.with(built);
        }

        let solution = match with_constraints.solve() {
            Ok(solution) => solution,
            Err(good_lp::ResolutionError::Infeasible) => {
                return Ok(SolvedModel {
                    status: SolverStatus::Infeasible,
                    objective_value: f64::NAN,
                    values: HashMap::new(),
                })
            }
            Err(good_lp::ResolutionError::Unbounded) => {
                return Ok(SolvedModel {
                    status: SolverStatus::Unbounded,
                    objective_value: f64::NAN,
                    values: HashMap::new(),
                })
            }
            Err(other) => return Err(other.to_string()),
        };

        // CBC can return a solution that isn't proven optimal (e.g. it ran
        // out of the `sec` time budget but still had a feasible incumbent);
        // report that distinction instead of claiming optimality it never
        // proved.
        let raw = solution.model();
        let status = if raw.is_proven_optimal() {
            SolverStatus::Optimal
        } else if raw.is_seconds_limit_reached() {
            SolverStatus::Timeout
        } else {
            SolverStatus::Feasible
        };

        let mut values = HashMap::with_capacity(handles.len());
        for (idx, handle) in handles.iter().enumerate() {
            values.insert(VarHandle(idx), solution.value(*handle));
        }
        let objective_value = model
            .objective
            .terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var).copied().unwrap_or(0.0))
            .sum::<f64>()
            + model.objective.constant;

        Ok(SolvedModel {
            status,
            objective_value,
            values,
        })
    }
}

fn to_expression(expr: &crate::model::LinExpr, handles: &[good_lp::Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for (var, coeff) in &expr.terms {
        out += *coeff * handles[var.0];
    }
    out
}
