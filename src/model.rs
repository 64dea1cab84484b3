//! Solver-agnostic linear model: variables, linear expressions and
//! constraints, built up without ever naming a concrete solver crate.
//!
//! [`crate::backend::SolverBackend`] is the only thing downstream of this
//! module that is allowed to know which solver actually runs.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Opaque handle to a variable. Indexes into [`Model::variables`]; carries
/// no meaning outside the `Model` that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarHandle(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Binary,
    NonNegativeInteger,
}

#[derive(Debug, Clone)]
pub struct VarSpec {
    pub name: String,
    pub kind: VarKind,
}

/// A weighted sum of variables plus a constant term.
#[derive(Debug, Clone, Default)]
pub struct LinExpr {
    pub terms: BTreeMap<VarHandle, f64>,
    pub constant: f64,
}

impl LinExpr {
    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    pub fn term(var: VarHandle, coeff: f64) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(var, coeff);
        Self { terms, constant: 0.0 }
    }

    pub fn add_term(&mut self, var: VarHandle, coeff: f64) {
        *self.terms.entry(var).or_insert(0.0) += coeff;
    }
}

impl From<VarHandle> for LinExpr {
    fn from(var: VarHandle) -> Self {
        LinExpr::term(var, 1.0)
    }
}

impl Add for LinExpr {
    type Output = LinExpr;
    fn add(mut self, rhs: LinExpr) -> LinExpr {
        self += rhs;
        self
    }
}

impl AddAssign for LinExpr {
    fn add_assign(&mut self, rhs: LinExpr) {
        for (var, coeff) in rhs.terms {
            self.add_term(var, coeff);
        }
        self.constant += rhs.constant;
    }
}

impl Sub for LinExpr {
    type Output = LinExpr;
    fn sub(self, rhs: LinExpr) -> LinExpr {
        self + rhs * -1.0
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;
    fn mul(mut self, scalar: f64) -> LinExpr {
        for coeff in self.terms.values_mut() {
            *coeff *= scalar;
        }
        self.constant *= scalar;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    Eq,
    Leq,
    Geq,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    pub name: Option<String>,
    pub lhs: LinExpr,
    pub op: ConstraintOp,
    pub rhs: f64,
}

/// A complete ILP: variables, constraints, and a minimization objective.
///
/// Built incrementally by the variable/objective/constraint factories, then
/// handed as a whole to a [`crate::backend::SolverBackend`].
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub variables: Vec<VarSpec>,
    pub objective: LinExpr,
    pub constraints: Vec<Constraint>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_var(&mut self, name: impl Into<String>, kind: VarKind) -> VarHandle {
        let handle = VarHandle(self.variables.len());
        self.variables.push(VarSpec {
            name: name.into(),
            kind,
        });
        handle
    }

    pub fn variable_name(&self, handle: VarHandle) -> &str {
        &self.variables[handle.0].name
    }

    pub fn add_to_objective(&mut self, term: LinExpr) {
        self.objective += term;
    }

    fn push_constraint(&mut self, lhs: LinExpr, op: ConstraintOp, rhs: f64, name: Option<String>) {
        self.constraints.push(Constraint { name, lhs, op, rhs });
    }

    pub fn add_eq(&mut self, lhs: LinExpr, rhs: f64) {
        self.push_constraint(lhs, ConstraintOp::Eq, rhs, None);
    }

    pub fn add_leq(&mut self, lhs: LinExpr, rhs: f64) {
        self.push_constraint(lhs, ConstraintOp::Leq, rhs, None);
    }

    pub fn add_geq(&mut self, lhs: LinExpr, rhs: f64) {
        self.push_constraint(lhs, ConstraintOp::Geq, rhs, None);
    }

    pub fn add_named_eq(&mut self, name: impl Into<String>, lhs: LinExpr, rhs: f64) {
        self.push_constraint(lhs, ConstraintOp::Eq, rhs, Some(name.into()));
    }

    pub fn add_named_leq(&mut self, name: impl Into<String>, lhs: LinExpr, rhs: f64) {
        self.push_constraint(lhs, ConstraintOp::Leq, rhs, Some(name.into()));
    }

    pub fn add_named_geq(&mut self, name: impl Into<String>, lhs: LinExpr, rhs: f64) {
        self.push_constraint(lhs, ConstraintOp::Geq, rhs, Some(name.into()));
    }

    /// Adds the shared AND-linearization (§4.5) for `z = AND(terms)`:
    /// `z <= x_i` for every term, and `z >= sum(x_i) - (n - 1)`.
    pub fn add_and_linearization(&mut self, z: VarHandle, terms: &[VarHandle]) {
        for &x in terms {
            self.add_leq(LinExpr::from(z) - LinExpr::from(x), 0.0);
        }
        // z >= sum(x_i) - (n - 1), rearranged as z - sum(x_i) >= -(n - 1).
        let mut lhs = LinExpr::from(z);
        for &x in terms {
            lhs.add_term(x, -1.0);
        }
        self.add_geq(lhs, -(terms.len() as f64 - 1.0));
    }

    /// Adds the OR-linearization for `z = OR(terms)`: `z >= x_i` for every
    /// term, and `z <= sum(x_i)`. For a single-element `terms`, this
    /// degenerates to `z = x_1`, identically to `add_and_linearization`.
    pub fn add_or_linearization(&mut self, z: VarHandle, terms: &[VarHandle]) {
        let mut sum = LinExpr::default();
        for &x in terms {
            self.add_geq(LinExpr::from(z) - LinExpr::from(x), 0.0);
            sum.add_term(x, 1.0);
        }
        self.add_leq(LinExpr::from(z) - sum, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linexpr_addition_merges_coefficients() {
        let mut model = Model::new();
        let a = model.add_var("a", VarKind::Binary);
        let expr = LinExpr::from(a) + LinExpr::from(a);
        assert_eq!(expr.terms.get(&a), Some(&2.0));
    }

    #[test]
    fn and_linearization_emits_n_plus_one_constraints() {
        let mut model = Model::new();
        let z = model.add_var("z", VarKind::Binary);
        let x1 = model.add_var("x1", VarKind::Binary);
        let x2 = model.add_var("x2", VarKind::Binary);
        let before = model.constraints.len();
        model.add_and_linearization(z, &[x1, x2]);
        assert_eq!(model.constraints.len() - before, 3);
    }

    #[test]
    fn or_linearization_emits_n_plus_one_constraints() {
        let mut model = Model::new();
        let z = model.add_var("z", VarKind::Binary);
        let x1 = model.add_var("x1", VarKind::Binary);
        let x2 = model.add_var("x2", VarKind::Binary);
        let before = model.constraints.len();
        model.add_or_linearization(z, &[x1, x2]);
        assert_eq!(model.constraints.len() - before, 3);
    }
}
