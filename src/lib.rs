//! Workforce schedule optimizer.
//!
//! Builds an integer linear program from a roster and a per-period demand
//! matrix, hands it to a solver through the [`backend::SolverBackend`]
//! trait, and decodes the solution back into per-employee schedules.
//!
//! Pipeline: [`shifts::enumerate_shifts`] -> [`variables::build_variables`]
//! -> [`objective::build_objective`] + [`constraints::build_constraints`]
//! -> [`backend::SolverBackend::solve`]. [`solver::Scheduler`] drives all of
//! it.

pub mod backend;
pub mod config;
pub mod constraints;
pub mod domain;
pub mod error;
pub mod fixtures;
pub mod model;
pub mod objective;
pub mod shifts;
pub mod solver;
pub mod variables;

pub use config::{SchedulerConfig, Weights};
pub use domain::{Capability, Contract, DemandMatrix, Employee, Preference, Roster, WeekendsConfig};
pub use error::SchedulerError;
pub use solver::{EmployeeSchedule, ScheduleReport, Scheduler};
