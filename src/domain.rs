//! Domain model for workforce scheduling: employees, their roster, and the
//! per-period demand they are scheduled against.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ID_LOWER_BOUND, ID_UPPER_BOUND, MAX_ID_GENERATION_ATTEMPTS};
use crate::shifts::Shift;

/// Minimum employees required for every period of every day.
///
/// `demand[d][p]` is the headcount required during period `p` of day `d`.
/// Days may have different lengths (`demand[d].len()` need not be constant),
/// but the weekly constraints (§C5/C6/C7 of the model) assume
/// `demand.len()` is a multiple of 7.
pub type DemandMatrix = Vec<Vec<u32>>;

/// An employee's contract kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contract {
    FullTime,
    PartTime,
}

bitflags! {
    /// Boolean attributes of an employee that can gate shift eligibility.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Capability: u8 {
        const CAN_OPEN     = 0b0000_0001;
        const CAN_CLOSE    = 0b0000_0010;
        const IS_STUDENT   = 0b0000_0100;
        const IS_IN_SCHOOL = 0b0000_1000;
        const HAS_KEYS     = 0b0001_0000;
    }
}

/// An employee's stated availability/desire for a specific period.
///
/// The numeric value of `Undesirable` is intentionally kept equal to
/// [`crate::config::PREFERENCE_VIOLATION_WEIGHT`] (8), but the objective
/// builder never reads this tag's discriminant as a weight — it looks up
/// the named constant instead. The two values being equal is a fact about
/// this model, not a mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preference {
    Normal = 0,
    Unavailable = 1,
    Undesirable = 8,
}

/// Which weekends an employee must have off.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekendsConfig {
    /// Weekend indices that must be fully off for this employee.
    pub single: Vec<usize>,
    /// `(minimum_off, [weekend_indices])` groups: at least `minimum_off` of
    /// the listed weekend indices must be off.
    pub groups: Vec<(u32, Vec<usize>)>,
}

/// An employee who can be assigned to shifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: u32,
    pub name: String,
    pub contract: Contract,
    pub min_hours: u32,
    pub max_hours: u32,
    pub max_shifts: u32,
    pub seniority: f64,
    pub capabilities: Capability,
    /// Consecutive days already worked immediately before day 0 of this
    /// schedule, in `[0, MAX_CONSECUTIVE_WORKDAYS]`.
    pub streak: u32,
    pub weekends_config: WeekendsConfig,
    /// `day_index -> (period_index -> Preference)`. Absent entries default
    /// to `Preference::Normal`.
    pub preferences: BTreeMap<usize, BTreeMap<usize, Preference>>,
    /// Admissible contiguous shifts per day, populated by
    /// [`crate::shifts::enumerate_shifts`]. Empty until that call has run.
    #[serde(skip)]
    pub(crate) shifts: Vec<Vec<Shift>>,
}

impl Employee {
    pub fn new(id: u32, name: impl Into<String>, contract: Contract, min_hours: u32) -> Self {
        Self {
            id,
            name: name.into(),
            contract,
            min_hours,
            max_hours: min_hours,
            max_shifts: crate::config::DEFAULT_WEEKLY_MAXIMUM_SHIFTS,
            seniority: 0.0,
            capabilities: Capability::empty(),
            streak: 0,
            weekends_config: WeekendsConfig::default(),
            preferences: BTreeMap::new(),
            shifts: Vec::new(),
        }
    }

    pub fn with_max_hours(mut self, max_hours: u32) -> Self {
        self.max_hours = max_hours;
        self
    }

    pub fn with_max_shifts(mut self, max_shifts: u32) -> Self {
        self.max_shifts = max_shifts;
        self
    }

    pub fn with_seniority(mut self, seniority: f64) -> Self {
        self.seniority = seniority;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capability) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_streak(mut self, streak: u32) -> Self {
        self.streak = streak;
        self
    }

    pub fn with_weekends_config(mut self, weekends_config: WeekendsConfig) -> Self {
        self.weekends_config = weekends_config;
        self
    }

    pub fn with_preference(mut self, day: usize, period: usize, preference: Preference) -> Self {
        self.preferences.entry(day).or_default().insert(period, preference);
        self
    }

    /// Preference recorded for `(day, period)`, defaulting to `Normal`.
    pub fn preference_at(&self, day: usize, period: usize) -> Preference {
        self.preferences
            .get(&day)
            .and_then(|periods| periods.get(&period))
            .copied()
            .unwrap_or(Preference::Normal)
    }

    /// Candidate shifts for `day`, empty if shifts have not been enumerated
    /// yet or the day has no admissible window.
    pub fn shifts_on(&self, day: usize) -> &[Shift] {
        self.shifts.get(day).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let periods_per_hour = crate::config::PERIODS_PER_HOUR;
        write!(
            f,
            "ID: {}, Name: {}, Contract: {:?}, Hours: {}-{}, Max shifts: {}, \
             Seniority: {}, Capabilities: {:?}, Streak: {}, Weekends: {:?}, \
             Preferences: {:?}",
            self.id,
            self.name,
            self.contract,
            self.min_hours / periods_per_hour,
            self.max_hours / periods_per_hour,
            self.max_shifts,
            self.seniority,
            self.capabilities,
            self.streak,
            self.weekends_config,
            self.preferences,
        )
    }
}

/// A collection of employees, keyed by unique id.
///
/// Uses a `BTreeMap` rather than a hash map so iteration order (and hence
/// the order constraints/variables are emitted in) is deterministic across
/// runs, which the idempotence property relies on.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    employees: BTreeMap<u32, Employee>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Employee> {
        self.employees.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Employee> {
        self.employees.get_mut(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.employees.contains_key(&id)
    }

    /// Adds `employee`, returning `false` if an employee with this id
    /// already exists (the employee is not inserted in that case).
    pub fn add(&mut self, employee: Employee) -> bool {
        if self.employees.contains_key(&employee.id) {
            return false;
        }
        self.employees.insert(employee.id, employee);
        true
    }

    pub fn remove(&mut self, id: u32) -> Option<Employee> {
        self.employees.remove(&id)
    }

    /// Employees in ascending id order — the order every downstream
    /// component (shift enumerator, variable factory, ...) iterates in.
    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Employee> {
        self.employees.values_mut()
    }

    /// Draws a random, currently-unused 8-digit id.
    ///
    /// Bounded to [`MAX_ID_GENERATION_ATTEMPTS`] tries; returns `None` on
    /// exhaustion rather than looping forever or panicking.
    pub fn generate_employee_id(&self, rng: &mut impl Rng) -> Option<u32> {
        for _ in 0..MAX_ID_GENERATION_ATTEMPTS {
            let candidate = rng.gen_range(ID_LOWER_BOUND..ID_UPPER_BOUND);
            if !self.contains(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(id: u32) -> Employee {
        Employee::new(id, "Test", Contract::FullTime, 76)
    }

    #[test]
    fn roster_add_rejects_duplicate_ids() {
        let mut roster = Roster::new();
        assert!(roster.add(employee(10_000_000)));
        assert!(!roster.add(employee(10_000_000)));
        assert_eq!(roster.count(), 1);
    }

    #[test]
    fn roster_remove_and_lookup() {
        let mut roster = Roster::new();
        roster.add(employee(10_000_001));
        assert!(roster.get(10_000_001).is_some());
        let removed = roster.remove(10_000_001);
        assert!(removed.is_some());
        assert!(roster.get(10_000_001).is_none());
    }

    #[test]
    fn preference_at_defaults_to_normal() {
        let e = employee(10_000_002);
        assert_eq!(e.preference_at(0, 0), Preference::Normal);
    }

    #[test]
    fn with_preference_is_recorded() {
        let e = employee(10_000_003).with_preference(2, 3, Preference::Unavailable);
        assert_eq!(e.preference_at(2, 3), Preference::Unavailable);
        assert_eq!(e.preference_at(2, 4), Preference::Normal);
    }

    #[test]
    fn id_generation_avoids_existing_ids() {
        let mut roster = Roster::new();
        // Force a tiny id space isn't possible without changing constants,
        // but we can at least check generated ids are always unused and in
        // range.
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let id = roster.generate_employee_id(&mut rng).expect("id space is huge");
            assert!(id >= ID_LOWER_BOUND && id < ID_UPPER_BOUND);
            roster.add(Employee::new(id, "X", Contract::PartTime, 30));
        }
        assert_eq!(roster.count(), 20);
    }
}
