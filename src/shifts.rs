//! Candidate-shift enumeration.
//!
//! Turns an employee's preferences for a single day into the finite list of
//! contiguous period windows the variable factory may assign them to.

use crate::config::{MAX_SHIFT_IN_PERIODS, MIN_SHIFT_IN_PERIODS, SCHOOL_MIN_SHIFT_IN_PERIODS};
use crate::domain::{Capability, DemandMatrix, Employee, Preference};

/// A contiguous half-open window of periods, `[start, end)`, within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shift {
    pub start: usize,
    pub end: usize,
}

impl Shift {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, period: usize) -> bool {
        period >= self.start && period < self.end
    }
}

/// Fills in `employee.shifts` for every day of `demand`, overwriting any
/// prior contents.
///
/// Shift length is outer, start offset is inner, matching the admissible
/// order the objective and constraint builders rely on for stable `k`
/// indices (the reporter decodes `x{eid}:{d}:{k}` back to this same list).
pub fn enumerate_shifts(employee: &mut Employee, demand: &DemandMatrix, stride: u32) {
    let min_len = if employee.capabilities.contains(Capability::IS_IN_SCHOOL) {
        SCHOOL_MIN_SHIFT_IN_PERIODS
    } else {
        MIN_SHIFT_IN_PERIODS
    };
    let stride = stride.max(1);

    employee.shifts = demand
        .iter()
        .enumerate()
        .map(|(day, periods)| shifts_for_day(employee, day, periods.len(), min_len, stride))
        .collect();
}

fn shifts_for_day(
    employee: &Employee,
    day: usize,
    day_len: usize,
    min_len: u32,
    stride: u32,
) -> Vec<Shift> {
    let mut shifts = Vec::new();
    if day_len == 0 {
        return shifts;
    }
    let day_len = day_len as u32;

    let mut length = min_len;
    while length <= MAX_SHIFT_IN_PERIODS {
        let mut start = 0u32;
        while start + length <= day_len {
            let window = Shift {
                start: start as usize,
                end: (start + length) as usize,
            };
            if !covers_unavailable(employee, day, window) {
                shifts.push(window);
            }
            start += stride;
        }
        length += 1;
    }
    shifts
}

fn covers_unavailable(employee: &Employee, day: usize, window: Shift) -> bool {
    (window.start..window.end).any(|p| employee.preference_at(day, p) == Preference::Unavailable)
}

/// True if any period of `shift` is marked UNDESIRABLE for `employee` on `day`.
pub fn touches_undesirable(employee: &Employee, day: usize, shift: Shift) -> bool {
    (shift.start..shift.end).any(|p| employee.preference_at(day, p) == Preference::Undesirable)
}
