use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::types::shift::{Shift, ShiftType};

/// A course offering shifts grouped by type and number. Identified by its
/// `id` across the whole problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: String,
    year: i32,
    shifts: BTreeMap<ShiftType, BTreeMap<i32, Shift>>,
}

impl Course {
    pub fn new(
        id: impl Into<String>,
        year: i32,
        shifts: impl IntoIterator<Item = Shift>,
    ) -> Result<Self, DomainError> {
        let id = id.into();

        if year <= 0 {
            return Err(DomainError::CourseYear {
                course: id,
                year: year.into(),
            });
        }

        let mut grouped: BTreeMap<ShiftType, BTreeMap<i32, Shift>> = BTreeMap::new();
        for shift in shifts {
            let by_number = grouped.entry(shift.kind()).or_default();
            if by_number.contains_key(&shift.number()) {
                return Err(DomainError::DuplicateShift {
                    course: id,
                    shift: shift.name(),
                });
            }

            by_number.insert(shift.number(), shift);
        }

        Ok(Course {
            id,
            year,
            shifts: grouped,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Shifts grouped by type then number; iteration order is canonical.
    pub fn shifts(&self) -> &BTreeMap<ShiftType, BTreeMap<i32, Shift>> {
        &self.shifts
    }

    pub fn shift(&self, kind: ShiftType, number: i32) -> Option<&Shift> {
        self.shifts.get(&kind)?.get(&number)
    }

    /// All shifts in canonical (kind, number) order.
    pub fn iter_shifts(&self) -> impl Iterator<Item = &Shift> {
        self.shifts.values().flat_map(|by_number| by_number.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(kind: ShiftType, number: i32) -> Shift {
        Shift::new(kind, number, 10, []).unwrap()
    }

    #[test]
    fn rejects_non_positive_year() {
        assert!(Course::new("J301N1", 0, []).is_err());
        assert!(Course::new("J301N1", -2, []).is_err());
    }

    #[test]
    fn rejects_duplicate_shift_names() {
        let result = Course::new(
            "J301N1",
            1,
            [shift(ShiftType::TP, 1), shift(ShiftType::TP, 1)],
        );
        assert!(result.is_err());
    }

    #[test]
    fn same_number_different_kind_is_fine() {
        let course = Course::new(
            "J301N1",
            1,
            [shift(ShiftType::T, 1), shift(ShiftType::TP, 1)],
        )
        .unwrap();

        assert!(course.shift(ShiftType::T, 1).is_some());
        assert!(course.shift(ShiftType::TP, 1).is_some());
        assert!(course.shift(ShiftType::PL, 1).is_none());
        assert!(course.shift(ShiftType::T, 2).is_none());
    }

    #[test]
    fn iteration_is_kind_then_number() {
        let course = Course::new(
            "J301N1",
            1,
            [
                shift(ShiftType::PL, 2),
                shift(ShiftType::T, 1),
                shift(ShiftType::PL, 1),
                shift(ShiftType::TP, 3),
            ],
        )
        .unwrap();

        let names: Vec<String> = course.iter_shifts().map(Shift::name).collect();
        assert_eq!(names, ["T1", "TP3", "PL1", "PL2"]);
    }

    #[test]
    fn equality_is_structural() {
        let a = Course::new("J301N1", 1, [shift(ShiftType::T, 1)]).unwrap();
        let b = Course::new("J301N1", 1, [shift(ShiftType::T, 1)]).unwrap();
        let c = Course::new("J301N1", 2, [shift(ShiftType::T, 1)]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
