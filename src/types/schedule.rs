use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::DomainError;
use crate::types::course::Course;
use crate::types::shift::{Shift, ShiftType};
use crate::types::student::Student;

/// An immutable set of (course, shift) picks holding at most one shift per
/// (course, shift type).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    shifts: BTreeMap<(String, ShiftType), (Arc<Course>, Shift)>,
}

impl Schedule {
    pub fn new(
        shifts: impl IntoIterator<Item = (Arc<Course>, Shift)>,
    ) -> Result<Self, DomainError> {
        let mut schedule = Schedule::default();

        for (course, shift) in shifts {
            let key = (course.id().to_string(), shift.kind());

            if schedule.shifts.contains_key(&key) {
                return Err(DomainError::DuplicateScheduleShift {
                    course: course.id().to_string(),
                    kind: shift.kind().to_string(),
                });
            }
            if course.shift(shift.kind(), shift.number()) != Some(&shift) {
                return Err(DomainError::ShiftNotInCourse {
                    course: course.id().to_string(),
                    shift: shift.name(),
                });
            }

            let conflicting = schedule
                .shifts
                .values()
                .any(|(other, _)| other.id() == course.id() && **other != *course);
            if conflicting {
                return Err(DomainError::ConflictingScheduleCourses {
                    course: course.id().to_string(),
                });
            }

            schedule.shifts.insert(key, (course, shift));
        }

        Ok(schedule)
    }

    pub fn empty() -> Self {
        Schedule::default()
    }

    /// Picks in canonical (course id, shift type) order.
    pub fn shifts(&self) -> impl Iterator<Item = (&Arc<Course>, &Shift)> {
        self.shifts.values().map(|(course, shift)| (course, shift))
    }

    pub fn get(&self, course_id: &str, kind: ShiftType) -> Option<&Shift> {
        self.shifts
            .get(&(course_id.to_string(), kind))
            .map(|(_, shift)| shift)
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    /// Every course named here must be the course the student is enrolled in
    /// under that id.
    pub fn is_valid_for(&self, student: &Student) -> bool {
        self.shifts.values().all(|(course, _)| {
            student
                .enrollments()
                .get(course.id())
                .is_some_and(|enrolled| enrolled == course)
        })
    }

    /// The (course, shift type) keys must cover exactly the student's
    /// mandatory shift types.
    pub fn is_complete_for(&self, student: &Student) -> bool {
        let own: std::collections::BTreeSet<(&str, ShiftType)> = self
            .shifts
            .keys()
            .map(|(course_id, kind)| (course_id.as_str(), *kind))
            .collect();

        own == student.mandatory_shift_types()
    }
}
