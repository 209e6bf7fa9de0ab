use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::DomainError;
use crate::types::course::Course;
use crate::types::schedule::Schedule;
use crate::types::shift::{Shift, ShiftType};

/// Key a (course, shift) pair sorts by: (course id, kind, number).
type ShiftSortKey<'a> = (&'a str, ShiftType, i32);

fn sort_key<'a>(course: &'a Arc<Course>, shift: &Shift) -> ShiftSortKey<'a> {
    (course.id(), shift.kind(), shift.number())
}

/// A student with their enrollments and the partial schedule carried over
/// from a previous run. Identified by `number` across the whole problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    number: String,
    year: i32,
    enrollments: BTreeMap<String, Arc<Course>>,
    previous_schedule: Schedule,
}

impl Student {
    pub fn new(
        number: impl Into<String>,
        year: i32,
        enrollments: impl IntoIterator<Item = Arc<Course>>,
        previous_schedule: Schedule,
    ) -> Result<Self, DomainError> {
        let number = number.into();

        if year <= 0 {
            return Err(DomainError::StudentYear {
                student: number,
                year: year.into(),
            });
        }

        let mut enrollment_map = BTreeMap::new();
        for course in enrollments {
            if enrollment_map.contains_key(course.id()) {
                return Err(DomainError::DuplicateEnrollment {
                    student: number,
                    course: course.id().to_string(),
                });
            }

            enrollment_map.insert(course.id().to_string(), course);
        }

        let student = Student {
            number,
            year,
            enrollments: enrollment_map,
            previous_schedule,
        };

        if !student.previous_schedule.is_valid_for(&student) {
            return Err(DomainError::InvalidPreviousSchedule {
                student: student.number,
            });
        }

        Ok(student)
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn enrollments(&self) -> &BTreeMap<String, Arc<Course>> {
        &self.enrollments
    }

    pub fn previous_schedule(&self) -> &Schedule {
        &self.previous_schedule
    }

    /// The (course, shift type) pairs this student must end up with exactly
    /// one shift for.
    pub fn mandatory_shift_types(&self) -> BTreeSet<(&str, ShiftType)> {
        self.enrollments
            .values()
            .flat_map(|course| {
                course
                    .shifts()
                    .keys()
                    .map(move |kind| (course.id(), *kind))
            })
            .collect()
    }

    /// Shifts fixed before solving: previous-schedule picks plus every shift
    /// that is the only one of its type in an enrolled course.
    pub fn assigned_shifts(&self) -> Vec<(&Arc<Course>, &Shift)> {
        let mut assigned: Vec<(&Arc<Course>, &Shift)> = Vec::new();

        // Resolve previous picks through the enrollment so every returned
        // course is the enrolled value (previous_schedule is valid, so the
        // lookups succeed).
        for (course, shift) in self.previous_schedule.shifts() {
            if let Some(enrolled) = self.enrollments.get(course.id()) {
                if let Some(shift) = enrolled.shift(shift.kind(), shift.number()) {
                    assigned.push((enrolled, shift));
                }
            }
        }

        for course in self.enrollments.values() {
            for by_number in course.shifts().values() {
                if by_number.len() == 1 {
                    if let Some(shift) = by_number.values().next() {
                        assigned.push((course, shift));
                    }
                }
            }
        }

        assigned.sort_by_key(|&(course, shift)| sort_key(course, shift));
        assigned.dedup_by_key(|&mut (course, shift)| sort_key(course, shift));
        assigned
    }

    /// For each assigned shift, every other shift of the same course and
    /// type; those can no longer be picked.
    pub fn unassignable_enrolled_shifts(&self) -> Vec<(&Arc<Course>, &Shift)> {
        let mut unassignable: Vec<(&Arc<Course>, &Shift)> = Vec::new();

        for (course, assigned) in self.assigned_shifts() {
            if let Some(by_number) = course.shifts().get(&assigned.kind()) {
                for shift in by_number.values() {
                    if shift.number() != assigned.number() {
                        unassignable.push((course, shift));
                    }
                }
            }
        }

        unassignable.sort_by_key(|&(course, shift)| sort_key(course, shift));
        unassignable.dedup_by_key(|&mut (course, shift)| sort_key(course, shift));
        unassignable
    }

    /// Every enrolled shift the student may still legally end up in, in
    /// canonical (course id, kind, number) order. Contains all assigned
    /// shifts.
    pub fn possible_shifts(&self) -> Vec<(&Arc<Course>, &Shift)> {
        let unassignable: BTreeSet<ShiftSortKey<'_>> = self
            .unassignable_enrolled_shifts()
            .into_iter()
            .map(|(course, shift)| sort_key(course, shift))
            .collect();

        let mut possible: Vec<(&Arc<Course>, &Shift)> = Vec::new();
        for course in self.enrollments.values() {
            for shift in course.iter_shifts() {
                if !unassignable.contains(&sort_key(course, shift)) {
                    possible.push((course, shift));
                }
            }
        }

        possible
    }
}
