use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::DomainError;
use crate::types::course::Course;
use crate::types::shift::ShiftType;
use crate::types::student::Student;

/// Identifies one shift across the problem: (course id, kind, number).
pub type ShiftRef = (String, ShiftType, i32);

/// The full declarative input of one scheduling run: every course and every
/// student, with referential integrity between the two enforced up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingProblem {
    courses: BTreeMap<String, Arc<Course>>,
    students: BTreeMap<String, Student>,
}

impl SchedulingProblem {
    pub fn new(
        courses: impl IntoIterator<Item = Arc<Course>>,
        students: impl IntoIterator<Item = Student>,
    ) -> Result<Self, DomainError> {
        let mut course_map = BTreeMap::new();
        for course in courses {
            if course_map.contains_key(course.id()) {
                return Err(DomainError::DuplicateCourse {
                    course: course.id().to_string(),
                });
            }

            course_map.insert(course.id().to_string(), course);
        }

        let mut student_map = BTreeMap::new();
        for student in students {
            if student_map.contains_key(student.number()) {
                return Err(DomainError::DuplicateStudent {
                    student: student.number().to_string(),
                });
            }

            for (course_id, course) in student.enrollments() {
                if course_map.get(course_id) != Some(course) {
                    return Err(DomainError::UnknownCourseReference {
                        student: student.number().to_string(),
                        course: course_id.clone(),
                    });
                }
            }

            student_map.insert(student.number().to_string(), student);
        }

        Ok(SchedulingProblem {
            courses: course_map,
            students: student_map,
        })
    }

    pub fn courses(&self) -> &BTreeMap<String, Arc<Course>> {
        &self.courses
    }

    pub fn students(&self) -> &BTreeMap<String, Student> {
        &self.students
    }

    /// For every shift of every course, the numbers of the students whose
    /// possible shifts contain it. Present (possibly empty) for every shift.
    pub fn possible_students_by_shift(&self) -> BTreeMap<ShiftRef, BTreeSet<String>> {
        let mut result: BTreeMap<ShiftRef, BTreeSet<String>> = BTreeMap::new();

        for course in self.courses.values() {
            for shift in course.iter_shifts() {
                result.insert(
                    (course.id().to_string(), shift.kind(), shift.number()),
                    BTreeSet::new(),
                );
            }
        }

        for student in self.students.values() {
            for (course, shift) in student.possible_shifts() {
                result
                    .entry((course.id().to_string(), shift.kind(), shift.number()))
                    .or_default()
                    .insert(student.number().to_string());
            }
        }

        result
    }
}
