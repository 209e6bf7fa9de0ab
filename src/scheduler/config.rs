use crate::types::{Course, Shift, Student};

/// Options handed to the MILP solver. Passed explicitly so callers and tests
/// can substitute their own.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock limit handed to the solver, in seconds.
    pub time_limit_seconds: f64,
    pub threads: i32,
    pub random_seed: i32,
    pub log_to_console: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        // One thread and a fixed seed keep runs reproducible.
        SolverConfig {
            time_limit_seconds: 300.0,
            threads: 1,
            random_seed: 1234,
            log_to_console: false,
        }
    }
}

/// Penalty weight for a pair of overlapping shifts in one student's
/// schedule, scaled by how the course years relate to the student's year.
pub fn overlap_weight(
    student: &Student,
    course1: &Course,
    _shift1: &Shift,
    course2: &Course,
    _shift2: &Shift,
) -> f64 {
    let delta1 = student.year() - course1.year();
    let delta2 = student.year() - course2.year();
    let delta_sum = delta1 + delta2;

    if delta1 < 0 || delta2 < 0 {
        1.0 // Student doing courses from higher years
    } else if delta_sum == 0 {
        10000.0 // Courses with the same year as the student
    } else if delta_sum == 1 {
        10.0 // Exactly one course with a one year delay
    } else {
        1.0 // Greater delay
    }
}

/// Penalty weight for each student beyond a shift's capacity. Lecture-style
/// shifts tolerate overflow.
pub fn overcrowd_weight(_course: &Course, shift: &Shift) -> f64 {
    if shift.kind().is_lecture_style() {
        0.1
    } else {
        1.0
    }
}
