use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while reading or decoding a problem JSON document.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read JSON file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse problem JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("course {course} in enrollment of student {student} was not found")]
    UnknownEnrollment { student: String, course: String },
    #[error("course {course} in schedule of student {student} was not found")]
    UnknownScheduleCourse { student: String, course: String },
    #[error("shift {shift} of course {course} in schedule of student {student} was not found")]
    UnknownScheduleShift {
        student: String,
        course: String,
        shift: String,
    },
}

/// Errors produced when an entity invariant is violated during construction.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("time {hour}:{minute} has invalid fields")]
    InvalidTime { hour: u8, minute: u8 },
    #[error("failed to parse time '{0}'")]
    UnparseableTime(String),
    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),
    #[error("unknown shift type '{0}'")]
    UnknownShiftType(String),
    #[error("timeslot's start ({start}) must precede its end ({end})")]
    TimeslotOrder { start: String, end: String },
    #[error("non-positive number {number} in shift {kind}{number}")]
    ShiftNumber { kind: String, number: i64 },
    #[error("non-positive capacity {capacity} in shift {shift}")]
    ShiftCapacity { shift: String, capacity: i64 },
    #[error("overlapping timeslots in shift {shift}")]
    OverlappingTimeslots { shift: String },
    #[error("non-positive year {year} in course {course}")]
    CourseYear { course: String, year: i64 },
    #[error("shifts with the same name ({shift}) in course {course}")]
    DuplicateShift { course: String, shift: String },
    #[error("shift {course}-{kind} multiple times in schedule")]
    DuplicateScheduleShift { course: String, kind: String },
    #[error("shift {shift} does not belong to course {course}")]
    ShiftNotInCourse { course: String, shift: String },
    #[error("courses with the same id ({course}) but different content in schedule")]
    ConflictingScheduleCourses { course: String },
    #[error("non-positive year {year} in student {student}")]
    StudentYear { student: String, year: i64 },
    #[error("courses with the same id ({course}) in student {student}")]
    DuplicateEnrollment { student: String, course: String },
    #[error("student {student}'s schedule is not valid for them")]
    InvalidPreviousSchedule { student: String },
    #[error("courses with the same id: {course}")]
    DuplicateCourse { course: String },
    #[error("students with the same number: {student}")]
    DuplicateStudent { student: String },
    #[error("student {student} references unknown course {course}")]
    UnknownCourseReference { student: String, course: String },
    #[error("schedule for unknown student {student}")]
    ScheduleForUnknownStudent { student: String },
    #[error("missing schedule for student {student}")]
    MissingSchedule { student: String },
    #[error("invalid schedule for student {student}")]
    InvalidSchedule { student: String },
    #[error("incomplete schedule for student {student}")]
    IncompleteSchedule { student: String },
}

/// Errors produced while building or solving the MILP model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("solver error: {0}")]
    Solver(String),
    #[error("failed to solve scheduling problem, status: {0}")]
    SolveFailed(String),
    #[error("infeasible input: {0}")]
    Infeasible(String),
}

/// Errors produced while writing a solution JSON document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write JSON file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An invariant violation detected while decoding solver output. Indicates a
/// bug rather than bad input.
#[derive(Debug, Error)]
#[error("invalid problem solution: {0}")]
pub struct InternalError(pub String);

/// Any classified error of the crate, surfaced at the CLI and HTTP
/// boundaries.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}
