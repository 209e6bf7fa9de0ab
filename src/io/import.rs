use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{Error, ImportError};
use crate::types::{
    Course, Schedule, ScheduleTime, SchedulingProblem, Shift, ShiftType, Student, Timeslot,
    Weekday,
};

// Raw JSON shapes. serde enforces the JSON type discipline (booleans and
// floats are not integers, unknown keys are ignored, missing keys are
// fatal); the conversion below enforces the domain invariants.

#[derive(Debug, Deserialize)]
struct ProblemDto {
    courses: Vec<CourseDto>,
    students: Vec<StudentDto>,
}

#[derive(Debug, Deserialize)]
struct CourseDto {
    id: String,
    year: i32,
    shifts: Vec<ShiftDto>,
}

#[derive(Debug, Deserialize)]
struct ShiftDto {
    #[serde(rename = "type")]
    kind: ShiftType,
    number: i32,
    capacity: i32,
    timeslots: Vec<TimeslotDto>,
}

#[derive(Debug, Deserialize)]
struct TimeslotDto {
    day: Weekday,
    start: ScheduleTime,
    end: ScheduleTime,
}

#[derive(Debug, Deserialize)]
struct StudentDto {
    number: String,
    year: i32,
    enrollments: Vec<String>,
    #[serde(default)]
    schedule: Vec<ScheduleShiftDto>,
}

#[derive(Debug, Deserialize)]
struct ScheduleShiftDto {
    course: String,
    shift_type: ShiftType,
    shift_number: i32,
}

/// Reads a problem JSON document from disk.
pub fn import_problem_file(path: impl AsRef<Path>) -> Result<SchedulingProblem, Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    import_problem_str(&contents)
}

/// Decodes a problem JSON document.
pub fn import_problem_str(json: &str) -> Result<SchedulingProblem, Error> {
    let dto: ProblemDto = serde_json::from_str(json).map_err(ImportError::Json)?;
    build_problem(dto)
}

fn build_problem(dto: ProblemDto) -> Result<SchedulingProblem, Error> {
    let mut courses: Vec<Arc<Course>> = Vec::with_capacity(dto.courses.len());
    let mut courses_by_id: BTreeMap<String, Arc<Course>> = BTreeMap::new();

    for course_dto in dto.courses {
        let course = Arc::new(build_course(course_dto)?);
        // Duplicate ids are caught by SchedulingProblem::new; the map just
        // resolves references and keeps the last occurrence until then.
        courses_by_id.insert(course.id().to_string(), Arc::clone(&course));
        courses.push(course);
    }

    let mut students = Vec::with_capacity(dto.students.len());
    for student_dto in dto.students {
        students.push(build_student(student_dto, &courses_by_id)?);
    }

    Ok(SchedulingProblem::new(courses, students)?)
}

fn build_course(dto: CourseDto) -> Result<Course, Error> {
    let mut shifts = Vec::with_capacity(dto.shifts.len());
    for shift_dto in dto.shifts {
        let mut timeslots = Vec::with_capacity(shift_dto.timeslots.len());
        for timeslot_dto in shift_dto.timeslots {
            timeslots.push(Timeslot::new(
                timeslot_dto.day,
                timeslot_dto.start,
                timeslot_dto.end,
            )?);
        }

        shifts.push(Shift::new(
            shift_dto.kind,
            shift_dto.number,
            shift_dto.capacity,
            timeslots,
        )?);
    }

    Ok(Course::new(dto.id, dto.year, shifts)?)
}

fn build_student(
    dto: StudentDto,
    courses: &BTreeMap<String, Arc<Course>>,
) -> Result<Student, Error> {
    let mut enrollments = Vec::with_capacity(dto.enrollments.len());
    for course_id in &dto.enrollments {
        let course = courses.get(course_id).ok_or_else(|| {
            ImportError::UnknownEnrollment {
                student: dto.number.clone(),
                course: course_id.clone(),
            }
        })?;

        enrollments.push(Arc::clone(course));
    }

    let mut picks = Vec::with_capacity(dto.schedule.len());
    for shift_dto in &dto.schedule {
        let course = courses.get(&shift_dto.course).ok_or_else(|| {
            ImportError::UnknownScheduleCourse {
                student: dto.number.clone(),
                course: shift_dto.course.clone(),
            }
        })?;

        let shift = course
            .shift(shift_dto.shift_type, shift_dto.shift_number)
            .ok_or_else(|| ImportError::UnknownScheduleShift {
                student: dto.number.clone(),
                course: shift_dto.course.clone(),
                shift: format!("{}{}", shift_dto.shift_type, shift_dto.shift_number),
            })?;

        picks.push((Arc::clone(course), shift.clone()));
    }

    let schedule = Schedule::new(picks)?;
    Ok(Student::new(dto.number, dto.year, enrollments, schedule)?)
}
