use std::path::Path;

use serde_json::{Map, Value, json};

use crate::error::ExportError;
use crate::types::{Schedule, SchedulingProblem, SchedulingProblemSolution, Shift};

/// Renders a solution as its JSON object: student number to picked shifts.
pub fn solution_to_json(solution: &SchedulingProblemSolution) -> Value {
    let mut root = Map::new();
    for (number, schedule) in solution.final_schedules() {
        root.insert(number.clone(), schedule_to_json(schedule));
    }

    Value::Object(root)
}

/// Renders a solution as a compact JSON string.
pub fn solution_to_string(solution: &SchedulingProblemSolution) -> String {
    solution_to_json(solution).to_string()
}

/// Writes a solution JSON document to disk.
pub fn write_solution_file(
    path: impl AsRef<Path>,
    solution: &SchedulingProblemSolution,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    std::fs::write(path, solution_to_string(solution)).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn schedule_to_json(schedule: &Schedule) -> Value {
    let shifts: Vec<Value> = schedule
        .shifts()
        .map(|(course, shift)| shift_pick_to_json(course.id(), shift))
        .collect();

    Value::Array(shifts)
}

fn shift_pick_to_json(course_id: &str, shift: &Shift) -> Value {
    json!({
        "course": course_id,
        "shift_type": shift.kind(),
        "shift_number": shift.number(),
    })
}

/// Renders a problem back to its input JSON form, so a written problem can
/// be read again into an equal value.
pub fn problem_to_json(problem: &SchedulingProblem) -> Value {
    let courses: Vec<Value> = problem
        .courses()
        .values()
        .map(|course| {
            let shifts: Vec<Value> = course
                .iter_shifts()
                .map(|shift| {
                    let timeslots: Vec<Value> = shift
                        .timeslots()
                        .iter()
                        .map(|timeslot| {
                            json!({
                                "day": timeslot.day(),
                                "start": timeslot.start(),
                                "end": timeslot.end(),
                            })
                        })
                        .collect();

                    json!({
                        "type": shift.kind(),
                        "number": shift.number(),
                        "capacity": shift.capacity(),
                        "timeslots": timeslots,
                    })
                })
                .collect();

            json!({
                "id": course.id(),
                "year": course.year(),
                "shifts": shifts,
            })
        })
        .collect();

    let students: Vec<Value> = problem
        .students()
        .values()
        .map(|student| {
            let enrollments: Vec<Value> = student
                .enrollments()
                .keys()
                .map(|id| Value::String(id.clone()))
                .collect();

            let schedule: Vec<Value> = student
                .previous_schedule()
                .shifts()
                .map(|(course, shift)| shift_pick_to_json(course.id(), shift))
                .collect();

            json!({
                "number": student.number(),
                "year": student.year(),
                "enrollments": enrollments,
                "schedule": schedule,
            })
        })
        .collect();

    json!({
        "courses": courses,
        "students": students,
    })
}
