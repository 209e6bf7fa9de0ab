use std::collections::BTreeMap;

use crate::error::DomainError;
use crate::types::problem::SchedulingProblem;
use crate::types::schedule::Schedule;

/// A validated result: one complete schedule per student of the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingProblemSolution {
    problem: SchedulingProblem,
    final_schedules: BTreeMap<String, Schedule>,
}

impl SchedulingProblemSolution {
    pub fn new(
        problem: SchedulingProblem,
        final_schedules: BTreeMap<String, Schedule>,
    ) -> Result<Self, DomainError> {
        for student_number in final_schedules.keys() {
            if !problem.students().contains_key(student_number) {
                return Err(DomainError::ScheduleForUnknownStudent {
                    student: student_number.clone(),
                });
            }
        }

        for student in problem.students().values() {
            let schedule = final_schedules.get(student.number()).ok_or_else(|| {
                DomainError::MissingSchedule {
                    student: student.number().to_string(),
                }
            })?;

            if !schedule.is_valid_for(student) {
                return Err(DomainError::InvalidSchedule {
                    student: student.number().to_string(),
                });
            }
            if !schedule.is_complete_for(student) {
                return Err(DomainError::IncompleteSchedule {
                    student: student.number().to_string(),
                });
            }
        }

        Ok(SchedulingProblemSolution {
            problem,
            final_schedules,
        })
    }

    pub fn problem(&self) -> &SchedulingProblem {
        &self.problem
    }

    pub fn final_schedules(&self) -> &BTreeMap<String, Schedule> {
        &self.final_schedules
    }
}
