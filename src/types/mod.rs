mod course;
mod problem;
mod schedule;
mod shift;
mod solution;
mod student;
mod time;
mod timeslot;
mod weekday;

pub use course::Course;
pub use problem::{SchedulingProblem, ShiftRef};
pub use schedule::Schedule;
pub use shift::{Shift, ShiftType};
pub use solution::SchedulingProblemSolution;
pub use student::Student;
pub use time::ScheduleTime;
pub use timeslot::Timeslot;
pub use weekday::Weekday;
