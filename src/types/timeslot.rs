use crate::error::DomainError;
use crate::types::time::ScheduleTime;
use crate::types::weekday::Weekday;

/// A half-open weekly interval `[start, end)` on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timeslot {
    day: Weekday,
    start: ScheduleTime,
    end: ScheduleTime,
}

impl Timeslot {
    pub fn new(day: Weekday, start: ScheduleTime, end: ScheduleTime) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::TimeslotOrder {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Timeslot { day, start, end })
    }

    /// Half-open intervals intersect; touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Timeslot) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> ScheduleTime {
        self.start
    }

    pub fn end(&self) -> ScheduleTime {
        self.end
    }
}
