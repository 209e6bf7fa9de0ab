use std::fmt;
use std::str::FromStr;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::DomainError;
use crate::types::timeslot::Timeslot;

/// The teaching mode of a shift. Ordering follows the declaration order and
/// is used for deterministic iteration over a course's shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShiftType {
    T,
    TP,
    PL,
    OT,
}

impl ShiftType {
    pub fn name(self) -> &'static str {
        match self {
            ShiftType::T => "T",
            ShiftType::TP => "TP",
            ShiftType::PL => "PL",
            ShiftType::OT => "OT",
        }
    }

    /// Lecture-style shifts held in large rooms, where overflowing the
    /// capacity is tolerable.
    pub fn is_lecture_style(self) -> bool {
        matches!(self, ShiftType::T | ShiftType::OT)
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShiftType {
    type Err = DomainError;

    // Accepts any casing, e.g. "tp" and "TP".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "T" => Ok(ShiftType::T),
            "TP" => Ok(ShiftType::TP),
            "PL" => Ok(ShiftType::PL),
            "OT" => Ok(ShiftType::OT),
            _ => Err(DomainError::UnknownShiftType(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ShiftType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for ShiftType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A numbered, capacitated teaching slot occupying a set of mutually
/// non-overlapping weekly timeslots. Within a course, a shift is identified
/// by its `(kind, number)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    kind: ShiftType,
    number: i32,
    capacity: i32,
    timeslots: Vec<Timeslot>,
}

impl Shift {
    pub fn new(
        kind: ShiftType,
        number: i32,
        capacity: i32,
        timeslots: impl IntoIterator<Item = Timeslot>,
    ) -> Result<Self, DomainError> {
        if number <= 0 {
            return Err(DomainError::ShiftNumber {
                kind: kind.to_string(),
                number: number.into(),
            });
        }

        let mut shift = Shift {
            kind,
            number,
            capacity,
            timeslots: Vec::new(),
        };

        if capacity <= 0 {
            return Err(DomainError::ShiftCapacity {
                shift: shift.name(),
                capacity: capacity.into(),
            });
        }

        for timeslot in timeslots {
            if shift.overlaps_timeslot(&timeslot) {
                return Err(DomainError::OverlappingTimeslots {
                    shift: shift.name(),
                });
            }

            shift.timeslots.push(timeslot);
        }

        Ok(shift)
    }

    /// Whether any of this shift's timeslots overlaps `timeslot`.
    pub fn overlaps_timeslot(&self, timeslot: &Timeslot) -> bool {
        self.timeslots.iter().any(|own| own.overlaps(timeslot))
    }

    /// Whether any timeslot pair across the two shifts overlaps. A shift with
    /// no timeslots overlaps nothing, itself included.
    pub fn overlaps(&self, other: &Shift) -> bool {
        other
            .timeslots
            .iter()
            .any(|timeslot| self.overlaps_timeslot(timeslot))
    }

    pub fn kind(&self) -> ShiftType {
        self.kind
    }

    pub fn number(&self) -> i32 {
        self.number
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    pub fn timeslots(&self) -> &[Timeslot] {
        &self.timeslots
    }

    /// Display name, e.g. `TP2`.
    pub fn name(&self) -> String {
        format!("{}{}", self.kind, self.number)
    }
}
