// --- File: crates/courtbook_common/src/models.rs ---

// Domain types shared by the database layer and the booking service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage and wire format for booking dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced when parsing the textual forms of the domain types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelParseError {
    #[error("Unknown court type: {0} (expected 'rubber' or 'hard')")]
    UnknownCourtType(String),
    #[error("Unknown time slot: {0} (expected e.g. '10:00-11:00' between 06:00 and 24:00)")]
    UnknownTimeSlot(String),
    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ModelParseError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ModelParseError::InvalidDate(value.to_string()))
}

/// Formats a date the way it is stored.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The two court surfaces that can be booked.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourtType {
    Rubber,
    Hard,
}

impl CourtType {
    /// All court types, in the order slots are listed.
    pub const ALL: [CourtType; 2] = [CourtType::Rubber, CourtType::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            CourtType::Rubber => "rubber",
            CourtType::Hard => "hard",
        }
    }
}

impl fmt::Display for CourtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourtType {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rubber" => Ok(CourtType::Rubber),
            "hard" => Ok(CourtType::Hard),
            other => Err(ModelParseError::UnknownCourtType(other.to_string())),
        }
    }
}

/// One of the fixed hourly slots, 06:00-07:00 through 23:00-24:00.
///
/// Serialized as its label, e.g. `"09:00-10:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    start_hour: u8,
}

impl TimeSlot {
    pub const FIRST_HOUR: u8 = 6;
    pub const LAST_HOUR: u8 = 23;
    pub const COUNT: usize = (Self::LAST_HOUR - Self::FIRST_HOUR + 1) as usize;

    /// Returns the slot starting at `hour`, if that hour is bookable.
    pub fn from_start_hour(hour: u8) -> Option<Self> {
        (Self::FIRST_HOUR..=Self::LAST_HOUR)
            .contains(&hour)
            .then_some(Self { start_hour: hour })
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    /// All slots of a day in chronological order.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (Self::FIRST_HOUR..=Self::LAST_HOUR).map(|start_hour| TimeSlot { start_hour })
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.start_hour + 1)
    }
}

impl FromStr for TimeSlot {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::all()
            .find(|slot| slot.label() == s)
            .ok_or_else(|| ModelParseError::UnknownTimeSlot(s.to_string()))
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ModelParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label()
    }
}

/// Which uniqueness rule a booking attempt ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// The user already holds a booking on that date, on either court.
    AlreadyBookedThatDay,
    /// The court is already booked at that date and time.
    SlotTaken,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::AlreadyBookedThatDay => {
                f.write_str("You already have a booking on this day")
            }
            ConflictKind::SlotTaken => f.write_str("This time slot is already taken"),
        }
    }
}

/// A persisted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub user_id: i64,
    pub court_type: CourtType,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    /// Audit only; stored by the database as text.
    pub created_at: Option<String>,
}

/// A booking request that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub user_id: i64,
    pub first_name: String,
    pub court_type: CourtType,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_slots_cover_six_to_midnight() {
        let labels: Vec<String> = TimeSlot::all().map(|s| s.label()).collect();
        assert_eq!(labels.len(), TimeSlot::COUNT);
        assert_eq!(labels.len(), 18);
        assert_eq!(labels.first().map(String::as_str), Some("06:00-07:00"));
        assert_eq!(labels.last().map(String::as_str), Some("23:00-24:00"));
        assert!(labels.contains(&"09:00-10:00".to_string()));
    }

    #[test]
    fn test_time_slot_parsing() {
        let slot: TimeSlot = "10:00-11:00".parse().unwrap();
        assert_eq!(slot.start_hour(), 10);
        assert!("05:00-06:00".parse::<TimeSlot>().is_err());
        assert!("10:00-12:00".parse::<TimeSlot>().is_err());
        assert!("10:00".parse::<TimeSlot>().is_err());
        assert!(TimeSlot::from_start_hour(24).is_none());
    }

    #[test]
    fn test_time_slot_serde_uses_label() {
        let slot = TimeSlot::from_start_hour(7).unwrap();
        assert_eq!(serde_json::to_string(&slot).unwrap(), "\"07:00-08:00\"");
        let parsed: TimeSlot = serde_json::from_str("\"23:00-24:00\"").unwrap();
        assert_eq!(parsed.start_hour(), 23);
        assert!(serde_json::from_str::<TimeSlot>("\"24:00-25:00\"").is_err());
    }

    #[test]
    fn test_court_type_round_trip() {
        for court in CourtType::ALL {
            assert_eq!(court.as_str().parse::<CourtType>().unwrap(), court);
        }
        assert_eq!(
            "clay".parse::<CourtType>(),
            Err(ModelParseError::UnknownCourtType("clay".to_string()))
        );
        assert_eq!(serde_json::to_string(&CourtType::Hard).unwrap(), "\"hard\"");
    }

    #[test]
    fn test_date_parsing() {
        let date = parse_date("2024-06-01").unwrap();
        assert_eq!(format_date(date), "2024-06-01");
        assert!(parse_date("01.06.2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
