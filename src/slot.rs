use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RosterError};

/// Week day names, in calendar order (day 0 = Monday).
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Daily shift period names (period 0 = Morning).
pub const PERIOD_NAMES: [&str; 3] = ["Morning", "Afternoon", "Evening"];

pub const DAYS_PER_WEEK: u8 = 7;
pub const PERIODS_PER_DAY: u8 = 3;

/// Saturday only has a morning shift.
pub const SHORT_DAY: u8 = 5;

/// One schedulable shift: a (day, period) pair within the weekly calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    pub day: u8,
    pub period: u8,
}

impl Slot {
    /// Builds a slot, rejecting pairs outside the weekly calendar.
    pub fn new(day: u8, period: u8) -> Result<Slot> {
        if !Slot::is_schedulable(day, period) {
            return Err(RosterError::SlotOutOfCalendar { day, period });
        }
        Ok(Slot { day, period })
    }

    /// True when the pair falls inside the weekly calendar
    /// (valid day and period, and not a short-day afternoon/evening).
    pub fn is_schedulable(day: u8, period: u8) -> bool {
        day < DAYS_PER_WEEK && period < PERIODS_PER_DAY && !(day == SHORT_DAY && period > 0)
    }

    /// Serializes the slot as a "day-period" token, e.g. "5-0".
    pub fn token(&self) -> String {
        format!("{}-{}", self.day, self.period)
    }

    /// Parses a "day-period" token back into a slot.
    /// Tokens that do not parse or fall outside the calendar are rejected.
    pub fn parse_token(token: &str) -> Result<Slot> {
        let trimmed = token.trim();
        let (day, period) = trimmed
            .split_once('-')
            .ok_or_else(|| RosterError::MalformedToken(trimmed.to_string()))?;
        let day: u8 = day
            .parse()
            .map_err(|_| RosterError::MalformedToken(trimmed.to_string()))?;
        let period: u8 = period
            .parse()
            .map_err(|_| RosterError::MalformedToken(trimmed.to_string()))?;
        Slot::new(day, period)
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.day as usize]
    }

    pub fn period_name(&self) -> &'static str {
        PERIOD_NAMES[self.period as usize]
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_name(), self.period_name())
    }
}

/// The ordered weekly calendar: day ascending, then period ascending,
/// skipping the short-day afternoon and evening. 19 slots in total.
pub fn week_calendar() -> Vec<Slot> {
    let mut slots = Vec::with_capacity(19);
    for day in 0..DAYS_PER_WEEK {
        for period in 0..PERIODS_PER_DAY {
            if Slot::is_schedulable(day, period) {
                slots.push(Slot { day, period });
            }
        }
    }
    slots
}

/// Serializes an availability set as ";"-joined "day-period" tokens.
pub fn encode_availability(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|slot| slot.token())
        .collect::<Vec<_>>()
        .join(";")
}

/// Parses a ";"-joined token list into a deduplicated, sorted slot set.
/// An empty string is an empty set; any malformed token rejects the whole list.
pub fn decode_availability(encoded: &str) -> Result<Vec<Slot>> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen = HashSet::new();
    for token in trimmed.split(';') {
        seen.insert(Slot::parse_token(token)?);
    }

    let mut slots: Vec<Slot> = seen.into_iter().collect();
    slots.sort();
    Ok(slots)
}
