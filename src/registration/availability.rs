//! Recurring weekly availability: per-day and per-day-part flags.

use std::collections::{BTreeMap, HashMap};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// Days in display order.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lowercase key for a weekday, e.g. `monday`.
pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parse a weekday from its key or a common abbreviation.
pub fn parse_day(s: &str) -> Result<Weekday, RegistrationError> {
    let lower = s.trim().to_ascii_lowercase();
    WEEK.iter()
        .copied()
        .find(|d| day_key(*d) == lower || (lower.len() >= 3 && day_key(*d).starts_with(&lower)))
        .ok_or_else(|| RegistrationError::UnknownOption {
            kind: "day".to_string(),
            value: s.to_string(),
        })
}

/// Part of the day a recurring slot covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    pub const ALL: [DayPart; 3] = [Self::Morning, Self::Afternoon, Self::Evening];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }

    pub fn time_range(&self) -> &'static str {
        match self {
            Self::Morning => "8:00 AM - 12:00 PM",
            Self::Afternoon => "12:00 PM - 5:00 PM",
            Self::Evening => "5:00 PM - 9:00 PM",
        }
    }
}

impl std::fmt::Display for DayPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for DayPart {
    type Err = RegistrationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "afternoon" => Ok(Self::Afternoon),
            "evening" => Ok(Self::Evening),
            _ => Err(RegistrationError::UnknownOption {
                kind: "day part".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Key into the sparse flag map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvailabilityKey {
    Day(Weekday),
    Slot(Weekday, DayPart),
}

impl std::fmt::Display for AvailabilityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{}", day_key(*day)),
            Self::Slot(day, part) => write!(f, "{}-{}", day_key(*day), part.key()),
        }
    }
}

/// Weekly availability flags.
///
/// Only keys the user has touched are stored; a missing key reads as false.
/// Slot flags are independent of their day flag: unchecking a day hides its
/// slots but keeps their values, so re-checking the day brings them back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringAvailability {
    flags: HashMap<AvailabilityKey, bool>,
}

impl RecurringAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a day's flag. Returns the new value.
    pub fn toggle_day(&mut self, day: Weekday) -> bool {
        self.flip(AvailabilityKey::Day(day))
    }

    /// Flip a `{day}-{part}` flag. Returns the new value.
    pub fn toggle_day_slot(&mut self, day: Weekday, part: DayPart) -> bool {
        self.flip(AvailabilityKey::Slot(day, part))
    }

    fn flip(&mut self, key: AvailabilityKey) -> bool {
        let flag = self.flags.entry(key).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_day_on(&self, day: Weekday) -> bool {
        self.get(AvailabilityKey::Day(day))
    }

    /// Raw slot flag, regardless of whether its day is on.
    pub fn is_slot_on(&self, day: Weekday, part: DayPart) -> bool {
        self.get(AvailabilityKey::Slot(day, part))
    }

    pub fn get(&self, key: AvailabilityKey) -> bool {
        self.flags.get(&key).copied().unwrap_or(false)
    }

    /// Slot rows displayed under a day: none while the day is off, all three
    /// with their current values while it is on.
    pub fn visible_slots(&self, day: Weekday) -> Vec<(DayPart, bool)> {
        if !self.is_day_on(day) {
            return Vec::new();
        }
        DayPart::ALL
            .iter()
            .map(|part| (*part, self.is_slot_on(day, *part)))
            .collect()
    }

    /// Day parts that count as available: slot on and its day on.
    pub fn effective(&self) -> BTreeMap<&'static str, Vec<DayPart>> {
        WEEK.iter()
            .filter(|day| self.is_day_on(**day))
            .map(|day| {
                let parts = DayPart::ALL
                    .iter()
                    .copied()
                    .filter(|part| self.is_slot_on(*day, *part))
                    .collect();
                (day_key(*day), parts)
            })
            .collect()
    }

    /// Every stored flag keyed by its string form (`monday`, `monday-morning`).
    pub fn to_flags(&self) -> BTreeMap<String, bool> {
        self.flags
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    /// Number of keys ever touched.
    pub fn touched(&self) -> usize {
        self.flags.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_reads_false_and_stays_sparse() {
        let availability = RecurringAvailability::new();
        assert!(!availability.is_day_on(Weekday::Mon));
        assert!(!availability.is_slot_on(Weekday::Mon, DayPart::Evening));
        assert_eq!(availability.touched(), 0);
    }

    #[test]
    fn toggle_day_flips() {
        let mut availability = RecurringAvailability::new();
        assert!(availability.toggle_day(Weekday::Tue));
        assert!(availability.is_day_on(Weekday::Tue));
        assert!(!availability.toggle_day(Weekday::Tue));
        assert!(!availability.is_day_on(Weekday::Tue));
        assert_eq!(availability.touched(), 1);
    }

    #[test]
    fn slot_flag_survives_day_uncheck() {
        let mut availability = RecurringAvailability::new();
        availability.toggle_day(Weekday::Wed);
        availability.toggle_day_slot(Weekday::Wed, DayPart::Morning);

        availability.toggle_day(Weekday::Wed);
        assert!(availability.is_slot_on(Weekday::Wed, DayPart::Morning));
        assert!(availability.visible_slots(Weekday::Wed).is_empty());

        availability.toggle_day(Weekday::Wed);
        let visible = availability.visible_slots(Weekday::Wed);
        assert_eq!(visible.len(), 3);
        assert!(visible.contains(&(DayPart::Morning, true)));
        assert!(visible.contains(&(DayPart::Evening, false)));
    }

    #[test]
    fn slot_toggle_does_not_need_day() {
        let mut days = RecurringAvailability::new();
        assert!(days.toggle_day_slot(Weekday::Fri, DayPart::Afternoon));
        assert!(!days.is_day_on(Weekday::Fri));
        assert!(days.effective().is_empty());
    }

    #[test]
    fn effective_respects_parent_day() {
        let mut availability = RecurringAvailability::new();
        availability.toggle_day(Weekday::Mon);
        availability.toggle_day_slot(Weekday::Mon, DayPart::Morning);
        availability.toggle_day_slot(Weekday::Mon, DayPart::Evening);
        availability.toggle_day_slot(Weekday::Sat, DayPart::Morning);

        let effective = availability.effective();
        assert_eq!(effective.len(), 1);
        assert_eq!(
            effective.get("monday"),
            Some(&vec![DayPart::Morning, DayPart::Evening])
        );
    }

    #[test]
    fn flag_keys_use_composite_strings() {
        let mut availability = RecurringAvailability::new();
        availability.toggle_day(Weekday::Thu);
        availability.toggle_day_slot(Weekday::Thu, DayPart::Afternoon);
        let flags = availability.to_flags();
        assert_eq!(flags.get("thursday"), Some(&true));
        assert_eq!(flags.get("thursday-afternoon"), Some(&true));
    }

    #[test]
    fn parse_day_accepts_names_and_abbreviations() {
        assert_eq!(parse_day("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_day("sun").unwrap(), Weekday::Sun);
        assert_eq!(parse_day("THU").unwrap(), Weekday::Thu);
        assert!(parse_day("mo").is_err());
        assert!(parse_day("someday").is_err());
    }

    #[test]
    fn day_part_parses() {
        assert_eq!("Evening".parse::<DayPart>().unwrap(), DayPart::Evening);
        assert!("night".parse::<DayPart>().is_err());
    }
}
