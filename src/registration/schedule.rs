//! Open schedule: specific calendar dates, each with a set of time slots.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Hourly slots offered as one-click buttons next to each selected date.
pub const PREDEFINED_SLOTS: [&str; 9] = [
    "9:00 AM - 10:00 AM",
    "10:00 AM - 11:00 AM",
    "11:00 AM - 12:00 PM",
    "1:00 PM - 2:00 PM",
    "2:00 PM - 3:00 PM",
    "3:00 PM - 4:00 PM",
    "4:00 PM - 5:00 PM",
    "6:00 PM - 7:00 PM",
    "7:00 PM - 8:00 PM",
];

/// Selected dates mapped to their time-slot labels.
///
/// Keys are day-granularity dates, so two timestamps on the same calendar day
/// always hit the same entry. Dates iterate chronologically. Slots keep the
/// order in which they were added and never repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    entries: BTreeMap<NaiveDate, Vec<String>>,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a date. Returns true if the date was newly added.
    pub fn select_date(&mut self, date: NaiveDate) -> bool {
        if self.entries.contains_key(&date) {
            return false;
        }
        self.entries.insert(date, Vec::new());
        true
    }

    /// Select the calendar day a timestamp falls on, in the timestamp's own zone.
    pub fn select_datetime<Tz: TimeZone>(&mut self, at: &DateTime<Tz>) -> bool {
        self.select_date(at.date_naive())
    }

    /// Add a slot to a selected date. Unknown dates are ignored.
    ///
    /// Labels are trimmed; blank labels are ignored. Returns true if the slot set
    /// changed.
    pub fn add_slot(&mut self, date: NaiveDate, slot: &str) -> bool {
        let slot = slot.trim();
        if slot.is_empty() {
            return false;
        }
        let Some(slots) = self.entries.get_mut(&date) else {
            debug!(%date, "add_slot ignored for unselected date");
            return false;
        };
        if slots.iter().any(|s| s == slot) {
            return false;
        }
        slots.push(slot.to_string());
        true
    }

    /// Remove a slot from a date. Returns true if the slot set changed.
    pub fn remove_slot(&mut self, date: NaiveDate, slot: &str) -> bool {
        let slot = slot.trim();
        match self.entries.get_mut(&date) {
            Some(slots) => {
                let before = slots.len();
                slots.retain(|s| s != slot);
                slots.len() != before
            }
            None => false,
        }
    }

    /// Add the slot if absent, remove it if present.
    pub fn toggle_slot(&mut self, date: NaiveDate, slot: &str) -> bool {
        if self.has_slot(date, slot) {
            self.remove_slot(date, slot)
        } else {
            self.add_slot(date, slot)
        }
    }

    /// Drop a date together with all its slots. Returns true if it was selected.
    pub fn remove_date(&mut self, date: NaiveDate) -> bool {
        self.entries.remove(&date).is_some()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.entries.contains_key(&date)
    }

    pub fn has_slot(&self, date: NaiveDate, slot: &str) -> bool {
        let slot = slot.trim();
        self.entries
            .get(&date)
            .is_some_and(|slots| slots.iter().any(|s| s == slot))
    }

    /// Slots for a date, or `None` if the date is not selected.
    pub fn slots(&self, date: NaiveDate) -> Option<&[String]> {
        self.entries.get(&date).map(Vec::as_slice)
    }

    /// Selected dates, earliest first.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[String])> {
        self.entries.iter().map(|(d, s)| (*d, s.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of slots across all dates.
    pub fn slot_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
