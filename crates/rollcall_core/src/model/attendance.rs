//! Per-date attendance map.
//!
//! # Responsibility
//! - Hold `date -> student -> mark` entries.
//! - Implement toggle-off and overwrite mutation semantics.
//!
//! # Invariants
//! - Only `Mark` values are stored; `Unset` is key absence.
//! - No date is kept with an empty inner map, so every recorded date has at
//!   least one entry.

use crate::model::date_key::DateKey;
use crate::model::status::{AttendanceStatus, Mark};
use crate::model::student::StudentId;
use std::collections::BTreeMap;

pub type DayEntries = BTreeMap<StudentId, Mark>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceBook {
    days: BTreeMap<DateKey, DayEntries>,
}

impl AttendanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized status for one pair.
    pub fn status(&self, date: &DateKey, id: &StudentId) -> AttendanceStatus {
        self.days
            .get(date)
            .and_then(|day| day.get(id))
            .copied()
            .into()
    }

    /// Applies a toggle click and returns the resulting status.
    ///
    /// Requesting the status already in place clears the entry; any other
    /// request overwrites it.
    pub fn toggle(&mut self, date: &DateKey, id: &StudentId, desired: Mark) -> AttendanceStatus {
        if self.status(date, id).mark() == Some(desired) {
            self.clear_entry(date, id);
            return AttendanceStatus::Unset;
        }
        self.record(date, id, desired);
        desired.into()
    }

    /// Overwrites the entry without toggle-off behavior.
    pub fn record(&mut self, date: &DateKey, id: &StudentId, mark: Mark) {
        self.days
            .entry(date.clone())
            .or_default()
            .insert(id.clone(), mark);
    }

    /// Removes one entry. Returns whether an entry existed.
    pub fn clear_entry(&mut self, date: &DateKey, id: &StudentId) -> bool {
        let Some(day) = self.days.get_mut(date) else {
            return false;
        };
        let removed = day.remove(id).is_some();
        if day.is_empty() {
            self.days.remove(date);
        }
        removed
    }

    /// Deletes `id` from every date. Returns the number of entries removed.
    pub fn remove_student(&mut self, id: &StudentId) -> usize {
        let mut removed = 0;
        for day in self.days.values_mut() {
            if day.remove(id).is_some() {
                removed += 1;
            }
        }
        self.days.retain(|_, day| !day.is_empty());
        removed
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }

    /// Dates with at least one entry, ascending.
    pub fn recorded_dates(&self) -> impl Iterator<Item = &DateKey> {
        self.days.keys()
    }

    pub fn entries_on(&self, date: &DateKey) -> Option<&DayEntries> {
        self.days.get(date)
    }

    pub fn has_entries(&self, date: &DateKey) -> bool {
        self.days.get(date).is_some_and(|day| !day.is_empty())
    }

    pub fn days(&self) -> &BTreeMap<DateKey, DayEntries> {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of stored entries across all dates.
    pub fn entry_count(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }
}
