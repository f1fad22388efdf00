//! Today-screen aggregation — pure queries over the two collections.
//!
//! View types for the day's schedule: per-(medicine, time) items with
//! a taken flag, grouping into time slots, headline counts, and the
//! remaining-reminders summary. Counts are at slot granularity — a
//! slot counts as taken once any active medicine in it has a TAKEN
//! record for the day.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{CheckinRecord, CheckinStatus, Medicine};
use crate::store::{checkins, medicines, PreferenceStore, StoreError};

/// One medicine at one of its scheduled times, with the day's taken
/// flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineTimeItem {
    pub medicine: Medicine,
    pub time: String,
    pub is_taken: bool,
}

/// All medicines sharing one scheduled time slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub time: String,
    pub items: Vec<MedicineTimeItem>,
}

/// Headline numbers for the today screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayStats {
    pub total_slots: u32,
    pub taken_slots: u32,
    pub pending_slots: u32,
    pub active_medicines: u32,
}

/// The day's still-pending slots and the distinct medicines they
/// involve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingReminders {
    /// Pending slot times, ascending.
    pub pending_slots: Vec<String>,
    /// Distinct names of active medicines scheduled in those slots.
    pub medicine_names: Vec<String>,
}

fn has_taken_record(records: &[CheckinRecord], medicine_id: &str, date: &str, time: &str) -> bool {
    records.iter().any(|r| {
        r.medicine_id == medicine_id
            && r.time == time
            && r.date == date
            && r.status == CheckinStatus::Taken
    })
}

/// One item per active medicine per scheduled time, with the day's
/// taken flag.
pub fn today_items(
    prefs: &dyn PreferenceStore,
    date: &str,
) -> Result<Vec<MedicineTimeItem>, StoreError> {
    let medicines = medicines::list_medicines(prefs)?;
    let records = checkins::records_for_date(prefs, date)?;

    let mut items = Vec::new();
    for medicine in medicines.into_iter().filter(|m| m.is_active) {
        for time in medicine.times.clone() {
            let is_taken = has_taken_record(&records, &medicine.id, date, &time);
            items.push(MedicineTimeItem {
                medicine: medicine.clone(),
                time,
                is_taken,
            });
        }
    }
    Ok(items)
}

/// Groups items into time slots sorted by clock time.
pub fn time_slots(items: Vec<MedicineTimeItem>) -> Vec<TimeSlot> {
    let mut groups: BTreeMap<String, Vec<MedicineTimeItem>> = BTreeMap::new();
    for item in items {
        groups.entry(item.time.clone()).or_default().push(item);
    }
    groups
        .into_iter()
        .map(|(time, items)| TimeSlot { time, items })
        .collect()
}

/// True when any active medicine scheduled in the slot has a TAKEN
/// record for the day.
fn slot_is_taken(active: &[&Medicine], records: &[CheckinRecord], date: &str, time: &str) -> bool {
    active.iter().any(|m| {
        m.times.iter().any(|t| t == time) && has_taken_record(records, &m.id, date, time)
    })
}

fn active_slots(active: &[&Medicine]) -> BTreeSet<String> {
    active
        .iter()
        .flat_map(|m| m.times.iter().cloned())
        .collect()
}

/// Slot-level counts for the day.
pub fn today_stats(prefs: &dyn PreferenceStore, date: &str) -> Result<TodayStats, StoreError> {
    let medicines = medicines::list_medicines(prefs)?;
    let records = checkins::records_for_date(prefs, date)?;
    let active: Vec<&Medicine> = medicines.iter().filter(|m| m.is_active).collect();

    let slots = active_slots(&active);
    let mut taken_slots = 0;
    for time in &slots {
        if slot_is_taken(&active, &records, date, time) {
            taken_slots += 1;
        }
    }

    let total_slots = slots.len() as u32;
    Ok(TodayStats {
        total_slots,
        taken_slots,
        pending_slots: total_slots - taken_slots,
        active_medicines: active.len() as u32,
    })
}

/// The day's pending slots with the distinct medicines they involve.
pub fn remaining_reminders(
    prefs: &dyn PreferenceStore,
    date: &str,
) -> Result<RemainingReminders, StoreError> {
    let medicines = medicines::list_medicines(prefs)?;
    let records = checkins::records_for_date(prefs, date)?;
    let active: Vec<&Medicine> = medicines.iter().filter(|m| m.is_active).collect();

    let mut pending_slots = Vec::new();
    let mut medicine_names = BTreeSet::new();
    for time in active_slots(&active) {
        if slot_is_taken(&active, &records, date, &time) {
            continue;
        }
        for medicine in &active {
            if medicine.times.iter().any(|t| *t == time) {
                medicine_names.insert(medicine.name.clone());
            }
        }
        pending_slots.push(time);
    }

    Ok(RemainingReminders {
        pending_slots,
        medicine_names: medicine_names.into_iter().collect(),
    })
}
