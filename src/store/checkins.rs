//! Check-in log — the `checkin_data` bucket.
//!
//! An append/replace list: at most one record per
//! (medicineId, date, time), later writes replacing earlier ones.
//! Records are never deleted; the list grows unbounded.

use crate::models::CheckinRecord;

use super::{PreferenceStore, StoreError};

pub const CHECKIN_BUCKET: &str = "checkin_data";
pub const CHECKIN_KEY: &str = "checkin_records";

/// Loads the full check-in log in stored order. Missing or corrupt
/// payloads yield an empty list.
pub fn list_checkins(prefs: &dyn PreferenceStore) -> Result<Vec<CheckinRecord>, StoreError> {
    let Some(payload) = prefs.get(CHECKIN_BUCKET, CHECKIN_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&payload) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!(error = %e, "corrupt check-in log, starting empty");
            Ok(Vec::new())
        }
    }
}

fn save_checkins(prefs: &dyn PreferenceStore, records: &[CheckinRecord]) -> Result<(), StoreError> {
    let payload = serde_json::to_string(records)?;
    prefs.put(CHECKIN_BUCKET, CHECKIN_KEY, &payload)
}

/// The log newest-first, for the history screen.
pub fn history(prefs: &dyn PreferenceStore) -> Result<Vec<CheckinRecord>, StoreError> {
    let mut records = list_checkins(prefs)?;
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(records)
}

/// All records for one date.
pub fn records_for_date(
    prefs: &dyn PreferenceStore,
    date: &str,
) -> Result<Vec<CheckinRecord>, StoreError> {
    let mut records = list_checkins(prefs)?;
    records.retain(|r| r.date == date);
    Ok(records)
}

/// The record occupying one (medicine, date, time) slot, if any.
pub fn find_record(
    prefs: &dyn PreferenceStore,
    medicine_id: &str,
    date: &str,
    time: &str,
) -> Result<Option<CheckinRecord>, StoreError> {
    Ok(list_checkins(prefs)?
        .into_iter()
        .find(|r| r.matches_slot(medicine_id, date, time)))
}

/// Writes a record for its slot, replacing any earlier record for the
/// same (medicineId, date, time).
pub fn upsert_checkin(prefs: &dyn PreferenceStore, record: CheckinRecord) -> Result<(), StoreError> {
    let mut records = list_checkins(prefs)?;
    records.retain(|r| !r.matches_slot(&record.medicine_id, &record.date, &record.time));
    records.push(record);
    save_checkins(prefs, &records)
}
