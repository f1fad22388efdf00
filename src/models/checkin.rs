use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::CheckinStatus;
use super::now_millis;

/// A confirmation that one dose slot was acted on.
///
/// The log holds at most one record per (medicineId, date, time);
/// later writes replace earlier ones. Records are never deleted and
/// may outlive the medicine they reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRecord {
    pub id: String,
    pub medicine_id: String,
    /// Name snapshot at check-in time; kept even if the medicine is
    /// later deleted.
    pub medicine_name: String,
    /// "YYYY-MM-DD".
    pub date: String,
    /// Scheduled slot time, "HH:MM".
    pub time: String,
    pub status: CheckinStatus,
    #[serde(default)]
    pub notes: String,
    /// Unix milliseconds of the confirmation itself.
    pub timestamp: i64,
}

impl CheckinRecord {
    /// Builds a record for one slot with a fresh id and timestamp.
    pub fn new(
        medicine_id: impl Into<String>,
        medicine_name: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        status: CheckinStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            medicine_id: medicine_id.into(),
            medicine_name: medicine_name.into(),
            date: date.into(),
            time: time.into(),
            status,
            notes: String::new(),
            timestamp: now_millis(),
        }
    }

    /// True when this record occupies the given slot.
    pub fn matches_slot(&self, medicine_id: &str, date: &str, time: &str) -> bool {
        self.medicine_id == medicine_id && self.date == date && self.time == time
    }
}
