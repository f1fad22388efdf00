//! Dose confirmation — the check-in action behind the notification
//! button.
//!
//! Writes the TAKEN record for the slot (replacing any earlier record
//! for the same slot) and decrements the medicine's remaining quantity
//! by the amount parsed from its dosage string. The outcome carries
//! the pair's alarm key so the caller can cancel the registered alarm;
//! this crate never touches platform notification APIs itself.

use crate::dosage;
use crate::models::{CheckinRecord, CheckinStatus};
use crate::reminder::alarm_key;
use crate::schedule;
use crate::store::{checkins, medicines, PreferenceStore, StoreError};

/// Outcome of a dose confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckinOutcome {
    pub record: CheckinRecord,
    /// New remaining quantity, when a decrement was applied. `None`
    /// when the medicine was already at zero or no longer exists.
    pub new_remaining: Option<f64>,
    /// Registry key of the (medicine, time) pair, for cancelling its
    /// alarm.
    pub alarm_key: u64,
}

/// Confirms a dose for today's slot.
pub fn apply_checkin_today(
    prefs: &dyn PreferenceStore,
    medicine_id: &str,
    time: &str,
) -> Result<CheckinOutcome, StoreError> {
    apply_checkin(prefs, medicine_id, time, &schedule::today_string())
}

/// Confirms a dose: upserts a TAKEN record for
/// (medicine_id, date, time) and decrements the medicine's remaining
/// quantity, floored at zero.
///
/// A check-in for a deleted medicine id still records (with the name
/// snapshot left empty); only the decrement is skipped.
pub fn apply_checkin(
    prefs: &dyn PreferenceStore,
    medicine_id: &str,
    time: &str,
    date: &str,
) -> Result<CheckinOutcome, StoreError> {
    let medicine = medicines::find_medicine(prefs, medicine_id)?;
    let medicine_name = medicine
        .as_ref()
        .map(|m| m.name.clone())
        .unwrap_or_default();

    let record = CheckinRecord::new(medicine_id, medicine_name, date, time, CheckinStatus::Taken);
    checkins::upsert_checkin(prefs, record.clone())?;

    let new_remaining = match medicine {
        Some(medicine) => {
            let amount = dosage::extract_dosage_amount(&medicine.dosage);
            medicines::decrement_remaining(prefs, medicine_id, amount)?
        }
        None => None,
    };

    tracing::info!(
        medicine_id,
        time,
        date,
        remaining = ?new_remaining,
        "dose checked in"
    );

    Ok(CheckinOutcome {
        record,
        new_remaining,
        alarm_key: alarm_key(medicine_id, time),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMedicine;
    use crate::store::{medicines::add_medicine, MemoryPreferences};

    fn seed(prefs: &MemoryPreferences, dosage: &str, remaining: f64) -> String {
        add_medicine(
            prefs,
            NewMedicine {
                name: "阿司匹林".into(),
                dosage: dosage.into(),
                frequency: 1,
                times: vec!["08:00".into()],
                remaining,
                unit: None,
                notes: None,
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn checkin_writes_taken_record() {
        let prefs = MemoryPreferences::new();
        let id = seed(&prefs, "1片", 10.0);

        let outcome = apply_checkin(&prefs, &id, "08:00", "2025-06-01").unwrap();
        assert_eq!(outcome.record.status, CheckinStatus::Taken);
        assert_eq!(outcome.record.medicine_name, "阿司匹林");

        let stored = checkins::find_record(&prefs, &id, "2025-06-01", "08:00").unwrap();
        assert!(stored.is_some());
    }

    #[test]
    fn checkin_decrements_by_extracted_dosage() {
        let prefs = MemoryPreferences::new();
        let id = seed(&prefs, "1.5片", 10.0);

        let outcome = apply_checkin(&prefs, &id, "08:00", "2025-06-01").unwrap();
        assert_eq!(outcome.new_remaining, Some(8.5));
    }

    #[test]
    fn unparseable_dosage_decrements_one() {
        let prefs = MemoryPreferences::new();
        let id = seed(&prefs, "一片", 10.0);

        let outcome = apply_checkin(&prefs, &id, "08:00", "2025-06-01").unwrap();
        assert_eq!(outcome.new_remaining, Some(9.0));
    }

    #[test]
    fn repeated_checkins_keep_single_record_and_clamp_at_zero() {
        let prefs = MemoryPreferences::new();
        let id = seed(&prefs, "2片", 3.0);

        apply_checkin(&prefs, &id, "08:00", "2025-06-01").unwrap();
        apply_checkin(&prefs, &id, "08:00", "2025-06-01").unwrap();
        let outcome = apply_checkin(&prefs, &id, "08:00", "2025-06-01").unwrap();

        // One record per slot regardless of repeats.
        assert_eq!(checkins::list_checkins(&prefs).unwrap().len(), 1);
        // 3.0 → 1.0 → 0.0, then no further decrement.
        assert_eq!(outcome.new_remaining, None);
        assert_eq!(
            medicines::find_medicine(&prefs, &id).unwrap().unwrap().remaining,
            0.0
        );
    }

    #[test]
    fn checkin_for_deleted_medicine_still_records() {
        let prefs = MemoryPreferences::new();
        let outcome = apply_checkin(&prefs, "ghost", "08:00", "2025-06-01").unwrap();

        assert_eq!(outcome.new_remaining, None);
        assert_eq!(outcome.record.medicine_name, "");
        assert!(checkins::find_record(&prefs, "ghost", "2025-06-01", "08:00")
            .unwrap()
            .is_some());
    }

    #[test]
    fn outcome_alarm_key_matches_pair() {
        let prefs = MemoryPreferences::new();
        let id = seed(&prefs, "1片", 10.0);

        let outcome = apply_checkin(&prefs, &id, "08:00", "2025-06-01").unwrap();
        assert_eq!(outcome.alarm_key, alarm_key(&id, "08:00"));
    }
}
