//! Reminder evaluation and delivery.
//!
//! `alarms` keeps one registered alarm per active (medicine, time)
//! pair; `engine` polls on a fixed interval and pushes due reminders
//! into a `sink`. Evaluation itself is pure and lives here.

pub mod alarms;
pub mod engine;
pub mod sink;

pub use alarms::{Alarm, AlarmRegistry, ALARM_LEAD_MINUTES};
pub use engine::{start_reminder_engine, ReminderEngineHandle, CHECK_INTERVAL};
pub use sink::{ChannelSink, ReminderNotification, ReminderSink};

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::models::{CheckinRecord, CheckinStatus, Medicine, ReminderSettings};
use crate::schedule;
use crate::store::{checkins, medicines, settings, PreferenceStore, StoreError};

/// Stable registry key for one (medicine, time) pair.
pub fn alarm_key(medicine_id: &str, time: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    medicine_id.hash(&mut hasher);
    time.hash(&mut hasher);
    hasher.finish()
}

/// One (medicine, time) pair whose reminder window covers now and
/// which has no TAKEN check-in yet today.
#[derive(Debug, Clone, PartialEq)]
pub struct DueReminder {
    pub medicine: Medicine,
    /// Scheduled slot time, "HH:MM".
    pub time: String,
}

/// Pure due evaluation over already-loaded state.
///
/// `records` must be the day's records. Malformed schedule times are
/// skipped with a warning and never fail the whole pass.
pub fn evaluate_due(
    medicines: &[Medicine],
    records: &[CheckinRecord],
    settings: &ReminderSettings,
    now: (u32, u32),
) -> Vec<DueReminder> {
    if !settings.enabled {
        return Vec::new();
    }

    let mut due = Vec::new();
    for medicine in medicines.iter().filter(|m| m.is_active) {
        for time in &medicine.times {
            let Some(scheduled) = schedule::parse_time(time) else {
                tracing::warn!(
                    medicine_id = %medicine.id,
                    time = %time,
                    "skipping malformed schedule time"
                );
                continue;
            };
            if !schedule::in_reminder_window(
                scheduled,
                now,
                settings.before_minutes,
                settings.after_minutes,
            ) {
                continue;
            }
            let taken = records.iter().any(|r| {
                r.medicine_id == medicine.id && r.time == *time && r.status == CheckinStatus::Taken
            });
            if !taken {
                due.push(DueReminder {
                    medicine: medicine.clone(),
                    time: time.clone(),
                });
            }
        }
    }
    due
}

/// Loads state from the store and returns one notification payload per
/// due (medicine, time) pair.
pub fn due_notifications(
    prefs: &dyn PreferenceStore,
    date: &str,
    now: (u32, u32),
) -> Result<Vec<ReminderNotification>, StoreError> {
    let settings = settings::load_settings(prefs)?;
    if !settings.enabled {
        return Ok(Vec::new());
    }
    let medicines = medicines::list_medicines(prefs)?;
    let records = checkins::records_for_date(prefs, date)?;

    Ok(evaluate_due(&medicines, &records, &settings, now)
        .into_iter()
        .map(|due| ReminderNotification::for_due(&due, &settings, date))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewMedicine;
    use crate::store::MemoryPreferences;

    fn medicine(id: &str, times: &[&str]) -> Medicine {
        let mut med = Medicine::new(
            NewMedicine {
                name: format!("药{id}"),
                dosage: "1片".into(),
                frequency: times.len() as u32,
                times: times.iter().map(|t| t.to_string()).collect(),
                remaining: 10.0,
                unit: None,
                notes: None,
            },
            "片".into(),
        );
        med.id = id.into();
        med
    }

    fn taken_record(medicine_id: &str, date: &str, time: &str) -> CheckinRecord {
        CheckinRecord::new(medicine_id, "药", date, time, CheckinStatus::Taken)
    }

    // ───────────────────────────────────────
    // alarm_key
    // ───────────────────────────────────────

    #[test]
    fn alarm_key_is_stable_per_pair() {
        assert_eq!(alarm_key("m1", "08:00"), alarm_key("m1", "08:00"));
        assert_ne!(alarm_key("m1", "08:00"), alarm_key("m1", "12:00"));
        assert_ne!(alarm_key("m1", "08:00"), alarm_key("m2", "08:00"));
    }

    // ───────────────────────────────────────
    // evaluate_due
    // ───────────────────────────────────────

    #[test]
    fn due_inside_window_without_checkin() {
        let meds = [medicine("m1", &["08:00"])];
        let due = evaluate_due(&meds, &[], &ReminderSettings::default(), (7, 5));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].time, "08:00");
    }

    #[test]
    fn not_due_outside_window() {
        let meds = [medicine("m1", &["08:00"])];
        let due = evaluate_due(&meds, &[], &ReminderSettings::default(), (6, 55));
        assert!(due.is_empty());
    }

    #[test]
    fn taken_checkin_suppresses_reminder() {
        let meds = [medicine("m1", &["08:00"])];
        let records = [taken_record("m1", "2025-06-01", "08:00")];
        let due = evaluate_due(&meds, &records, &ReminderSettings::default(), (8, 0));
        assert!(due.is_empty());
    }

    #[test]
    fn skipped_checkin_does_not_suppress() {
        let meds = [medicine("m1", &["08:00"])];
        let records = [CheckinRecord::new(
            "m1",
            "药",
            "2025-06-01",
            "08:00",
            CheckinStatus::Skipped,
        )];
        let due = evaluate_due(&meds, &records, &ReminderSettings::default(), (8, 0));
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn inactive_medicine_never_due() {
        let mut med = medicine("m1", &["08:00"]);
        med.is_active = false;
        let due = evaluate_due(&[med], &[], &ReminderSettings::default(), (8, 0));
        assert!(due.is_empty());
    }

    #[test]
    fn disabled_settings_yield_nothing() {
        let meds = [medicine("m1", &["08:00"])];
        let settings = ReminderSettings {
            enabled: false,
            ..ReminderSettings::default()
        };
        let due = evaluate_due(&meds, &[], &settings, (8, 0));
        assert!(due.is_empty());
    }

    #[test]
    fn malformed_time_is_skipped_not_fatal() {
        let mut med = medicine("m1", &["08:00"]);
        med.times.push("8am".into());
        let due = evaluate_due(&[med], &[], &ReminderSettings::default(), (8, 0));
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn each_slot_evaluated_independently() {
        let meds = [medicine("m1", &["08:00", "08:30"])];
        let records = [taken_record("m1", "2025-06-01", "08:00")];
        let due = evaluate_due(&meds, &records, &ReminderSettings::default(), (8, 15));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].time, "08:30");
    }

    // ───────────────────────────────────────
    // due_notifications (store-backed)
    // ───────────────────────────────────────

    #[test]
    fn notifications_carry_settings_message_and_flags() {
        let prefs = MemoryPreferences::new();
        crate::store::medicines::save_medicines(&prefs, &[medicine("m1", &["08:00"])]).unwrap();

        let due = due_notifications(&prefs, "2025-06-01", (8, 0)).unwrap();
        assert_eq!(due.len(), 1);
        let n = &due[0];
        assert_eq!(n.medicine_id, "m1");
        assert_eq!(n.time, "08:00");
        assert_eq!(n.date, "2025-06-01");
        assert_eq!(n.message, ReminderSettings::default().message);
        assert!(n.sound_enabled);
    }

    #[test]
    fn empty_store_yields_no_notifications() {
        let prefs = MemoryPreferences::new();
        assert!(due_notifications(&prefs, "2025-06-01", (8, 0))
            .unwrap()
            .is_empty());
    }
}
