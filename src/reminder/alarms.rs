//! Alarm registry — one entry per active (medicine, time) pair.
//!
//! Stands in for the platform alarm service: entries are keyed by a
//! hash of the pair and carry the fire time computed with the fixed
//! pre-dose lead. A fire time that has already passed today rolls to
//! tomorrow. The due-window evaluation in `engine` uses the settings'
//! window instead of this lead; the two offsets were independent in
//! the original and stay independent here.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::models::Medicine;
use crate::schedule;

use super::alarm_key;

/// Fixed pre-dose lead for registered alarms, in minutes.
pub const ALARM_LEAD_MINUTES: u32 = 10;

/// A registered reminder alarm for one (medicine, time) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Alarm {
    pub key: u64,
    pub medicine_id: String,
    pub medicine_name: String,
    pub dosage: String,
    /// Scheduled dose time, "HH:MM".
    pub time: String,
    /// Fire time after the lead subtraction, "HH:MM".
    pub fire_time: String,
}

#[derive(Debug, Default)]
pub struct AlarmRegistry {
    alarms: HashMap<u64, Alarm>,
}

impl AlarmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the registry from the medicine list: one alarm per
    /// active medicine per valid scheduled time. Malformed times are
    /// skipped with a warning.
    pub fn reschedule_all(&mut self, medicines: &[Medicine]) {
        self.alarms.clear();
        for medicine in medicines.iter().filter(|m| m.is_active) {
            for time in &medicine.times {
                let Some((hour, minute)) = schedule::parse_time(time) else {
                    tracing::warn!(
                        medicine_id = %medicine.id,
                        time = %time,
                        "skipping alarm for malformed time"
                    );
                    continue;
                };
                let (fire_hour, fire_minute) =
                    schedule::reminder_time(hour, minute, ALARM_LEAD_MINUTES);
                let key = alarm_key(&medicine.id, time);
                self.alarms.insert(
                    key,
                    Alarm {
                        key,
                        medicine_id: medicine.id.clone(),
                        medicine_name: medicine.name.clone(),
                        dosage: medicine.dosage.clone(),
                        time: time.clone(),
                        fire_time: schedule::format_time(fire_hour, fire_minute),
                    },
                );
                tracing::debug!(
                    medicine = %medicine.name,
                    time = %time,
                    fire_time = %schedule::format_time(fire_hour, fire_minute),
                    "alarm registered"
                );
            }
        }
        tracing::info!(count = self.alarms.len(), "alarms rescheduled");
    }

    /// Cancels the alarm for one pair. Returns whether it existed.
    pub fn cancel(&mut self, medicine_id: &str, time: &str) -> bool {
        let removed = self.alarms.remove(&alarm_key(medicine_id, time)).is_some();
        if removed {
            tracing::debug!(medicine_id, time, "alarm cancelled");
        }
        removed
    }

    pub fn cancel_all(&mut self) {
        self.alarms.clear();
    }

    pub fn get(&self, key: u64) -> Option<&Alarm> {
        self.alarms.get(&key)
    }

    pub fn alarms(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms.values()
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// The earliest fire instant strictly after `now`. A fire time
    /// already passed today rolls to tomorrow.
    pub fn next_fire_after(&self, now: NaiveDateTime) -> Option<(NaiveDateTime, &Alarm)> {
        self.alarms
            .values()
            .filter_map(|alarm| {
                let (hour, minute) = schedule::parse_time(&alarm.fire_time)?;
                let fire_time = NaiveTime::from_hms_opt(hour, minute, 0)?;
                let mut candidate = now.date().and_time(fire_time);
                if candidate <= now {
                    candidate += Duration::days(1);
                }
                Some((candidate, alarm))
            })
            .min_by_key(|(at, alarm)| (*at, alarm.key))
    }
}
