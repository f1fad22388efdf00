//! Typed reminder delivery — the seam a platform shell plugs into.
//!
//! The original forwarded reminders through platform broadcasts; here
//! the engine pushes typed payloads into a `ReminderSink`. The payload
//! carries everything needed to render a notification with a check-in
//! action button.

use std::sync::mpsc;

use serde::Serialize;

use crate::models::ReminderSettings;

use super::{alarm_key, DueReminder};

/// One fired reminder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNotification {
    pub medicine_id: String,
    pub medicine_name: String,
    pub dosage: String,
    /// Scheduled slot time "HH:MM", the check-in slot the action
    /// button targets.
    pub time: String,
    /// "YYYY-MM-DD" the slot belongs to.
    pub date: String,
    /// Headline from the reminder settings.
    pub message: String,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    /// Registry key of the pair, for cancelling its alarm.
    pub alarm_key: u64,
}

impl ReminderNotification {
    pub fn for_due(due: &DueReminder, settings: &ReminderSettings, date: &str) -> Self {
        Self {
            medicine_id: due.medicine.id.clone(),
            medicine_name: due.medicine.name.clone(),
            dosage: due.medicine.dosage.clone(),
            time: due.time.clone(),
            date: date.into(),
            message: settings.message.clone(),
            sound_enabled: settings.sound_enabled,
            vibration_enabled: settings.vibration_enabled,
            alarm_key: alarm_key(&due.medicine.id, &due.time),
        }
    }
}

/// Where fired reminders go. Implementations must be callable from the
/// engine thread.
pub trait ReminderSink: Send + Sync {
    fn deliver(&self, notification: ReminderNotification);
}

/// Sink backed by a std mpsc channel; the receiving end is the event
/// loop of whatever shell embeds the crate.
pub struct ChannelSink {
    tx: mpsc::Sender<ReminderNotification>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::Receiver<ReminderNotification>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl ReminderSink for ChannelSink {
    fn deliver(&self, notification: ReminderNotification) {
        if self.tx.send(notification).is_err() {
            tracing::warn!("reminder receiver dropped, notification lost");
        }
    }
}
