//! Background reminder engine — periodic due-reminder polling.
//!
//! Spawns a background thread that re-evaluates due reminders on a
//! fixed interval (every 5 minutes, the original cadence) and pushes
//! one notification per due (medicine, time) pair into the sink. The
//! first evaluation runs immediately on start. All other event
//! handling stays on the caller's thread; this is the only thread the
//! crate creates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::schedule;
use crate::store::PreferenceStore;

use super::{due_notifications, ReminderSink};

/// Check interval: every 5 minutes.
pub const CHECK_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Sleep granularity for shutdown responsiveness.
const SLEEP_GRANULARITY: Duration = Duration::from_millis(250);

/// Handle for the background reminder engine thread.
///
/// Supports graceful shutdown via `shutdown()` or automatic cleanup on
/// `Drop`.
pub struct ReminderEngineHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl ReminderEngineHandle {
    /// Request graceful shutdown. The thread exits at the next
    /// granularity boundary; no further notifications are delivered.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for ReminderEngineHandle {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

/// Start the reminder engine on a separate thread.
pub fn start_reminder_engine(
    prefs: Arc<dyn PreferenceStore>,
    sink: Arc<dyn ReminderSink>,
    interval: Duration,
) -> ReminderEngineHandle {
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();

    let handle = std::thread::spawn(move || {
        tracing::info!(interval_secs = interval.as_secs(), "reminder engine started");
        engine_loop(prefs.as_ref(), sink.as_ref(), interval, &flag);
    });

    ReminderEngineHandle {
        shutdown,
        handle: Some(handle),
    }
}

/// Runs one evaluation pass against the store and delivers every due
/// reminder. Platform shells may call this directly to force a
/// re-evaluation (e.g. on resume) between polls.
pub fn tick(prefs: &dyn PreferenceStore, sink: &dyn ReminderSink) {
    run_tick(prefs, sink, &schedule::today_string(), schedule::now_pair());
}

fn run_tick(prefs: &dyn PreferenceStore, sink: &dyn ReminderSink, date: &str, now: (u32, u32)) {
    match due_notifications(prefs, date, now) {
        Ok(due) => {
            for notification in due {
                tracing::info!(
                    medicine = %notification.medicine_name,
                    time = %notification.time,
                    "reminder fired"
                );
                sink.deliver(notification);
            }
        }
        Err(e) => tracing::warn!(error = %e, "reminder tick failed"),
    }
}

fn engine_loop(
    prefs: &dyn PreferenceStore,
    sink: &dyn ReminderSink,
    interval: Duration,
    shutdown: &AtomicBool,
) {
    while !shutdown.load(Ordering::Relaxed) {
        tick(prefs, sink);

        // Sleep in small increments for responsive shutdown
        let mut slept = Duration::ZERO;
        while slept < interval {
            if shutdown.load(Ordering::Relaxed) {
                tracing::info!("reminder engine shutting down");
                return;
            }
            let slice = SLEEP_GRANULARITY.min(interval - slept);
            std::thread::sleep(slice);
            slept += slice;
        }
    }
    tracing::info!("reminder engine shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckinRecord, CheckinStatus, Medicine, NewMedicine};
    use crate::reminder::ChannelSink;
    use crate::store::{checkins, medicines, MemoryPreferences};

    fn seed_medicine(prefs: &MemoryPreferences, id: &str, time: &str) {
        let mut med = Medicine::new(
            NewMedicine {
                name: format!("药{id}"),
                dosage: "1片".into(),
                frequency: 1,
                times: vec![time.into()],
                remaining: 10.0,
                unit: None,
                notes: None,
            },
            "片".into(),
        );
        med.id = id.into();
        medicines::save_medicines(prefs, &[med]).unwrap();
    }

    #[test]
    fn tick_delivers_due_reminders() {
        let prefs = MemoryPreferences::new();
        seed_medicine(&prefs, "m1", "08:00");
        let (sink, rx) = ChannelSink::new();

        run_tick(&prefs, &sink, "2025-06-01", (8, 0));

        let fired = rx.try_recv().unwrap();
        assert_eq!(fired.medicine_id, "m1");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn tick_after_checkin_delivers_nothing() {
        let prefs = MemoryPreferences::new();
        seed_medicine(&prefs, "m1", "08:00");
        checkins::upsert_checkin(
            &prefs,
            CheckinRecord::new("m1", "药m1", "2025-06-01", "08:00", CheckinStatus::Taken),
        )
        .unwrap();
        let (sink, rx) = ChannelSink::new();

        run_tick(&prefs, &sink, "2025-06-01", (8, 0));

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn tick_repeats_until_checked_in() {
        let prefs = MemoryPreferences::new();
        seed_medicine(&prefs, "m1", "08:00");
        let (sink, rx) = ChannelSink::new();

        run_tick(&prefs, &sink, "2025-06-01", (7, 55));
        run_tick(&prefs, &sink, "2025-06-01", (8, 0));
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn engine_starts_and_shuts_down_cleanly() {
        let prefs: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::new());
        let (sink, _rx) = ChannelSink::new();

        let handle = start_reminder_engine(prefs, Arc::new(sink), Duration::from_millis(10));
        handle.shutdown();
        // shutdown is idempotent; Drop joins the thread.
        handle.shutdown();
        drop(handle);
    }

    #[test]
    fn check_interval_is_5_minutes() {
        assert_eq!(CHECK_INTERVAL, Duration::from_secs(300));
    }
}
