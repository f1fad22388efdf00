pub mod checkin;
pub mod enums;
pub mod medicine;
pub mod settings;

pub use checkin::CheckinRecord;
pub use enums::CheckinStatus;
pub use medicine::{Medicine, NewMedicine};
pub use settings::ReminderSettings;

/// Current wall-clock time as unix milliseconds, the timestamp format
/// persisted in both buckets.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
