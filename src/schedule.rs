//! Clock-time arithmetic for dose schedules.
//!
//! Times are zero-padded "HH:MM" strings on a 24-hour clock, compared
//! as minutes-of-day. The lead-time subtraction wraps across hour and
//! day boundaries; the due window does not wrap — it is a raw
//! minute-of-day interval truncated at midnight, exactly as the
//! original evaluated it. No daylight-saving or timezone handling.

use chrono::{Local, Timelike};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses a strict "HH:MM" string into (hour, minute).
///
/// Both fields must be two digits; "8:30" is rejected.
pub fn parse_time(s: &str) -> Option<(u32, u32)> {
    let (h, m) = s.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    (hour <= 23 && minute <= 59).then_some((hour, minute))
}

pub fn is_valid_time(s: &str) -> bool {
    parse_time(s).is_some()
}

/// Formats (hour, minute) as a zero-padded "HH:MM" string.
pub fn format_time(hour: u32, minute: u32) -> String {
    format!("{hour:02}:{minute:02}")
}

fn minute_of_day(hour: u32, minute: u32) -> i64 {
    i64::from(hour) * 60 + i64::from(minute)
}

/// Computes the reminder fire time for a scheduled dose time: the lead
/// is subtracted from the minute-of-day, wrapping modulo 24h.
///
/// `(8, 0, 10)` → `(7, 50)`; `(0, 5, 10)` → `(23, 55)`.
pub fn reminder_time(hour: u32, minute: u32, lead_minutes: u32) -> (u32, u32) {
    let fire = (minute_of_day(hour, minute) - i64::from(lead_minutes)).rem_euclid(MINUTES_PER_DAY);
    ((fire / 60) as u32, (fire % 60) as u32)
}

/// Whether `now` lies within `[scheduled − before, scheduled + after]`
/// minutes-of-day.
pub fn in_reminder_window(
    scheduled: (u32, u32),
    now: (u32, u32),
    before_minutes: u32,
    after_minutes: u32,
) -> bool {
    let scheduled = minute_of_day(scheduled.0, scheduled.1);
    let now = minute_of_day(now.0, now.1);
    now >= scheduled - i64::from(before_minutes) && now <= scheduled + i64::from(after_minutes)
}

/// Today's date as "YYYY-MM-DD" in local time.
pub fn today_string() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// The current local clock time as (hour, minute).
pub fn now_pair() -> (u32, u32) {
    let now = Local::now();
    (now.hour(), now.minute())
}
