//! Reminder settings — individual keys in the `notification_settings`
//! bucket, mirroring the original per-key preference layout.

use crate::models::ReminderSettings;

use super::{PreferenceStore, StoreError};

pub const SETTINGS_BUCKET: &str = "notification_settings";

const KEY_ENABLED: &str = "notifications_enabled";
const KEY_BEFORE_MINUTES: &str = "reminder_before_minutes";
const KEY_AFTER_MINUTES: &str = "reminder_after_minutes";
const KEY_SOUND_ENABLED: &str = "sound_enabled";
const KEY_VIBRATION_ENABLED: &str = "vibration_enabled";
const KEY_MESSAGE: &str = "notification_message";

/// Loads reminder settings. Any missing or unparseable key falls back
/// to its default.
pub fn load_settings(prefs: &dyn PreferenceStore) -> Result<ReminderSettings, StoreError> {
    let defaults = ReminderSettings::default();
    Ok(ReminderSettings {
        enabled: get_bool(prefs, KEY_ENABLED, defaults.enabled)?,
        before_minutes: get_u32(prefs, KEY_BEFORE_MINUTES, defaults.before_minutes)?,
        after_minutes: get_u32(prefs, KEY_AFTER_MINUTES, defaults.after_minutes)?,
        sound_enabled: get_bool(prefs, KEY_SOUND_ENABLED, defaults.sound_enabled)?,
        vibration_enabled: get_bool(prefs, KEY_VIBRATION_ENABLED, defaults.vibration_enabled)?,
        message: prefs
            .get(SETTINGS_BUCKET, KEY_MESSAGE)?
            .filter(|m| !m.is_empty())
            .unwrap_or(defaults.message),
    })
}

/// Persists all reminder settings keys.
pub fn save_settings(
    prefs: &dyn PreferenceStore,
    settings: &ReminderSettings,
) -> Result<(), StoreError> {
    prefs.put(SETTINGS_BUCKET, KEY_ENABLED, &settings.enabled.to_string())?;
    prefs.put(
        SETTINGS_BUCKET,
        KEY_BEFORE_MINUTES,
        &settings.before_minutes.to_string(),
    )?;
    prefs.put(
        SETTINGS_BUCKET,
        KEY_AFTER_MINUTES,
        &settings.after_minutes.to_string(),
    )?;
    prefs.put(
        SETTINGS_BUCKET,
        KEY_SOUND_ENABLED,
        &settings.sound_enabled.to_string(),
    )?;
    prefs.put(
        SETTINGS_BUCKET,
        KEY_VIBRATION_ENABLED,
        &settings.vibration_enabled.to_string(),
    )?;
    prefs.put(SETTINGS_BUCKET, KEY_MESSAGE, &settings.message)
}

fn get_bool(prefs: &dyn PreferenceStore, key: &str, default: bool) -> Result<bool, StoreError> {
    Ok(prefs
        .get(SETTINGS_BUCKET, key)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(default))
}

fn get_u32(prefs: &dyn PreferenceStore, key: &str, default: u32) -> Result<u32, StoreError> {
    Ok(prefs
        .get(SETTINGS_BUCKET, key)?
        .and_then(|v| v.parse().ok())
        .unwrap_or(default))
}
