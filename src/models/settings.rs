use serde::{Deserialize, Serialize};

/// User-tunable reminder behaviour, persisted in the
/// `notification_settings` bucket. Missing or corrupt payloads fall
/// back to these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReminderSettings {
    /// Master switch; when off the engine emits nothing.
    pub enabled: bool,
    /// Due window opens this many minutes before the dose time.
    pub before_minutes: u32,
    /// Due window stays open this many minutes after the dose time.
    pub after_minutes: u32,
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
    /// Notification headline shown to the user.
    pub message: String,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            before_minutes: 60,
            after_minutes: 30,
            sound_enabled: true,
            vibration_enabled: true,
            message: "该服药了！".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_window() {
        let s = ReminderSettings::default();
        assert!(s.enabled);
        assert_eq!(s.before_minutes, 60);
        assert_eq!(s.after_minutes, 30);
        assert!(s.sound_enabled);
        assert!(s.vibration_enabled);
    }

    #[test]
    fn partial_payload_fills_defaults() {
        let s: ReminderSettings = serde_json::from_str(r#"{"beforeMinutes": 15}"#).unwrap();
        assert_eq!(s.before_minutes, 15);
        assert_eq!(s.after_minutes, 30);
        assert!(s.enabled);
    }
}
