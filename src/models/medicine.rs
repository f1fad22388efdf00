use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::now_millis;

/// A tracked medicine and its daily dose schedule.
///
/// Serialized field names are camelCase to match the persisted
/// `medicine_data` bucket payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    /// Free-text dosage, e.g. "1片" or "5ml".
    pub dosage: String,
    /// Doses per day.
    pub frequency: u32,
    /// Scheduled times as "HH:MM" strings, e.g. ["08:00", "12:00", "18:00"].
    pub times: Vec<String>,
    /// Remaining quantity; half units allowed.
    pub remaining: f64,
    /// Unit label, e.g. "片", "ml", "粒".
    pub unit: String,
    #[serde(default)]
    pub notes: String,
    pub is_active: bool,
    /// Unix milliseconds.
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for registering a new medicine. `unit` defaults to the suffix
/// of the dosage string when not given.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicine {
    pub name: String,
    pub dosage: String,
    pub frequency: u32,
    pub times: Vec<String>,
    pub remaining: f64,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

impl Medicine {
    /// Builds a new active medicine with a fresh id and timestamps.
    pub fn new(input: NewMedicine, unit: String) -> Self {
        let now = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            dosage: input.dosage,
            frequency: input.frequency,
            times: input.times,
            remaining: input.remaining,
            unit,
            notes: input.notes.unwrap_or_default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Medicine {
        Medicine::new(
            NewMedicine {
                name: "阿司匹林".into(),
                dosage: "1片".into(),
                frequency: 2,
                times: vec!["08:00".into(), "20:00".into()],
                remaining: 30.0,
                unit: None,
                notes: None,
            },
            "片".into(),
        )
    }

    #[test]
    fn new_medicine_is_active_with_fresh_id() {
        let med = sample();
        assert!(med.is_active);
        assert!(!med.id.is_empty());
        assert_eq!(med.created_at, med.updated_at);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"isActive\":true"));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
    }

    #[test]
    fn deserializes_payload_without_notes() {
        let json = r#"{
            "id": "m1", "name": "维生素C", "dosage": "2粒",
            "frequency": 1, "times": ["09:00"], "remaining": 10.5,
            "unit": "粒", "isActive": false,
            "createdAt": 1700000000000, "updatedAt": 1700000000000
        }"#;
        let med: Medicine = serde_json::from_str(json).unwrap();
        assert_eq!(med.notes, "");
        assert!(!med.is_active);
        assert_eq!(med.remaining, 10.5);
    }
}
