//! Medicine repository — list persistence and CRUD over the
//! `medicine_data` bucket.
//!
//! The whole list is stored as one JSON array string and
//! read-modify-written in full on every mutation. A corrupt payload
//! degrades to an empty list with a logged warning rather than an
//! error, matching the load behaviour of the rest of the store.

use crate::dosage;
use crate::models::{now_millis, Medicine, NewMedicine};
use crate::schedule;

use super::{PreferenceStore, StoreError};

pub const MEDICINE_BUCKET: &str = "medicine_data";
pub const MEDICINE_KEY: &str = "medicines";

/// Loads the full medicine list. Missing or corrupt payloads yield an
/// empty list.
pub fn list_medicines(prefs: &dyn PreferenceStore) -> Result<Vec<Medicine>, StoreError> {
    let Some(payload) = prefs.get(MEDICINE_BUCKET, MEDICINE_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&payload) {
        Ok(medicines) => Ok(medicines),
        Err(e) => {
            tracing::warn!(error = %e, "corrupt medicine list, starting empty");
            Ok(Vec::new())
        }
    }
}

/// Persists the full medicine list.
pub fn save_medicines(prefs: &dyn PreferenceStore, medicines: &[Medicine]) -> Result<(), StoreError> {
    let payload = serde_json::to_string(medicines)?;
    prefs.put(MEDICINE_BUCKET, MEDICINE_KEY, &payload)
}

/// Finds one medicine by id.
pub fn find_medicine(
    prefs: &dyn PreferenceStore,
    medicine_id: &str,
) -> Result<Option<Medicine>, StoreError> {
    Ok(list_medicines(prefs)?
        .into_iter()
        .find(|m| m.id == medicine_id))
}

/// Validates and registers a new medicine. The unit falls back to the
/// suffix of the dosage string when not given.
pub fn add_medicine(
    prefs: &dyn PreferenceStore,
    input: NewMedicine,
) -> Result<Medicine, StoreError> {
    validate(&input.name, &input.dosage, input.frequency, &input.times, input.remaining)?;

    let unit = match input.unit.as_deref().map(str::trim) {
        Some(unit) if !unit.is_empty() => unit.to_string(),
        _ => dosage::extract_unit(&input.dosage),
    };

    let input = NewMedicine {
        name: input.name.trim().to_string(),
        dosage: input.dosage.trim().to_string(),
        ..input
    };
    let medicine = Medicine::new(input, unit);

    let mut medicines = list_medicines(prefs)?;
    medicines.push(medicine.clone());
    save_medicines(prefs, &medicines)?;

    tracing::info!(
        medicine_id = %medicine.id,
        name = %medicine.name,
        "medicine added"
    );
    Ok(medicine)
}

/// Replaces an existing medicine after validation, bumping `updated_at`.
pub fn update_medicine(prefs: &dyn PreferenceStore, medicine: Medicine) -> Result<Medicine, StoreError> {
    validate(
        &medicine.name,
        &medicine.dosage,
        medicine.frequency,
        &medicine.times,
        medicine.remaining,
    )?;

    let mut medicines = list_medicines(prefs)?;
    let slot = medicines
        .iter_mut()
        .find(|m| m.id == medicine.id)
        .ok_or_else(|| StoreError::NotFound {
            entity_type: "Medicine".into(),
            id: medicine.id.clone(),
        })?;

    let updated = Medicine {
        updated_at: now_millis(),
        ..medicine
    };
    *slot = updated.clone();
    save_medicines(prefs, &medicines)?;
    Ok(updated)
}

/// Removes a medicine. Its check-in records are left in place.
pub fn delete_medicine(prefs: &dyn PreferenceStore, medicine_id: &str) -> Result<(), StoreError> {
    let mut medicines = list_medicines(prefs)?;
    let before = medicines.len();
    medicines.retain(|m| m.id != medicine_id);
    if medicines.len() == before {
        return Err(StoreError::NotFound {
            entity_type: "Medicine".into(),
            id: medicine_id.into(),
        });
    }
    save_medicines(prefs, &medicines)?;
    tracing::info!(medicine_id, "medicine deleted");
    Ok(())
}

/// Toggles the active flag. An active medicine must keep a non-empty
/// schedule.
pub fn set_active(
    prefs: &dyn PreferenceStore,
    medicine_id: &str,
    active: bool,
) -> Result<(), StoreError> {
    let mut medicines = list_medicines(prefs)?;
    let medicine = medicines
        .iter_mut()
        .find(|m| m.id == medicine_id)
        .ok_or_else(|| StoreError::NotFound {
            entity_type: "Medicine".into(),
            id: medicine_id.into(),
        })?;

    if active && medicine.times.is_empty() {
        return Err(StoreError::Invalid(
            "Cannot activate a medicine without scheduled times".into(),
        ));
    }

    medicine.is_active = active;
    medicine.updated_at = now_millis();
    save_medicines(prefs, &medicines)
}

/// Decrements a medicine's remaining quantity, clamped at zero.
///
/// Returns the new remaining quantity, or `None` when nothing was
/// decremented (medicine missing, or already at zero).
pub fn decrement_remaining(
    prefs: &dyn PreferenceStore,
    medicine_id: &str,
    amount: f64,
) -> Result<Option<f64>, StoreError> {
    let mut medicines = list_medicines(prefs)?;
    let Some(medicine) = medicines.iter_mut().find(|m| m.id == medicine_id) else {
        return Ok(None);
    };
    if medicine.remaining <= 0.0 {
        return Ok(None);
    }

    let new_remaining = (medicine.remaining - amount).max(0.0);
    medicine.remaining = new_remaining;
    medicine.updated_at = now_millis();
    save_medicines(prefs, &medicines)?;
    Ok(Some(new_remaining))
}

fn validate(
    name: &str,
    dosage: &str,
    frequency: u32,
    times: &[String],
    remaining: f64,
) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::Invalid("Medicine name is required".into()));
    }
    if dosage.trim().is_empty() {
        return Err(StoreError::Invalid("Dosage is required".into()));
    }
    if frequency == 0 {
        return Err(StoreError::Invalid(
            "Frequency must be at least once per day".into(),
        ));
    }
    if times.is_empty() {
        return Err(StoreError::Invalid(
            "At least one scheduled time is required".into(),
        ));
    }
    for time in times {
        if !schedule::is_valid_time(time) {
            return Err(StoreError::Invalid(format!(
                "Invalid time \"{time}\" (expected HH:MM)"
            )));
        }
    }
    if !remaining.is_finite() || remaining < 0.0 {
        return Err(StoreError::Invalid(
            "Remaining quantity cannot be negative".into(),
        ));
    }
    Ok(())
}
