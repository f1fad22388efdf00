//! Dosage string parsing.
//!
//! Dosages are free text like "1片", "1.5片" or "5ml". The amount is
//! the leading decimal number; everything that fails to parse counts
//! as a single unit, silently. No error surfaces from this module.

use std::sync::OnceLock;

use regex::Regex;

/// Amount substituted when a dosage string has no parseable number.
pub const DEFAULT_DOSAGE_AMOUNT: f64 = 1.0;

fn leading_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)").expect("valid dosage regex"))
}

/// Extracts the leading decimal amount from a dosage string.
///
/// `"1.5片"` → 1.5; `"abc"` → 1.0.
pub fn extract_dosage_amount(dosage: &str) -> f64 {
    leading_number()
        .captures(dosage)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(DEFAULT_DOSAGE_AMOUNT)
}

/// Guesses the unit label from a dosage string.
///
/// Checks the common unit markers in order; "mg" must come before "g"
/// or "500mg" reads as grams. Defaults to "片".
pub fn extract_unit(dosage: &str) -> String {
    for unit in ["片", "粒", "ml", "mg", "g"] {
        if dosage.contains(unit) {
            return unit.to_string();
        }
    }
    "片".into()
}
