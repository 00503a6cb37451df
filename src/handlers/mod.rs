pub mod delegates;
pub mod plants;
pub mod reminders;

use std::collections::HashMap;

use crate::error::ApiError;
use crate::resources::{ProxyDelegate, Reminder, UserPlant};
use crate::store::ResourceStore;

/// Everything the handlers need, built once in `main` around a single pool
/// and threaded through axum state.
#[derive(Clone)]
pub struct AppState {
    pub delegates: ResourceStore<ProxyDelegate>,
    pub plants: ResourceStore<UserPlant>,
    pub reminders: ResourceStore<Reminder>,
}

/// The store reports zero rows as an empty vec; list and search render that
/// as 404 at this layer, matching what clients already expect.
pub(crate) fn require_rows<T>(rows: Vec<T>) -> Result<Vec<T>, ApiError> {
    if rows.is_empty() {
        return Err(ApiError::not_found("Resource not found"));
    }
    Ok(rows)
}

/// Strip spaces and dashes, then check the E.164-ish shape the mobile app
/// sends: optional `+`, leading digit 1-9, 10 to 15 digits total.
pub fn normalize_phone(raw: &str) -> Result<String, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    let valid = (10..=15).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0');

    if valid {
        Ok(cleaned)
    } else {
        Err("Invalid phone number.".to_string())
    }
}

pub(crate) fn field_error(field: &str, message: impl Into<String>) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    errors.insert(field.to_string(), message.into());
    errors
}
