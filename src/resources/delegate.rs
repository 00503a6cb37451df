//! Proxy delegates: the person looking after an owner's plants while they
//! are away, reachable on a phone number for a bounded date window.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{SqlValue, StoredResource, UpdateBuilder};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProxyDelegate {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating a delegate.
#[derive(Debug, Clone)]
pub struct NewDelegate {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub phone_number: String,
}

/// Sparse update payload; `None` means leave the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct DelegatePatch {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub phone_number: Option<String>,
}

impl DelegatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.phone_number.is_none()
    }
}

impl StoredResource for ProxyDelegate {
    const TABLE: &'static str = "proxys.proxy_list";
    const COLUMNS: &'static str =
        "id, user_id, name, start_date, end_date, phone_number, created_at, updated_at";
    const INSERT_COLUMNS: &'static str = "name, start_date, end_date, phone_number";
    const SEARCH_COLUMN: &'static str = "name";

    type Create = NewDelegate;
    type Patch = DelegatePatch;

    fn insert_values(input: &NewDelegate) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(input.name.clone()),
            SqlValue::Date(input.start_date),
            SqlValue::Date(input.end_date),
            SqlValue::Text(input.phone_number.clone()),
        ]
    }

    fn apply_patch(patch: &DelegatePatch, update: &mut UpdateBuilder) {
        update.set_opt("name", patch.name.clone());
        update.set_opt("start_date", patch.start_date);
        update.set_opt("end_date", patch.end_date);
        update.set_opt("phone_number", patch.phone_number.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_values_match_insert_columns() {
        let input = NewDelegate {
            name: "Alice".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            phone_number: "+6591234567".to_string(),
        };
        let values = ProxyDelegate::insert_values(&input);
        assert_eq!(
            values.len(),
            ProxyDelegate::INSERT_COLUMNS.split(", ").count()
        );
        assert_eq!(values[0], SqlValue::Text("Alice".to_string()));
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let patch = DelegatePatch {
            name: Some("Alicia".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        let mut update = UpdateBuilder::new();
        ProxyDelegate::apply_patch(&patch, &mut update);
        assert_eq!(update.len(), 1);
    }

    #[test]
    fn empty_patch_builds_no_assignments() {
        let mut update = UpdateBuilder::new();
        ProxyDelegate::apply_patch(&DelegatePatch::default(), &mut update);
        assert!(update.is_empty());
    }
}
