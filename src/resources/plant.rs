//! The plants an owner keeps: a photo reference in object storage, a name,
//! and free-form care notes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{SqlValue, StoredResource, UpdateBuilder};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserPlant {
    pub id: Uuid,
    pub user_id: String,
    pub s3_id: String,
    pub name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUserPlant {
    pub s3_id: String,
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserPlantPatch {
    pub s3_id: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
}

impl UserPlantPatch {
    pub fn is_empty(&self) -> bool {
        self.s3_id.is_none() && self.name.is_none() && self.notes.is_none()
    }
}

impl StoredResource for UserPlant {
    const TABLE: &'static str = "user_plants.user_plant_list";
    const COLUMNS: &'static str = "id, user_id, s3_id, name, notes, created_at, updated_at";
    const INSERT_COLUMNS: &'static str = "s3_id, name, notes";
    const SEARCH_COLUMN: &'static str = "name";

    type Create = NewUserPlant;
    type Patch = UserPlantPatch;

    fn insert_values(input: &NewUserPlant) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(input.s3_id.clone()),
            SqlValue::Text(input.name.clone()),
            SqlValue::OptText(input.notes.clone()),
        ]
    }

    fn apply_patch(patch: &UserPlantPatch, update: &mut UpdateBuilder) {
        update.set_opt("s3_id", patch.s3_id.clone());
        update.set_opt("name", patch.name.clone());
        update.set_opt("notes", patch.notes.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_values_match_insert_columns() {
        let input = NewUserPlant {
            s3_id: "plants/abc123.jpg".to_string(),
            name: "Monstera".to_string(),
            notes: None,
        };
        let values = UserPlant::insert_values(&input);
        assert_eq!(values.len(), UserPlant::INSERT_COLUMNS.split(", ").count());
        assert_eq!(values[1], SqlValue::Text("Monstera".to_string()));
    }

    #[test]
    fn patch_only_touches_supplied_fields() {
        let patch = UserPlantPatch {
            notes: Some("mist the leaves weekly".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        let mut update = UpdateBuilder::new();
        UserPlant::apply_patch(&patch, &mut update);
        assert_eq!(update.len(), 1);
    }

    #[test]
    fn empty_patch_builds_no_assignments() {
        let mut update = UpdateBuilder::new();
        UserPlant::apply_patch(&UserPlantPatch::default(), &mut update);
        assert!(update.is_empty());
    }
}
