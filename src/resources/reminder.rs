//! Watering reminders, optionally routed to a proxy delegate's phone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::store::{ResourceStore, SqlValue, StoreError, StoredResource, UpdateBuilder};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub due_at: DateTime<Utc>,
    pub due_day: Vec<i32>,
    pub is_proxy: bool,
    pub proxy: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub name: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub due_at: DateTime<Utc>,
    pub due_day: Vec<i32>,
    pub is_proxy: bool,
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
    pub due_at: Option<DateTime<Utc>>,
    pub due_day: Option<Vec<i32>>,
    pub is_proxy: Option<bool>,
    pub proxy: Option<String>,
}

impl ReminderPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notes.is_none()
            && self.is_active.is_none()
            && self.due_at.is_none()
            && self.due_day.is_none()
            && self.is_proxy.is_none()
            && self.proxy.is_none()
    }
}

impl StoredResource for Reminder {
    const TABLE: &'static str = "reminders.reminder_list";
    const COLUMNS: &'static str = "id, user_id, name, notes, is_active, due_at, due_day, \
                                   is_proxy, proxy, created_at, updated_at";
    const INSERT_COLUMNS: &'static str =
        "name, notes, is_active, due_at, due_day, is_proxy, proxy";
    const SEARCH_COLUMN: &'static str = "name";

    type Create = NewReminder;
    type Patch = ReminderPatch;

    fn insert_values(input: &NewReminder) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(input.name.clone()),
            SqlValue::OptText(input.notes.clone()),
            SqlValue::Bool(input.is_active),
            SqlValue::Timestamp(input.due_at),
            SqlValue::IntArray(input.due_day.clone()),
            SqlValue::Bool(input.is_proxy),
            SqlValue::OptText(input.proxy.clone()),
        ]
    }

    fn apply_patch(patch: &ReminderPatch, update: &mut UpdateBuilder) {
        update.set_opt("name", patch.name.clone());
        update.set_opt("notes", patch.notes.clone());
        update.set_opt("is_active", patch.is_active);
        update.set_opt("due_at", patch.due_at);
        update.set_opt("due_day", patch.due_day.clone());
        update.set_opt("is_proxy", patch.is_proxy);
        update.set_opt("proxy", patch.proxy.clone());
    }
}

impl ResourceStore<Reminder> {
    /// Active reminders falling due within the next `window_secs` seconds,
    /// soonest first. Read by the scheduler, so not owner-scoped.
    pub async fn due_within(&self, window_secs: i64) -> Result<Vec<Reminder>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} \
             WHERE is_active = true \
               AND due_at BETWEEN now() AND now() + make_interval(secs => $1) \
             ORDER BY due_at ASC",
            Reminder::COLUMNS,
            Reminder::TABLE
        );
        let rows = sqlx::query_as::<_, Reminder>(&sql)
            .bind(window_secs as f64)
            .fetch_all(self.pool())
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_values_match_insert_columns() {
        let input = NewReminder {
            name: "Water the monstera".to_string(),
            notes: None,
            is_active: true,
            due_at: Utc::now(),
            due_day: vec![1, 3, 5],
            is_proxy: false,
            proxy: None,
        };
        let values = Reminder::insert_values(&input);
        assert_eq!(values.len(), Reminder::INSERT_COLUMNS.split(", ").count());
    }

    #[test]
    fn full_patch_covers_every_payload_column() {
        let patch = ReminderPatch {
            name: Some("n".to_string()),
            notes: Some("x".to_string()),
            is_active: Some(false),
            due_at: Some(Utc::now()),
            due_day: Some(vec![7]),
            is_proxy: Some(true),
            proxy: Some("+6598765432".to_string()),
        };
        let mut update = UpdateBuilder::new();
        Reminder::apply_patch(&patch, &mut update);
        assert_eq!(update.len(), Reminder::INSERT_COLUMNS.split(", ").count());
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(ReminderPatch::default().is_empty());
    }
}
