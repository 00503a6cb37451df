//! HTTP surface for reminders, including the scheduler-only due-soon feed.

use axum::extract::{Path, Query, State};
use axum::Extension;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::delegates::SearchQueryParams;
use super::{field_error, normalize_phone, require_rows, AppState};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::resources::{NewReminder, Reminder, ReminderPatch};
use crate::store::{Page, StoreError};

const DEFAULT_DUE_WINDOW_SECS: i64 = 60;

fn validate_due_day(due_day: &[i32]) -> Result<(), ApiError> {
    if due_day.is_empty() || due_day.len() > 7 || due_day.iter().any(|d| !(1..=7).contains(d)) {
        return Err(ApiError::validation_error(
            "Invalid fields",
            Some(field_error("dueDay", "Due days must be 1 to 7 weekdays.")),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub due_at: DateTime<Utc>,
    pub due_day: Option<Vec<i32>>,
    pub is_proxy: bool,
    pub proxy: Option<String>,
}

impl CreateReminderRequest {
    fn validate(self) -> Result<NewReminder, ApiError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Reminder".to_string());
        let due_day = self.due_day.unwrap_or_else(|| (1..=7).collect());
        validate_due_day(&due_day)?;

        let proxy = match self.proxy {
            Some(raw) => Some(normalize_phone(&raw).map_err(|msg| {
                ApiError::validation_error("Invalid fields", Some(field_error("proxy", msg)))
            })?),
            None => None,
        };
        if self.is_proxy && proxy.is_none() {
            return Err(ApiError::validation_error(
                "Invalid fields",
                Some(field_error("proxy", "A proxy phone number is required.")),
            ));
        }

        Ok(NewReminder {
            name,
            notes: self.notes,
            is_active: self.is_active,
            due_at: self.due_at,
            due_day,
            is_proxy: self.is_proxy,
            proxy,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReminderRequest {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
    pub due_at: Option<DateTime<Utc>>,
    pub due_day: Option<Vec<i32>>,
    pub is_proxy: Option<bool>,
    pub proxy: Option<String>,
}

impl UpdateReminderRequest {
    fn validate(self) -> Result<ReminderPatch, ApiError> {
        if let Some(ref due_day) = self.due_day {
            validate_due_day(due_day)?;
        }
        let proxy = match self.proxy {
            Some(raw) => Some(normalize_phone(&raw).map_err(|msg| {
                ApiError::validation_error("Invalid fields", Some(field_error("proxy", msg)))
            })?),
            None => None,
        };

        let patch = ReminderPatch {
            name: self.name.map(|n| n.trim().to_string()),
            notes: self.notes,
            is_active: self.is_active,
            due_at: self.due_at,
            due_day: self.due_day,
            is_proxy: self.is_proxy,
            proxy,
        };

        if patch.is_empty() {
            return Err(ApiError::validation_error(
                "Provide at least one field to update",
                None,
            ));
        }
        Ok(patch)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueQueryParams {
    pub window_sec: Option<i64>,
}

/// POST /v1/reminder/create
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(body): axum::Json<CreateReminderRequest>,
) -> ApiResult<Value> {
    let input = body.validate()?;
    let id = state.reminders.create(&user.id, &input).await?;
    Ok(ApiResponse::created(json!({ "reminderID": id })))
}

/// GET /v1/reminder/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Reminder> {
    let row = state
        .reminders
        .fetch(&user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource not found"))?;
    Ok(ApiResponse::success(row))
}

/// GET /v1/reminders
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Reminder>> {
    let rows = state.reminders.list(&user.id).await?;
    Ok(ApiResponse::success(require_rows(rows)?))
}

/// GET /v1/reminders/search?searchValue=&limit=&offset=
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SearchQueryParams>,
) -> ApiResult<Vec<Reminder>> {
    let filter = params
        .search_value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if filter.is_none() {
        return Err(ApiError::bad_request("No search was entered"));
    }

    let search = &config::config().search;
    let page = Page::bounded(
        params.limit,
        params.offset,
        search.default_limit,
        search.max_limit,
    );

    let rows = state
        .reminders
        .search(&user.id, filter.as_deref(), page)
        .await?;
    Ok(ApiResponse::success(require_rows(rows)?))
}

/// GET /v1/reminders/due?windowSec= - scheduler feed, not owner-scoped and
/// not behind the bearer-token middleware.
pub async fn due(
    State(state): State<AppState>,
    Query(params): Query<DueQueryParams>,
) -> ApiResult<Vec<Reminder>> {
    let window_secs = params
        .window_sec
        .filter(|w| *w > 0)
        .unwrap_or(DEFAULT_DUE_WINDOW_SECS);
    let rows = state.reminders.due_within(window_secs).await?;
    Ok(ApiResponse::success(rows))
}

/// PUT /v1/reminder/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    axum::Json(body): axum::Json<UpdateReminderRequest>,
) -> ApiResult<Reminder> {
    let patch = body.validate()?;
    let row = state
        .reminders
        .update(&user.id, id, &patch)
        .await?
        .ok_or(StoreError::EmptyUpdate)?;
    Ok(ApiResponse::success(row))
}

/// DELETE /v1/reminder/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let deleted = state.reminders.delete(&user.id, id).await?;
    Ok(ApiResponse::success(json!({ "id": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_create() -> CreateReminderRequest {
        CreateReminderRequest {
            name: None,
            notes: Some("water twice".to_string()),
            is_active: true,
            due_at: Utc::now(),
            due_day: None,
            is_proxy: false,
            proxy: None,
        }
    }

    #[test]
    fn create_defaults_name_and_due_days() {
        let input = base_create().validate().unwrap();
        assert_eq!(input.name, "Reminder");
        assert_eq!(input.due_day, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn create_requires_proxy_phone_when_proxied() {
        let mut req = base_create();
        req.is_proxy = true;
        assert_eq!(req.validate().unwrap_err().status_code(), 400);

        let mut req = base_create();
        req.is_proxy = true;
        req.proxy = Some("+65 8293 8737".to_string());
        let input = req.validate().unwrap();
        assert_eq!(input.proxy.as_deref(), Some("+6582938737"));
    }

    #[test]
    fn due_day_bounds_are_enforced() {
        let mut req = base_create();
        req.due_day = Some(vec![0, 3]);
        assert!(req.validate().is_err());

        let mut req = base_create();
        req.due_day = Some(vec![]);
        assert!(req.validate().is_err());

        let mut req = base_create();
        req.due_day = Some(vec![1, 2, 3, 4, 5, 6, 7, 7]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_rejects_empty_patch() {
        let req = UpdateReminderRequest {
            name: None,
            notes: None,
            is_active: None,
            due_at: None,
            due_day: None,
            is_proxy: None,
            proxy: None,
        };
        assert_eq!(req.validate().unwrap_err().error_code(), "VALIDATION_ERROR");
    }
}
