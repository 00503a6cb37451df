//! HTTP surface for proxy delegates. Handlers translate validated payloads
//! into store calls and classified store errors into responses; all the
//! ownership and transaction discipline lives in the store.

use axum::extract::{Path, Query, State};
use axum::Extension;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{field_error, normalize_phone, require_rows, AppState};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::resources::{DelegatePatch, NewDelegate, ProxyDelegate};
use crate::store::{Page, StoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDelegateRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub phone_number: String,
}

impl CreateDelegateRequest {
    fn validate(self) -> Result<NewDelegate, ApiError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::validation_error(
                "Invalid fields",
                Some(field_error("name", "A name must be provided!")),
            ));
        }
        if self.end_date < self.start_date {
            return Err(ApiError::validation_error(
                "Invalid fields",
                Some(field_error("endDate", "End date is before start date.")),
            ));
        }
        let phone_number = normalize_phone(&self.phone_number)
            .map_err(|msg| ApiError::validation_error("Invalid fields", Some(field_error("phoneNumber", msg))))?;

        Ok(NewDelegate {
            name,
            start_date: self.start_date,
            end_date: self.end_date,
            phone_number,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDelegateRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub phone_number: Option<String>,
}

impl UpdateDelegateRequest {
    fn validate(self) -> Result<DelegatePatch, ApiError> {
        let phone_number = match self.phone_number {
            Some(raw) => Some(normalize_phone(&raw).map_err(|msg| {
                ApiError::validation_error("Invalid fields", Some(field_error("phoneNumber", msg)))
            })?),
            None => None,
        };

        let patch = DelegatePatch {
            name: self.name.map(|n| n.trim().to_string()),
            start_date: self.start_date,
            end_date: self.end_date,
            phone_number,
        };

        // Zero supplied fields is rejected here, before the store is reached.
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
pub struct SearchQueryParams {
    pub search_value: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /v1/proxy/create
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(body): axum::Json<CreateDelegateRequest>,
) -> ApiResult<Value> {
    let input = body.validate()?;
    let id = state.delegates.create(&user.id, &input).await?;
    Ok(ApiResponse::created(json!({ "proxyID": id })))
}

/// GET /v1/proxy/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<ProxyDelegate> {
    let row = state
        .delegates
        .fetch(&user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource not found"))?;
    Ok(ApiResponse::success(row))
}

/// GET /v1/proxys
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<ProxyDelegate>> {
    let rows = state.delegates.list(&user.id).await?;
    Ok(ApiResponse::success(require_rows(rows)?))
}

/// GET /v1/proxys/search?searchValue=&limit=&offset=
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SearchQueryParams>,
) -> ApiResult<Vec<ProxyDelegate>> {
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
        .delegates
        .search(&user.id, filter.as_deref(), page)
        .await?;
    Ok(ApiResponse::success(require_rows(rows)?))
}

/// PUT /v1/proxy/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    axum::Json(body): axum::Json<UpdateDelegateRequest>,
) -> ApiResult<ProxyDelegate> {
    let patch = body.validate()?;
    // Validation guarantees a non-empty patch, so a no-op here means the
    // request body slipped through with nothing to change.
    let row = state
        .delegates
        .update(&user.id, id, &patch)
        .await?
        .ok_or(StoreError::EmptyUpdate)?;
    Ok(ApiResponse::success(row))
}

/// DELETE /v1/proxy/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let deleted = state.delegates.delete(&user.id, id).await?;
    Ok(ApiResponse::success(json!({ "id": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_create() -> CreateDelegateRequest {
        CreateDelegateRequest {
            name: "Alice".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            phone_number: "+65 9123 4567".to_string(),
        }
    }

    #[test]
    fn create_normalizes_phone() {
        let input = base_create().validate().unwrap();
        assert_eq!(input.phone_number, "+6591234567");
    }

    #[test]
    fn create_rejects_blank_name_and_inverted_window() {
        let mut req = base_create();
        req.name = "   ".to_string();
        assert_eq!(req.validate().unwrap_err().status_code(), 400);

        let mut req = base_create();
        req.end_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(req.validate().unwrap_err().status_code(), 400);
    }

    #[test]
    fn update_rejects_empty_patch() {
        let req = UpdateDelegateRequest {
            name: None,
            start_date: None,
            end_date: None,
            phone_number: None,
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn update_accepts_single_field() {
        let req = UpdateDelegateRequest {
            name: Some("Alicia".to_string()),
            start_date: None,
            end_date: None,
            phone_number: None,
        };
        let patch = req.validate().unwrap();
        assert_eq!(patch.name.as_deref(), Some("Alicia"));
        assert!(patch.phone_number.is_none());
    }
}
