//! HTTP surface for the plants an owner keeps. The photo itself lives in
//! object storage; the row only carries its key.

use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::delegates::SearchQueryParams;
use super::{field_error, require_rows, AppState};
use crate::config;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::resources::{NewUserPlant, UserPlant, UserPlantPatch};
use crate::store::{Page, StoreError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantRequest {
    pub s3_id: Option<String>,
    pub name: String,
    pub notes: Option<String>,
}

impl CreatePlantRequest {
    fn validate(self) -> Result<NewUserPlant, ApiError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::validation_error(
                "Invalid fields",
                Some(field_error("name", "A name must be provided!")),
            ));
        }

        Ok(NewUserPlant {
            s3_id: self.s3_id.unwrap_or_default(),
            name,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlantRequest {
    pub s3_id: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
}

impl UpdatePlantRequest {
    fn validate(self) -> Result<UserPlantPatch, ApiError> {
        let patch = UserPlantPatch {
            s3_id: self.s3_id,
            name: self.name.map(|n| n.trim().to_string()),
            notes: self.notes,
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

/// POST /v1/plant/create
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(body): axum::Json<CreatePlantRequest>,
) -> ApiResult<Value> {
    let input = body.validate()?;
    let id = state.plants.create(&user.id, &input).await?;
    Ok(ApiResponse::created(json!({ "userPlantID": id })))
}

/// GET /v1/plant/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserPlant> {
    let row = state
        .plants
        .fetch(&user.id, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource not found"))?;
    Ok(ApiResponse::success(row))
}

/// GET /v1/plants
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<UserPlant>> {
    let rows = state.plants.list(&user.id).await?;
    Ok(ApiResponse::success(require_rows(rows)?))
}

/// GET /v1/plants/search?searchValue=&limit=&offset=
pub async fn search(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<SearchQueryParams>,
) -> ApiResult<Vec<UserPlant>> {
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
        .plants
        .search(&user.id, filter.as_deref(), page)
        .await?;
    Ok(ApiResponse::success(require_rows(rows)?))
}

/// PUT /v1/plant/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    axum::Json(body): axum::Json<UpdatePlantRequest>,
) -> ApiResult<UserPlant> {
    let patch = body.validate()?;
    let row = state
        .plants
        .update(&user.id, id, &patch)
        .await?
        .ok_or(StoreError::EmptyUpdate)?;
    Ok(ApiResponse::success(row))
}

/// DELETE /v1/plant/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    let deleted = state.plants.delete(&user.id, id).await?;
    Ok(ApiResponse::success(json!({ "id": deleted })))
}
