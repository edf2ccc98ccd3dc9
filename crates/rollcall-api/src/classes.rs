//! Handlers for `/classes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/classes` | Body: [`NewClassGroup`]; returns 201 |
//! | `GET`  | `/classes/:id` | Class with member ids; 404 if not found |
//! | `POST` | `/classes/:id/members` | Body: `{"student_id": 1}`; 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  class::{ClassRoster, NewClassGroup},
  store::ScheduleStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// `POST /classes`
pub async fn create<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewClassGroup>,
) -> Result<impl IntoResponse, ApiError> {
  body.validate()?;
  let class = state.store.add_class(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(class)))
}

/// `GET /classes/:id`
pub async fn get_one<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<ClassRoster>, ApiError> {
  let class = state
    .store
    .get_class(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("class {id} not found")))?;
  let members = state.store.class_members(id).await.map_err(ApiError::store)?;
  Ok(Json(ClassRoster { class, members }))
}

#[derive(Debug, Deserialize)]
pub struct MemberBody {
  pub student_id: i64,
}

/// `POST /classes/:id/members`: idempotent.
pub async fn add_member<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<MemberBody>,
) -> Result<StatusCode, ApiError> {
  if body.student_id <= 0 {
    return Err(ApiError::BadRequest(format!(
      "student_id must be a positive id, got {}",
      body.student_id
    )));
  }
  state
    .store
    .get_class(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("class {id} not found")))?;
  state
    .store
    .add_class_member(id, body.student_id)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
