//! Handlers for `/grades`.
//!
//! `POST /grades` takes a [`GradeBatch`] and answers with one outcome per
//! entry. `GET /grades` filters by `student_id`, `course_id`, `semester` and
//! `academic_year`.

use axum::{
  Json,
  extract::{Query, State},
};
use rollcall_core::{
  attendance::RecordOutcome,
  grade::{GradeBatch, GradeQuery, GradeRecord},
  record::record_grades,
  store::ScheduleStore,
};

use crate::{ApiState, error::ApiError};

pub async fn list<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Query(query): Query<GradeQuery>,
) -> Result<Json<Vec<GradeRecord>>, ApiError> {
  let grades = state.store.list_grades(&query).await.map_err(ApiError::store)?;
  Ok(Json(grades))
}

pub async fn create<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Json(batch): Json<GradeBatch>,
) -> Result<Json<Vec<RecordOutcome>>, ApiError> {
  Ok(Json(record_grades(&*state.store, batch).await?))
}
