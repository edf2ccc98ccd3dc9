//! Handlers for `/attendance` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/attendance` | Optional `student_id`, `course_id`, `from`, `to` |
//! | `POST` | `/attendance/automatic` | Body: [`AutomaticBody`]; marks the running class |
//! | `POST` | `/attendance/manual` | Body: [`ManualBody`]; one outcome per record |

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, NaiveDate, Utc};
use rollcall_core::{
  attendance::{AttendanceQuery, AttendanceRecord, AutomaticMark, ManualMark, RecordOutcome},
  record::{record_automatic_attendance, record_manual_attendance},
  store::ScheduleStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// `GET /attendance[?student_id=...][&course_id=...][&from=YYYY-MM-DD][&to=YYYY-MM-DD]`
pub async fn list<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Query(query): Query<AttendanceQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError> {
  let records = state.store.list_attendance(&query).await.map_err(ApiError::store)?;
  Ok(Json(records))
}

#[derive(Debug, Deserialize)]
pub struct AutomaticBody {
  pub student_id: i64,
  /// Reference instant; defaults to the time the request is handled.
  pub at:         Option<DateTime<Utc>>,
}

/// `POST /attendance/automatic`
pub async fn automatic<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<AutomaticBody>,
) -> Result<Json<AutomaticMark>, ApiError> {
  let at = body.at.unwrap_or_else(Utc::now);
  let mark =
    record_automatic_attendance(&*state.store, body.student_id, at, &state.zone).await?;
  Ok(Json(mark))
}

#[derive(Debug, Deserialize)]
pub struct ManualBody {
  pub course_id:  i64,
  pub teacher_id: i64,
  pub date:       NaiveDate,
  pub records:    Vec<ManualMark>,
}

/// `POST /attendance/manual`: 200 even when individual records fail.
pub async fn manual<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<ManualBody>,
) -> Result<Json<Vec<RecordOutcome>>, ApiError> {
  let outcomes = record_manual_attendance(
    &*state.store,
    body.course_id,
    body.teacher_id,
    body.date,
    body.records,
  )
  .await?;
  Ok(Json(outcomes))
}
