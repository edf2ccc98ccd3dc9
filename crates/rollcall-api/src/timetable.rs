//! Handlers for `/timetable` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/timetable/conflicts` | Body: [`SlotCandidate`]; never writes |
//! | `GET`    | `/timetable/slots` | Optional filters, see [`ListParams`] |
//! | `POST`   | `/timetable/slots` | Body: [`NewSlot`]; 201, or 409 on conflict |
//! | `GET`    | `/timetable/slots/:id` | 404 if not found |
//! | `PUT`    | `/timetable/slots/:id` | Body: [`NewSlot`]; full replacement |
//! | `PATCH`  | `/timetable/slots/:id` | Body: [`SlotPatch`] |
//! | `DELETE` | `/timetable/slots/:id` | 204, or 404 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rollcall_core::{
  schedule::{find_conflicts, patch_slot, save_slot},
  store::ScheduleStore,
  timetable::{NewSlot, SlotCandidate, SlotPatch, SlotQuery, TimetableSlot, iso_weekday},
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

// ─── Conflicts ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ConflictReport {
  pub conflicting_slot_ids: Vec<i64>,
}

/// `POST /timetable/conflicts`: report clashes without writing anything.
pub async fn conflicts<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Json(candidate): Json<SlotCandidate>,
) -> Result<Json<ConflictReport>, ApiError> {
  let conflicting_slot_ids = find_conflicts(&*state.store, &candidate).await?;
  Ok(Json(ConflictReport { conflicting_slot_ids }))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub semester:      Option<String>,
  pub academic_year: Option<String>,
  pub class_id:      Option<i64>,
  /// When combined with `teacher_id`, matches slots sharing either.
  pub course_id:     Option<i64>,
  pub teacher_id:    Option<i64>,
  /// ISO day number, 1 = Monday … 7 = Sunday.
  pub day_of_week:   Option<u8>,
}

/// `GET /timetable/slots[?semester=...][&class_id=...][&day_of_week=1]`
pub async fn list<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<TimetableSlot>>, ApiError> {
  let day_of_week = params
    .day_of_week
    .map(|n| {
      iso_weekday::from_number(n).ok_or_else(|| {
        ApiError::BadRequest(format!("day_of_week must be 1-7, got {n}"))
      })
    })
    .transpose()?;

  let query = SlotQuery {
    semester: params.semester,
    academic_year: params.academic_year,
    day_of_week,
    class_id: params.class_id,
    course_id: params.course_id,
    teacher_id: params.teacher_id,
    ..Default::default()
  };
  let slots = state.store.find_slots(&query).await.map_err(ApiError::store)?;
  Ok(Json(slots))
}

// ─── Create / replace / patch ─────────────────────────────────────────────────

/// `POST /timetable/slots`: returns 201 + the stored slot.
pub async fn create<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewSlot>,
) -> Result<impl IntoResponse, ApiError> {
  let slot = save_slot(&*state.store, body, None).await?;
  Ok((StatusCode::CREATED, Json(slot)))
}

/// `PUT /timetable/slots/:id`: replace every field of an existing slot.
pub async fn replace<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewSlot>,
) -> Result<Json<TimetableSlot>, ApiError> {
  Ok(Json(save_slot(&*state.store, body, Some(id)).await?))
}

/// `PATCH /timetable/slots/:id`: update only the fields present in the body.
pub async fn patch<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<SlotPatch>,
) -> Result<Json<TimetableSlot>, ApiError> {
  Ok(Json(patch_slot(&*state.store, id, body).await?))
}

// ─── Get / delete ─────────────────────────────────────────────────────────────

/// `GET /timetable/slots/:id`
pub async fn get_one<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<TimetableSlot>, ApiError> {
  let slot = state
    .store
    .get_slot(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("timetable slot {id} not found")))?;
  Ok(Json(slot))
}

/// `DELETE /timetable/slots/:id`
pub async fn delete_one<S: ScheduleStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  if state.store.delete_slot(id).await.map_err(ApiError::store)? {
    tracing::info!(slot_id = id, "deleted timetable slot");
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("timetable slot {id} not found")))
  }
}
