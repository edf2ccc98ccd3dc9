//! Conflict detection and conflict-aware slot writes.

use tracing::{debug, info};

use crate::{
  Error, Result,
  error::store_failure,
  store::ScheduleStore,
  timetable::{NewSlot, SlotCandidate, SlotPatch, SlotQuery, TimetableSlot},
};

/// Ids of existing slots that clash with `candidate`, in ascending order.
///
/// A clash needs the same semester and day, overlapping `[start, end)`
/// ranges, and a shared course or teacher. No side effects.
pub async fn find_conflicts<S: ScheduleStore>(
  store: &S,
  candidate: &SlotCandidate,
) -> Result<Vec<i64>> {
  let query = SlotQuery {
    semester: Some(candidate.semester.clone()),
    day_of_week: Some(candidate.day_of_week),
    course_id: Some(candidate.course_id),
    teacher_id: Some(candidate.teacher_id),
    overlapping: Some(candidate.time_range()),
    exclude_id: candidate.exclude_id,
    ..Default::default()
  };
  let existing = store.find_slots(&query).await.map_err(store_failure)?;
  Ok(conflicting_ids(candidate, &existing))
}

/// The in-memory half of [`find_conflicts`]: filter `existing` down to the
/// slots that clash with `candidate`.
pub fn conflicting_ids(candidate: &SlotCandidate, existing: &[TimetableSlot]) -> Vec<i64> {
  let range = candidate.time_range();
  let mut ids: Vec<i64> = existing
    .iter()
    .filter(|s| Some(s.id) != candidate.exclude_id)
    .filter(|s| s.semester == candidate.semester && s.day_of_week == candidate.day_of_week)
    .filter(|s| s.course_id == candidate.course_id || s.teacher_id == candidate.teacher_id)
    .filter(|s| s.time_range().overlaps(&range))
    .map(|s| s.id)
    .collect();
  ids.sort_unstable();
  ids.dedup();
  ids
}

/// Validate `slot`, reject it if it clashes with the timetable, then insert
/// it (or replace `existing_id`). Returns the slot id.
///
/// The conflict check and the write are separate store calls, so two
/// concurrent writers can each pass the check and together create a clash.
/// Callers that need stronger guarantees must serialise slot writes.
pub async fn create_or_update_slot<S: ScheduleStore>(
  store: &S,
  slot: NewSlot,
  existing_id: Option<i64>,
) -> Result<i64> {
  save_slot(store, slot, existing_id).await.map(|s| s.id)
}

/// Merge `patch` onto slot `id` and save it through the same checks as
/// [`create_or_update_slot`].
pub async fn patch_slot<S: ScheduleStore>(
  store: &S,
  id: i64,
  patch: SlotPatch,
) -> Result<TimetableSlot> {
  let current = store
    .get_slot(id)
    .await
    .map_err(store_failure)?
    .ok_or(Error::SlotNotFound(id))?;
  if patch.is_empty() {
    return Ok(current);
  }
  save_slot(store, patch.apply(current), Some(id)).await
}

/// [`create_or_update_slot`], returning the slot as the store saved it.
pub async fn save_slot<S: ScheduleStore>(
  store: &S,
  slot: NewSlot,
  existing_id: Option<i64>,
) -> Result<TimetableSlot> {
  slot.validate()?;

  if let Some(id) = existing_id {
    store
      .get_slot(id)
      .await
      .map_err(store_failure)?
      .ok_or(Error::SlotNotFound(id))?;
  }

  let conflicting = find_conflicts(store, &slot.candidate(existing_id)).await?;
  if !conflicting.is_empty() {
    debug!(?conflicting, ?existing_id, "rejected slot write: schedule conflict");
    return Err(Error::ScheduleConflict { conflicting });
  }

  let saved = match existing_id {
    Some(id) => store
      .update_slot(id, slot)
      .await
      .map_err(store_failure)?
      .ok_or(Error::SlotNotFound(id))?,
    None => store.insert_slot(slot).await.map_err(store_failure)?,
  };
  info!(slot_id = saved.id, class_id = saved.class_id, "saved timetable slot");
  Ok(saved)
}
