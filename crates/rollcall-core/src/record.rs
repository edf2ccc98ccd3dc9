//! Attendance and grade recording.
//!
//! Automatic marking resolves class and slot from the clock and performs a
//! single upsert. Batch operations validate and write each entry on its own:
//! one bad entry or one failed write never fails the whole batch.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::{debug, error, info};

use crate::{
  Error, Result,
  attendance::{AttendanceStatus, AttendanceUpsert, AutomaticMark, ManualMark, RecordOutcome},
  clock::LocalMoment,
  error::store_failure,
  grade::{GradeBatch, GradeEntry, NewGrade},
  resolve::{active_class_at, current_slot_at},
  store::ScheduleStore,
  timetable::{require_positive, require_text},
};

/// Mark `student_id` present for whatever class is running at `instant`.
///
/// Idempotent within one slot occurrence: repeated calls update the same
/// `(student, course, date)` record.
pub async fn record_automatic_attendance<S, Tz>(
  store: &S,
  student_id: i64,
  instant: DateTime<Utc>,
  zone: &Tz,
) -> Result<AutomaticMark>
where
  S: ScheduleStore,
  Tz: TimeZone + Sync,
{
  require_positive("student_id", student_id)?;
  let moment = LocalMoment::at(instant, zone);

  let class = active_class_at(store, student_id, moment).await?;
  let slot = current_slot_at(store, &class, moment).await?;

  let record = store
    .upsert_attendance(AttendanceUpsert {
      student_id,
      class_id: Some(class.id),
      course_id: slot.course_id,
      teacher_id: slot.teacher_id,
      date: moment.date,
      status: AttendanceStatus::Present,
      notes: None,
    })
    .await
    .map_err(store_failure)?;

  info!(
    student_id,
    class_id = class.id,
    course_id = slot.course_id,
    record_id = record.id,
    date = %moment.date,
    "recorded automatic attendance"
  );
  Ok(AutomaticMark { date: moment.date, course_id: slot.course_id })
}

/// Mark a batch of students for one course and day.
///
/// The result has one entry per input record, in input order.
pub async fn record_manual_attendance<S: ScheduleStore>(
  store: &S,
  course_id: i64,
  teacher_id: i64,
  date: NaiveDate,
  records: Vec<ManualMark>,
) -> Result<Vec<RecordOutcome>> {
  require_positive("course_id", course_id)?;
  require_positive("teacher_id", teacher_id)?;

  let mut outcomes = Vec::with_capacity(records.len());
  for mark in records {
    let upsert = match validate_mark(&mark, course_id, teacher_id, date) {
      Ok(u) => u,
      Err(e) => {
        debug!(
          student_id = ?mark.student_id,
          course_id,
          error = %e,
          "rejected manual attendance entry"
        );
        outcomes.push(RecordOutcome::failed(mark.student_id, e.to_string()));
        continue;
      }
    };

    let student_id = upsert.student_id;
    match store.upsert_attendance(upsert).await {
      Ok(record) => outcomes.push(RecordOutcome::ok(student_id, record.id)),
      Err(e) => {
        error!(student_id, course_id, error = %e, "failed to store attendance entry");
        outcomes.push(RecordOutcome::failed(student_id, Error::store(e).to_string()));
      }
    }
  }

  info!(
    course_id,
    date = %date,
    total = outcomes.len(),
    succeeded = outcomes.iter().filter(|o| o.success).count(),
    "recorded manual attendance batch"
  );
  Ok(outcomes)
}

fn validate_mark(
  mark: &ManualMark,
  course_id: i64,
  teacher_id: i64,
  date: NaiveDate,
) -> Result<AttendanceUpsert> {
  let student_id = mark
    .student_id
    .ok_or_else(|| Error::invalid("student_id", "missing or not an integer"))?;
  require_positive("student_id", student_id)?;
  let raw = mark
    .status
    .as_deref()
    .ok_or_else(|| Error::invalid("status", "missing or not a string"))?;
  let status = AttendanceStatus::from_str(raw).map_err(|_| {
    Error::invalid("status", format!("{raw:?} is not one of present, absent, late"))
  })?;
  Ok(AttendanceUpsert {
    student_id,
    class_id: None,
    course_id,
    teacher_id,
    date,
    status,
    notes: mark.notes.clone(),
  })
}

/// Append one grade row per valid entry.
///
/// The result has one entry per input entry, in input order.
pub async fn record_grades<S: ScheduleStore>(
  store: &S,
  batch: GradeBatch,
) -> Result<Vec<RecordOutcome>> {
  let GradeBatch { course_id, teacher_id, semester, academic_year, entries } = batch;
  require_positive("course_id", course_id)?;
  require_positive("teacher_id", teacher_id)?;
  require_text("semester", &semester)?;
  require_text("academic_year", &academic_year)?;

  let mut outcomes = Vec::with_capacity(entries.len());
  for entry in entries {
    let student_id = entry.student_id;
    let input = match validate_grade(entry) {
      Ok((grade, comments)) => NewGrade {
        student_id,
        course_id,
        teacher_id,
        grade,
        semester: semester.clone(),
        academic_year: academic_year.clone(),
        comments,
      },
      Err(e) => {
        debug!(student_id, error = %e, "rejected grade entry");
        outcomes.push(RecordOutcome::failed(student_id, e.to_string()));
        continue;
      }
    };

    match store.insert_grade(input).await {
      Ok(grade) => outcomes.push(RecordOutcome::ok(student_id, grade.id)),
      Err(e) => {
        error!(student_id, error = %e, "failed to store grade entry");
        outcomes.push(RecordOutcome::failed(student_id, Error::store(e).to_string()));
      }
    }
  }

  info!(
    course_id,
    total = outcomes.len(),
    succeeded = outcomes.iter().filter(|o| o.success).count(),
    "recorded grade batch"
  );
  Ok(outcomes)
}

/// Returns the trimmed grade and the comments.
fn validate_grade(entry: GradeEntry) -> Result<(String, Option<String>)> {
  require_positive("student_id", entry.student_id)?;
  let grade = entry.grade.trim();
  require_text("grade", grade)?;
  Ok((grade.to_owned(), entry.comments))
}
