//! Attendance records and the inputs/outputs of attendance marking.
//!
//! A record is identified by its natural key `(student_id, course_id, date)`.
//! Re-marking the same key updates the existing record in place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use strum::{EnumString, IntoStaticStr};

/// The attendance status of one student for one course on one day.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
  Present,
  Absent,
  Late,
}

/// A persisted attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub id:         i64,
  pub student_id: i64,
  /// Set by automatic marking; manual marks carry no class.
  pub class_id:   Option<i64>,
  pub course_id:  i64,
  pub teacher_id: i64,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
  pub notes:      Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::upsert_attendance`].
///
/// On a natural-key collision the store replaces `status`, `teacher_id` and
/// `updated_at`; `class_id` and `notes` are replaced only when `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceUpsert {
  pub student_id: i64,
  pub class_id:   Option<i64>,
  pub course_id:  i64,
  pub teacher_id: i64,
  pub date:       NaiveDate,
  pub status:     AttendanceStatus,
  pub notes:      Option<String>,
}

/// Parameters for [`crate::store::ScheduleStore::list_attendance`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
  pub student_id: Option<i64>,
  pub course_id:  Option<i64>,
  /// Earliest date (inclusive).
  pub from:       Option<NaiveDate>,
  /// Latest date (inclusive).
  pub to:         Option<NaiveDate>,
}

/// What an automatic mark resolved to, returned for caller confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomaticMark {
  pub date:      NaiveDate,
  pub course_id: i64,
}

/// One entry of a manual attendance batch.
///
/// Every field is read leniently: a missing or mistyped value becomes `None`
/// and fails only this entry during validation. `status` is kept as raw text
/// for the same reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManualMark {
  #[serde(default, deserialize_with = "lenient")]
  pub student_id: Option<i64>,
  #[serde(default, deserialize_with = "lenient")]
  pub status:     Option<String>,
  #[serde(default, deserialize_with = "lenient")]
  pub notes:      Option<String>,
}

impl ManualMark {
  pub fn new(student_id: i64, status: impl Into<String>) -> Self {
    Self { student_id: Some(student_id), status: Some(status.into()), notes: None }
  }
}

/// `Some` when the value has the expected shape, `None` for anything else.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
  }

  Ok(match Lenient::<T>::deserialize(d)? {
    Lenient::Value(v) => Some(v),
    Lenient::Other(_) => None,
  })
}

/// Per-entry result of a batch operation, parallel to the input.
/// `student_id` is absent when the entry did not carry a usable one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordOutcome {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub student_id: Option<i64>,
  pub success:    bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:         Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message:    Option<String>,
}

impl RecordOutcome {
  pub fn ok(student_id: i64, id: i64) -> Self {
    Self { student_id: Some(student_id), success: true, id: Some(id), message: None }
  }

  pub fn failed(student_id: impl Into<Option<i64>>, message: impl Into<String>) -> Self {
    Self {
      student_id: student_id.into(),
      success: false,
      id: None,
      message: Some(message.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn status_parses_lowercase_only() {
    assert_eq!(
      AttendanceStatus::from_str("present").unwrap(),
      AttendanceStatus::Present
    );
    assert_eq!(AttendanceStatus::from_str("late").unwrap(), AttendanceStatus::Late);
    assert!(AttendanceStatus::from_str("Present").is_err());
    assert!(AttendanceStatus::from_str("bad").is_err());
    assert_eq!(<&str>::from(AttendanceStatus::Absent), "absent");
  }

  #[test]
  fn outcome_omits_absent_fields() {
    let ok = serde_json::to_value(RecordOutcome::ok(9, 42)).unwrap();
    assert_eq!(ok, serde_json::json!({"student_id": 9, "success": true, "id": 42}));

    let failed =
      serde_json::to_value(RecordOutcome::failed(5, "invalid status")).unwrap();
    assert_eq!(
      failed,
      serde_json::json!({"student_id": 5, "success": false, "message": "invalid status"})
    );

    let anonymous = serde_json::to_value(RecordOutcome::failed(None, "no id")).unwrap();
    assert_eq!(anonymous, serde_json::json!({"success": false, "message": "no id"}));
  }

  #[test]
  fn manual_mark_tolerates_malformed_fields() {
    let marks: Vec<ManualMark> = serde_json::from_str(
      r#"[
        {"student_id": 9, "status": "present", "notes": "front row"},
        {"student_id": 5},
        {"student_id": null, "status": 3},
        {"student_id": "abc", "status": "late", "notes": false}
      ]"#,
    )
    .unwrap();

    assert_eq!(marks[0].student_id, Some(9));
    assert_eq!(marks[0].status.as_deref(), Some("present"));
    assert_eq!(marks[0].notes.as_deref(), Some("front row"));
    assert_eq!(marks[1].student_id, Some(5));
    assert_eq!(marks[1].status, None);
    assert_eq!(marks[2].student_id, None);
    assert_eq!(marks[2].status, None);
    assert_eq!(marks[3].student_id, None);
    assert_eq!(marks[3].status.as_deref(), Some("late"));
    assert_eq!(marks[3].notes, None);
  }
}
