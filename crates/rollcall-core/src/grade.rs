//! Grade records.
//!
//! Grades have no natural key: every submission appends a new row, so the
//! same student can hold several grades for one course and semester.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRecord {
  pub id:            i64,
  pub student_id:    i64,
  pub course_id:     i64,
  pub teacher_id:    i64,
  /// Free-text symbol, e.g. `"A-"` or `"85"`.
  pub grade:         String,
  pub semester:      String,
  pub academic_year: String,
  pub comments:      Option<String>,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::ScheduleStore::insert_grade`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGrade {
  pub student_id:    i64,
  pub course_id:     i64,
  pub teacher_id:    i64,
  pub grade:         String,
  pub semester:      String,
  pub academic_year: String,
  pub comments:      Option<String>,
}

/// A batch of grades for one course, submitted by one teacher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeBatch {
  pub course_id:     i64,
  pub teacher_id:    i64,
  pub semester:      String,
  pub academic_year: String,
  pub entries:       Vec<GradeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeEntry {
  pub student_id: i64,
  pub grade:      String,
  #[serde(default)]
  pub comments:   Option<String>,
}

/// Parameters for [`crate::store::ScheduleStore::list_grades`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeQuery {
  pub student_id:    Option<i64>,
  pub course_id:     Option<i64>,
  pub semester:      Option<String>,
  pub academic_year: Option<String>,
}
