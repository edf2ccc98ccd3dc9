//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use rollcall_core::{
  attendance::{AttendanceRecord, AttendanceStatus},
  class::ClassGroup,
  grade::GradeRecord,
  timetable::{TimetableSlot, iso_weekday},
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate / NaiveTime ───────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Always `HH:MM:SS`; fractional seconds are dropped so text comparison in
/// SQL stays consistent.
pub fn encode_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Weekday ─────────────────────────────────────────────────────────────────

pub fn encode_weekday(d: Weekday) -> i64 { i64::from(d.number_from_monday()) }

pub fn decode_weekday(n: i64) -> Result<Weekday> {
  u8::try_from(n)
    .ok()
    .and_then(iso_weekday::from_number)
    .ok_or_else(|| Error::UnknownValue { column: "day_of_week", value: n.to_string() })
}

// ─── AttendanceStatus ────────────────────────────────────────────────────────

pub fn encode_status(s: AttendanceStatus) -> &'static str { s.into() }

pub fn decode_status(s: &str) -> Result<AttendanceStatus> {
  AttendanceStatus::from_str(s)
    .map_err(|_| Error::UnknownValue { column: "status", value: s.to_owned() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const SLOT_COLUMNS: &str = "id, course_id, teacher_id, class_id, day_of_week, \
                                start_time, end_time, semester, academic_year";

/// Raw values read directly from a `timetable` row.
pub struct RawSlot {
  pub id:            i64,
  pub course_id:     i64,
  pub teacher_id:    i64,
  pub class_id:      i64,
  pub day_of_week:   i64,
  pub start_time:    String,
  pub end_time:      String,
  pub semester:      String,
  pub academic_year: String,
}

impl RawSlot {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      course_id:     row.get(1)?,
      teacher_id:    row.get(2)?,
      class_id:      row.get(3)?,
      day_of_week:   row.get(4)?,
      start_time:    row.get(5)?,
      end_time:      row.get(6)?,
      semester:      row.get(7)?,
      academic_year: row.get(8)?,
    })
  }

  pub fn into_slot(self) -> Result<TimetableSlot> {
    Ok(TimetableSlot {
      id:            self.id,
      course_id:     self.course_id,
      teacher_id:    self.teacher_id,
      class_id:      self.class_id,
      day_of_week:   decode_weekday(self.day_of_week)?,
      start_time:    decode_time(&self.start_time)?,
      end_time:      decode_time(&self.end_time)?,
      semester:      self.semester,
      academic_year: self.academic_year,
    })
  }
}

pub const CLASS_COLUMNS: &str =
  "c.id, c.name, c.start_date, c.end_date, c.is_active, c.semester, c.academic_year";

/// Raw values read directly from a `classes` row.
pub struct RawClass {
  pub id:            i64,
  pub name:          String,
  pub start_date:    String,
  pub end_date:      String,
  pub is_active:     bool,
  pub semester:      String,
  pub academic_year: String,
}

impl RawClass {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      name:          row.get(1)?,
      start_date:    row.get(2)?,
      end_date:      row.get(3)?,
      is_active:     row.get(4)?,
      semester:      row.get(5)?,
      academic_year: row.get(6)?,
    })
  }

  pub fn into_class(self) -> Result<ClassGroup> {
    Ok(ClassGroup {
      id:            self.id,
      name:          self.name,
      start_date:    decode_date(&self.start_date)?,
      end_date:      decode_date(&self.end_date)?,
      is_active:     self.is_active,
      semester:      self.semester,
      academic_year: self.academic_year,
    })
  }
}

pub const ATTENDANCE_COLUMNS: &str = "id, student_id, class_id, course_id, teacher_id, \
                                      date, status, notes, created_at, updated_at";

/// Raw values read directly from an `attendance` row.
pub struct RawAttendance {
  pub id:         i64,
  pub student_id: i64,
  pub class_id:   Option<i64>,
  pub course_id:  i64,
  pub teacher_id: i64,
  pub date:       String,
  pub status:     String,
  pub notes:      Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawAttendance {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      student_id: row.get(1)?,
      class_id:   row.get(2)?,
      course_id:  row.get(3)?,
      teacher_id: row.get(4)?,
      date:       row.get(5)?,
      status:     row.get(6)?,
      notes:      row.get(7)?,
      created_at: row.get(8)?,
      updated_at: row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      id:         self.id,
      student_id: self.student_id,
      class_id:   self.class_id,
      course_id:  self.course_id,
      teacher_id: self.teacher_id,
      date:       decode_date(&self.date)?,
      status:     decode_status(&self.status)?,
      notes:      self.notes,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const GRADE_COLUMNS: &str = "id, student_id, course_id, teacher_id, grade, \
                                 semester, academic_year, comments, created_at";

/// Raw values read directly from a `grades` row.
pub struct RawGrade {
  pub id:            i64,
  pub student_id:    i64,
  pub course_id:     i64,
  pub teacher_id:    i64,
  pub grade:         String,
  pub semester:      String,
  pub academic_year: String,
  pub comments:      Option<String>,
  pub created_at:    String,
}

impl RawGrade {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      student_id:    row.get(1)?,
      course_id:     row.get(2)?,
      teacher_id:    row.get(3)?,
      grade:         row.get(4)?,
      semester:      row.get(5)?,
      academic_year: row.get(6)?,
      comments:      row.get(7)?,
      created_at:    row.get(8)?,
    })
  }

  pub fn into_grade(self) -> Result<GradeRecord> {
    Ok(GradeRecord {
      id:            self.id,
      student_id:    self.student_id,
      course_id:     self.course_id,
      teacher_id:    self.teacher_id,
      grade:         self.grade,
      semester:      self.semester,
      academic_year: self.academic_year,
      comments:      self.comments,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
