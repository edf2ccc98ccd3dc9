//! [`SqliteStore`]: the SQLite implementation of [`ScheduleStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension as _;

use rollcall_core::{
  attendance::{AttendanceQuery, AttendanceRecord, AttendanceUpsert},
  class::{ClassGroup, NewClassGroup},
  grade::{GradeQuery, GradeRecord, NewGrade},
  store::ScheduleStore,
  timetable::{NewSlot, SlotQuery, TimetableSlot},
};

use crate::{
  Result,
  encode::{
    ATTENDANCE_COLUMNS, CLASS_COLUMNS, GRADE_COLUMNS, RawAttendance, RawClass, RawGrade,
    RawSlot, SLOT_COLUMNS, encode_date, encode_dt, encode_status, encode_time,
    encode_weekday,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rollcall store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Owned, column-encoded copy of a [`NewSlot`] that can move into a
/// connection closure.
struct SlotParams {
  course_id:     i64,
  teacher_id:    i64,
  class_id:      i64,
  day_of_week:   i64,
  start_time:    String,
  end_time:      String,
  semester:      String,
  academic_year: String,
}

impl From<NewSlot> for SlotParams {
  fn from(s: NewSlot) -> Self {
    Self {
      course_id:     s.course_id,
      teacher_id:    s.teacher_id,
      class_id:      s.class_id,
      day_of_week:   encode_weekday(s.day_of_week),
      start_time:    encode_time(s.start_time),
      end_time:      encode_time(s.end_time),
      semester:      s.semester,
      academic_year: s.academic_year,
    }
  }
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = crate::Error;

  // ── Timetable slots ───────────────────────────────────────────────────────

  async fn insert_slot(&self, slot: NewSlot) -> Result<TimetableSlot> {
    let p = SlotParams::from(slot);

    let raw: RawSlot = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO timetable (
             course_id, teacher_id, class_id, day_of_week,
             start_time, end_time, semester, academic_year
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           RETURNING {SLOT_COLUMNS}"
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            p.course_id,
            p.teacher_id,
            p.class_id,
            p.day_of_week,
            p.start_time,
            p.end_time,
            p.semester,
            p.academic_year,
          ],
          RawSlot::from_row,
        )?)
      })
      .await?;

    raw.into_slot()
  }

  async fn update_slot(&self, id: i64, slot: NewSlot) -> Result<Option<TimetableSlot>> {
    let p = SlotParams::from(slot);

    let raw: Option<RawSlot> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "UPDATE timetable SET
             course_id = ?1, teacher_id = ?2, class_id = ?3, day_of_week = ?4,
             start_time = ?5, end_time = ?6, semester = ?7, academic_year = ?8
           WHERE id = ?9
           RETURNING {SLOT_COLUMNS}"
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![
                p.course_id,
                p.teacher_id,
                p.class_id,
                p.day_of_week,
                p.start_time,
                p.end_time,
                p.semester,
                p.academic_year,
                id,
              ],
              RawSlot::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSlot::into_slot).transpose()
  }

  async fn get_slot(&self, id: i64) -> Result<Option<TimetableSlot>> {
    let raw: Option<RawSlot> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {SLOT_COLUMNS} FROM timetable WHERE id = ?1");
        Ok(conn.query_row(&sql, rusqlite::params![id], RawSlot::from_row).optional()?)
      })
      .await?;

    raw.map(RawSlot::into_slot).transpose()
  }

  async fn delete_slot(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM timetable WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn find_slots(&self, query: &SlotQuery) -> Result<Vec<TimetableSlot>> {
    let semester      = query.semester.clone();
    let academic_year = query.academic_year.clone();
    let day           = query.day_of_week.map(encode_weekday);
    let class_id      = query.class_id;
    let course_id     = query.course_id;
    let teacher_id    = query.teacher_id;
    let overlap_start = query.overlapping.map(|r| encode_time(r.start));
    let overlap_end   = query.overlapping.map(|r| encode_time(r.end));
    let containing    = query.containing.map(encode_time);
    let exclude_id    = query.exclude_id;

    let raws: Vec<RawSlot> = self
      .conn
      .call(move |conn| {
        // Unset predicates bind NULL and drop out.
        let sql = format!(
          "SELECT {SLOT_COLUMNS} FROM timetable
           WHERE (?1 IS NULL OR semester = ?1)
             AND (?2 IS NULL OR academic_year = ?2)
             AND (?3 IS NULL OR day_of_week = ?3)
             AND (?4 IS NULL OR class_id = ?4)
             AND ((?5 IS NULL AND ?6 IS NULL) OR course_id = ?5 OR teacher_id = ?6)
             AND (?7 IS NULL OR (start_time < ?8 AND end_time > ?7))
             AND (?9 IS NULL OR (start_time <= ?9 AND end_time >= ?9))
             AND (?10 IS NULL OR id != ?10)
           ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              semester,
              academic_year,
              day,
              class_id,
              course_id,
              teacher_id,
              overlap_start,
              overlap_end,
              containing,
              exclude_id,
            ],
            RawSlot::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSlot::into_slot).collect()
  }

  // ── Class groups ──────────────────────────────────────────────────────────

  async fn add_class(&self, input: NewClassGroup) -> Result<ClassGroup> {
    let name          = input.name.clone();
    let start_str     = encode_date(input.start_date);
    let end_str       = encode_date(input.end_date);
    let is_active     = input.is_active;
    let semester      = input.semester.clone();
    let academic_year = input.academic_year.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO classes (name, start_date, end_date, is_active, semester, academic_year)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![name, start_str, end_str, is_active, semester, academic_year],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ClassGroup {
      id,
      name:          input.name,
      start_date:    input.start_date,
      end_date:      input.end_date,
      is_active:     input.is_active,
      semester:      input.semester,
      academic_year: input.academic_year,
    })
  }

  async fn get_class(&self, id: i64) -> Result<Option<ClassGroup>> {
    let raw: Option<RawClass> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {CLASS_COLUMNS} FROM classes c WHERE c.id = ?1");
        Ok(conn.query_row(&sql, rusqlite::params![id], RawClass::from_row).optional()?)
      })
      .await?;

    raw.map(RawClass::into_class).transpose()
  }

  async fn add_class_member(&self, class_id: i64, student_id: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO class_members (class_id, student_id) VALUES (?1, ?2)",
          rusqlite::params![class_id, student_id],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn class_members(&self, class_id: i64) -> Result<Vec<i64>> {
    let members = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT student_id FROM class_members WHERE class_id = ?1 ORDER BY student_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![class_id], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(members)
  }

  async fn active_classes_for_student(
    &self,
    student_id: i64,
    date: NaiveDate,
  ) -> Result<Vec<ClassGroup>> {
    let date_str = encode_date(date);

    let raws: Vec<RawClass> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CLASS_COLUMNS}
           FROM classes c
           JOIN class_members m ON m.class_id = c.id
           WHERE m.student_id = ?1
             AND c.is_active = 1
             AND c.start_date <= ?2
             AND c.end_date   >= ?2
           ORDER BY c.id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![student_id, date_str], RawClass::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawClass::into_class).collect()
  }

  // ── Attendance ────────────────────────────────────────────────────────────

  async fn upsert_attendance(&self, input: AttendanceUpsert) -> Result<AttendanceRecord> {
    let date_str   = encode_date(input.date);
    let status_str = encode_status(input.status);
    let now_str    = encode_dt(Utc::now());

    let raw: RawAttendance = self
      .conn
      .call(move |conn| {
        // A single statement: concurrent marks for the same key cannot both
        // insert.
        let sql = format!(
          "INSERT INTO attendance (
             student_id, class_id, course_id, teacher_id,
             date, status, notes, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
           ON CONFLICT (student_id, course_id, date) DO UPDATE SET
             class_id   = COALESCE(excluded.class_id, attendance.class_id),
             teacher_id = excluded.teacher_id,
             status     = excluded.status,
             notes      = COALESCE(excluded.notes, attendance.notes),
             updated_at = excluded.updated_at
           RETURNING {ATTENDANCE_COLUMNS}"
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            input.student_id,
            input.class_id,
            input.course_id,
            input.teacher_id,
            date_str,
            status_str,
            input.notes,
            now_str,
          ],
          RawAttendance::from_row,
        )?)
      })
      .await?;

    raw.into_record()
  }

  async fn list_attendance(&self, query: &AttendanceQuery) -> Result<Vec<AttendanceRecord>> {
    let student_id = query.student_id;
    let course_id  = query.course_id;
    let from_str   = query.from.map(encode_date);
    let to_str     = query.to.map(encode_date);

    let raws: Vec<RawAttendance> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {ATTENDANCE_COLUMNS} FROM attendance
           WHERE (?1 IS NULL OR student_id = ?1)
             AND (?2 IS NULL OR course_id = ?2)
             AND (?3 IS NULL OR date >= ?3)
             AND (?4 IS NULL OR date <= ?4)
           ORDER BY date, student_id, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![student_id, course_id, from_str, to_str],
            RawAttendance::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendance::into_record).collect()
  }

  // ── Grades ────────────────────────────────────────────────────────────────

  async fn insert_grade(&self, input: NewGrade) -> Result<GradeRecord> {
    let now_str = encode_dt(Utc::now());

    let raw: RawGrade = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO grades (
             student_id, course_id, teacher_id, grade,
             semester, academic_year, comments, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
           RETURNING {GRADE_COLUMNS}"
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            input.student_id,
            input.course_id,
            input.teacher_id,
            input.grade,
            input.semester,
            input.academic_year,
            input.comments,
            now_str,
          ],
          RawGrade::from_row,
        )?)
      })
      .await?;

    raw.into_grade()
  }

  async fn list_grades(&self, query: &GradeQuery) -> Result<Vec<GradeRecord>> {
    let student_id    = query.student_id;
    let course_id     = query.course_id;
    let semester      = query.semester.clone();
    let academic_year = query.academic_year.clone();

    let raws: Vec<RawGrade> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {GRADE_COLUMNS} FROM grades
           WHERE (?1 IS NULL OR student_id = ?1)
             AND (?2 IS NULL OR course_id = ?2)
             AND (?3 IS NULL OR semester = ?3)
             AND (?4 IS NULL OR academic_year = ?4)
           ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![student_id, course_id, semester, academic_year],
            RawGrade::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGrade::into_grade).collect()
  }
}
