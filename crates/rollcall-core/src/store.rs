//! The `ScheduleStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rollcall-store-sqlite`).
//! The operations in [`crate::schedule`], [`crate::resolve`] and
//! [`crate::record`] depend on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  attendance::{AttendanceQuery, AttendanceRecord, AttendanceUpsert},
  class::{ClassGroup, NewClassGroup},
  grade::{GradeQuery, GradeRecord, NewGrade},
  timetable::{NewSlot, SlotQuery, TimetableSlot},
};

/// Abstraction over the persistence backend of the scheduling core.
///
/// The store performs no scheduling validation of its own: conflict checks
/// and field validation happen in the core before a write reaches it. The one
/// guarantee it must provide itself is that [`upsert_attendance`] is atomic.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
///
/// [`upsert_attendance`]: ScheduleStore::upsert_attendance
pub trait ScheduleStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Timetable slots ───────────────────────────────────────────────────

  fn insert_slot(
    &self,
    slot: NewSlot,
  ) -> impl Future<Output = Result<TimetableSlot, Self::Error>> + Send + '_;

  /// Replace every field of slot `id`. Returns `None` if it does not exist.
  fn update_slot(
    &self,
    id: i64,
    slot: NewSlot,
  ) -> impl Future<Output = Result<Option<TimetableSlot>, Self::Error>> + Send + '_;

  fn get_slot(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<TimetableSlot>, Self::Error>> + Send + '_;

  /// Returns `false` if there was nothing to delete.
  fn delete_slot(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Slots matching every predicate set in `query`, ordered by id.
  fn find_slots<'a>(
    &'a self,
    query: &'a SlotQuery,
  ) -> impl Future<Output = Result<Vec<TimetableSlot>, Self::Error>> + Send + 'a;

  // ── Class groups ──────────────────────────────────────────────────────

  fn add_class(
    &self,
    input: NewClassGroup,
  ) -> impl Future<Output = Result<ClassGroup, Self::Error>> + Send + '_;

  fn get_class(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<ClassGroup>, Self::Error>> + Send + '_;

  /// Add a student to a class. Adding an existing member is a no-op.
  fn add_class_member(
    &self,
    class_id: i64,
    student_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn class_members(
    &self,
    class_id: i64,
  ) -> impl Future<Output = Result<Vec<i64>, Self::Error>> + Send + '_;

  /// Active classes containing `student_id` whose inclusive date window
  /// contains `date`, ordered by id.
  fn active_classes_for_student(
    &self,
    student_id: i64,
    date: NaiveDate,
  ) -> impl Future<Output = Result<Vec<ClassGroup>, Self::Error>> + Send + '_;

  // ── Attendance ────────────────────────────────────────────────────────

  /// Insert or update the record for `(student_id, course_id, date)` in a
  /// single atomic step and return the stored record.
  fn upsert_attendance(
    &self,
    input: AttendanceUpsert,
  ) -> impl Future<Output = Result<AttendanceRecord, Self::Error>> + Send + '_;

  fn list_attendance<'a>(
    &'a self,
    query: &'a AttendanceQuery,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + 'a;

  // ── Grades ────────────────────────────────────────────────────────────

  /// Append a grade row. Never deduplicates.
  fn insert_grade(
    &self,
    input: NewGrade,
  ) -> impl Future<Output = Result<GradeRecord, Self::Error>> + Send + '_;

  fn list_grades<'a>(
    &'a self,
    query: &'a GradeQuery,
  ) -> impl Future<Output = Result<Vec<GradeRecord>, Self::Error>> + Send + 'a;
}
