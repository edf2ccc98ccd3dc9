//! Error types for `rollcall-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no active class for student {student_id}")]
  NoActiveClass { student_id: i64 },

  #[error("student {student_id} belongs to several active classes: {class_ids:?}")]
  MultipleActiveClasses { student_id: i64, class_ids: Vec<i64> },

  #[error("no course scheduled at this time for class {class_id}")]
  NoScheduledClass { class_id: i64 },

  #[error("class {class_id} has overlapping slots at this time: {slot_ids:?}")]
  AmbiguousSlot { class_id: i64, slot_ids: Vec<i64> },

  #[error("schedule conflict with slots {conflicting:?}")]
  ScheduleConflict { conflicting: Vec<i64> },

  #[error("timetable slot not found: {0}")]
  SlotNotFound(i64),

  #[error("class not found: {0}")]
  ClassNotFound(i64),

  #[error("invalid {field}: {reason}")]
  Validation { field: &'static str, reason: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Self::Validation { field, reason: reason.into() }
  }

  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  /// Whether this error is an operational incident rather than an expected
  /// outcome of the request. Only store failures qualify.
  pub fn is_operational(&self) -> bool { matches!(self, Self::Store(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Log a backend failure as an operational incident and box it.
pub(crate) fn store_failure<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  tracing::error!(error = %e, "store operation failed");
  Error::store(e)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_store_errors_are_operational() {
    let io = std::io::Error::other("disk on fire");
    assert!(Error::store(io).is_operational());
    assert!(!Error::NoActiveClass { student_id: 1 }.is_operational());
    assert!(!Error::NoScheduledClass { class_id: 1 }.is_operational());
    assert!(
      !Error::ScheduleConflict { conflicting: vec![4] }.is_operational()
    );
  }

  #[test]
  fn conflict_message_names_slot_ids() {
    let e = Error::ScheduleConflict { conflicting: vec![3, 8] };
    assert_eq!(e.to_string(), "schedule conflict with slots [3, 8]");
  }
}
