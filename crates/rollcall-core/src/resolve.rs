//! Time-window resolution: which class a student belongs to right now, and
//! which slot of that class is running.
//!
//! Ambiguity is an error. If the data allows more than one answer the caller
//! gets every candidate id back instead of an arbitrary pick.

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::{
  Error, Result,
  class::ClassGroup,
  clock::LocalMoment,
  error::store_failure,
  store::ScheduleStore,
  timetable::{SlotQuery, TimetableSlot},
};

/// The single class `student_id` belongs to at `instant`, with the calendar
/// date taken in `zone`.
pub async fn resolve_active_class<S, Tz>(
  store: &S,
  student_id: i64,
  instant: DateTime<Utc>,
  zone: &Tz,
) -> Result<ClassGroup>
where
  S: ScheduleStore,
  Tz: TimeZone + Sync,
{
  active_class_at(store, student_id, LocalMoment::at(instant, zone)).await
}

/// The single slot of class `class_id` running at `instant` in `zone`.
pub async fn resolve_current_slot<S, Tz>(
  store: &S,
  class_id: i64,
  instant: DateTime<Utc>,
  zone: &Tz,
) -> Result<TimetableSlot>
where
  S: ScheduleStore,
  Tz: TimeZone + Sync,
{
  let class = store
    .get_class(class_id)
    .await
    .map_err(store_failure)?
    .ok_or(Error::ClassNotFound(class_id))?;
  current_slot_at(store, &class, LocalMoment::at(instant, zone)).await
}

pub(crate) async fn active_class_at<S: ScheduleStore>(
  store: &S,
  student_id: i64,
  moment: LocalMoment,
) -> Result<ClassGroup> {
  let classes = store
    .active_classes_for_student(student_id, moment.date)
    .await
    .map_err(store_failure)?;

  match Exactly::from(
    classes
      .into_iter()
      .filter(|c| c.is_current_on(moment.date))
      .collect::<Vec<_>>(),
  ) {
    Exactly::None => {
      debug!(student_id, date = %moment.date, "no active class");
      Err(Error::NoActiveClass { student_id })
    }
    Exactly::One(class) => Ok(class),
    Exactly::Many(classes) => Err(Error::MultipleActiveClasses {
      student_id,
      class_ids: classes.iter().map(|c| c.id).collect(),
    }),
  }
}

pub(crate) async fn current_slot_at<S: ScheduleStore>(
  store: &S,
  class: &ClassGroup,
  moment: LocalMoment,
) -> Result<TimetableSlot> {
  let query = SlotQuery {
    semester: Some(class.semester.clone()),
    academic_year: Some(class.academic_year.clone()),
    day_of_week: Some(moment.day),
    class_id: Some(class.id),
    containing: Some(moment.time),
    ..Default::default()
  };
  let slots = store.find_slots(&query).await.map_err(store_failure)?;

  match Exactly::from(
    slots
      .into_iter()
      .filter(|s| s.day_of_week == moment.day && s.time_range().contains(moment.time))
      .collect::<Vec<_>>(),
  ) {
    Exactly::None => {
      debug!(class_id = class.id, day = %moment.day, time = %moment.time, "no scheduled slot");
      Err(Error::NoScheduledClass { class_id: class.id })
    }
    Exactly::One(slot) => Ok(slot),
    Exactly::Many(slots) => Err(Error::AmbiguousSlot {
      class_id: class.id,
      slot_ids: slots.iter().map(|s| s.id).collect(),
    }),
  }
}

/// Cardinality of a lookup that should yield one row.
#[derive(Debug, PartialEq, Eq)]
enum Exactly<T> {
  None,
  One(T),
  Many(Vec<T>),
}

impl<T> From<Vec<T>> for Exactly<T> {
  fn from(mut items: Vec<T>) -> Self {
    match items.len() {
      0 => Self::None,
      1 => items.pop().map_or(Self::None, Self::One),
      _ => Self::Many(items),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cardinality() {
    assert_eq!(Exactly::<i32>::from(vec![]), Exactly::None);
    assert_eq!(Exactly::from(vec![4]), Exactly::One(4));
    assert_eq!(Exactly::from(vec![4, 5]), Exactly::Many(vec![4, 5]));
  }
}
