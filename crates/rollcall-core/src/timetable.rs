//! Timetable slots: recurring weekly time blocks.
//!
//! A slot binds one course, taught by one teacher, to one class group on one
//! day of the week within a semester. Times are wall-clock with second
//! precision and are interpreted in the deployment's reference zone.

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Day of week ─────────────────────────────────────────────────────────────

/// Serde adapter storing a [`Weekday`] as its ISO number (1 = Monday …
/// 7 = Sunday).
pub mod iso_weekday {
  use chrono::Weekday;
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  pub fn from_number(n: u8) -> Option<Weekday> {
    match n {
      1 => Some(Weekday::Mon),
      2 => Some(Weekday::Tue),
      3 => Some(Weekday::Wed),
      4 => Some(Weekday::Thu),
      5 => Some(Weekday::Fri),
      6 => Some(Weekday::Sat),
      7 => Some(Weekday::Sun),
      _ => None,
    }
  }

  pub fn serialize<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u32(day.number_from_monday())
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Weekday, D::Error> {
    let n = u8::deserialize(d)?;
    from_number(n)
      .ok_or_else(|| D::Error::custom(format!("day_of_week must be 1-7, got {n}")))
  }

  /// The same encoding for `Option<Weekday>`.
  pub mod option {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(
      day: &Option<Weekday>,
      s: S,
    ) -> Result<S::Ok, S::Error> {
      match day {
        Some(d) => s.serialize_some(&d.number_from_monday()),
        None => s.serialize_none(),
      }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
      d: D,
    ) -> Result<Option<Weekday>, D::Error> {
      Option::<u8>::deserialize(d)?
        .map(|n| {
          super::from_number(n).ok_or_else(|| {
            D::Error::custom(format!("day_of_week must be 1-7, got {n}"))
          })
        })
        .transpose()
    }
  }
}

// ─── Time range ──────────────────────────────────────────────────────────────

/// A wall-clock range within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
  pub start: NaiveTime,
  pub end:   NaiveTime,
}

impl TimeRange {
  pub fn new(start: NaiveTime, end: NaiveTime) -> Self { Self { start, end } }

  /// Half-open overlap: `[s1, e1)` and `[s2, e2)` share at least one instant.
  /// Back-to-back ranges do not overlap.
  pub fn overlaps(&self, other: &TimeRange) -> bool {
    self.start < other.end && other.start < self.end
  }

  /// Inclusive containment. A student arriving exactly at the end of a slot
  /// still counts as attending it.
  pub fn contains(&self, t: NaiveTime) -> bool { self.start <= t && t <= self.end }
}

// ─── Slot ────────────────────────────────────────────────────────────────────

/// A persisted timetable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableSlot {
  pub id:            i64,
  pub course_id:     i64,
  pub teacher_id:    i64,
  pub class_id:      i64,
  #[serde(with = "iso_weekday")]
  pub day_of_week:   Weekday,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub semester:      String,
  pub academic_year: String,
}

impl TimetableSlot {
  pub fn time_range(&self) -> TimeRange { TimeRange::new(self.start_time, self.end_time) }
}

/// Full write descriptor for creating or replacing a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSlot {
  pub course_id:     i64,
  pub teacher_id:    i64,
  pub class_id:      i64,
  #[serde(with = "iso_weekday")]
  pub day_of_week:   Weekday,
  pub start_time:    NaiveTime,
  pub end_time:      NaiveTime,
  pub semester:      String,
  pub academic_year: String,
}

impl NewSlot {
  /// Field-level checks that do not need the store.
  pub fn validate(&self) -> Result<()> {
    require_positive("course_id", self.course_id)?;
    require_positive("teacher_id", self.teacher_id)?;
    require_positive("class_id", self.class_id)?;
    require_whole_seconds("start_time", self.start_time)?;
    require_whole_seconds("end_time", self.end_time)?;
    if self.start_time >= self.end_time {
      return Err(Error::invalid(
        "end_time",
        format!(
          "start_time {} must be before end_time {}",
          self.start_time, self.end_time
        ),
      ));
    }
    require_text("semester", &self.semester)?;
    require_text("academic_year", &self.academic_year)?;
    Ok(())
  }

  /// The conflict-detector input describing this slot.
  pub fn candidate(&self, exclude_id: Option<i64>) -> SlotCandidate {
    SlotCandidate {
      course_id: self.course_id,
      teacher_id: self.teacher_id,
      day_of_week: self.day_of_week,
      start_time: self.start_time,
      end_time: self.end_time,
      semester: self.semester.clone(),
      exclude_id,
    }
  }
}

impl From<TimetableSlot> for NewSlot {
  fn from(s: TimetableSlot) -> Self {
    NewSlot {
      course_id:     s.course_id,
      teacher_id:    s.teacher_id,
      class_id:      s.class_id,
      day_of_week:   s.day_of_week,
      start_time:    s.start_time,
      end_time:      s.end_time,
      semester:      s.semester,
      academic_year: s.academic_year,
    }
  }
}

/// Typed partial update. Unset fields keep their stored value; the merged
/// result is validated as a whole by [`NewSlot::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPatch {
  pub course_id:     Option<i64>,
  pub teacher_id:    Option<i64>,
  pub class_id:      Option<i64>,
  #[serde(default, with = "iso_weekday::option")]
  pub day_of_week:   Option<Weekday>,
  pub start_time:    Option<NaiveTime>,
  pub end_time:      Option<NaiveTime>,
  pub semester:      Option<String>,
  pub academic_year: Option<String>,
}

impl SlotPatch {
  pub fn is_empty(&self) -> bool { self == &Self::default() }

  /// Merge this patch over `current`.
  pub fn apply(self, current: TimetableSlot) -> NewSlot {
    let base = NewSlot::from(current);
    NewSlot {
      course_id:     self.course_id.unwrap_or(base.course_id),
      teacher_id:    self.teacher_id.unwrap_or(base.teacher_id),
      class_id:      self.class_id.unwrap_or(base.class_id),
      day_of_week:   self.day_of_week.unwrap_or(base.day_of_week),
      start_time:    self.start_time.unwrap_or(base.start_time),
      end_time:      self.end_time.unwrap_or(base.end_time),
      semester:      self.semester.unwrap_or(base.semester),
      academic_year: self.academic_year.unwrap_or(base.academic_year),
    }
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Input to [`crate::schedule::find_conflicts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCandidate {
  pub course_id:   i64,
  pub teacher_id:  i64,
  #[serde(with = "iso_weekday")]
  pub day_of_week: Weekday,
  pub start_time:  NaiveTime,
  pub end_time:    NaiveTime,
  pub semester:    String,
  /// The slot being edited, which must not conflict with itself.
  #[serde(default)]
  pub exclude_id:  Option<i64>,
}

impl SlotCandidate {
  /// The candidate's range at the second precision slots are stored with.
  pub fn time_range(&self) -> TimeRange {
    TimeRange::new(whole_seconds(self.start_time), whole_seconds(self.end_time))
  }
}

/// Parameters for [`crate::store::ScheduleStore::find_slots`]. Every set field
/// narrows the result.
#[derive(Debug, Clone, Default)]
pub struct SlotQuery {
  pub semester:      Option<String>,
  pub academic_year: Option<String>,
  pub day_of_week:   Option<Weekday>,
  pub class_id:      Option<i64>,
  /// When both `course_id` and `teacher_id` are set, a slot matches if it
  /// shares either of them.
  pub course_id:     Option<i64>,
  pub teacher_id:    Option<i64>,
  /// Slots whose `[start, end)` overlaps this range.
  pub overlapping:   Option<TimeRange>,
  /// Slots whose `[start, end]` contains this time.
  pub containing:    Option<NaiveTime>,
  pub exclude_id:    Option<i64>,
}

// ─── Shared validation helpers ───────────────────────────────────────────────

pub(crate) fn require_positive(field: &'static str, id: i64) -> Result<()> {
  if id <= 0 {
    return Err(Error::invalid(field, format!("must be a positive id, got {id}")));
  }
  Ok(())
}

/// Slot times are stored with second precision.
fn require_whole_seconds(field: &'static str, time: NaiveTime) -> Result<()> {
  if time.nanosecond() != 0 {
    return Err(Error::invalid(field, format!("{time} has a fractional second")));
  }
  Ok(())
}

fn whole_seconds(time: NaiveTime) -> NaiveTime { time.with_nanosecond(0).unwrap_or(time) }

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    return Err(Error::invalid(field, "must not be empty"));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

  fn slot() -> NewSlot {
    NewSlot {
      course_id:     7,
      teacher_id:    3,
      class_id:      1,
      day_of_week:   Weekday::Mon,
      start_time:    t(9, 0),
      end_time:      t(10, 30),
      semester:      "Fall 2024".into(),
      academic_year: "2024-2025".into(),
    }
  }

  #[test]
  fn overlap_is_half_open() {
    let a = TimeRange::new(t(9, 0), t(10, 0));
    assert!(a.overlaps(&TimeRange::new(t(9, 30), t(11, 0))));
    assert!(a.overlaps(&TimeRange::new(t(8, 0), t(12, 0))));
    assert!(!a.overlaps(&TimeRange::new(t(10, 0), t(11, 0))));
    assert!(!a.overlaps(&TimeRange::new(t(7, 0), t(9, 0))));
  }

  #[test]
  fn containment_is_inclusive() {
    let r = TimeRange::new(t(9, 0), t(10, 30));
    assert!(r.contains(t(9, 0)));
    assert!(r.contains(t(10, 30)));
    assert!(!r.contains(t(10, 31)));
  }

  #[test]
  fn zero_length_slot_is_rejected() {
    let mut s = slot();
    s.end_time = s.start_time;
    let err = s.validate().unwrap_err();
    assert!(matches!(err, Error::Validation { field: "end_time", .. }));
  }

  #[test]
  fn fractional_seconds_are_rejected() {
    let mut s = slot();
    s.start_time = NaiveTime::from_hms_milli_opt(9, 0, 0, 200).unwrap();
    s.end_time = NaiveTime::from_hms_milli_opt(9, 0, 0, 700).unwrap();
    assert!(matches!(
      s.validate(),
      Err(Error::Validation { field: "start_time", .. })
    ));

    let mut s = slot();
    s.end_time = NaiveTime::from_hms_milli_opt(10, 30, 0, 1).unwrap();
    assert!(matches!(
      s.validate(),
      Err(Error::Validation { field: "end_time", .. })
    ));
  }

  #[test]
  fn candidate_range_drops_fractions() {
    let mut c = slot().candidate(None);
    c.end_time = NaiveTime::from_hms_milli_opt(10, 30, 0, 900).unwrap();
    assert_eq!(c.time_range(), TimeRange::new(t(9, 0), t(10, 30)));
  }

  #[test]
  fn non_positive_ids_and_blank_labels_are_rejected() {
    let mut s = slot();
    s.teacher_id = 0;
    assert!(matches!(
      s.validate(),
      Err(Error::Validation { field: "teacher_id", .. })
    ));

    let mut s = slot();
    s.semester = "  ".into();
    assert!(matches!(
      s.validate(),
      Err(Error::Validation { field: "semester", .. })
    ));

    assert!(slot().validate().is_ok());
  }

  #[test]
  fn patch_keeps_unset_fields() {
    let current = TimetableSlot {
      id:            5,
      course_id:     7,
      teacher_id:    3,
      class_id:      1,
      day_of_week:   Weekday::Mon,
      start_time:    t(9, 0),
      end_time:      t(10, 30),
      semester:      "Fall 2024".into(),
      academic_year: "2024-2025".into(),
    };
    let patch = SlotPatch {
      day_of_week: Some(Weekday::Wed),
      end_time: Some(t(11, 0)),
      ..Default::default()
    };
    let merged = patch.apply(current);
    assert_eq!(merged.day_of_week, Weekday::Wed);
    assert_eq!(merged.end_time, t(11, 0));
    assert_eq!(merged.start_time, t(9, 0));
    assert_eq!(merged.course_id, 7);
  }

  #[test]
  fn weekday_is_serialised_as_iso_number() {
    let json = serde_json::to_value(slot()).unwrap();
    assert_eq!(json["day_of_week"], 1);
    assert_eq!(json["start_time"], "09:00:00");

    let mut raw = json.clone();
    raw["day_of_week"] = 7.into();
    let back: NewSlot = serde_json::from_value(raw).unwrap();
    assert_eq!(back.day_of_week, Weekday::Sun);

    let mut bad = json;
    bad["day_of_week"] = 0.into();
    assert!(serde_json::from_value::<NewSlot>(bad).is_err());
  }

  #[test]
  fn patch_accepts_partial_json() {
    let patch: SlotPatch =
      serde_json::from_str(r#"{"day_of_week": 3, "semester": "Spring 2025"}"#)
        .unwrap();
    assert_eq!(patch.day_of_week, Some(Weekday::Wed));
    assert_eq!(patch.semester.as_deref(), Some("Spring 2025"));
    assert!(patch.start_time.is_none());
    assert!(SlotPatch::default().is_empty());
    assert!(!patch.is_empty());
  }
}
