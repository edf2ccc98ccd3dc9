//! Class groups: cohorts of students with an active date window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  timetable::require_text,
};

/// A persisted class group. Membership is stored separately and queried
/// through [`crate::store::ScheduleStore::class_members`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassGroup {
  pub id:            i64,
  pub name:          String,
  /// First day of the active window (inclusive).
  pub start_date:    NaiveDate,
  /// Last day of the active window (inclusive).
  pub end_date:      NaiveDate,
  pub is_active:     bool,
  pub semester:      String,
  pub academic_year: String,
}

impl ClassGroup {
  /// Whether the class counts as current on `date`.
  pub fn is_current_on(&self, date: NaiveDate) -> bool {
    self.is_active && self.start_date <= date && date <= self.end_date
  }
}

/// Input to [`crate::store::ScheduleStore::add_class`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassGroup {
  pub name:          String,
  pub start_date:    NaiveDate,
  pub end_date:      NaiveDate,
  #[serde(default = "default_active")]
  pub is_active:     bool,
  pub semester:      String,
  pub academic_year: String,
}

fn default_active() -> bool { true }

impl NewClassGroup {
  pub fn validate(&self) -> Result<()> {
    require_text("name", &self.name)?;
    if self.start_date > self.end_date {
      return Err(Error::invalid(
        "end_date",
        format!(
          "start_date {} is after end_date {}",
          self.start_date, self.end_date
        ),
      ));
    }
    require_text("semester", &self.semester)?;
    require_text("academic_year", &self.academic_year)?;
    Ok(())
  }
}

/// A class together with its member student ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRoster {
  #[serde(flatten)]
  pub class:   ClassGroup,
  pub members: Vec<i64>,
}
