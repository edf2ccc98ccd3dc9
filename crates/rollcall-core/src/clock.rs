//! Conversion of a reference instant into the civil calendar of a zone.
//!
//! Every resolver takes the zone as an argument; there is no process-wide
//! default.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};

/// A reference instant seen through a particular civil time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMoment {
  pub date: NaiveDate,
  pub day:  Weekday,
  /// Wall-clock time, truncated to whole seconds.
  pub time: NaiveTime,
}

impl LocalMoment {
  pub fn at<Tz: TimeZone>(instant: DateTime<Utc>, zone: &Tz) -> Self {
    let local = instant.with_timezone(zone);
    let time = local.time();
    Self {
      date: local.date_naive(),
      day:  local.weekday(),
      time: time.with_nanosecond(0).unwrap_or(time),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono_tz::{America::New_York, Asia::Shanghai};

  use super::*;

  fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
  }

  #[test]
  fn converts_into_zone() {
    // 2024-01-01 01:30 UTC is Monday 09:30 in Shanghai.
    let m = LocalMoment::at(utc(2024, 1, 1, 1, 30), &Shanghai);
    assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(m.day, Weekday::Mon);
    assert_eq!(m.time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
  }

  #[test]
  fn local_date_can_differ_from_utc_date() {
    let m = LocalMoment::at(utc(2024, 1, 1, 20, 0), &Shanghai);
    assert_eq!(m.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(m.day, Weekday::Tue);
    assert_eq!(m.time, NaiveTime::from_hms_opt(4, 0, 0).unwrap());
  }

  #[test]
  fn follows_daylight_saving() {
    let winter = LocalMoment::at(utc(2024, 1, 15, 14, 0), &New_York);
    let summer = LocalMoment::at(utc(2024, 7, 15, 14, 0), &New_York);
    assert_eq!(winter.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    assert_eq!(summer.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
  }

  #[test]
  fn drops_sub_second_precision() {
    let instant = utc(2024, 1, 1, 9, 0) + chrono::Duration::milliseconds(999);
    let m = LocalMoment::at(instant, &Utc);
    assert_eq!(m.time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
  }
}
