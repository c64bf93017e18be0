//! Lunch window detection.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// A daily lunch break starting at a fixed time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunchWindow {
    /// When the lunch break starts.
    pub start: NaiveTime,

    /// Length of the break in minutes.
    pub break_minutes: u32,
}

impl LunchWindow {
    /// Creates a lunch window.
    pub const fn new(start: NaiveTime, break_minutes: u32) -> Self {
        Self {
            start,
            break_minutes,
        }
    }

    /// The lunch start anchored on a date.
    pub fn starts_at(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start)
    }

    /// The end of the break anchored on a date; `None` past the last
    /// representable date.
    pub fn ends_at(&self, date: NaiveDate) -> Option<NaiveDateTime> {
        self.starts_at(date).checked_add_signed(self.break_duration())
    }

    /// The break length as a duration.
    pub fn break_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.break_minutes))
    }

    /// How far `end` runs past the lunch start on `date`.
    ///
    /// Returns `(zero, false)` when `end` is at or before the lunch start;
    /// ending exactly at the lunch start is not an overlap.
    pub fn overlap(&self, end: NaiveDateTime, date: NaiveDate) -> (Duration, bool) {
        let lunch = self.starts_at(date);
        if end > lunch {
            (end - lunch, true)
        } else {
            (Duration::zero(), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 5, 5).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        date().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn noon() -> LunchWindow {
        LunchWindow::new(NaiveTime::from_hms_opt(12, 0, 0).unwrap(), 60)
    }

    #[test]
    fn end_before_lunch_does_not_overlap() {
        assert_eq!(noon().overlap(at(11, 0), date()), (Duration::zero(), false));
    }

    #[test]
    fn end_at_lunch_start_does_not_overlap() {
        assert_eq!(noon().overlap(at(12, 0), date()), (Duration::zero(), false));
    }

    #[test]
    fn end_after_lunch_reports_difference() {
        assert_eq!(
            noon().overlap(at(12, 1), date()),
            (Duration::minutes(1), true)
        );
        assert_eq!(
            noon().overlap(at(14, 30), date()),
            (Duration::minutes(150), true)
        );
    }

    #[test]
    fn overlap_is_anchored_on_the_given_date() {
        let previous_day = NaiveDate::from_ymd_opt(2021, 5, 4).unwrap();
        let (diff, overlaps) = noon().overlap(at(11, 0), previous_day);
        assert!(overlaps);
        assert_eq!(diff, Duration::hours(23));
    }

    #[test]
    fn break_duration_uses_minutes() {
        let window = LunchWindow::new(NaiveTime::from_hms_opt(12, 0, 0).unwrap(), 45);
        assert_eq!(window.break_duration(), Duration::minutes(45));
        assert_eq!(window.starts_at(date()), at(12, 0));
        assert_eq!(window.ends_at(date()), Some(at(12, 45)));
    }

    #[test]
    fn break_may_end_on_the_next_day() {
        let late = LunchWindow::new(NaiveTime::from_hms_opt(23, 30, 0).unwrap(), 60);
        let next_day = NaiveDate::from_ymd_opt(2021, 5, 6).unwrap();
        assert_eq!(late.ends_at(date()), next_day.and_hms_opt(0, 30, 0));
        assert_eq!(late.ends_at(NaiveDate::MAX), None);
    }
}
