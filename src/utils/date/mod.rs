// Date utility functions
// Date-only normalization used for page and fetch keys

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Timelike};

/// Truncate a timestamp to its calendar day.
///
/// Every page and every fetch request is keyed by the value this returns, so two
/// timestamps on the same local day always produce the same key.
pub fn date_only<Tz: TimeZone>(date: &DateTime<Tz>) -> NaiveDate {
    date.date_naive()
}

pub fn is_same_day<Tz: TimeZone>(date1: &DateTime<Tz>, date2: &DateTime<Tz>) -> bool {
    date_only(date1) == date_only(date2)
}

/// Local midnight at the start of `date`.
///
/// Returns `None` only when midnight does not exist in the local zone.
pub fn start_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    date.and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
}

/// Local midnight at the start of the following day.
pub fn end_of_day(date: NaiveDate) -> Option<DateTime<Local>> {
    start_of_day(date.succ_opt()?)
}

/// Hours since midnight as a fraction, e.g. 13:30 -> 13.5
pub fn fractional_hour(time: NaiveTime) -> f32 {
    time.hour() as f32 + time.minute() as f32 / 60.0 + time.second() as f32 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_date_only_ignores_time_of_day() {
        let morning = Local.with_ymd_and_hms(2025, 3, 10, 0, 5, 0).unwrap();
        let evening = Local.with_ymd_and_hms(2025, 3, 10, 23, 55, 0).unwrap();
        assert_eq!(date_only(&morning), date_only(&evening));
        assert!(is_same_day(&morning, &evening));
    }

    #[test]
    fn test_date_only_works_for_any_zone() {
        let utc = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(date_only(&utc), NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
    }

    #[test]
    fn test_start_and_end_of_day() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let start = start_of_day(date).unwrap();
        let end = end_of_day(date).unwrap();
        assert_eq!(start.date_naive(), date);
        assert_eq!(start.time(), NaiveTime::MIN);
        assert_eq!(end.date_naive(), date.succ_opt().unwrap());
    }

    #[test]
    fn test_fractional_hour() {
        let time = NaiveTime::from_hms_opt(13, 30, 0).unwrap();
        assert!((fractional_hour(time) - 13.5).abs() < f32::EPSILON);
    }
}
