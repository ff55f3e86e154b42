// Property-based tests for date-only request keys
// Any two timestamps on the same calendar day must map to the same page and fetch key

use calendar_day_view::models::state::{week_containing, DayViewState};
use calendar_day_view::services::event_source::EventDate;
use calendar_day_view::utils::date::{date_only, is_same_day};
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Weekday};
use proptest::prelude::*;

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (2000..2040i32, 1..=12u32, 1..=28u32)
        .prop_map(|(year, month, day)| NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

proptest! {
    /// Property: the time of day never changes the key
    #[test]
    fn prop_same_day_timestamps_share_a_key(
        date in any_date(),
        first in 0..86_400u32,
        second in 0..86_400u32,
        offset_hours in -11..=12i32,
    ) {
        let zone = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let midnight = zone.from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap()).unwrap();
        let a = midnight + Duration::seconds(first as i64);
        let b = midnight + Duration::seconds(second as i64);

        prop_assert_eq!(date_only(&a), date);
        prop_assert!(is_same_day(&a, &b));
        prop_assert_eq!(EventDate::from_datetime(&a), EventDate::from_datetime(&b));
        prop_assert_eq!(EventDate::from_datetime(&a), EventDate::new(date));
    }

    /// Property: timestamps on different days never collide
    #[test]
    fn prop_different_days_have_different_keys(date in any_date(), days in 1..400i64, second in 0..86_400i64) {
        let zone = FixedOffset::east_opt(0).unwrap();
        let start = zone.from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap()).unwrap();
        let later = start + Duration::days(days) + Duration::seconds(second);

        prop_assert_ne!(EventDate::from_datetime(&start), EventDate::from_datetime(&later));
        prop_assert_eq!((date_only(&later) - date).num_days(), days);
    }

    /// Property: the week strip always holds the selected day, starting on the first weekday
    #[test]
    fn prop_week_contains_selection(date in any_date(), first in 0..7u8) {
        let first_weekday = Weekday::try_from(first).unwrap();
        let week = week_containing(date, first_weekday);

        prop_assert_eq!(week.len(), 7);
        prop_assert_eq!(week[0].weekday(), first_weekday);
        prop_assert!(week.contains(&date));
    }

    /// Property: stepping forward then back returns to the same day
    #[test]
    fn prop_next_then_previous_is_identity(date in any_date()) {
        let state = DayViewState::new(date);
        prop_assert!(state.next_day());
        prop_assert!(state.previous_day());
        prop_assert_eq!(state.selected_date(), date);
    }
}
