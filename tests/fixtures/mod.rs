// Test fixtures - reusable test data
// Provides consistent dates and events across the integration tests

#![allow(dead_code)]

use calendar_day_view::models::event::{into_refs, Event, EventRef};
use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Wednesday, Sep 10 2025
    pub fn wednesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()
    }

    pub fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 9).unwrap()
    }

    pub fn thursday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 11).unwrap()
    }

    /// Feb 29, 2024 (leap year)
    pub fn leap_day_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    pub fn local(date: NaiveDate, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .from_local_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
            .earliest()
            .unwrap()
    }
}

/// Sample events for testing
pub mod events {
    use super::*;

    pub fn meeting(date: NaiveDate, hour: u32, title: &str) -> Event {
        let start = dates::local(date, hour, 0);
        Event::new(title, start, start + chrono::Duration::hours(1)).unwrap()
    }

    pub fn all_day(date: NaiveDate, title: &str) -> Event {
        Event::builder()
            .title(title)
            .start(dates::local(date, 0, 0))
            .end(dates::local(date.succ_opt().unwrap(), 0, 0))
            .all_day(true)
            .build()
            .unwrap()
    }

    /// A morning stand-up and an all-day event on `date`.
    pub fn typical_day(date: NaiveDate) -> Vec<EventRef> {
        into_refs(vec![
            meeting(date, 9, "Stand-up"),
            all_day(date, "Conference"),
        ])
    }
}
