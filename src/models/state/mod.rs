//! Shared day-view state.
//!
//! The header and the timeline pager both hold a clone of the same
//! [`DayViewState`] handle. Moving the selected date through either clone is
//! immediately visible to the other, so no synchronisation messages are needed
//! between the two components.

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug)]
struct StateInner {
    selected_date: NaiveDate,
    first_weekday: Weekday,
}

/// Cheap-clone handle to the state shared across one day-view hierarchy.
#[derive(Clone)]
pub struct DayViewState {
    inner: Rc<RefCell<StateInner>>,
}

impl DayViewState {
    pub fn new(selected_date: NaiveDate) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StateInner {
                selected_date,
                first_weekday: Weekday::Mon,
            })),
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.inner.borrow().selected_date
    }

    /// Select `date`. Returns `true` when the selection changed.
    pub fn move_to(&self, date: NaiveDate) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.selected_date == date {
            return false;
        }
        log::debug!("day view state: {} -> {}", inner.selected_date, date);
        inner.selected_date = date;
        true
    }

    pub fn next_day(&self) -> bool {
        self.move_by(1)
    }

    pub fn previous_day(&self) -> bool {
        self.move_by(-1)
    }

    fn move_by(&self, days: i64) -> bool {
        match self.selected_date().checked_add_signed(Duration::days(days)) {
            Some(target) => self.move_to(target),
            None => false,
        }
    }

    pub fn first_weekday(&self) -> Weekday {
        self.inner.borrow().first_weekday
    }

    pub fn set_first_weekday(&self, weekday: Weekday) {
        self.inner.borrow_mut().first_weekday = weekday;
    }

    /// The week (per `first_weekday`) that contains the selected date.
    pub fn selected_week(&self) -> Vec<NaiveDate> {
        week_containing(self.selected_date(), self.first_weekday())
    }

    /// `true` when both handles point at the same shared state.
    pub fn ptr_eq(&self, other: &DayViewState) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for DayViewState {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl fmt::Debug for DayViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DayViewState")
            .field("selected_date", &inner.selected_date)
            .field("first_weekday", &inner.first_weekday)
            .finish()
    }
}

/// Seven consecutive days starting at the `first_weekday` on or before `date`.
///
/// Days outside the representable calendar range are left out.
pub fn week_containing(date: NaiveDate, first_weekday: Weekday) -> Vec<NaiveDate> {
    let offset = (7 + date.weekday().num_days_from_monday() as i64
        - first_weekday.num_days_from_monday() as i64)
        % 7;
    (-offset..7 - offset)
        .filter_map(|day| date.checked_add_signed(Duration::days(day)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_clones_share_selection() {
        let state = DayViewState::new(date(2025, 5, 1));
        let observer = state.clone();

        assert!(state.move_to(date(2025, 5, 9)));
        assert_eq!(observer.selected_date(), date(2025, 5, 9));
        assert!(state.ptr_eq(&observer));
    }

    #[test]
    fn test_move_to_same_date_reports_no_change() {
        let state = DayViewState::new(date(2025, 5, 1));
        assert!(!state.move_to(date(2025, 5, 1)));
    }

    #[test]
    fn test_next_and_previous_day_cross_month() {
        let state = DayViewState::new(date(2025, 4, 30));
        state.next_day();
        assert_eq!(state.selected_date(), date(2025, 5, 1));
        state.previous_day();
        state.previous_day();
        assert_eq!(state.selected_date(), date(2025, 4, 29));
    }

    #[test]
    fn test_independent_states_are_not_equal() {
        let a = DayViewState::new(date(2025, 5, 1));
        let b = DayViewState::new(date(2025, 5, 1));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_week_containing_respects_first_weekday() {
        // 2025-05-07 is a Wednesday
        let monday_week = week_containing(date(2025, 5, 7), Weekday::Mon);
        assert_eq!(monday_week[0], date(2025, 5, 5));
        assert_eq!(monday_week[6], date(2025, 5, 11));

        let sunday_week = week_containing(date(2025, 5, 7), Weekday::Sun);
        assert_eq!(sunday_week[0], date(2025, 5, 4));

        let state = DayViewState::new(date(2025, 5, 4));
        state.set_first_weekday(Weekday::Sun);
        assert_eq!(state.selected_week()[0], date(2025, 5, 4));
    }

    #[test]
    fn test_stepping_stops_at_calendar_edges() {
        let last = DayViewState::new(NaiveDate::MAX);
        assert!(!last.next_day());
        assert_eq!(last.selected_date(), NaiveDate::MAX);

        let first = DayViewState::new(NaiveDate::MIN);
        assert!(!first.previous_day());
        assert_eq!(first.selected_date(), NaiveDate::MIN);
    }

    #[test]
    fn test_week_at_calendar_edge_is_truncated() {
        let week = week_containing(NaiveDate::MAX, NaiveDate::MAX.weekday());
        assert_eq!(week, vec![NaiveDate::MAX]);
        assert!(week_containing(NaiveDate::MIN, Weekday::Mon).contains(&NaiveDate::MIN));
    }
}
