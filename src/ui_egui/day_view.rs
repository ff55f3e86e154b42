//! The day view: a header on top of a paged timeline.
//!
//! `DayView` owns the header and the pager, hands both the same
//! [`DayViewState`], splits a [`CalendarStyle`] between them, and relays
//! everything the pager reports to a [`DayViewDelegate`] unchanged.
//! How events are loaded is chosen with an [`EventSource`].

use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::header::{DayHeaderView, HEADER_VISIBLE_HEIGHT};
use super::pager::{PageTrigger, PagerEvent, TimelinePagerView};
use super::timeline::TimelineGesture;
use crate::models::event::EventRef;
use crate::models::layout::HorizontalSizeClass;
use crate::models::state::DayViewState;
use crate::models::style::CalendarStyle;
use crate::services::event_source::{
    EventDataSource, EventDate, EventRequestHandler, EventSource,
};

/// Notifications raised by a day view. Every method defaults to doing nothing.
pub trait DayViewDelegate {
    fn did_select_event(&mut self, _event: &EventRef) {}
    fn did_long_press_event(&mut self, _event: &EventRef) {}
    fn did_long_press_timeline_at_hour(&mut self, _hour: u32) {}
    fn will_move_to(&mut self, _date: NaiveDate) {}
    fn did_move_to(&mut self, _date: NaiveDate) {}
}

pub type DelegateRef = Weak<RefCell<dyn DayViewDelegate>>;

fn page_trigger(source: EventSource) -> Option<PageTrigger> {
    match source {
        EventSource::Detached => None,
        EventSource::Synchronous(data_source) => {
            let trigger: PageTrigger = Box::new(move |date, _timeline| {
                Some(data_source.events_for_date(date))
            });
            Some(trigger)
        }
        EventSource::Asynchronous(mut handler) => {
            let trigger: PageTrigger = Box::new(move |date, _timeline| {
                handler(EventDate::new(date));
                None
            });
            Some(trigger)
        }
    }
}

pub struct DayView {
    state: DayViewState,
    style: CalendarStyle,
    header: DayHeaderView,
    pager: TimelinePagerView,
    delegate: Option<DelegateRef>,
    header_visible: bool,
}

impl DayView {
    /// Create a view observing `state`, or a fresh state on today's date.
    pub fn new(state: Option<DayViewState>) -> Self {
        let state = state.unwrap_or_default();
        let mut view = Self {
            header: DayHeaderView::new(state.clone()),
            pager: TimelinePagerView::new(state.clone()),
            state,
            style: CalendarStyle::default(),
            delegate: None,
            header_visible: true,
        };
        let style = view.style.clone();
        view.update_style(&style);
        view
    }

    pub fn with_event_source(state: Option<DayViewState>, source: EventSource) -> Self {
        let mut view = Self::new(state);
        view.set_event_source(source);
        view
    }

    /// Replace how pages get their events. Already loaded events stay until
    /// the next reload.
    pub fn set_event_source(&mut self, source: EventSource) {
        log::debug!("day view event source: {:?}", source);
        self.pager.set_trigger(page_trigger(source));
    }

    pub fn set_data_source(&mut self, data_source: Option<Rc<dyn EventDataSource>>) {
        self.set_event_source(data_source.map_or(EventSource::Detached, EventSource::Synchronous));
    }

    pub fn set_event_request_handler(&mut self, handler: Option<EventRequestHandler>) {
        self.set_event_source(handler.map_or(EventSource::Detached, EventSource::Asynchronous));
    }

    /// Deliver the answer to an asynchronous request.
    pub fn receive(&mut self, events: Vec<EventRef>, date: EventDate) {
        self.pager.receive(events, date.value);
    }

    pub fn state(&self) -> &DayViewState {
        &self.state
    }

    /// Point the view, its header and its pager at `state` in one step.
    pub fn set_state(&mut self, state: DayViewState) {
        self.header.set_state(state.clone());
        self.pager.set_state(state.clone());
        self.state = state;
    }

    pub fn header(&self) -> &DayHeaderView {
        &self.header
    }

    pub fn pager(&self) -> &TimelinePagerView {
        &self.pager
    }

    pub fn set_delegate(&mut self, delegate: Option<DelegateRef>) {
        self.delegate = delegate;
    }

    pub fn style(&self) -> &CalendarStyle {
        &self.style
    }

    pub fn update_style(&mut self, style: &CalendarStyle) {
        self.style = style.clone();
        self.header.update_style(self.style.header.clone());
        self.pager.update_style(self.style.timeline.clone());
    }

    pub fn transition_to_horizontal_size_class(&mut self, size_class: HorizontalSizeClass) {
        self.header.transition_to_horizontal_size_class(size_class);
        let style = self.style.clone();
        self.update_style(&style);
    }

    pub fn is_header_visible(&self) -> bool {
        self.header_visible
    }

    pub fn set_header_visible(&mut self, visible: bool) {
        self.header_visible = visible;
    }

    pub fn header_height(&self) -> f32 {
        if self.header_visible {
            HEADER_VISIBLE_HEIGHT
        } else {
            0.0
        }
    }

    pub fn set_corner_label(&mut self, label: Option<String>) {
        self.header.set_corner_label(label);
    }

    pub fn timeline_scroll_offset(&self) -> f32 {
        self.pager.timeline_scroll_offset()
    }

    pub fn auto_scroll_to_first_event(&self) -> bool {
        self.pager.auto_scroll_to_first_event()
    }

    pub fn set_auto_scroll_to_first_event(&mut self, value: bool) {
        self.pager.set_auto_scroll_to_first_event(value);
    }

    pub fn scroll_to(&mut self, hour24: f32) {
        self.pager.scroll_to(hour24);
    }

    pub fn scroll_to_first_event_if_needed(&mut self) {
        self.pager.scroll_to_first_event_if_needed();
    }

    pub fn reload_data(&mut self) {
        self.pager.reload_data();
    }

    /// Select `date`. The delegate hears `will_move_to` while the old date is
    /// still selected and before the new pages request their events, then
    /// `did_move_to` once the pages are in place.
    pub fn move_to(&mut self, date: NaiveDate) {
        self.follow_shared_state();
        if date == self.pager.current_date() {
            return;
        }
        self.relay();
        self.notify(|delegate| delegate.will_move_to(date));
        self.pager.move_to(date);
        self.notify(|delegate| delegate.did_move_to(date));
    }

    /// Feed a gesture recognised outside of `show` (e.g. by a host's own input layer).
    pub fn handle_gesture(&mut self, gesture: TimelineGesture) {
        self.pager.handle_gesture(gesture);
        self.relay();
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        self.follow_shared_state();
        if self.header_visible {
            let height = self.header_height();
            if let Some(date) = self.header.show(ui, height) {
                self.move_to(date);
            }
        }
        if let Some(date) = self.pager.show(ui) {
            self.move_to(date);
        }
        self.relay();
    }

    /// Catch up with a selection made through another view sharing the
    /// state. The move has already happened, so only `did_move_to` is sent.
    pub fn follow_shared_state(&mut self) {
        if let Some(date) = self.pager.sync_to_state() {
            self.notify(|delegate| delegate.did_move_to(date));
        }
    }

    fn notify(&self, call: impl FnOnce(&mut dyn DayViewDelegate)) {
        let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        match delegate.try_borrow_mut() {
            Ok(mut delegate) => call(&mut *delegate),
            Err(_) => log::warn!("day view delegate is busy, dropped a move notification"),
        };
    }

    fn relay(&mut self) {
        let events = self.pager.drain_events();
        if events.is_empty() {
            return;
        }
        let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let Ok(mut delegate) = delegate.try_borrow_mut() else {
            log::warn!("day view delegate is busy, dropped {} notifications", events.len());
            return;
        };

        for event in events {
            match event {
                PagerEvent::EventSelected(event) => delegate.did_select_event(&event),
                PagerEvent::EventLongPressed(event) => delegate.did_long_press_event(&event),
                PagerEvent::TimelineLongPressedAtHour(hour) => {
                    delegate.did_long_press_timeline_at_hour(hour)
                }
            }
        }
    }
}

impl Default for DayView {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{into_refs, Event};
    use crate::services::event_source::InMemoryEventSource;
    use chrono::{Local, TimeZone};
    use pretty_assertions::assert_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn event(day: u32, hour: u32) -> Event {
        Event::new(
            format!("Day {} at {}", day, hour),
            Local.with_ymd_and_hms(2025, 9, day, hour, 0, 0).unwrap(),
            Local.with_ymd_and_hms(2025, 9, day, hour + 1, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl DayViewDelegate for Recorder {
        fn did_select_event(&mut self, event: &EventRef) {
            self.calls.push(format!("select {}", event.text()));
        }
        fn did_long_press_event(&mut self, event: &EventRef) {
            self.calls.push(format!("long press {}", event.text()));
        }
        fn did_long_press_timeline_at_hour(&mut self, hour: u32) {
            self.calls.push(format!("timeline {}", hour));
        }
        fn will_move_to(&mut self, date: NaiveDate) {
            self.calls.push(format!("will {}", date));
        }
        fn did_move_to(&mut self, date: NaiveDate) {
            self.calls.push(format!("did {}", date));
        }
    }

    fn attach(view: &mut DayView) -> Rc<RefCell<Recorder>> {
        let recorder = Rc::new(RefCell::new(Recorder::default()));
        let delegate: Rc<RefCell<dyn DayViewDelegate>> = recorder.clone();
        view.set_delegate(Some(Rc::downgrade(&delegate)));
        recorder
    }

    #[test]
    fn test_new_view_creates_state_when_missing() {
        let view = DayView::new(None);
        assert!(view.header().state().ptr_eq(view.state()));
        assert!(view.pager().state().ptr_eq(view.state()));
        assert_eq!(view.state().selected_date(), Local::now().date_naive());
    }

    #[test]
    fn test_sync_source_populates_pages() {
        let source = Rc::new(InMemoryEventSource::new(into_refs(vec![event(4, 9), event(5, 10)])));
        let mut view =
            DayView::with_event_source(Some(DayViewState::new(date(4))), EventSource::synchronous(source));
        view.reload_data();

        assert_eq!(view.pager().events_for(date(4)).unwrap()[0].text(), "Day 4 at 9");
        assert_eq!(view.pager().events_for(date(5)).unwrap()[0].text(), "Day 5 at 10");
        assert!(view.pager().events_for(date(3)).unwrap().is_empty());
    }

    #[test]
    fn test_detaching_source_stops_requests() {
        let source: Rc<dyn EventDataSource> =
            Rc::new(InMemoryEventSource::new(into_refs(vec![event(4, 9)])));
        let mut view = DayView::new(Some(DayViewState::new(date(4))));
        view.set_data_source(Some(source));
        assert!(view.pager().has_trigger());
        view.set_data_source(None);
        assert!(!view.pager().has_trigger());
    }

    #[test]
    fn test_async_source_round_trip() {
        let requested = Rc::new(RefCell::new(Vec::new()));
        let sink = requested.clone();
        let mut view = DayView::new(Some(DayViewState::new(date(4))));
        let handler: EventRequestHandler = Box::new(move |date| sink.borrow_mut().push(date));
        view.set_event_request_handler(Some(handler));

        view.reload_data();
        assert_eq!(
            *requested.borrow(),
            vec![EventDate::new(date(3)), EventDate::new(date(4)), EventDate::new(date(5))]
        );
        assert!(view.pager().events_for(date(4)).unwrap().is_empty());

        view.receive(into_refs(vec![event(4, 9)]), EventDate::new(date(4)));
        assert_eq!(view.pager().events_for(date(4)).unwrap().len(), 1);
    }

    #[test]
    fn test_gestures_are_relayed_to_delegate() {
        let mut view = DayView::new(Some(DayViewState::new(date(4))));
        let recorder = attach(&mut view);
        view.receive(into_refs(vec![event(4, 9)]), EventDate::new(date(4)));

        view.handle_gesture(TimelineGesture::EventTapped(0));
        view.handle_gesture(TimelineGesture::EventLongPressed(0));
        view.handle_gesture(TimelineGesture::LongPressedAtHour(15));
        view.move_to(date(6));

        assert_eq!(
            recorder.borrow().calls,
            vec![
                "select Day 4 at 9",
                "long press Day 4 at 9",
                "timeline 15",
                "will 2025-09-06",
                "did 2025-09-06",
            ]
        );
    }

    struct MoveObserver {
        state: DayViewState,
        requests: Rc<RefCell<Vec<EventDate>>>,
        seen: Vec<String>,
    }

    impl DayViewDelegate for MoveObserver {
        fn will_move_to(&mut self, _date: NaiveDate) {
            self.seen.push(format!(
                "will: selected {} after {} requests",
                self.state.selected_date(),
                self.requests.borrow().len()
            ));
        }
        fn did_move_to(&mut self, _date: NaiveDate) {
            self.seen.push(format!(
                "did: selected {} after {} requests",
                self.state.selected_date(),
                self.requests.borrow().len()
            ));
        }
    }

    #[test]
    fn test_will_move_to_runs_before_the_move() {
        let state = DayViewState::new(date(4));
        let requests = Rc::new(RefCell::new(Vec::new()));
        let sink = requests.clone();
        let mut view = DayView::new(Some(state.clone()));
        let handler: EventRequestHandler = Box::new(move |date| sink.borrow_mut().push(date));
        view.set_event_request_handler(Some(handler));

        let observer = Rc::new(RefCell::new(MoveObserver {
            state,
            requests: requests.clone(),
            seen: Vec::new(),
        }));
        let delegate: Rc<RefCell<dyn DayViewDelegate>> = observer.clone();
        view.set_delegate(Some(Rc::downgrade(&delegate)));

        view.move_to(date(10));

        assert_eq!(
            observer.borrow().seen,
            vec![
                "will: selected 2025-09-04 after 0 requests",
                "did: selected 2025-09-10 after 3 requests",
            ]
        );
    }

    #[test]
    fn test_moving_to_the_shown_date_is_silent() {
        let mut view = DayView::new(Some(DayViewState::new(date(4))));
        let recorder = attach(&mut view);
        view.move_to(date(4));
        assert!(recorder.borrow().calls.is_empty());
    }

    #[test]
    fn test_shared_state_change_announces_only_arrival() {
        let state = DayViewState::new(date(4));
        let mut view = DayView::new(Some(state.clone()));
        let recorder = attach(&mut view);

        state.move_to(date(8));
        view.follow_shared_state();
        view.follow_shared_state();

        assert_eq!(view.pager().current_date(), date(8));
        assert_eq!(recorder.borrow().calls, vec!["did 2025-09-08"]);
    }

    #[test]
    fn test_view_at_calendar_edge_loads_what_exists() {
        let mut view = DayView::new(Some(DayViewState::new(NaiveDate::MAX)));
        view.reload_data();
        assert_eq!(view.pager().current_date(), NaiveDate::MAX);
        assert_eq!(view.pager().loaded_dates().len(), 2);

        view.move_to(NaiveDate::MIN);
        assert_eq!(view.state().selected_date(), NaiveDate::MIN);
        assert_eq!(view.pager().loaded_dates().len(), 2);
    }

    #[test]
    fn test_relay_without_delegate_is_silent() {
        let mut view = DayView::new(Some(DayViewState::new(date(4))));
        view.handle_gesture(TimelineGesture::LongPressedAtHour(3));
        view.move_to(date(5));
        assert_eq!(view.state().selected_date(), date(5));
    }

    #[test]
    fn test_header_visibility_controls_height() {
        let mut view = DayView::default();
        assert_eq!(view.header_height(), HEADER_VISIBLE_HEIGHT);
        view.set_header_visible(false);
        assert!(!view.is_header_visible());
        assert_eq!(view.header_height(), 0.0);
    }

    #[test]
    fn test_size_class_transition_keeps_style_and_state() {
        let mut view = DayView::new(Some(DayViewState::new(date(4))));
        view.update_style(&CalendarStyle::dark());

        view.transition_to_horizontal_size_class(HorizontalSizeClass::Regular);

        assert_eq!(view.header().size_class(), HorizontalSizeClass::Regular);
        assert_eq!(view.style(), &CalendarStyle::dark());
        assert_eq!(view.header().style(), &CalendarStyle::dark().header);
        assert_eq!(view.pager().style(), &CalendarStyle::dark().timeline);
        assert_eq!(view.state().selected_date(), date(4));
    }
}
