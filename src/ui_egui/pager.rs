//! Horizontally paged timeline.
//!
//! The pager keeps three pages loaded: the selected day and its two
//! neighbours. Whenever a page is created, or on `reload_data`, the pager
//! invokes its trigger with the page's date and a [`TimelineHandle`] naming
//! the page. A trigger that returns events has them rendered immediately
//! (`process_events`); a trigger that returns `None` expects them to arrive
//! later through `receive`.
//!
//! Everything the user does on the pages is queued as a [`PagerEvent`] and
//! collected by the owner with `drain_events`. Paging is silent: the owner
//! announces moves around `move_to`, and `show` only reports where a swipe
//! asked to go.

use chrono::{Duration, Local, NaiveDate};
use egui::Pos2;

use super::timeline::{TimelineGesture, TimelineView};
use crate::models::event::EventRef;
use crate::models::state::DayViewState;
use crate::models::style::TimelineStyle;

/// Identifies one loaded timeline page for the lifetime of that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineHandle(u64);

/// Called when a page needs events: `(date, page)`.
pub type PageTrigger = Box<dyn FnMut(NaiveDate, TimelineHandle) -> Option<Vec<EventRef>>>;

#[derive(Debug, Clone)]
pub enum PagerEvent {
    EventSelected(EventRef),
    EventLongPressed(EventRef),
    TimelineLongPressedAtHour(u32),
}

/// Neighbouring pages kept loaded on each side of the selected day.
const PRELOADED_NEIGHBOURS: i64 = 1;
const SWIPE_MIN_DISTANCE: f32 = 60.0;

#[derive(Debug)]
struct TimelinePage {
    handle: TimelineHandle,
    timeline: TimelineView,
}

pub struct TimelinePagerView {
    state: DayViewState,
    style: TimelineStyle,
    trigger: Option<PageTrigger>,
    pages: Vec<TimelinePage>,
    current: NaiveDate,
    next_handle: u64,
    scroll_offset: f32,
    pending_scroll: Option<f32>,
    auto_scroll_to_first_event: bool,
    swipe_origin: Option<Pos2>,
    outbox: Vec<PagerEvent>,
}

impl TimelinePagerView {
    pub fn new(state: DayViewState) -> Self {
        let current = state.selected_date();
        let mut pager = Self {
            state,
            current,
            style: TimelineStyle::default(),
            trigger: None,
            pages: Vec::new(),
            next_handle: 0,
            scroll_offset: 0.0,
            pending_scroll: None,
            auto_scroll_to_first_event: false,
            swipe_origin: None,
            outbox: Vec::new(),
        };
        pager.realign(current);
        pager
    }

    pub fn state(&self) -> &DayViewState {
        &self.state
    }

    /// Observe a different shared state and load pages around its selected date.
    pub fn set_state(&mut self, state: DayViewState) {
        self.state = state;
        let date = self.state.selected_date();
        self.realign(date);
    }

    pub fn set_trigger(&mut self, trigger: Option<PageTrigger>) {
        self.trigger = trigger;
    }

    pub fn has_trigger(&self) -> bool {
        self.trigger.is_some()
    }

    pub fn style(&self) -> &TimelineStyle {
        &self.style
    }

    pub fn update_style(&mut self, style: TimelineStyle) {
        self.style = style;
        for page in &mut self.pages {
            page.timeline.relayout(&self.style);
        }
    }

    pub fn auto_scroll_to_first_event(&self) -> bool {
        self.auto_scroll_to_first_event
    }

    pub fn set_auto_scroll_to_first_event(&mut self, value: bool) {
        self.auto_scroll_to_first_event = value;
    }

    pub fn timeline_scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current
    }

    /// Dates of the loaded pages, oldest first.
    pub fn loaded_dates(&self) -> Vec<NaiveDate> {
        self.pages.iter().map(|page| page.timeline.date()).collect()
    }

    pub fn handle_for(&self, date: NaiveDate) -> Option<TimelineHandle> {
        self.pages
            .iter()
            .find(|page| page.timeline.date() == date)
            .map(|page| page.handle)
    }

    /// Events held by the loaded page for `date`.
    pub fn events_for(&self, date: NaiveDate) -> Option<&[EventRef]> {
        self.pages
            .iter()
            .find(|page| page.timeline.date() == date)
            .map(|page| page.timeline.events())
    }

    fn current_page(&self) -> &TimelinePage {
        // realign always loads the current date itself
        let index = self
            .pages
            .iter()
            .position(|page| page.timeline.date() == self.current)
            .unwrap_or(0);
        &self.pages[index]
    }

    fn allocate_handle(&mut self) -> TimelineHandle {
        let handle = TimelineHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Centre the pages on `date`, keeping pages whose date is still in range
    /// and requesting events for the new ones. Neighbours past the ends of the
    /// calendar are not loaded.
    fn realign(&mut self, date: NaiveDate) {
        let mut previous = std::mem::take(&mut self.pages);
        let mut fresh = Vec::new();
        self.current = date;

        for offset in -PRELOADED_NEIGHBOURS..=PRELOADED_NEIGHBOURS {
            let Some(page_date) = date.checked_add_signed(Duration::days(offset)) else {
                continue;
            };
            let page = match previous.iter().position(|p| p.timeline.date() == page_date) {
                Some(existing) => previous.swap_remove(existing),
                None => {
                    let handle = self.allocate_handle();
                    fresh.push((page_date, handle));
                    TimelinePage {
                        handle,
                        timeline: TimelineView::new(page_date),
                    }
                }
            };
            self.pages.push(page);
        }

        for (page_date, handle) in fresh {
            self.request(page_date, handle);
        }
    }

    fn request(&mut self, date: NaiveDate, handle: TimelineHandle) {
        let delivered = match self.trigger.as_mut() {
            Some(trigger) => trigger(date, handle),
            None => {
                log::debug!("no event source attached, skipping {}", date);
                return;
            }
        };
        if let Some(events) = delivered {
            self.process_events(events, handle);
        }
    }

    /// Ask for events for every loaded page again.
    pub fn reload_data(&mut self) {
        let requests: Vec<(NaiveDate, TimelineHandle)> = self
            .pages
            .iter()
            .map(|page| (page.timeline.date(), page.handle))
            .collect();
        for (date, handle) in requests {
            self.request(date, handle);
        }
    }

    /// Render `events` on the page identified by `timeline`.
    ///
    /// Pages that were scrolled out of range since the request are gone; their
    /// events are dropped.
    pub fn process_events(&mut self, events: Vec<EventRef>, timeline: TimelineHandle) {
        match self.pages.iter_mut().find(|page| page.handle == timeline) {
            Some(page) => {
                log::debug!("{} events for {}", events.len(), page.timeline.date());
                page.timeline.set_events(events, &self.style);
            }
            None => log::debug!("dropping events for unloaded page {:?}", timeline),
        }
    }

    /// Render `events` on every loaded page showing `date`.
    pub fn receive(&mut self, events: Vec<EventRef>, date: NaiveDate) {
        let mut matched = false;
        for page in self.pages.iter_mut().filter(|page| page.timeline.date() == date) {
            page.timeline.set_events(events.clone(), &self.style);
            matched = true;
        }
        if !matched {
            log::debug!("received {} events for {} but no page shows it", events.len(), date);
        }
    }

    /// Select `date` and page to it. Returns false if it is already shown.
    pub fn move_to(&mut self, date: NaiveDate) -> bool {
        if date == self.current_date() {
            return false;
        }
        self.state.move_to(date);
        self.realign(date);
        true
    }

    /// Follow a selection made through another view sharing the state.
    pub fn sync_to_state(&mut self) -> Option<NaiveDate> {
        let selected = self.state.selected_date();
        if selected == self.current_date() {
            return None;
        }
        self.realign(selected);
        Some(selected)
    }

    pub fn scroll_to(&mut self, hour24: f32) {
        let offset = (self.style.offset_for_hour(hour24) - self.style.vertical_inset).max(0.0);
        self.scroll_offset = offset;
        self.pending_scroll = Some(offset);
    }

    pub fn scroll_to_first_event_if_needed(&mut self) {
        if !self.auto_scroll_to_first_event {
            return;
        }
        if let Some(hour) = self.current_page().timeline.first_event_hour() {
            self.scroll_to(hour);
        }
    }

    /// Translate a gesture on the current page into a pager event.
    pub fn handle_gesture(&mut self, gesture: TimelineGesture) {
        let timeline = &self.current_page().timeline;
        let page_date = timeline.date();
        let event = match gesture {
            TimelineGesture::EventTapped(index) => {
                timeline.event(index).cloned().map(PagerEvent::EventSelected)
            }
            TimelineGesture::EventLongPressed(index) => {
                timeline.event(index).cloned().map(PagerEvent::EventLongPressed)
            }
            TimelineGesture::LongPressedAtHour(hour) => {
                Some(PagerEvent::TimelineLongPressedAtHour(hour))
            }
        };
        match event {
            Some(event) => self.outbox.push(event),
            None => log::debug!("ignoring {:?} on {}", gesture, page_date),
        }
    }

    pub fn drain_events(&mut self) -> Vec<PagerEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Draw the current page. Returns the date a finished swipe asks for.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<NaiveDate> {
        let pager_rect = ui.available_rect_before_wrap();
        let mut gestures = self.current_page().timeline.show_all_day(ui, &self.style);

        let mut scroll_area = egui::ScrollArea::vertical()
            .id_source("day_view_timeline")
            .auto_shrink([false, false]);
        if let Some(offset) = self.pending_scroll.take() {
            scroll_area = scroll_area.vertical_scroll_offset(offset);
        }

        let now = Local::now();
        let current = &self.current_page().timeline;
        let output = scroll_area.show(ui, |ui| current.show(ui, &self.style, now));
        self.scroll_offset = output.state.offset.y;
        gestures.extend(output.inner);

        for gesture in gestures {
            self.handle_gesture(gesture);
        }

        let days = self.track_swipe(ui, pager_rect)?;
        self.current_date().checked_add_signed(Duration::days(days))
    }

    fn track_swipe(&mut self, ui: &egui::Ui, area: egui::Rect) -> Option<i64> {
        let (pressed, released, position) = ui.input(|input| {
            (
                input.pointer.any_pressed(),
                input.pointer.any_released(),
                input.pointer.latest_pos(),
            )
        });

        if pressed {
            self.swipe_origin = position.filter(|pos| area.contains(*pos));
        }
        if !released {
            return None;
        }
        let origin = self.swipe_origin.take()?;
        swipe_direction(origin, position?, area.width())
    }
}

/// Day offset for a horizontal swipe from `origin` to `end`, if it was one.
///
/// Swiping left moves forward a day, swiping right moves back.
pub fn swipe_direction(origin: Pos2, end: Pos2, width: f32) -> Option<i64> {
    let delta = end - origin;
    let threshold = SWIPE_MIN_DISTANCE.max(width * 0.2);
    if delta.x.abs() < threshold || delta.x.abs() < delta.y.abs() * 2.0 {
        return None;
    }
    Some(if delta.x < 0.0 { 1 } else { -1 })
}
