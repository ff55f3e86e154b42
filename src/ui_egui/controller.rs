//! Host-level wrapper around a [`DayView`].
//!
//! A controller owns a day view and a host object. The host receives every
//! delegate notification and supplies events, either synchronously as an
//! [`EventDataSource`] ([`DayViewController::new`]) or asynchronously as an
//! [`EventRequester`] ([`DayViewController::asynchronous`]).
//!
//! The lifecycle hooks run lazily from [`DayViewController::show`]: the first
//! frame loads the view, size-class changes are forwarded as they happen.

use chrono::NaiveDate;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::day_view::{DayView, DayViewDelegate};
use crate::models::event::EventRef;
use crate::models::layout::HorizontalSizeClass;
use crate::models::state::DayViewState;
use crate::models::style::CalendarStyle;
use crate::services::event_source::{EventDataSource, EventDate, EventRequester, EventSource};

/// Answers data-source queries by borrowing the controller's host.
struct HostDataSource<H>(Weak<RefCell<H>>);

impl<H: EventDataSource> EventDataSource for HostDataSource<H> {
    fn events_for_date(&self, date: NaiveDate) -> Vec<EventRef> {
        let Some(host) = self.0.upgrade() else {
            return Vec::new();
        };
        let events = match host.try_borrow() {
            Ok(host) => host.events_for_date(date),
            Err(_) => {
                log::warn!("host is busy, no events loaded for {}", date);
                Vec::new()
            }
        };
        events
    }
}

pub struct DayViewController<H: DayViewDelegate + 'static> {
    host: Rc<RefCell<H>>,
    day_view: DayView,
    loaded: bool,
    appeared: bool,
    size_class: HorizontalSizeClass,
}

impl<H: DayViewDelegate + EventDataSource + 'static> DayViewController<H> {
    /// Controller whose host answers `events_for_date` directly.
    pub fn new(host: H) -> Self {
        Self::with_state(host, None)
    }

    pub fn with_state(host: H, state: Option<DayViewState>) -> Self {
        let host = Rc::new(RefCell::new(host));
        let source = Rc::new(HostDataSource(Rc::downgrade(&host)));
        let day_view = DayView::with_event_source(state, EventSource::synchronous(source));
        Self::from_parts(host, day_view)
    }
}

impl<H: DayViewDelegate + EventRequester + 'static> DayViewController<H> {
    /// Controller whose host is told which dates to fetch and answers later
    /// through [`DayViewController::receive`].
    ///
    /// The host must implement [`EventRequester::trigger`]:
    ///
    /// ```compile_fail
    /// use calendar_day_view::ui_egui::controller::DayViewController;
    /// use calendar_day_view::ui_egui::day_view::DayViewDelegate;
    ///
    /// struct Host;
    /// impl DayViewDelegate for Host {}
    ///
    /// let controller = DayViewController::asynchronous(Host);
    /// ```
    ///
    /// ```
    /// use calendar_day_view::services::event_source::{EventDate, EventRequester};
    /// use calendar_day_view::ui_egui::controller::DayViewController;
    /// use calendar_day_view::ui_egui::day_view::DayViewDelegate;
    ///
    /// #[derive(Default)]
    /// struct Host {
    ///     pending: Vec<EventDate>,
    /// }
    /// impl DayViewDelegate for Host {}
    /// impl EventRequester for Host {
    ///     fn trigger(&mut self, date: EventDate) {
    ///         self.pending.push(date);
    ///     }
    /// }
    ///
    /// let mut controller = DayViewController::asynchronous(Host::default());
    /// controller.view_did_load();
    /// assert_eq!(controller.host().borrow().pending.len(), 3);
    /// ```
    pub fn asynchronous(host: H) -> Self {
        Self::asynchronous_with_state(host, None)
    }

    pub fn asynchronous_with_state(host: H, state: Option<DayViewState>) -> Self {
        let host = Rc::new(RefCell::new(host));
        let weak = Rc::downgrade(&host);
        let source = EventSource::asynchronous(move |date: EventDate| {
            let Some(host) = weak.upgrade() else {
                return;
            };
            match host.try_borrow_mut() {
                Ok(mut host) => host.trigger(date),
                Err(_) => log::warn!("host is busy, dropped request for {}", date),
            };
        });
        let day_view = DayView::with_event_source(state, source);
        Self::from_parts(host, day_view)
    }
}

impl<H: DayViewDelegate + 'static> DayViewController<H> {
    fn from_parts(host: Rc<RefCell<H>>, day_view: DayView) -> Self {
        Self {
            host,
            day_view,
            loaded: false,
            appeared: false,
            size_class: HorizontalSizeClass::Unspecified,
        }
    }

    pub fn host(&self) -> &Rc<RefCell<H>> {
        &self.host
    }

    pub fn day_view(&self) -> &DayView {
        &self.day_view
    }

    pub fn day_view_mut(&mut self) -> &mut DayView {
        &mut self.day_view
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn size_class(&self) -> HorizontalSizeClass {
        self.size_class
    }

    /// Attach the host as delegate and load the first pages. Runs once.
    pub fn view_did_load(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let delegate: Rc<RefCell<dyn DayViewDelegate>> = self.host.clone();
        self.day_view.set_delegate(Some(Rc::downgrade(&delegate)));
        self.day_view.reload_data();
        self.configure_day_view_layout(self.size_class);
    }

    pub fn view_will_appear(&mut self) {
        self.appeared = true;
        self.day_view.scroll_to_first_event_if_needed();
    }

    pub fn view_did_disappear(&mut self) {
        self.appeared = false;
    }

    pub fn will_transition_to(&mut self, size_class: HorizontalSizeClass) {
        log::debug!("size class {:?} -> {:?}", self.size_class, size_class);
        self.size_class = size_class;
        self.configure_day_view_layout(size_class);
    }

    fn configure_day_view_layout(&mut self, size_class: HorizontalSizeClass) {
        self.day_view.transition_to_horizontal_size_class(size_class);
    }

    pub fn reload_data(&mut self) {
        self.day_view.reload_data();
    }

    pub fn update_style(&mut self, style: &CalendarStyle) {
        self.day_view.update_style(style);
    }

    pub fn receive(&mut self, events: Vec<EventRef>, date: EventDate) {
        self.day_view.receive(events, date);
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let size_class = HorizontalSizeClass::from_width(ui.available_width());
        if !self.loaded {
            self.size_class = size_class;
            self.view_did_load();
        } else if size_class != self.size_class {
            self.will_transition_to(size_class);
        }
        if !self.appeared {
            self.view_will_appear();
        }
        self.day_view.show(ui);
    }
}
