//! Where the day view gets its events from.
//!
//! Two delivery styles are supported:
//!
//! * **Synchronous**: an [`EventDataSource`] is asked for a date's events and
//!   answers immediately.
//! * **Asynchronous**: a request handler is told which date is needed and the
//!   owner later pushes the answer in through `DayView::receive`.
//!
//! Requests are always keyed by date-only values. Nothing here tracks which
//! requests are outstanding: an answer is matched to a request purely by date.

use chrono::{DateTime, NaiveDate, TimeZone};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::models::event::EventRef;
use crate::utils::date::date_only;

/// Pull-based event provider.
pub trait EventDataSource {
    fn events_for_date(&self, date: NaiveDate) -> Vec<EventRef>;
}

/// Push-based event provider.
///
/// `trigger` has no default body: an asynchronous day view cannot be built
/// around a host that does not know how to fetch events.
pub trait EventRequester {
    fn trigger(&mut self, date: EventDate);
}

/// Token identifying the day an asynchronous request was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventDate {
    pub value: NaiveDate,
}

impl EventDate {
    pub fn new(value: NaiveDate) -> Self {
        Self { value }
    }

    pub fn from_datetime<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self::new(date_only(timestamp))
    }
}

impl From<NaiveDate> for EventDate {
    fn from(value: NaiveDate) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

pub type EventRequestHandler = Box<dyn FnMut(EventDate)>;

/// How a day view loads the events for a page.
#[derive(Default)]
pub enum EventSource {
    /// Nothing attached; page requests are dropped.
    #[default]
    Detached,
    Synchronous(Rc<dyn EventDataSource>),
    Asynchronous(EventRequestHandler),
}

impl EventSource {
    pub fn synchronous<S: EventDataSource + 'static>(source: Rc<S>) -> Self {
        EventSource::Synchronous(source)
    }

    pub fn asynchronous(handler: impl FnMut(EventDate) + 'static) -> Self {
        EventSource::Asynchronous(Box::new(handler))
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, EventSource::Detached)
    }
}

impl fmt::Debug for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventSource::Detached => "Detached",
            EventSource::Synchronous(_) => "Synchronous",
            EventSource::Asynchronous(_) => "Asynchronous",
        };
        f.write_str(name)
    }
}

/// Vector-backed data source.
///
/// Events are returned for every day they touch, ordered by start time.
#[derive(Debug, Default)]
pub struct InMemoryEventSource {
    events: RefCell<Vec<EventRef>>,
}

impl InMemoryEventSource {
    pub fn new(events: Vec<EventRef>) -> Self {
        Self {
            events: RefCell::new(events),
        }
    }

    pub fn add(&self, event: EventRef) {
        self.events.borrow_mut().push(event);
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventDataSource for InMemoryEventSource {
    fn events_for_date(&self, date: NaiveDate) -> Vec<EventRef> {
        let mut events: Vec<EventRef> = self
            .events
            .borrow()
            .iter()
            .filter(|event| event.touches_date(date))
            .cloned()
            .collect();
        events.sort_by_key(|event| event.start());
        events
    }
}
