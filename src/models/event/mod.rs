// Event module
// Displayable calendar events and the descriptor capability the day view renders

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::rc::Rc;

use crate::utils::date::start_of_day;

/// Anything the timeline can place on a day page.
///
/// The day view never inspects events beyond this trait, so hosts can render
/// their own model types without converting them into [`Event`].
pub trait EventDescriptor: fmt::Debug {
    fn start(&self) -> DateTime<Local>;
    fn end(&self) -> DateTime<Local>;
    fn is_all_day(&self) -> bool;
    /// Primary text drawn inside the event box.
    fn text(&self) -> &str;

    /// Hex colour (`#RRGGBB` or `#RGB`), `None` for the style default.
    fn color(&self) -> Option<&str> {
        None
    }

    fn location(&self) -> Option<&str> {
        None
    }

    /// Returns the portion of the event that falls on `date`, clamped to that day.
    fn segment_for_date(&self, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let day_start = start_of_day(date)?.naive_local();
        let day_end = day_start
            .checked_add_signed(chrono::Duration::days(1))
            .unwrap_or(NaiveDateTime::MAX);
        let start = self.start().naive_local().max(day_start);
        let end = self.end().naive_local().min(day_end);
        (start < end).then_some((start, end))
    }

    fn touches_date(&self, date: NaiveDate) -> bool {
        if self.is_all_day() {
            let first = self.start().date_naive();
            let end = self.end();
            // An all-day event ending at midnight does not spill into that day.
            let last = match end.date_naive() {
                last if last > first && end.time() == NaiveTime::MIN => last.pred_opt().unwrap_or(last),
                last => last,
            };
            return first <= date && date <= last;
        }
        self.segment_for_date(date).is_some()
    }
}

/// Shared handle to a rendered event; the pager and delegates hand these around.
pub type EventRef = Rc<dyn EventDescriptor>;

/// Wrap concrete events into descriptor handles.
pub fn into_refs<E: EventDescriptor + 'static>(events: impl IntoIterator<Item = E>) -> Vec<EventRef> {
    events
        .into_iter()
        .map(|event| Rc::new(event) as EventRef)
        .collect()
}

/// Calendar event shown on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub title: String,
    pub location: Option<String>,
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub all_day: bool,
    pub color: Option<String>,
}

impl Event {
    /// Create a new event with required fields
    ///
    /// # Arguments
    /// * `title` - Event title (required, non-empty)
    /// * `start` - Event start time
    /// * `end` - Event end time
    ///
    /// # Examples
    /// ```
    /// use calendar_day_view::models::event::Event;
    /// use chrono::Local;
    ///
    /// let start = Local::now();
    /// let end = start + chrono::Duration::hours(1);
    /// let event = Event::new("Team Meeting", start, end).unwrap();
    /// ```
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Result<Self, String> {
        let event = Self {
            title: title.into(),
            location: None,
            start,
            end,
            all_day: false,
            color: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Validate the event
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if self.end <= self.start {
            return Err("Event end time must be after start time".to_string());
        }

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }
}

impl EventDescriptor for Event {
    fn start(&self) -> DateTime<Local> {
        self.start
    }

    fn end(&self) -> DateTime<Local> {
        self.end
    }

    fn is_all_day(&self) -> bool {
        self.all_day
    }

    fn text(&self) -> &str {
        &self.title
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    title: Option<String>,
    location: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    all_day: bool,
    color: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    /// Set as all-day event
    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Set the event color (hex format)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build the event
    pub fn build(self) -> Result<Event, String> {
        let title = self.title.ok_or("Event title is required")?;
        let start = self.start.ok_or("Event start time is required")?;
        let end = self.end.ok_or("Event end time is required")?;

        let event = Event {
            title,
            location: self.location,
            start,
            end,
            all_day: self.all_day,
            color: self.color,
        };

        event.validate()?;
        Ok(event)
    }
}
