// Calendar day view library
// Exports all modules for testing and reuse

pub mod models;
pub mod services;
pub mod ui_egui;
pub mod utils;

pub use models::event::{Event, EventDescriptor, EventRef};
pub use models::state::DayViewState;
pub use models::style::CalendarStyle;
pub use services::event_source::{EventDataSource, EventDate, EventRequester, EventSource};
pub use ui_egui::controller::DayViewController;
pub use ui_egui::day_view::{DayView, DayViewDelegate};
