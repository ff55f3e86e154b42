pub mod controller;
pub mod day_view;
pub mod header;
pub mod pager;
mod palette;
pub mod timeline;

pub use controller::DayViewController;
pub use day_view::{DayView, DayViewDelegate};
