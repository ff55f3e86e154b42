// Module exports for models

pub mod event;
pub mod layout;
pub mod state;
pub mod style;
