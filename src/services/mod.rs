// Service module exports

pub mod event_source;
