// Domain layer - Widget data model and wire payloads
pub mod action;
pub mod error;
pub mod snapshot;
pub mod time_series;
pub mod widget;
