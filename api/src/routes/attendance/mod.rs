//! Event attendance listing and CSV export, mounted under `/events/{event_id}/attendance`.

pub mod get;

pub use get::{export_attendance, get_attendance};
