//! Calendar dispatcher - invites bots into upcoming meetings.
//!
//! Periodically lists calendar events around the current time and invites
//! a notetaker into every event with a conferencing URL that has not been
//! dispatched before. Each successful invite hands the job to the media
//! pipeline.

mod config;
mod runner;
mod types;

pub use config::DispatcherConfig;
pub use runner::CalendarDispatcher;
pub use types::*;
