//! Meeting-bot provider client.
//!
//! The provider schedules a recording bot ("notetaker") into a meeting,
//! reports the bot's lifecycle state, serves media download URLs once a
//! recording exists, and lists upcoming calendar events.

mod error;
mod nylas;
mod traits;
mod types;

pub use error::ProviderError;
pub use nylas::NylasProvider;
pub use traits::NotetakerProvider;
pub use types::{
    CalendarEvent, MediaDescriptor, MeetingSettings, NotetakerState, TimeWindow,
};
