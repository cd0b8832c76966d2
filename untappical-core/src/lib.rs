//! Check-in aggregation engine for untappical.
//!
//! Turns Untappd check-in records into per-user calendars:
//! - `checkin` for the record types as the API returns them
//! - `transform` for the check-in to event conversion
//! - `ledger` and `registry` for the process-wide state
//! - `feed` for the per-request refresh of a user's calendar
//! - `ics` for rendering calendars as .ics documents

pub mod calendar;
pub mod checkin;
pub mod error;
pub mod event;
pub mod feed;
pub mod ics;
pub mod ledger;
pub mod registry;
pub mod transform;

pub use calendar::UserCalendar;
pub use checkin::Checkin;
pub use error::{UntappicalError, UntappicalResult};
pub use event::{CheckinEvent, Geo};
pub use feed::{CheckinCalendars, FeedSource, Refresh};
