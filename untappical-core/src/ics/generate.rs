//! ICS document generation for user calendars.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike};

use crate::calendar::UserCalendar;
use crate::event::CheckinEvent;

pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Render a user's whole calendar as an .ics document.
///
/// `domain` labels the producer (`PRODID`).
pub fn generate_ics(calendar: &UserCalendar, domain: &str) -> String {
    let mut cal = Calendar::new();
    cal.name(&calendar.name);

    for event in calendar.events() {
        cal.push(to_ics_event(event));
    }

    let cal = cal.done();

    strip_ics_bloat(&cal.to_string(), domain)
}

fn to_ics_event(event: &CheckinEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);

    // DTSTAMP is the check-in time so the same calendar always renders the same
    ics_event.add_property("DTSTAMP", format_utc(&event.start));
    ics_event.add_property("DTSTART", format_utc(&event.start));
    ics_event.add_property("DTEND", format_utc(&event.end));

    if !event.description.is_empty() {
        ics_event.description(&event.description);
    }

    ics_event.add_property("URL", &event.url);

    if let Some(ref loc) = event.location {
        ics_event.location(loc);
    }

    if let Some(geo) = event.geo {
        ics_event.add_property("GEO", geo.to_string());
    }

    ics_event.done()
}

fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with one naming the configured domain
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str, domain: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str(&format!("PRODID:-//{}//untappical//EN\r\n", domain));
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
