//! Check-in to calendar event conversion.

use chrono::{DateTime, Duration, Utc};

use crate::checkin::{Checkin, Venue};
use crate::error::{UntappicalError, UntappicalResult};
use crate::event::{CheckinEvent, Geo};

/// Check-ins are instants; every event gets this fixed length.
pub const EVENT_DURATION_MINUTES: i64 = 5;

const CHECKIN_URL_BASE: &str = "https://untappd.com/user";

/// Render a check-in as a calendar event on `username`'s calendar.
///
/// Only fails when `created_at` is not a recognizable timestamp; every
/// other missing field just drops the corresponding part of the event.
pub fn transform(checkin: &Checkin, username: &str) -> UntappicalResult<CheckinEvent> {
    let start = parse_created_at(&checkin.created_at).ok_or_else(|| {
        UntappicalError::InvalidCheckin {
            id: checkin.id.clone(),
            reason: format!("unrecognized created_at '{}'", checkin.created_at),
        }
    })?;
    let end = start + Duration::minutes(EVENT_DURATION_MINUTES);

    let (location, geo) = match checkin.venue {
        Some(ref venue) => venue_details(venue),
        None => (None, None),
    };

    Ok(CheckinEvent {
        uid: checkin.id.clone(),
        start,
        end,
        summary: format!("{} by {}", checkin.beer.name, checkin.brewery.name),
        description: description(checkin),
        url: format!("{}/{}/checkin/{}", CHECKIN_URL_BASE, username, checkin.id),
        location,
        geo,
    })
}

/// Untappd sends RFC 2822 (`Sun, 01 Jan 2023 12:00:00 +0000`); RFC 3339 is
/// accepted too.
fn parse_created_at(created_at: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(created_at)
        .or_else(|_| DateTime::parse_from_rfc3339(created_at))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Comment, rating, user comments and toasts, in that order, separated by
/// blank lines. Absent parts leave no trace.
fn description(checkin: &Checkin) -> String {
    let mut sections: Vec<String> = Vec::new();

    if let Some(ref comment) = checkin.comment {
        sections.push(comment.clone());
    }

    if let Some(rating) = checkin.rating.filter(|r| *r != 0.0) {
        sections.push(format!("{}/5", rating));
    }

    let comments = checkin.comments();
    if !comments.is_empty() {
        let lines: Vec<String> = comments
            .iter()
            .map(|c| {
                format!(
                    "{} {} (@{}): {}",
                    c.user.first_name, c.user.last_name, c.user.handle, c.text
                )
            })
            .collect();
        sections.push(lines.join("\n"));
    }

    let toasts = checkin.toasts();
    if !toasts.is_empty() {
        let toasters: Vec<String> = toasts
            .iter()
            .map(|t| format!("{} {} ({})", t.user.first_name, t.user.last_name, t.user.handle))
            .collect();
        sections.push(format!("🍻 by {}", toasters.join(", ")));
    }

    sections.retain(|s| !s.is_empty());
    sections.join("\n\n")
}

/// Coordinates are only considered for venues that have a name.
fn venue_details(venue: &Venue) -> (Option<String>, Option<Geo>) {
    let Some(ref name) = venue.name else {
        return (None, None);
    };

    let mut location = name.clone();
    let mut geo = None;

    if let Some(ref loc) = venue.location {
        if let Some(address) = loc.address.as_deref().filter(|a| !a.is_empty()) {
            location.push_str(&format!(
                "\n{}, {}, {} {}",
                address, loc.city, loc.state, loc.country
            ));
        }

        if let (Some(lat), Some(lng)) = (loc.lat, loc.lng) {
            geo = Some(Geo { lat, lng });
        }
    }

    (Some(location), geo)
}
