//! Calendar events rendered from check-ins.

use std::fmt;

use chrono::{DateTime, Utc};

/// A calendar event for a single check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckinEvent {
    /// The check-in identifier
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    /// May be empty when the check-in carries no comment, rating or social data
    pub description: String,
    /// Canonical check-in page on untappd.com
    pub url: String,
    pub location: Option<String>,
    pub geo: Option<Geo>,
}

/// Venue coordinates, rendered as `lat;lng` (the ICS `GEO` value format).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geo {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for Geo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.lat, self.lng)
    }
}
