//! Check-in records as returned by the Untappd API.
//!
//! Optional parts of a check-in (rating, venue, comments, toasts) are modelled
//! as `Option`s so the transform never checks for missing keys by hand.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{UntappicalError, UntappicalResult};

/// A single check-in from a user's activity feed.
#[derive(Debug, Clone, Deserialize)]
pub struct Checkin {
    #[serde(rename = "checkin_id", deserialize_with = "id_as_string")]
    pub id: String,
    pub created_at: String,
    #[serde(rename = "checkin_comment", default)]
    pub comment: Option<String>,
    #[serde(rename = "rating_score", default)]
    pub rating: Option<f64>,
    pub beer: Beer,
    pub brewery: Brewery,
    #[serde(default, deserialize_with = "venue_or_empty")]
    pub venue: Option<Venue>,
    #[serde(default)]
    pub comments: Option<Items<Comment>>,
    #[serde(default)]
    pub toasts: Option<Items<Toast>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Beer {
    #[serde(rename = "beer_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Brewery {
    #[serde(rename = "brewery_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    #[serde(rename = "venue_name", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<VenueLocation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VenueLocation {
    #[serde(rename = "venue_address", default)]
    pub address: Option<String>,
    #[serde(rename = "venue_city", default, deserialize_with = "null_as_empty")]
    pub city: String,
    #[serde(rename = "venue_state", default, deserialize_with = "null_as_empty")]
    pub state: String,
    #[serde(rename = "venue_country", default, deserialize_with = "null_as_empty")]
    pub country: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

/// The `{ count, items }` wrapper Untappd puts around nested lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Items<T> {
    #[serde(default)]
    pub items: Vec<T>,
}

/// Author attribution attached to comments and toasts.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "user_name", default, deserialize_with = "null_as_empty")]
    pub handle: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub user: User,
    #[serde(rename = "comment", default, deserialize_with = "null_as_empty")]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Toast {
    pub user: User,
}

impl Checkin {
    /// Decode one raw feed item. A failure names the item's id when it has one.
    pub fn from_value(value: Value) -> UntappicalResult<Self> {
        let id = match value.get("checkin_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => "(unknown)".to_string(),
        };

        serde_json::from_value(value).map_err(|e| UntappicalError::InvalidCheckin {
            id,
            reason: e.to_string(),
        })
    }

    pub fn comments(&self) -> &[Comment] {
        self.comments.as_ref().map_or(&[], |c| c.items.as_slice())
    }

    pub fn toasts(&self) -> &[Toast] {
        self.toasts.as_ref().map_or(&[], |t| t.items.as_slice())
    }
}

/// Untappd ids are numeric, but anything stable and unique will do.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Display strings Untappd may send as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Untappd sends `"venue": []` for check-ins without a venue.
fn venue_or_empty<'de, D>(deserializer: D) -> Result<Option<Venue>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawVenue {
        // Tried first: a derived struct would also accept an empty sequence.
        Empty(Vec<Value>),
        Venue(Venue),
    }

    Ok(match Option::<RawVenue>::deserialize(deserializer)? {
        Some(RawVenue::Venue(venue)) => Some(venue),
        Some(RawVenue::Empty(_)) | None => None,
    })
}
