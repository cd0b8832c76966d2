//! Per-request feed processing: fetch a user's check-ins and fold the new
//! ones into their calendar.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::checkin::Checkin;
use crate::error::UntappicalResult;
use crate::ics::generate_ics;
use crate::ledger::Ledger;
use crate::registry::CalendarRegistry;
use crate::transform::transform;

/// Where check-ins come from (the Untappd API in production).
pub trait FeedSource {
    /// Fetch one page of `username`'s check-ins, newest first, as raw
    /// records. Each one is decoded on its own while it is processed.
    fn user_checkins(
        &self,
        username: &str,
    ) -> impl Future<Output = UntappicalResult<Vec<Value>>> + Send;
}

/// Process-wide calendar state: one calendar per user plus the shared
/// dedup ledger.
///
/// Both grow for as long as the process lives. Neither lock is ever held
/// across the feed fetch; once the feed is in hand, the ledger and the
/// registry are held together for the whole check-in loop, so two requests
/// can never render the same check-in twice.
#[derive(Debug)]
pub struct CheckinCalendars {
    domain: String,
    registry: Mutex<CalendarRegistry>,
    ledger: Mutex<Ledger>,
}

/// Outcome of one refresh, for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Refresh {
    pub fetched: usize,
    pub added: usize,
    pub total: usize,
    /// The user's calendar as an .ics document
    pub ics: String,
}

impl CheckinCalendars {
    pub fn new(domain: impl Into<String>) -> Self {
        CheckinCalendars {
            domain: domain.into(),
            registry: Mutex::new(CalendarRegistry::new()),
            ledger: Mutex::new(Ledger::new()),
        }
    }

    /// Fetch `username`'s feed, append events for check-ins not rendered
    /// before, and return the user's full calendar.
    ///
    /// Events appended before a failure (a record that can't be decoded or
    /// transformed) stay in the calendar.
    pub async fn refresh<F>(&self, source: &F, username: &str) -> UntappicalResult<Refresh>
    where
        F: FeedSource + Sync,
    {
        self.registry().get_or_create(username);

        let records = source.user_checkins(username).await?;
        let fetched = records.len();
        tracing::info!(username, checkins = fetched, "Fetched check-ins");

        let mut ledger = self.ledger();
        let mut registry = self.registry();
        let calendar = registry.get_or_create(username);
        let mut added = 0;

        for record in records {
            let checkin = Checkin::from_value(record)?;
            if ledger.has_seen(&checkin.id) {
                continue;
            }

            let event = transform(&checkin, username)?;
            calendar.append(event);
            ledger.mark_seen(&checkin.id);
            added += 1;
        }

        Ok(Refresh {
            fetched,
            added,
            total: calendar.len(),
            ics: generate_ics(calendar, &self.domain),
        })
    }

    /// Number of events currently on `username`'s calendar, if it exists.
    pub fn event_count(&self, username: &str) -> Option<usize> {
        self.registry().get(username).map(|c| c.len())
    }

    /// Forget every calendar and every rendered check-in.
    pub fn reset(&self) {
        self.ledger().clear();
        self.registry().clear();
    }

    // A panic mid-loop leaves both structures consistent at check-in
    // granularity, so poisoning is ignored.
    fn registry(&self) -> MutexGuard<'_, CalendarRegistry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UntappicalError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Serves canned feeds per username.
    #[derive(Default)]
    struct StaticFeed {
        feeds: HashMap<String, Vec<Value>>,
    }

    impl StaticFeed {
        fn with(mut self, username: &str, items: Vec<Value>) -> Self {
            self.feeds.insert(username.to_string(), items);
            self
        }
    }

    impl FeedSource for StaticFeed {
        async fn user_checkins(&self, username: &str) -> UntappicalResult<Vec<Value>> {
            // Suspend here the way a real fetch would
            tokio::task::yield_now().await;

            self.feeds
                .get(username)
                .cloned()
                .ok_or_else(|| UntappicalError::Api {
                    code: 404,
                    detail: format!("User {} not found", username),
                })
        }
    }

    fn item(id: &str) -> Value {
        json!({
            "checkin_id": id,
            "created_at": "2023-01-01T12:00:00Z",
            "rating_score": 0,
            "beer": { "beer_name": "Pale Ale" },
            "brewery": { "brewery_name": "River Co" }
        })
    }

    fn uids(ics: &str) -> Vec<&str> {
        ics.lines().filter_map(|l| l.strip_prefix("UID:")).collect()
    }

    #[tokio::test]
    async fn test_single_checkin_end_to_end() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default().with("alice", vec![item("abc123")]);

        let first = calendars.refresh(&feed, "alice").await.unwrap();
        assert_eq!(first.fetched, 1);
        assert_eq!(first.added, 1);
        assert_eq!(first.total, 1);
        assert_eq!(uids(&first.ics), vec!["abc123"]);
        assert!(first.ics.contains("DTSTART:20230101T120000Z"));
        assert!(first.ics.contains("DTEND:20230101T120500Z"));
        assert!(first.ics.contains("SUMMARY:Pale Ale by River Co"));
        assert!(!first.ics.contains("DESCRIPTION"));
        assert!(!first.ics.contains("LOCATION"));
        assert!(!first.ics.contains("GEO"));

        let second = calendars.refresh(&feed, "alice").await.unwrap();
        assert_eq!(second.added, 0);
        assert_eq!(second.total, 1);
        assert_eq!(uids(&second.ics), vec!["abc123"]);
    }

    #[tokio::test]
    async fn test_feed_order_is_preserved() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default().with("alice", vec![item("30"), item("10"), item("20")]);

        let refresh = calendars.refresh(&feed, "alice").await.unwrap();

        assert_eq!(uids(&refresh.ics), vec!["30", "10", "20"]);
    }

    #[tokio::test]
    async fn test_new_checkins_are_appended_after_existing() {
        let calendars = CheckinCalendars::new("example.com");
        let before = StaticFeed::default().with("alice", vec![item("2"), item("1")]);
        calendars.refresh(&before, "alice").await.unwrap();

        let after = StaticFeed::default().with("alice", vec![item("3"), item("2"), item("1")]);
        let refresh = calendars.refresh(&after, "alice").await.unwrap();

        assert_eq!(refresh.added, 1);
        assert_eq!(uids(&refresh.ics), vec!["2", "1", "3"]);
    }

    #[tokio::test]
    async fn test_duplicate_within_one_feed_rendered_once() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default().with("alice", vec![item("1"), item("1")]);

        let refresh = calendars.refresh(&feed, "alice").await.unwrap();

        assert_eq!(refresh.added, 1);
        assert_eq!(calendars.event_count("alice"), Some(1));
    }

    #[tokio::test]
    async fn test_ledger_is_shared_across_users() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default()
            .with("alice", vec![item("shared"), item("a1")])
            .with("bob", vec![item("shared"), item("b1")]);

        calendars.refresh(&feed, "alice").await.unwrap();
        let bob = calendars.refresh(&feed, "bob").await.unwrap();

        assert_eq!(uids(&bob.ics), vec!["b1"]);
        assert_eq!(calendars.event_count("alice"), Some(2));
    }

    #[tokio::test]
    async fn test_fetch_failure_still_creates_calendar() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default();

        let err = calendars.refresh(&feed, "ghost").await.unwrap_err();

        assert!(matches!(err, UntappicalError::Api { code: 404, .. }));
        assert_eq!(calendars.event_count("ghost"), Some(0));
    }

    #[tokio::test]
    async fn test_partial_progress_is_kept_on_failure() {
        let calendars = CheckinCalendars::new("example.com");
        let mut broken = item("2");
        broken["created_at"] = json!("not a date");
        let feed = StaticFeed::default().with("alice", vec![item("1"), broken, item("3")]);

        let err = calendars.refresh(&feed, "alice").await.unwrap_err();
        assert!(matches!(err, UntappicalError::InvalidCheckin { .. }));
        assert_eq!(calendars.event_count("alice"), Some(1));

        let fixed = StaticFeed::default().with("alice", vec![item("1"), item("3")]);
        let refresh = calendars.refresh(&fixed, "alice").await.unwrap();
        assert_eq!(uids(&refresh.ics), vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_reset_forgets_everything() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default().with("alice", vec![item("1")]);
        calendars.refresh(&feed, "alice").await.unwrap();

        calendars.reset();
        assert_eq!(calendars.event_count("alice"), None);

        let refresh = calendars.refresh(&feed, "alice").await.unwrap();
        assert_eq!(refresh.added, 1);
    }

    #[tokio::test]
    async fn test_null_venue_field_does_not_fail_feed() {
        let calendars = CheckinCalendars::new("example.com");
        let mut with_venue = item("2");
        with_venue["venue"] = json!({
            "venue_name": "The Tap",
            "location": {
                "venue_address": "1 High St",
                "venue_city": "Leeds",
                "venue_state": null,
                "venue_country": "England"
            }
        });
        let feed = StaticFeed::default().with("alice", vec![item("1"), with_venue]);

        let refresh = calendars.refresh(&feed, "alice").await.unwrap();

        assert_eq!(refresh.added, 2);
        assert!(refresh.ics.contains("LOCATION:The Tap"), "ICS:\n{}", refresh.ics);
    }

    #[tokio::test]
    async fn test_malformed_record_fails_at_its_position() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default().with(
            "alice",
            vec![item("1"), json!({ "checkin_id": 2, "created_at": "x" }), item("3")],
        );

        let err = calendars.refresh(&feed, "alice").await.unwrap_err();

        match err {
            UntappicalError::InvalidCheckin { id, .. } => assert_eq!(id, "2"),
            other => panic!("expected InvalidCheckin, got {:?}", other),
        }
        assert_eq!(calendars.event_count("alice"), Some(1));
    }

    #[tokio::test]
    async fn test_interleaved_refreshes_render_shared_checkin_once() {
        let calendars = CheckinCalendars::new("example.com");
        let feed = StaticFeed::default()
            .with("alice", vec![item("shared"), item("a1")])
            .with("bob", vec![item("b1"), item("shared")]);

        let (alice, bob) = tokio::join!(
            calendars.refresh(&feed, "alice"),
            calendars.refresh(&feed, "bob")
        );
        let (alice, bob) = (alice.unwrap(), bob.unwrap());

        let shared = uids(&alice.ics)
            .into_iter()
            .chain(uids(&bob.ics))
            .filter(|uid| *uid == "shared")
            .count();
        assert_eq!(shared, 1);
        assert_eq!(alice.added + bob.added, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_refreshes_keep_dedup() {
        let calendars = Arc::new(CheckinCalendars::new("example.com"));
        let users: Vec<String> = (0..8).map(|n| format!("user{}", n)).collect();
        let feed = Arc::new(users.iter().fold(StaticFeed::default(), |feed, user| {
            feed.with(user, vec![item("1"), item("2"), item("3"), item(user)])
        }));

        let handles: Vec<_> = users
            .iter()
            .cloned()
            .map(|user| {
                let calendars = Arc::clone(&calendars);
                let feed = Arc::clone(&feed);
                tokio::spawn(async move { calendars.refresh(feed.as_ref(), &user).await })
            })
            .collect();

        let mut added = 0;
        for handle in handles {
            added += handle.await.unwrap().unwrap().added;
        }

        let total: usize = users
            .iter()
            .map(|u| calendars.event_count(u).unwrap_or(0))
            .sum();
        assert_eq!(added, 3 + users.len());
        assert_eq!(total, 3 + users.len());
    }
}
