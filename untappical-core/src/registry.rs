//! Registry of user calendars, keyed by username.

use std::collections::HashMap;

use crate::calendar::UserCalendar;

/// Lazily populated map of username to calendar. Calendars are never
/// removed while the process runs.
#[derive(Debug, Default)]
pub struct CalendarRegistry {
    calendars: HashMap<String, UserCalendar>,
}

impl CalendarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, username: &str) -> &mut UserCalendar {
        self.calendars
            .entry(username.to_string())
            .or_insert_with(|| UserCalendar::new(username))
    }

    pub fn get(&self, username: &str) -> Option<&UserCalendar> {
        self.calendars.get(username)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    pub fn clear(&mut self) {
        self.calendars.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CheckinEvent;
    use chrono::{TimeZone, Utc};

    fn event(uid: &str) -> CheckinEvent {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
        CheckinEvent {
            uid: uid.to_string(),
            start,
            end: start + chrono::Duration::minutes(5),
            summary: "Pale Ale by River Co".to_string(),
            description: String::new(),
            url: format!("https://untappd.com/user/alice/checkin/{}", uid),
            location: None,
            geo: None,
        }
    }

    #[test]
    fn test_get_or_create_is_lazy_and_stable() {
        let mut registry = CalendarRegistry::new();
        assert!(registry.get("alice").is_none());

        let calendar = registry.get_or_create("alice");
        assert_eq!(calendar.name, "Untappd check-ins for alice");
        calendar.append(event("1"));

        let again = registry.get_or_create("alice");
        assert_eq!(again.len(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_append_keeps_order_and_duplicates() {
        let mut registry = CalendarRegistry::new();
        let calendar = registry.get_or_create("alice");

        calendar.append(event("b"));
        calendar.append(event("a"));
        calendar.append(event("b"));

        let uids: Vec<&str> = calendar.events().iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(uids, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_calendars_are_per_user() {
        let mut registry = CalendarRegistry::new();
        registry.get_or_create("alice").append(event("1"));
        registry.get_or_create("bob");

        assert_eq!(registry.get("alice").map(|c| c.len()), Some(1));
        assert_eq!(registry.get("bob").map(|c| c.len()), Some(0));
        assert!(registry.get("bob").is_some_and(|c| c.is_empty()));

        registry.clear();
        assert!(registry.is_empty());
    }
}
