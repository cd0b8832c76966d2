//! Per-user check-in calendars.

use crate::event::CheckinEvent;

/// The accumulating calendar for one Untappd user.
#[derive(Debug, Clone)]
pub struct UserCalendar {
    pub username: String,
    /// Display name (`X-WR-CALNAME`)
    pub name: String,
    events: Vec<CheckinEvent>,
}

impl UserCalendar {
    pub fn new(username: &str) -> Self {
        UserCalendar {
            username: username.to_string(),
            name: format!("Untappd check-ins for {}", username),
            events: Vec::new(),
        }
    }

    /// Add an event at the end. Callers own ordering and dedup.
    pub fn append(&mut self, event: CheckinEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CheckinEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
