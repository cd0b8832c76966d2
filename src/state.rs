use std::sync::Arc;

use untappical_core::CheckinCalendars;

/// Shared application state
#[derive(Clone)]
pub struct AppState<F> {
    pub calendars: Arc<CheckinCalendars>,
    pub feed: F,
}

impl<F> AppState<F> {
    pub fn new(domain: &str, feed: F) -> Self {
        AppState {
            calendars: Arc::new(CheckinCalendars::new(domain)),
            feed,
        }
    }
}
