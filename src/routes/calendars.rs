//! Calendar feed endpoint

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use untappical_core::FeedSource;
use untappical_core::ics::CONTENT_TYPE;

use crate::routes::{AppError, not_found};
use crate::state::AppState;

pub fn router<F>(route_prefix: &str) -> Router<AppState<F>>
where
    F: FeedSource + Clone + Send + Sync + 'static,
{
    Router::new().route(
        &format!("{}/{{username}}", route_prefix),
        get(calendar_feed::<F>).fallback(not_found),
    )
}

/// GET {route}/:username - The user's check-in calendar as .ics
async fn calendar_feed<F>(
    State(state): State<AppState<F>>,
    Path(username): Path<String>,
) -> Result<Response, AppError>
where
    F: FeedSource + Clone + Send + Sync + 'static,
{
    tracing::info!(username = %username, "Processing request");

    let refresh = match state.calendars.refresh(&state.feed, &username).await {
        Ok(refresh) => refresh,
        Err(e) => {
            tracing::error!(username = %username, error = %e, "Failed to build calendar");
            return Err(e.into());
        }
    };

    tracing::info!(
        username = %username,
        checkins = refresh.fetched,
        added = refresh.added,
        events = refresh.total,
        "Responding with calendar"
    );

    Ok((
        [
            (header::CONTENT_TYPE, CONTENT_TYPE),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"calendar.ics\"",
            ),
        ],
        refresh.ics,
    )
        .into_response())
}
