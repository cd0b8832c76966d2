pub mod calendars;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use untappical_core::FeedSource;

use crate::state::AppState;

const POWERED_BY: &str = concat!("untappical ", env!("CARGO_PKG_VERSION"));

/// Convert errors to plain-text 500 responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error - {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Everything that isn't a calendar route
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404")
}

/// Full application router: calendar routes, 404 fallback, and the
/// response layers (CORS, `X-Powered-By`, request tracing).
pub fn app<F>(state: AppState<F>, route_prefix: &str) -> Router
where
    F: FeedSource + Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(calendars::router::<F>(route_prefix))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-powered-by"),
            HeaderValue::from_static(POWERED_BY),
        ))
        .layer(TraceLayer::new_for_http())
}
