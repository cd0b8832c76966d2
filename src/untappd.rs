//! Untappd API client (the check-in feed source).

use serde::Deserialize;
use serde_json::Value;
use untappical_core::{FeedSource, UntappicalError, UntappicalResult};
use url::Url;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct UntappdClient {
    http: reqwest::Client,
    base_url: Url,
    client_id: String,
    client_secret: String,
}

/// Response envelope: `{ meta, response }`
#[derive(Deserialize)]
struct Envelope {
    response: FeedResponse,
}

#[derive(Deserialize)]
struct FeedResponse {
    checkins: CheckinPage,
}

/// Items stay raw; each one is decoded when the calendar processes it.
#[derive(Deserialize)]
struct CheckinPage {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    meta: Meta,
}

#[derive(Deserialize)]
struct Meta {
    #[serde(default)]
    error_detail: Option<String>,
}

impl UntappdClient {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.untappd_api_url)?;

        Ok(UntappdClient {
            http: reqwest::Client::new(),
            base_url,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// `{base}/user/checkins/{username}?client_id=..&client_secret=..`
    fn checkins_url(&self, username: &str) -> UntappicalResult<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| UntappicalError::Feed(format!("Invalid API base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["user", "checkins", username]);

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", &self.client_secret);

        Ok(url)
    }
}

impl FeedSource for UntappdClient {
    async fn user_checkins(&self, username: &str) -> UntappicalResult<Vec<Value>> {
        let url = self.checkins_url(username)?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| UntappicalError::Feed(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UntappicalError::Feed(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        parse_checkins(&body)
    }
}

fn parse_checkins(body: &str) -> UntappicalResult<Vec<Value>> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| UntappicalError::Feed(format!("Unexpected feed response: {}", e)))?;

    Ok(envelope.response.checkins.items)
}

/// Prefer Untappd's own explanation (`meta.error_detail`) over the bare status.
fn api_error(code: u16, body: &str) -> UntappicalError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.meta.error_detail)
        .unwrap_or_else(|| format!("HTTP {}", code));

    UntappicalError::Api { code, detail }
}
