use serde::Serialize;
use std::time::Duration;

const COUNTRY_LOOKUP_URL: &str = "https://ipapi.co/json";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);
const POST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fallback when the geolocation lookup fails or answers nonsense.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Correction event record posted to the analytics collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionEvent {
    /// ISO-8601 UTC timestamp
    pub timestamp: String,
    pub filename: String,
    pub auto_angle: f64,
    pub manual_angle: f64,
    /// How far the caller deviated from the detected angle
    pub correction_delta: f64,
    pub num_lines: usize,
    pub client_country: String,
    pub perspective_mode: bool,
    pub key: String,
}

impl CorrectionEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        filename: &str,
        auto_angle: f64,
        manual_angle: f64,
        num_lines: usize,
        client_country: String,
        perspective_mode: bool,
        key: &str,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            filename: filename.to_string(),
            auto_angle,
            manual_angle,
            correction_delta: manual_angle - auto_angle,
            num_lines,
            client_country,
            perspective_mode,
            key: key.to_string(),
        }
    }
}

/// Best-effort country lookup for event records. Never fails; answers
/// "Unknown" when the service is unreachable or the response is malformed.
pub fn lookup_country() -> String {
    let client = match reqwest::blocking::Client::builder()
        .timeout(LOOKUP_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("could not build lookup client: {e}");
            return UNKNOWN_COUNTRY.to_string();
        }
    };

    match client
        .get(COUNTRY_LOOKUP_URL)
        .send()
        .and_then(|response| response.json::<serde_json::Value>())
    {
        Ok(info) => info
            .get("country_name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()),
        Err(e) => {
            tracing::warn!("country lookup failed: {e}");
            UNKNOWN_COUNTRY.to_string()
        }
    }
}

/// Fire-and-forget JSON POST of a correction event. Failures are logged as
/// warnings and never reach the caller.
pub fn post_event(endpoint: &str, event: &CorrectionEvent) {
    let client = match reqwest::blocking::Client::builder()
        .timeout(POST_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("could not build analytics client: {e}");
            return;
        }
    };

    match client.post(endpoint).json(event).send() {
        Ok(response) if !response.status().is_success() => {
            tracing::warn!("analytics endpoint answered HTTP {}", response.status());
        }
        Ok(_) => tracing::debug!("logged correction event for {}", event.filename),
        Err(e) => tracing::warn!("failed to log correction event: {e}"),
    }
}
