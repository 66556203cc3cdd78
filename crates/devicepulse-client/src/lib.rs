//! Client data layer for the devicepulse log API.
//!
//! [`TelemetryClient`] keeps one list cache per entity kind. `list_*` serves
//! the cache when warm and fetches otherwise; a successful `create_*`
//! invalidates the corresponding cache and reloads it before returning, so
//! consumers re-render from fresh data (refetch-on-write). Failures are
//! never retried automatically — the next call tries again.

use tokio::sync::Mutex;

use devicepulse_core::{BatteryLog, DiagnosticResult, NewBatteryLog, NewDiagnostic, ValidationError};

/// Failure surfaced by the client data layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the payload (400); carries message + field path.
    #[error("rejected by server: {0}")]
    Rejected(ValidationError),

    /// The server answered with an unexpected status.
    #[error("transport failure: {url} answered {status}")]
    Transport { status: u16, url: String },

    /// The server was unreachable or the response body was malformed.
    #[error("http failure: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the log API with per-entity list caching.
pub struct TelemetryClient {
    base: String,
    http: reqwest::Client,
    diagnostics: Mutex<Option<Vec<DiagnosticResult>>>,
    battery_logs: Mutex<Option<Vec<BatteryLog>>>,
}

impl TelemetryClient {
    /// Create a client for a server base URL, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            diagnostics: Mutex::new(None),
            battery_logs: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn fetch_list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.url(path);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }

    async fn post_create<T, I>(&self, path: &str, input: &I) -> Result<T, ClientError>
    where
        T: serde::de::DeserializeOwned,
        I: serde::Serialize,
    {
        let url = self.url(path);
        let response = self.http.post(&url).json(input).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            let fault: ValidationError = response.json().await?;
            return Err(ClientError::Rejected(fault));
        }
        if !status.is_success() {
            return Err(ClientError::Transport {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }

    /// All diagnostic results, from cache when warm.
    pub async fn list_diagnostics(&self) -> Result<Vec<DiagnosticResult>, ClientError> {
        if let Some(cached) = self.diagnostics.lock().await.clone() {
            return Ok(cached);
        }
        self.refetch_diagnostics().await
    }

    async fn refetch_diagnostics(&self) -> Result<Vec<DiagnosticResult>, ClientError> {
        let records = self.fetch_list("/api/diagnostics").await?;
        log::debug!("cached {} diagnostic results", records.len());
        *self.diagnostics.lock().await = Some(records.clone());
        Ok(records)
    }

    /// Record a diagnostic result, then invalidate and reload the cached
    /// list before returning.
    pub async fn create_diagnostic(
        &self,
        input: &NewDiagnostic,
    ) -> Result<DiagnosticResult, ClientError> {
        let record: DiagnosticResult = self.post_create("/api/diagnostics", input).await?;
        *self.diagnostics.lock().await = None;
        self.refetch_diagnostics().await?;
        Ok(record)
    }

    /// All battery samples, from cache when warm.
    pub async fn list_battery_logs(&self) -> Result<Vec<BatteryLog>, ClientError> {
        if let Some(cached) = self.battery_logs.lock().await.clone() {
            return Ok(cached);
        }
        self.refetch_battery_logs().await
    }

    async fn refetch_battery_logs(&self) -> Result<Vec<BatteryLog>, ClientError> {
        let records = self.fetch_list("/api/battery-logs").await?;
        log::debug!("cached {} battery samples", records.len());
        *self.battery_logs.lock().await = Some(records.clone());
        Ok(records)
    }

    /// Record a battery sample with the same refetch-on-write contract as
    /// [`create_diagnostic`].
    ///
    /// [`create_diagnostic`]: TelemetryClient::create_diagnostic
    pub async fn create_battery_log(
        &self,
        input: &NewBatteryLog,
    ) -> Result<BatteryLog, ClientError> {
        let record: BatteryLog = self.post_create("/api/battery-logs", input).await?;
        *self.battery_logs.lock().await = None;
        self.refetch_battery_logs().await?;
        Ok(record)
    }

    /// The `n` most recent battery samples (list is timestamp-ascending).
    pub async fn recent_battery(&self, n: usize) -> Result<Vec<BatteryLog>, ClientError> {
        let logs = self.list_battery_logs().await?;
        let skip = logs.len().saturating_sub(n);
        Ok(logs.into_iter().skip(skip).collect())
    }
}
