use std::time::Duration;

use serde::Deserialize;

/// Connection and upload settings for the backend collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Root of the backend, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Bearer token for the signed-in session.
    pub access_token: Option<String>,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout. `None` lets requests run to completion.
    pub request_timeout_secs: Option<u64>,
    /// Pause after each settled upload so the finished state stays visible.
    pub upload_settle_delay_ms: u64,
    /// Lower-case extensions accepted by the ingestion endpoint.
    pub allowed_file_types: Vec<String>,
    pub max_file_size_mb: u64,
    /// Size of each streamed upload chunk; one progress report per chunk.
    pub upload_chunk_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            access_token: None,
            connect_timeout_secs: 10,
            request_timeout_secs: None,
            upload_settle_delay_ms: 500,
            allowed_file_types: ["pdf", "txt", "md", "docx"]
                .into_iter()
                .map(ToOwned::to_owned)
                .collect(),
            max_file_size_mb: 50,
            upload_chunk_bytes: 64 * 1024,
        }
    }
}

impl ServiceSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn upload_settle_delay(&self) -> Duration {
        Duration::from_millis(self.upload_settle_delay_ms)
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn is_file_type_allowed(&self, extension: &str) -> bool {
        self.allowed_file_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}
