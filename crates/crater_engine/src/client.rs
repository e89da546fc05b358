use reqwest::{RequestBuilder, Response};
use url::Url;

use crate::{EngineError, FailureKind, ServiceError, ServiceSettings};

/// Shared HTTP plumbing for every backend collaborator.
///
/// One instance implements [`DocumentGateway`](crate::DocumentGateway),
/// [`GenerationService`](crate::GenerationService) and
/// [`Ingestor`](crate::Ingestor).
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    base_url: Url,
    settings: ServiceSettings,
}

impl ServiceClient {
    pub fn new(settings: ServiceSettings) -> Result<Self, EngineError> {
        let mut base_url = Url::parse(&settings.base_url).map_err(|err| EngineError::BaseUrl {
            url: settings.base_url.clone(),
            reason: err.to_string(),
        })?;
        if !base_url.path().ends_with('/') {
            // Keep any path prefix when joining endpoint paths.
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout());
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| EngineError::Client(err.to_string()))?;

        Ok(Self {
            http,
            base_url,
            settings,
        })
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn has_token(&self) -> bool {
        self.settings.access_token.is_some()
    }

    /// Resolves `path` (no leading slash) against the base url.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    /// Sends the request with the session token attached and fails on any
    /// non-success status.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let request = match &self.settings.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{status}: {body}"),
            ));
        }
        Ok(response)
    }

    /// Reads the body as a JSON object, rejecting anything else.
    pub(crate) async fn read_object(
        &self,
        response: Response,
    ) -> Result<serde_json::Value, ServiceError> {
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|err| ServiceError::new(FailureKind::MalformedResponse, err.to_string()))?;
        if !value.is_object() {
            return Err(ServiceError::new(
                FailureKind::MalformedResponse,
                "expected a JSON object",
            ));
        }
        Ok(value)
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ServiceError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}

pub(crate) fn malformed(err: serde_json::Error) -> ServiceError {
    ServiceError::new(FailureKind::MalformedResponse, err.to_string())
}
