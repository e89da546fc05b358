use crater_logging::{crater_debug, crater_info};

use crate::client::{malformed, map_reqwest_error};
use crate::{GenerationPayload, PreviewResponse, ServiceClient, ServiceError};

const PREVIEW_PATH: &str = "api/content/generate/preview";
const GENERATE_PATH: &str = "api/content/generate";

#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Asks for an advisory sample of what generation would produce.
    async fn preview(&self, payload: &GenerationPayload) -> Result<PreviewResponse, ServiceError>;

    /// Runs full generation. Only success or failure is reported; the new
    /// content shows up in the document store.
    async fn generate(&self, payload: &GenerationPayload) -> Result<(), ServiceError>;
}

#[async_trait::async_trait]
impl GenerationService for ServiceClient {
    async fn preview(&self, payload: &GenerationPayload) -> Result<PreviewResponse, ServiceError> {
        let url = self.endpoint(PREVIEW_PATH)?;
        crater_debug!(
            "Preview request url={} sources={}",
            url,
            payload.source_doc_ids.len()
        );
        let response = self.send(self.http().post(url).json(payload)).await?;
        let body = self.read_object(response).await?;
        let preview: PreviewResponse = serde_json::from_value(body).map_err(malformed)?;
        crater_info!(
            "Preview ready: snippet={} estimated_tokens={:?}",
            preview.example_snippet.is_some(),
            preview.estimated_tokens
        );
        Ok(preview)
    }

    async fn generate(&self, payload: &GenerationPayload) -> Result<(), ServiceError> {
        let url = self.endpoint(GENERATE_PATH)?;
        crater_debug!(
            "Generate request url={} sources={}",
            url,
            payload.source_doc_ids.len()
        );
        let response = self.send(self.http().post(url).json(payload)).await?;
        let body = response.bytes().await.map_err(map_reqwest_error)?;
        crater_info!("Generation finished: {} response bytes", body.len());
        Ok(())
    }
}
