use crater_logging::{crater_debug, crater_info};

use crate::client::{malformed, map_reqwest_error};
use crate::{
    DocumentQuery, DocumentRecord, FailureKind, IdentityRecord, ServiceClient, ServiceError,
};

const IDENTITY_PATH: &str = "api/auth/me";
const DOCUMENTS_PATH: &str = "api/documents/";

/// Session and document listing collaborator.
#[async_trait::async_trait]
pub trait DocumentGateway: Send + Sync {
    /// `Ok(None)` means nobody is signed in.
    async fn current_identity(&self) -> Result<Option<IdentityRecord>, ServiceError>;

    async fn list_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<DocumentRecord>, ServiceError>;
}

#[async_trait::async_trait]
impl DocumentGateway for ServiceClient {
    async fn current_identity(&self) -> Result<Option<IdentityRecord>, ServiceError> {
        if !self.has_token() {
            return Ok(None);
        }
        let url = self.endpoint(IDENTITY_PATH)?;
        let response = match self.send(self.http().get(url)).await {
            Ok(response) => response,
            Err(err) if matches!(err.kind, FailureKind::HttpStatus(401 | 403)) => {
                crater_info!("Session rejected: {}", err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        let body = self.read_object(response).await?;
        let identity: IdentityRecord = serde_json::from_value(body).map_err(malformed)?;
        crater_info!("Signed in as {}", identity.email);
        Ok(Some(identity))
    }

    async fn list_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<DocumentRecord>, ServiceError> {
        let mut url = self.endpoint(DOCUMENTS_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(folder) = &query.folder_path {
                pairs.append_pair("folder_path", folder);
            }
            if !query.tags.is_empty() {
                pairs.append_pair("tags", &query.tags.join(","));
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        let response = self.send(self.http().get(url)).await?;
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let documents: Vec<DocumentRecord> = serde_json::from_slice(&bytes).map_err(malformed)?;
        crater_debug!("Listed {} documents", documents.len());
        Ok(documents)
    }
}
