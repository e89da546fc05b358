use bytes::Bytes;
use crater_logging::{crater_debug, crater_trace};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;

use crate::{FailureKind, Ingestor, ServiceClient, ServiceError, TransferProgress, UploadRequest};

const UPLOAD_PATH: &str = "api/documents/upload";

#[async_trait::async_trait]
impl Ingestor for ServiceClient {
    async fn upload(
        &self,
        request: UploadRequest,
        progress: TransferProgress,
    ) -> Result<(), ServiceError> {
        let extension = request
            .path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !self.settings().is_file_type_allowed(&extension) {
            return Err(ServiceError::new(
                FailureKind::UnsupportedFileType { extension },
                request.path.display().to_string(),
            ));
        }

        let file = tokio::fs::File::open(&request.path)
            .await
            .map_err(|err| io_error(&request, err))?;
        let total = file
            .metadata()
            .await
            .map_err(|err| io_error(&request, err))?
            .len();
        let max_bytes = self.settings().max_file_bytes();
        if total > max_bytes {
            return Err(ServiceError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: total,
                },
                request.path.display().to_string(),
            ));
        }

        let chunk_bytes = self.settings().upload_chunk_bytes.max(1);
        let mut sent = 0u64;
        let title = request.title.clone();
        let body = ReaderStream::with_capacity(file, chunk_bytes).map(
            move |chunk: std::io::Result<Bytes>| {
                if let Ok(bytes) = &chunk {
                    sent += bytes.len() as u64;
                    crater_trace!("{}: {}/{} bytes", title, sent, total);
                    progress.report(sent, total);
                }
                chunk
            },
        );

        let part = Part::stream_with_length(reqwest::Body::wrap_stream(body), total)
            .file_name(request.title.clone());
        let mut form = Form::new()
            .part("file", part)
            .text("title", request.title.clone());
        if let Some(folder) = &request.folder_path {
            form = form.text("folder_path", folder.clone());
        }
        if !request.tags.is_empty() {
            form = form.text("tags", request.tags.join(","));
        }

        let url = self.endpoint(UPLOAD_PATH)?;
        crater_debug!(
            "Uploading {} ({} bytes) to {}",
            request.path.display(),
            total,
            url
        );
        self.send(self.http().post(url).multipart(form)).await?;
        Ok(())
    }
}

fn io_error(request: &UploadRequest, err: std::io::Error) -> ServiceError {
    ServiceError::new(
        FailureKind::Io,
        format!("{}: {err}", request.path.display()),
    )
}
