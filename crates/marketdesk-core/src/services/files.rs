use std::path::Path;

use tracing::info;

use crate::api::{ApiClient, ApiError, ApiRequest, FilePart};
use crate::models::{Envelope, UploadedFile};

/// Upload endpoint, relative to the base URL.
pub const UPLOAD_PATH: &str = "/files/upload";

/// Multipart field every uploaded file goes under.
pub const UPLOAD_FIELD: &str = "files";

#[derive(Clone)]
pub struct FileService {
    api: ApiClient,
}

impl FileService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Upload files and return where the backend stored them.
    pub async fn upload(&self, files: Vec<FilePart>) -> Result<Vec<UploadedFile>, ApiError> {
        let count = files.len();
        let request = ApiRequest::post(UPLOAD_PATH).multipart(files);
        let envelope: Envelope<Vec<UploadedFile>> = self.api.request(&request).await?;

        match envelope.result {
            Some(uploaded) if envelope.success == Some(true) && !uploaded.is_empty() => {
                info!(files = count, "Upload complete");
                Ok(uploaded)
            }
            _ => Err(ApiError::Rejected(envelope.message_or("File upload failed"))),
        }
    }

    /// Upload and keep only the URLs (what entity `media` fields store).
    pub async fn upload_urls(&self, files: Vec<FilePart>) -> Result<Vec<String>, ApiError> {
        Ok(self
            .upload(files)
            .await?
            .into_iter()
            .map(|f| f.url)
            .collect())
    }
}

/// Read a file from disk into an upload part under the `files` field.
pub async fn file_part(path: &Path) -> Result<FilePart, ApiError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ApiError::InvalidRequest(format!("{}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();

    let mime = mime_guess::from_path(path).first_or_octet_stream().to_string();

    Ok(FilePart::new(UPLOAD_FIELD, file_name, bytes).with_mime(mime))
}
