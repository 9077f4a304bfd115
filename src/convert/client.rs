use super::poller::StatusSource;
use super::types::{ErrorBody, StatusReport, SubmitResponse, TaskId};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::staging::StagedFile;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct ConversionClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConversionClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.server_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn status_url(&self, task_id: &TaskId) -> String {
        format!(
            "{}/api/status/{}",
            self.base_url,
            urlencoding::encode(task_id.as_str())
        )
    }

    /// The PDF name is percent-encoded so non-ASCII names survive the path.
    pub fn download_url(&self, task_id: &TaskId, pdf_filename: &str) -> String {
        format!(
            "{}/api/download/{}/{}",
            self.base_url,
            urlencoding::encode(task_id.as_str()),
            urlencoding::encode(pdf_filename)
        )
    }

    pub fn download_all_url(&self, task_id: &TaskId) -> String {
        format!(
            "{}/api/download-all/{}",
            self.base_url,
            urlencoding::encode(task_id.as_str())
        )
    }

    fn cleanup_url(&self, task_id: &TaskId) -> String {
        format!(
            "{}/api/cleanup/{}",
            self.base_url,
            urlencoding::encode(task_id.as_str())
        )
    }

    pub async fn submit(&self, files: &[StagedFile]) -> Result<SubmitResponse, ApiError> {
        let mut form = Form::new();
        for file in files {
            let bytes = file.read().await?;
            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str("application/octet-stream")?;
            form = form.part("files", part);
        }

        info!(count = files.len(), "submitting files for conversion");
        let response = self
            .http
            .post(format!("{}/api/convert", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let response = Self::check_status(response, "Conversion request failed").await?;
        let submitted = response.json::<SubmitResponse>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("failed to parse convert response: {}", e))
        })?;

        info!(task_id = %submitted.task_id, "conversion task created");
        Ok(submitted)
    }

    pub async fn status(&self, task_id: &TaskId) -> Result<StatusReport, ApiError> {
        let response = self.http.get(self.status_url(task_id)).send().await?;
        let response = Self::check_status(response, "Status check failed").await?;

        response.json::<StatusReport>().await.map_err(|e| {
            ApiError::InvalidResponse(format!("failed to parse status response: {}", e))
        })
    }

    pub async fn download(
        &self,
        task_id: &TaskId,
        pdf_filename: &str,
        dest: &Path,
    ) -> Result<u64, ApiError> {
        self.download_to(self.download_url(task_id, pdf_filename), dest)
            .await
    }

    pub async fn download_all(&self, task_id: &TaskId, dest: &Path) -> Result<u64, ApiError> {
        self.download_to(self.download_all_url(task_id), dest).await
    }

    pub async fn cleanup(&self, task_id: &TaskId) -> Result<(), ApiError> {
        let response = self.http.delete(self.cleanup_url(task_id)).send().await?;
        Self::check_status(response, "Cleanup failed").await?;
        info!(task_id = %task_id, "server cleanup finished");
        Ok(())
    }

    async fn download_to(&self, url: String, dest: &Path) -> Result<u64, ApiError> {
        debug!(url = %url, dest = %dest.display(), "starting download");
        let response = self.http.get(&url).send().await?;
        let mut response = Self::check_status(response, "Download failed").await?;

        let mut file = tokio::fs::File::create(dest).await?;
        let streamed = Self::stream_body(&mut response, &mut file).await;
        drop(file);

        match streamed {
            Ok(written) => {
                info!(dest = %dest.display(), bytes = written, "download finished");
                Ok(written)
            }
            Err(err) => {
                // A partial file would pass for a finished download.
                if let Err(remove_err) = tokio::fs::remove_file(dest).await {
                    warn!(
                        dest = %dest.display(),
                        error = %remove_err,
                        "could not remove partial download"
                    );
                }
                Err(err)
            }
        }
    }

    async fn stream_body(
        response: &mut Response,
        file: &mut tokio::fs::File,
    ) -> Result<u64, ApiError> {
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }

    /// Turns a non-2xx reply into [`ApiError::Server`], preferring the server's `error` text.
    async fn check_status(response: Response, fallback: &str) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(ErrorBody { error: Some(message) }) => message,
            _ => format!("{} (status {})", fallback, status.as_u16()),
        };
        warn!(status = status.as_u16(), %message, "request rejected by server");

        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl StatusSource for ConversionClient {
    async fn fetch_status(&self, task_id: &TaskId) -> Result<StatusReport, ApiError> {
        self.status(task_id).await
    }
}
