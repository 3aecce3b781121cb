use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, VeoError};
use crate::prompts::validate_prompts_filename;
use crate::settings::GenerationRequest;
use crate::types::*;

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// Async client for a VEO3 video generator service instance.
///
/// Provides REST methods for prompts upload, prompt optimization,
/// generation control, status reads, and video download. Long-running
/// batches are tracked by polling `/generation_status` via
/// [`StatusPoller`](crate::StatusPoller).
///
/// # Example
/// ```no_run
/// use veogen_rs::VeoClient;
///
/// # async fn example() -> veogen_rs::Result<()> {
/// let client = VeoClient::new("http://127.0.0.1:5000");
/// let healthy = client.health().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct VeoClient {
    http: Client,
    endpoint: String,
}

impl VeoClient {
    /// Create a new client pointing at the given generator endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: normalize(endpoint.into()),
        }
    }

    /// Use a custom `reqwest::Client` (for connection pooling, timeouts, TLS).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Returns the configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connect_error(&self, e: reqwest::Error) -> VeoError {
        VeoError::Network {
            context: format!(
                "Cannot connect to the video generator at {} \u{2014} is the service running?",
                self.endpoint
            ),
            source: e,
        }
    }

    // ── Health ──────────────────────────────────────────────────────

    /// Check whether the generator is reachable via `/api/status`.
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/api/status", self.endpoint);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;
        Ok(resp.status().is_success())
    }

    // ── Prompts upload ──────────────────────────────────────────────

    /// Upload a prompts file (one prompt per line) for the next batch.
    ///
    /// The file name is validated locally before anything is read or
    /// sent: only `.txt` files are accepted, so a wrong extension never
    /// reaches the network layer.
    pub async fn upload_prompts(&self, path: impl AsRef<Path>) -> Result<UploadOutcome> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VeoError::Validation("prompts path has no file name".into()))?
            .to_string();
        validate_prompts_filename(&name)?;

        let data = std::fs::read(path)?;
        debug!(file = %name, bytes = data.len(), "uploading prompts file");

        let part = reqwest::multipart::Part::bytes(data).file_name(name);
        let form = reqwest::multipart::Form::new().part("prompts_file", part);

        let url = format!("{}/upload_prompts", self.endpoint);
        let resp = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(30))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;

        self.parse_reply(resp, "upload_prompts").await
    }

    // ── Prompt optimization ─────────────────────────────────────────

    /// Turn a plain description into an optimized generation prompt.
    pub async fn optimize_prompt(&self, description: &str) -> Result<OptimizedPrompt> {
        let description = description.trim();
        if description.is_empty() {
            return Err(VeoError::Validation("description must not be empty".into()));
        }

        let url = format!("{}/generate_prompt", self.endpoint);
        let body = serde_json::json!({ "description": description });
        let resp = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(30))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;

        self.parse_reply(resp, "generate_prompt").await
    }

    // ── Generation control ──────────────────────────────────────────

    /// Start generating videos for the uploaded prompts.
    ///
    /// Progress is reported through `/generation_status`; use
    /// [`StatusPoller`](crate::StatusPoller) to track it to completion.
    pub async fn start_generation(&self, request: &GenerationRequest) -> Result<StartOutcome> {
        let url = format!("{}/start_generation", self.endpoint);
        debug!(
            aspect_ratio = %request.aspect_ratio,
            duration = request.duration,
            resolution = %request.resolution,
            "starting generation batch"
        );
        let resp = self
            .http
            .post(&url)
            .timeout(Duration::from_secs(30))
            .json(request)
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;

        self.parse_reply(resp, "start_generation").await
    }

    // ── Status ──────────────────────────────────────────────────────

    /// Fetch the current batch progress snapshot.
    pub async fn generation_status(&self) -> Result<GenerationStatus> {
        let url = format!("{}/generation_status", self.endpoint);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| self.connect_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(VeoError::Http { status, body });
        }

        resp.json::<GenerationStatus>()
            .await
            .map_err(|e| VeoError::Network {
                context: "Failed to parse generation status response".into(),
                source: e,
            })
    }

    // ── Video download ──────────────────────────────────────────────

    /// Download a generated video by filename. Returns raw bytes.
    pub async fn download(&self, filename: &str) -> Result<Vec<u8>> {
        if filename.is_empty() {
            return Err(VeoError::Validation("filename must not be empty".into()));
        }

        let url = format!("{}/download/{}", self.endpoint, filename);
        let resp = self
            .http
            .get(&url)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .map_err(|e| VeoError::Network {
                context: format!("Failed to fetch video {}", filename),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(VeoError::Http {
                status: resp.status().as_u16(),
                body: format!("Failed to fetch video {}", filename),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| VeoError::Network {
            context: "Failed to read video bytes".into(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }

    /// Download a video and write it into `dir` under its server filename.
    pub async fn save_video(&self, video: &VideoRef, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let bytes = self.download(&video.filename).await?;
        let target = dir.as_ref().join(&video.filename);
        std::fs::write(&target, bytes)?;
        Ok(target)
    }

    // ── Response handling ───────────────────────────────────────────

    /// Decode a one-shot endpoint response, unwrapping the success/error
    /// envelope at the boundary.
    async fn parse_reply<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(VeoError::Http { status, body });
        }

        let text = resp.text().await.map_err(|e| VeoError::Network {
            context: format!("Failed to read {} response", what),
            source: e,
        })?;

        let reply: ApiReply<T> = serde_json::from_str(&text)
            .map_err(|e| VeoError::InvalidResponse(format!("Bad {} response: {}", what, e)))?;
        reply.into_result()
    }
}
