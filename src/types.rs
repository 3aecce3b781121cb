use serde::{Deserialize, Serialize};

use crate::error::{Result, VeoError};

/// Lifecycle state reported by the `/generation_status` endpoint.
///
/// `Completed` and `Error` are terminal: once the backend reports either,
/// the status will not change again for the current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Idle,
    Processing,
    Completed,
    Error,
}

impl GenerationState {
    /// Whether polling should stop permanently on this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Completed | GenerationState::Error)
    }
}

/// Reference to a video stored in the server's download directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRef {
    /// The source prompt this video was generated from.
    pub prompt: String,
    pub filename: String,
    #[serde(default)]
    pub status: String,
}

impl VideoRef {
    /// The server path this video can be fetched from.
    pub fn download_path(&self) -> String {
        format!("/download/{}", self.filename)
    }
}

/// Snapshot of the backend's batch generation progress.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationStatus {
    #[serde(rename = "status")]
    pub state: GenerationState,
    #[serde(rename = "completed_videos", default)]
    pub completed: u32,
    #[serde(rename = "total_prompts", default)]
    pub total: u32,
    #[serde(rename = "videos", default)]
    pub videos: Vec<VideoRef>,
}

impl GenerationStatus {
    /// Whole-number completion percentage, truncated (2/3 -> 66).
    pub fn percent(&self) -> u8 {
        percent(self.completed, self.total)
    }

    /// Prompt of the most recently reported video, if any.
    pub fn current_prompt(&self) -> Option<&str> {
        self.videos.last().map(|v| v.prompt.as_str())
    }
}

pub(crate) fn percent(completed: u32, total: u32) -> u8 {
    if total == 0 {
        0
    } else {
        ((u64::from(completed.min(total)) * 100) / u64::from(total)) as u8
    }
}

/// Progress notification handed to the poll callback on each cycle.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub completed: u32,
    pub total: u32,
    /// Prompt currently being processed, truncated for display.
    pub current_prompt: Option<String>,
}

impl ProgressUpdate {
    /// Whole-number completion percentage, truncated (2/3 -> 66).
    pub fn percent(&self) -> u8 {
        percent(self.completed, self.total)
    }
}

/// Outcome of polling a generation batch to a terminal state.
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// The batch finished successfully with output videos.
    Completed { videos: Vec<VideoRef> },
    /// The backend reported a generation-level failure.
    Failed { error: String },
}

/// Result of the one-shot status check performed at startup.
///
/// Covers resuming after a restart: a batch started before this process
/// came up may still be running, or may have finished already.
#[derive(Debug, Clone)]
pub enum InitialStatus {
    /// A batch is running; the caller should resume polling.
    InProgress,
    /// A previous batch finished and its videos are available.
    Finished(Vec<VideoRef>),
    /// Nothing is running and no results exist.
    Idle,
}

/// Parsed response from `/upload_prompts`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub message: String,
    pub prompts_count: u32,
    /// Preview of the first prompts, as echoed back by the server.
    #[serde(default)]
    pub prompts: Vec<String>,
}

/// Parsed response from `/generate_prompt`.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizedPrompt {
    #[serde(default)]
    pub original_description: String,
    pub optimized_prompt: String,
}

/// Parsed response from `/start_generation`.
#[derive(Debug, Clone, Deserialize)]
pub struct StartOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub prompts_count: u32,
}

/// Success/error envelope carried by the one-shot endpoints.
///
/// Every mutating endpoint responds with a `status` discriminator of
/// `"success"` or `"error"`. Validating it here, at the boundary, means
/// callers only ever see a typed payload or a `Backend` error with the
/// server's message verbatim.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub(crate) enum ApiReply<T> {
    Success(T),
    Error {
        #[serde(default)]
        message: String,
    },
}

impl<T> ApiReply<T> {
    pub(crate) fn into_result(self) -> Result<T> {
        match self {
            ApiReply::Success(payload) => Ok(payload),
            ApiReply::Error { message } => Err(VeoError::Backend(message)),
        }
    }
}
