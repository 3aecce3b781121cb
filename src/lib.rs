//! # veogen-rs
//!
//! Async Rust client for a VEO3 batch video-generation service.
//!
//! Provides a typed client for the generator's REST operations (prompts
//! upload, prompt optimization, generation control, video download), a
//! status poller that tracks a running batch to completion with
//! retry-on-transient-failure, and a busy-overlay guard that keeps a
//! blocking indicator from ever getting stuck.
//!
//! ## Quick Start
//!
//! ```no_run
//! use veogen_rs::{GenerationOutcome, GenerationRequest, StatusPoller, VeoClient};
//!
//! # async fn example() -> veogen_rs::Result<()> {
//! let client = VeoClient::new("http://127.0.0.1:5000");
//!
//! // Upload a prompts file (one prompt per line)
//! let upload = client.upload_prompts("prompts.txt").await?;
//! println!("{} ({} prompts)", upload.message, upload.prompts_count);
//!
//! // Start the batch
//! let request = GenerationRequest::new().aspect_ratio("16:9").duration(5);
//! client.start_generation(&request).await?;
//!
//! // Poll to completion with progress updates
//! let poller = StatusPoller::new(client.clone());
//! let outcome = poller
//!     .run(|p| println!("{}/{} ({}%)", p.completed, p.total, p.percent()))
//!     .await?;
//!
//! if let Some(GenerationOutcome::Completed { videos }) = outcome {
//!     for video in &videos {
//!         let path = client.save_video(video, ".").await?;
//!         println!("Saved: {}", path.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod overlay;
pub mod poller;
pub mod prompts;
pub mod settings;
pub mod types;

pub use client::VeoClient;
pub use error::{Result, VeoError};
pub use overlay::{OverlayGuard, OverlaySurface};
pub use poller::{PollConfig, StatusPoller, StatusSource};
pub use prompts::PromptBatch;
pub use settings::GenerationRequest;
pub use types::{
    GenerationOutcome, GenerationState, GenerationStatus, InitialStatus, OptimizedPrompt,
    ProgressUpdate, StartOutcome, UploadOutcome, VideoRef,
};
