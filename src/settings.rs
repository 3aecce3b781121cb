use serde::{Deserialize, Serialize};

/// Builder for a batch generation request.
///
/// Carries the settings sent to `/start_generation`. Defaults match the
/// server's: 16:9 aspect ratio, 5 second clips, 1080p.
///
/// # Example
/// ```
/// use veogen_rs::GenerationRequest;
///
/// let request = GenerationRequest::new()
///     .aspect_ratio("9:16")
///     .duration(8)
///     .resolution("720p");
///
/// assert_eq!(request.aspect_ratio, "9:16");
/// assert_eq!(request.duration, 8);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub aspect_ratio: String,
    /// Clip length in seconds.
    pub duration: u32,
    pub resolution: String,
}

impl GenerationRequest {
    pub fn new() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            duration: 5,
            resolution: "1080p".to_string(),
        }
    }

    /// Set the aspect ratio (e.g. "16:9", "9:16", "1:1").
    pub fn aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = ratio.into();
        self
    }

    /// Set the clip duration in seconds.
    pub fn duration(mut self, seconds: u32) -> Self {
        self.duration = seconds;
        self
    }

    /// Set the output resolution (e.g. "720p", "1080p").
    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = resolution.into();
        self
    }
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self::new()
    }
}
