use std::path::Path;

use crate::error::{Result, VeoError};

/// File extension accepted for prompts uploads.
const PROMPTS_EXTENSION: &str = "txt";

/// A batch of video prompts loaded from a prompts file.
///
/// Mirrors the server's parsing rules so problems are caught before the
/// file ever leaves the machine: one prompt per line, blank lines
/// skipped, surrounding whitespace trimmed.
///
/// # Example
/// ```
/// use veogen_rs::PromptBatch;
///
/// let batch = PromptBatch::parse("a cat in space\n\n  a dog on the moon  \n").unwrap();
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.prompts()[1], "a dog on the moon");
/// ```
#[derive(Debug, Clone)]
pub struct PromptBatch {
    prompts: Vec<String>,
}

impl PromptBatch {
    /// Load and validate a prompts file from disk.
    ///
    /// The file name is checked before the file is read: only `.txt`
    /// files are accepted.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VeoError::Validation("prompts path has no file name".into()))?;
        validate_prompts_filename(name)?;

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse prompts from raw text, one per line.
    pub fn parse(content: &str) -> Result<Self> {
        let prompts: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();

        if prompts.is_empty() {
            return Err(VeoError::Validation(
                "prompts file contains no prompts".into(),
            ));
        }

        Ok(Self { prompts })
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// The first `n` prompts, matching the preview the server echoes back
    /// after an upload.
    pub fn preview(&self, n: usize) -> &[String] {
        &self.prompts[..self.prompts.len().min(n)]
    }
}

/// Reject a prompts file by name unless it carries the `.txt` extension.
///
/// Runs before any file read or network activity, so a `prompts.csv`
/// never reaches the upload endpoint.
pub(crate) fn validate_prompts_filename(name: &str) -> Result<()> {
    let ok = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(PROMPTS_EXTENSION))
        .unwrap_or(false);

    if ok {
        Ok(())
    } else {
        Err(VeoError::Validation(format!(
            "only .{} prompts files are accepted, got '{}'",
            PROMPTS_EXTENSION, name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let batch = PromptBatch::parse("first\n\n   \nsecond\n").unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.prompts(), &["first", "second"]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let batch = PromptBatch::parse("  padded prompt  \n").unwrap();
        assert_eq!(batch.prompts()[0], "padded prompt");
    }

    #[test]
    fn test_empty_content_rejected() {
        assert!(matches!(
            PromptBatch::parse("\n   \n"),
            Err(VeoError::Validation(_))
        ));
    }

    #[test]
    fn test_preview_caps_at_len() {
        let batch = PromptBatch::parse("a\nb\nc").unwrap();
        assert_eq!(batch.preview(5).len(), 3);
        assert_eq!(batch.preview(2), &["a", "b"]);
    }

    #[test]
    fn test_txt_filename_accepted() {
        assert!(validate_prompts_filename("prompts.txt").is_ok());
        assert!(validate_prompts_filename("PROMPTS.TXT").is_ok());
    }

    #[test]
    fn test_other_extensions_rejected() {
        assert!(validate_prompts_filename("prompts.csv").is_err());
        assert!(validate_prompts_filename("prompts.json").is_err());
        assert!(validate_prompts_filename("prompts").is_err());
    }

    #[test]
    fn test_missing_file_past_validation() {
        // A valid name fails on the read, not on validation.
        let err = PromptBatch::from_file("definitely-missing-prompts.txt").unwrap_err();
        assert!(matches!(err, VeoError::Io(_)));
    }
}
