//! Error types for the contractgen library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ContractGenError`] — **Fatal**: the batch cannot proceed at all
//!   (no API key, unreadable states file, output directory cannot be
//!   created, invalid configuration). Returned as `Err(ContractGenError)`
//!   from the top-level entry points.
//!
//! * [`RecordError`] — **Non-fatal**: a single jurisdiction failed
//!   (content call came back empty, a table was malformed, the external
//!   renderer crashed) but every other record is fine. Stored inside
//!   [`crate::batch::RecordOutcome`] so callers get a per-record report
//!   rather than losing the whole batch to one bad state.
//!
//! The separation mirrors the error taxonomy of the pipeline: content
//! generation, incomplete content, and layout/render failures are all
//! caught at the per-record boundary and never escape to batch level.

use std::path::PathBuf;
use thiserror::Error;

use crate::states::ContentKind;

/// All fatal errors returned by the contractgen library.
///
/// Per-record failures use [`RecordError`] and are stored in
/// [`crate::batch::RecordOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum ContractGenError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No API key is available for the content service.
    #[error("Content service API key is not set.\nExport ANTHROPIC_API_KEY before running.")]
    ApiKeyMissing,

    // ── Input errors ──────────────────────────────────────────────────────
    /// A user-supplied states file was not found or not readable.
    #[error("States file not found: '{path}'\nCheck the path exists and is readable.")]
    StatesFileNotFound { path: PathBuf },

    /// A states file was read but could not be parsed.
    #[error("Failed to parse states file '{path}': {detail}")]
    StatesFileInvalid { path: PathBuf, detail: String },

    /// A `--only` filter matched none of the loaded jurisdictions.
    #[error("No jurisdiction matches '{filter}' (loaded: {available})")]
    NoMatchingStates { filter: String, available: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write an output artifact.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single jurisdiction record.
///
/// The batch driver logs it, marks the record failed, and moves on to the
/// next jurisdiction.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum RecordError {
    /// The content service returned its failure sentinel for one kind.
    #[error("{state}: content generation failed for {kind}")]
    ContentFailed { state: String, kind: ContentKind },

    /// A content call nominally succeeded but the reply was empty.
    #[error("{state}: empty reply for {kind}")]
    EmptyContent { state: String, kind: ContentKind },

    /// A parsed table is not rectangular: a data row disagrees with the
    /// header's column count.
    #[error("table '{title}': row {row} has {got} columns, header has {expected}")]
    TableShape {
        title: String,
        row: usize,
        expected: usize,
        got: usize,
    },

    /// The PDF layout engine failed.
    #[error("{state}: PDF layout failed: {detail}")]
    LayoutFailed { state: String, detail: String },

    /// Every HTML-to-PDF render strategy failed.
    #[error("{state}: all {attempts} render strategies failed: {detail}")]
    RenderFailed {
        state: String,
        attempts: usize,
        detail: String,
    },

    /// An artifact could not be written.
    #[error("{state}: failed to write '{path}': {detail}")]
    WriteFailed {
        state: String,
        path: String,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_failed_display() {
        let e = RecordError::ContentFailed {
            state: "Florida".into(),
            kind: ContentKind::Rates,
        };
        let msg = e.to_string();
        assert!(msg.contains("Florida"), "got: {msg}");
        assert!(msg.contains("rate schedule"), "got: {msg}");
    }

    #[test]
    fn table_shape_display() {
        let e = RecordError::TableShape {
            title: "Attachment A: Rate Schedule".into(),
            row: 3,
            expected: 6,
            got: 4,
        };
        let msg = e.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("4 columns"));
        assert!(msg.contains("header has 6"));
    }

    #[test]
    fn render_failed_display() {
        let e = RecordError::RenderFailed {
            state: "Texas".into(),
            attempts: 3,
            detail: "wkhtmltopdf not found".into(),
        };
        assert!(e.to_string().contains("3 render strategies"));
    }

    #[test]
    fn api_key_missing_mentions_env_var() {
        let e = ContractGenError::ApiKeyMissing;
        assert!(e.to_string().contains("ANTHROPIC_API_KEY"));
    }
}
