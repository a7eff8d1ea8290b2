/// Engine error taxonomy
///
/// Every variant is terminal for the current report. Per-host application
/// failures are not represented here: they are ordinary values routed into
/// the error aggregation map.
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// A host identifier string could not be parsed
    #[error("invalid host {input:?}: {reason}")]
    Parse { input: String, reason: String },

    /// The host was already added during this aggregation pass
    #[error("host {0} already present in this result set")]
    DuplicateHost(String),

    /// A value could not be encoded into its canonical grouping key
    #[error("failed to build canonical key: {0}")]
    CanonicalKey(#[from] serde_json::Error),

    /// Writing to the output sink failed
    #[error("failed to write report: {0}")]
    Render(#[from] io::Error),
}

impl ReportError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        ReportError::Parse { input: input.to_string(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
