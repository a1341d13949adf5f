use crate::export::ParsedExport;
use crate::key::NodeKey;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The stream is not a single export object, or a property has no
    /// readable value. `summary` holds whatever summary text was produced
    /// before the failure.
    #[error("malformed export: {reason}")]
    MalformedInput { reason: String, summary: String },
}

impl ExportError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ExportError::MalformedInput {
            reason: reason.into(),
            summary: String::new(),
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            ExportError::MalformedInput { summary, .. } => summary,
        }
    }

    /// Empty collections carrying the partial summary.
    pub fn into_empty(self) -> ParsedExport {
        match self {
            ExportError::MalformedInput { summary, .. } => ParsedExport {
                summary,
                ..ParsedExport::default()
            },
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::malformed(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    #[error("no path found from {from} to {to}")]
    UnreachableTarget { from: NodeKey, to: NodeKey },
}
