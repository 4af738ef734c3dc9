use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Pipeline step a page failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ocr,
    Layout,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ocr => f.write_str("ocr"),
            Stage::Layout => f.write_str("layout"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("malformed detection {text:?}: {reason}")]
    MalformedDetection { text: String, reason: String },

    #[error("invalid bin configuration: {0}")]
    InvalidBinConfiguration(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("page {page_id} failed during {stage}")]
    PageProcessing {
        page_id: usize,
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    #[error("page {page_id} worker exited without a result; stage unknown")]
    WorkerLost { page_id: usize },

    #[error("document contains no extractable text")]
    EmptyDocument,

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl LayoutError {
    pub(crate) fn page(page_id: usize, stage: Stage, source: impl Into<anyhow::Error>) -> Self {
        LayoutError::PageProcessing {
            page_id,
            stage,
            source: source.into(),
        }
    }

    /// Page id carried by a page-level failure.
    pub fn page_id(&self) -> Option<usize> {
        match self {
            LayoutError::PageProcessing { page_id, .. } | LayoutError::WorkerLost { page_id } => {
                Some(*page_id)
            }
            _ => None,
        }
    }
}
