use thiserror::Error;

/// Why a constituency document could not be turned into a feature collection.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not a GeoJSON FeatureCollection: {0}")]
    Malformed(String),

    #[error("feature {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    #[error("{0} (rebuild with the `download` feature)")]
    Unsupported(String),
}

impl DataLoadError {
    pub(crate) fn feature(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidFeature { index, reason: reason.into() }
    }
}

/// An expected property is absent from a constituency record.
/// Never fatal: the detail panel shows a placeholder instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing property {field:?}")]
pub struct MissingFieldError {
    pub field: &'static str,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
