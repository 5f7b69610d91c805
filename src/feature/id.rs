use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a single constituency within a loaded `FeatureCollection`.
///
/// Ids are the zero-based position of the feature in the source document, so
/// they are only stable across reloads if the document keeps its ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u32);

impl FeatureId {
    #[inline]
    pub fn index(self) -> usize { self.0 as usize }
}

impl From<u32> for FeatureId {
    fn from(value: u32) -> Self { Self(value) }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
