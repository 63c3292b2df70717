// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ContentDimensionError;

/// Identifier of a content dimension (e.g. `language`).
///
/// Equality and ordering are those of the underlying string. The ordering is
/// what makes dimension space point encodings order-independent, so it must
/// stay the plain byte-wise string order.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDimensionId(String);

impl ContentDimensionId {
    /// Creates an identifier, rejecting the empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, ContentDimensionError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ContentDimensionError::EmptyDimensionId);
        }
        Ok(Self(id))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentDimensionId {
    type Error = ContentDimensionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ContentDimensionId {
    type Error = ContentDimensionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentDimensionId> for String {
    fn from(id: ContentDimensionId) -> Self {
        id.0
    }
}

impl AsRef<str> for ContentDimensionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContentDimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDimensionId({:?})", self.0)
    }
}
