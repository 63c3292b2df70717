// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a subject point relates to an object point in the variation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantType {
    /// Subject and object are the same point.
    Same,
    /// Subject is a (transitive) specialization of the object.
    Specialization,
    /// Subject is a (transitive) generalization of the object.
    Generalization,
    /// Neither is a variant of the other.
    Peer,
}

impl VariantType {
    /// The relation seen from the other side.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Specialization => Self::Generalization,
            Self::Generalization => Self::Specialization,
            other => other,
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Same => "same",
            Self::Specialization => "specialization",
            Self::Generalization => "generalization",
            Self::Peer => "peer",
        })
    }
}
