// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use content_dimension::ContentDimensionError;
use thiserror::Error;

/// Errors raised by dimension space construction and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionSpaceError {
    /// The point is not a member of the allowed dimension subspace.
    ///
    /// Callers probing membership should use the weighted-point lookups, which
    /// report absence as `None` instead.
    #[error("dimension space point {point} is not within the allowed dimension subspace")]
    DimensionSpacePointNotFound {
        /// JSON form of the offending point.
        point: String,
    },
    /// A point or point set could not be decoded from its string form.
    #[error("invalid dimension space point encoding: {0}")]
    InvalidEncoding(String),
    /// A point hash could not be decoded from hex.
    #[error("invalid dimension space point hash {0:?}")]
    InvalidHash(String),
    /// Two distinct generalizations of one point landed on the same weight.
    #[error(
        "generalizations {first} and {second} of {specialization} share variation weight {weight}"
    )]
    AmbiguousGeneralizationWeight {
        /// JSON form of the specialization.
        specialization: String,
        /// Colliding variation weight.
        weight: u64,
        /// Generalization recorded first.
        first: String,
        /// Generalization that collided.
        second: String,
    },
    /// Normalized weights do not fit in 64 bits.
    #[error("variation weights overflow with normalization base {base} across {dimensions} dimensions")]
    WeightOverflow {
        /// Normalization base in use.
        base: u64,
        /// Number of configured dimensions.
        dimensions: usize,
    },
    /// The allowed subspace was computed over different dimensions than the
    /// graph is built with.
    #[error("allowed subspace covers dimensions {found:?}, the configuration declares {expected:?}")]
    DimensionMismatch {
        /// Dimension ids of the configuration, in priority order.
        expected: Vec<String>,
        /// Dimension ids the allowed subspace was computed over.
        found: Vec<String>,
    },
    /// An allowed combination uses a value the configured dimension does not
    /// declare in that form.
    #[error("allowed subspace uses value {value:?} that content dimension {dimension} does not declare")]
    UndeclaredValue {
        /// Offending dimension.
        dimension: String,
        /// Raw value of the combination.
        value: String,
    },
    /// The dimension configuration is malformed.
    #[error(transparent)]
    Configuration(#[from] ContentDimensionError),
}
