// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;

/// Configuration errors raised while constructing content dimensions.
///
/// All of these are fatal: a dimension (or a dimension source) is either
/// fully valid or not constructed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentDimensionError {
    /// A dimension identifier was empty.
    #[error("content dimension id must not be empty")]
    EmptyDimensionId,
    /// A dimension was declared without any values.
    #[error("content dimension {dimension} has no values")]
    NoValues {
        /// Offending dimension.
        dimension: String,
    },
    /// Two values of one dimension share the same raw value.
    #[error("content dimension {dimension} declares value {value:?} more than once")]
    DuplicateValue {
        /// Offending dimension.
        dimension: String,
        /// Duplicated raw value.
        value: String,
    },
    /// Two dimensions of one source share the same identifier.
    #[error("content dimension {dimension} is declared more than once")]
    DuplicateDimension {
        /// Duplicated dimension id.
        dimension: String,
    },
    /// A variation edge references a value the dimension does not declare.
    #[error("content dimension {dimension} has a variation edge referencing unknown value {value:?}")]
    UnknownValue {
        /// Offending dimension.
        dimension: String,
        /// Unknown raw value.
        value: String,
    },
    /// A value was given more than one direct generalization.
    #[error("value {value:?} of content dimension {dimension} has more than one generalization")]
    MultipleGeneralizations {
        /// Offending dimension.
        dimension: String,
        /// Value with several parents.
        value: String,
    },
    /// Following generalization edges from a value never reaches a root.
    #[error("value {value:?} of content dimension {dimension} is part of a generalization cycle")]
    GeneralizationCycle {
        /// Offending dimension.
        dimension: String,
        /// A value on the cycle.
        value: String,
    },
    /// A value's declared depth disagrees with its distance from its root.
    #[error(
        "value {value:?} of content dimension {dimension} declares depth {declared}, expected {expected}"
    )]
    InconsistentDepth {
        /// Offending dimension.
        dimension: String,
        /// Offending value.
        value: String,
        /// Depth carried by the value.
        declared: u32,
        /// Distance from the root along generalization edges.
        expected: u32,
    },
    /// The designated default value is not declared by the dimension.
    #[error("default value {value:?} of content dimension {dimension} is not declared")]
    UnknownDefaultValue {
        /// Offending dimension.
        dimension: String,
        /// Default value that was requested.
        value: String,
    },
    /// The designated default value is a specialization of another value.
    #[error("default value {value:?} of content dimension {dimension} is not a root value")]
    DefaultValueIsNotRoot {
        /// Offending dimension.
        dimension: String,
        /// Default value that was requested.
        value: String,
    },
    /// The configuration document does not have the expected shape.
    #[error("invalid configuration for content dimension {dimension}: {message}")]
    InvalidConfiguration {
        /// Dimension whose configuration failed to parse (empty for the document root).
        dimension: String,
        /// Parser message.
        message: String,
    },
}
