// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! content-dimension: validated content dimensions and their value hierarchies.
//!
//! A content dimension (e.g. `language`) is a named axis of content variation.
//! Its values form a forest: every value has at most one direct
//! generalization, and following generalizations always ends at a root value
//! of depth 0. Dimensions are validated once at construction and immutable
//! afterwards; a malformed hierarchy is rejected, never repaired.
//!
//! Values may additionally carry constraints restricting which values of
//! *other* dimensions they may be combined with. The combination logic itself
//! lives in the `dimension-space` crate.
#![forbid(unsafe_code)]

mod config;
mod constraints;
mod dimension;
mod error;
mod ident;
mod source;
mod value;

/// Configuration documents and the configuration-based dimension source.
pub use config::{
    ConfigurationBasedContentDimensionSource, ContentDimensionsConfiguration,
    DimensionConfiguration, ValueConfiguration,
};
/// Cross-dimension combination constraints.
pub use constraints::{ContentDimensionConstraintSet, ContentDimensionConstraints, WILDCARD};
/// Dimension aggregate, its builder and variation edges.
pub use dimension::{
    ContentDimension, ContentDimensionBuilder, ContentDimensionValueVariationEdge,
};
/// Configuration errors.
pub use error::ContentDimensionError;
/// Dimension identifiers.
pub use ident::ContentDimensionId;
/// Dimension sources (ordered collections of dimensions).
pub use source::ContentDimensionSource;
/// Dimension values and their specialization depth.
pub use value::{
    lookup_configuration_path, ContentDimensionValue, ContentDimensionValueSpecializationDepth,
};
