// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! dimension-space: the space spanned by content dimensions.
//!
//! A [`DimensionSpacePoint`] assigns one value to every configured dimension
//! and is identified by a stable, order-independent content hash. The
//! [`ContentDimensionZookeeper`] computes which points are allowed under the
//! configured constraints, and the [`InterDimensionalVariationGraph`]
//! precomputes, for every allowed point, which other points specialize or
//! generalize it and how far apart they are.
//!
//! ```
//! use content_dimension::ContentDimension;
//! use dimension_space::{DimensionSpacePoint, InterDimensionalVariationGraph, VariantType};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let language = ContentDimension::builder("language")
//!     .value("mul")
//!     .specialization("de", "mul")
//!     .specialization("de_CH", "de")
//!     .build()?;
//! let graph = InterDimensionalVariationGraph::from_source(&vec![language])?;
//!
//! let de_ch = DimensionSpacePoint::from_coordinates([("language", "de_CH")])?;
//! let de = DimensionSpacePoint::from_coordinates([("language", "de")])?;
//! assert_eq!(graph.primary_generalization(&de_ch)?, Some(&de));
//! assert_eq!(graph.variant_type(&de, &de_ch)?, VariantType::Generalization);
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod error;
mod point;
mod point_set;
mod shared;
mod variant_type;
mod variation_graph;
mod weight;
mod weighted_point;
mod zookeeper;

pub use error::DimensionSpaceError;
pub use point::{DimensionSpacePoint, DimensionSpacePointHash};
pub use point_set::DimensionSpacePointSet;
pub use shared::SharedVariationGraph;
pub use variant_type::VariantType;
pub use variation_graph::{
    InterDimensionalVariationGraph, WeightedGeneralizations, WeightedSpecializations,
};
pub use weight::DimensionSpacePointWeight;
pub use weighted_point::{DimensionValueCombination, WeightedDimensionSpacePoint};
pub use zookeeper::{
    CombinationConstraint, ContentDimensionZookeeper, PartialCombination, Unconstrained,
};
