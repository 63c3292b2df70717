// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use content_dimension::{ContentDimensionId, ContentDimensionValue};

use crate::point::{DimensionSpacePoint, DimensionSpacePointHash};
use crate::weight::DimensionSpacePointWeight;

/// One allowed combination: a value per dimension, in priority order.
pub type DimensionValueCombination = Vec<(ContentDimensionId, ContentDimensionValue)>;

/// A dimension space point annotated with the depth of each coordinate.
///
/// The weight is derived from the values it was built from and never
/// changes independently of them.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedDimensionSpacePoint {
    dimension_values: DimensionValueCombination,
    point: DimensionSpacePoint,
    weight: DimensionSpacePointWeight,
}

impl WeightedDimensionSpacePoint {
    /// Derives point and weight from a combination of dimension values.
    pub fn new(dimension_values: DimensionValueCombination) -> Self {
        let point = DimensionSpacePoint::new(
            dimension_values
                .iter()
                .map(|(id, value)| (id.clone(), value.value.clone()))
                .collect(),
        );
        let weight = DimensionSpacePointWeight::new(
            dimension_values
                .iter()
                .map(|(id, value)| (id.clone(), value.specialization_depth))
                .collect(),
        );
        Self {
            dimension_values,
            point,
            weight,
        }
    }

    /// Identity hash; equal to the hash of the unweighted point.
    pub fn identity_hash(&self) -> DimensionSpacePointHash {
        self.point.hash()
    }

    /// The unweighted point.
    pub fn dimension_space_point(&self) -> &DimensionSpacePoint {
        &self.point
    }

    /// Per-dimension depths.
    pub fn weight(&self) -> &DimensionSpacePointWeight {
        &self.weight
    }

    /// The values this point was built from, in priority order.
    pub fn dimension_values(&self) -> &[(ContentDimensionId, ContentDimensionValue)] {
        &self.dimension_values
    }

    /// The value chosen for `dimension`.
    pub fn dimension_value(&self, dimension: &ContentDimensionId) -> Option<&ContentDimensionValue> {
        self.dimension_values
            .iter()
            .find(|(id, _)| id == dimension)
            .map(|(_, value)| value)
    }
}
