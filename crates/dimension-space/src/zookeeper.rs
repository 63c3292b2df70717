// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Allowed-combination finder.
//!
//! Walks the Cartesian product of dimension values depth-first in priority
//! order and prunes a branch as soon as its partial assignment violates a
//! constraint, so dense constraints never materialize the full product.
use std::collections::BTreeSet;

use content_dimension::{
    ContentDimension, ContentDimensionError, ContentDimensionId, ContentDimensionSource,
    ContentDimensionValue,
};
use tracing::debug;

use crate::error::DimensionSpaceError;
use crate::point_set::DimensionSpacePointSet;
use crate::weighted_point::{DimensionValueCombination, WeightedDimensionSpacePoint};

/// Values chosen so far, in priority order; the last entry is the newest.
pub type PartialCombination<'a> = [(&'a ContentDimension, &'a ContentDimensionValue)];

/// Collaborator-supplied restriction on value combinations.
///
/// Checked on every partial assignment, after the value-level constraints of
/// the dimension configuration. Returning `false` prunes every completion of
/// the partial assignment.
pub trait CombinationConstraint {
    /// Returns whether the partial assignment may be extended.
    fn admits(&self, partial: &PartialCombination<'_>) -> bool;
}

impl<F> CombinationConstraint for F
where
    F: Fn(&PartialCombination<'_>) -> bool,
{
    fn admits(&self, partial: &PartialCombination<'_>) -> bool {
        self(partial)
    }
}

/// The constraint that admits everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconstrained;

impl CombinationConstraint for Unconstrained {
    fn admits(&self, _partial: &PartialCombination<'_>) -> bool {
        true
    }
}

/// Computes and holds the allowed dimension subspace of a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDimensionZookeeper {
    dimension_ids: Vec<ContentDimensionId>,
    allowed_combinations: Vec<DimensionValueCombination>,
    allowed_subspace: DimensionSpacePointSet,
}

impl ContentDimensionZookeeper {
    /// Computes the subspace allowed by the value-level constraints alone.
    ///
    /// # Errors
    /// [`DimensionSpaceError::Configuration`] if two dimensions of `source`
    /// share an id.
    pub fn new<S>(source: &S) -> Result<Self, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        Self::with_constraint(source, &Unconstrained)
    }

    /// Computes the subspace allowed by the value-level constraints and
    /// `constraint`.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn with_constraint<S>(
        source: &S,
        constraint: &dyn CombinationConstraint,
    ) -> Result<Self, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        let dimensions = source.dimensions_ordered_by_priority();
        ensure_unique_dimension_ids(dimensions)?;
        let mut allowed_combinations = Vec::new();
        let mut partial = Vec::with_capacity(dimensions.len());
        extend(dimensions, &mut partial, constraint, &mut allowed_combinations);

        let allowed_subspace = allowed_combinations
            .iter()
            .map(|combination| {
                WeightedDimensionSpacePoint::new(combination.clone())
                    .dimension_space_point()
                    .clone()
            })
            .collect();

        debug!(
            dimensions = dimensions.len(),
            combinations = allowed_combinations.len(),
            "allowed dimension subspace computed"
        );

        Ok(Self {
            dimension_ids: dimensions.iter().map(|d| d.id().clone()).collect(),
            allowed_combinations,
            allowed_subspace,
        })
    }

    /// Ids of the dimensions the subspace was computed over, in priority order.
    pub fn dimension_ids(&self) -> &[ContentDimensionId] {
        &self.dimension_ids
    }

    /// Every allowed combination, in lexicographic priority order.
    pub fn allowed_combinations(&self) -> &[DimensionValueCombination] {
        &self.allowed_combinations
    }

    /// The allowed points.
    pub fn allowed_dimension_subspace(&self) -> &DimensionSpacePointSet {
        &self.allowed_subspace
    }
}

/// Rejects sources that declare one dimension id twice.
pub(crate) fn ensure_unique_dimension_ids(
    dimensions: &[ContentDimension],
) -> Result<(), DimensionSpaceError> {
    let mut seen = BTreeSet::new();
    for dimension in dimensions {
        if !seen.insert(dimension.id()) {
            return Err(ContentDimensionError::DuplicateDimension {
                dimension: dimension.id().as_str().to_owned(),
            }
            .into());
        }
    }
    Ok(())
}

fn extend<'a>(
    remaining: &'a [ContentDimension],
    partial: &mut Vec<(&'a ContentDimension, &'a ContentDimensionValue)>,
    constraint: &dyn CombinationConstraint,
    out: &mut Vec<DimensionValueCombination>,
) {
    let Some((dimension, rest)) = remaining.split_first() else {
        out.push(
            partial
                .iter()
                .map(|(dimension, value)| (dimension.id().clone(), (*value).clone()))
                .collect(),
        );
        return;
    };

    for value in dimension.values() {
        let compatible = partial.iter().all(|(chosen_dimension, chosen)| {
            chosen.can_be_combined_with(dimension.id(), value)
                && value.can_be_combined_with(chosen_dimension.id(), chosen)
        });
        if !compatible {
            continue;
        }
        partial.push((dimension, value));
        if constraint.admits(partial) {
            extend(rest, partial, constraint, out);
        }
        partial.pop();
    }
}
