// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The inter-dimensional variation graph.
//!
//! Built eagerly and in full from one dimension configuration:
//!
//! 1. Every allowed point is weighted with the depths of its coordinates and
//!    the depths are normalized into a single integer using a shared base
//!    (`1 + deepest depth across all dimensions`), highest-priority dimension
//!    most significant.
//! 2. Every ordered pair of allowed points is checked for lineage in every
//!    dimension. When `A` specializes `G`, the pair is indexed under the
//!    variation weight `normalized(A) - normalized(G)`.
//!
//! Because each per-dimension depth difference is below the base, two
//! distinct generalizations of one point can never share a variation weight.
//! Construction still refuses to proceed if that ever fails to hold, rather
//! than silently dropping a generalization.
//!
//! The graph is immutable once built; a configuration change means building a
//! new graph (see [`SharedVariationGraph`](crate::SharedVariationGraph)).
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use content_dimension::{ContentDimension, ContentDimensionSource};
use tracing::{debug, info, instrument};

use crate::error::DimensionSpaceError;
use crate::point::{DimensionSpacePoint, DimensionSpacePointHash};
use crate::point_set::DimensionSpacePointSet;
use crate::variant_type::VariantType;
use crate::weighted_point::WeightedDimensionSpacePoint;
use crate::zookeeper::{ensure_unique_dimension_ids, CombinationConstraint, ContentDimensionZookeeper};

/// Specializations of one point, grouped by variation weight.
pub type WeightedSpecializations = BTreeMap<u64, DimensionSpacePointSet>;

/// Generalizations of one point keyed by variation weight; one per weight.
pub type WeightedGeneralizations = BTreeMap<u64, DimensionSpacePoint>;

/// Precomputed variation relations over the allowed dimension subspace.
#[derive(Debug, Clone)]
pub struct InterDimensionalVariationGraph {
    weight_normalization_base: u64,
    dimension_space_points: DimensionSpacePointSet,
    weighted_points: BTreeMap<DimensionSpacePointHash, WeightedDimensionSpacePoint>,
    indexed_specializations: BTreeMap<DimensionSpacePointHash, DimensionSpacePointSet>,
    weighted_specializations: BTreeMap<DimensionSpacePointHash, WeightedSpecializations>,
    indexed_generalizations: BTreeMap<DimensionSpacePointHash, DimensionSpacePointSet>,
    weighted_generalizations: BTreeMap<DimensionSpacePointHash, WeightedGeneralizations>,
}

impl InterDimensionalVariationGraph {
    /// Builds the graph over the subspace `zookeeper` computed for `source`.
    ///
    /// `zookeeper` must have been computed from the same dimensions.
    ///
    /// # Errors
    /// [`DimensionSpaceError::Configuration`] if two dimensions share an id,
    /// [`DimensionSpaceError::DimensionMismatch`] or
    /// [`DimensionSpaceError::UndeclaredValue`] if the subspace does not
    /// belong to `source`, [`DimensionSpaceError::WeightOverflow`] if
    /// normalized weights do not fit in 64 bits,
    /// [`DimensionSpaceError::AmbiguousGeneralizationWeight`] if two
    /// generalizations of a point share a weight.
    #[instrument(skip_all, fields(points = zookeeper.allowed_combinations().len()))]
    pub fn new<S>(source: &S, zookeeper: &ContentDimensionZookeeper) -> Result<Self, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        let dimensions = source.dimensions_ordered_by_priority();
        ensure_unique_dimension_ids(dimensions)?;
        ensure_subspace_of(dimensions, zookeeper)?;
        let base = determine_weight_normalization_base(dimensions);

        // Keep combination order so pair iteration is deterministic.
        let mut ordered = Vec::with_capacity(zookeeper.allowed_combinations().len());
        for combination in zookeeper.allowed_combinations() {
            let weighted = WeightedDimensionSpacePoint::new(combination.clone());
            let normalized = weighted
                .weight()
                .normalize(base)
                .ok_or(DimensionSpaceError::WeightOverflow {
                    base,
                    dimensions: dimensions.len(),
                })?;
            ordered.push((weighted, normalized));
        }

        let mut graph = Self {
            weight_normalization_base: base,
            dimension_space_points: DimensionSpacePointSet::new(),
            weighted_points: BTreeMap::new(),
            indexed_specializations: BTreeMap::new(),
            weighted_specializations: BTreeMap::new(),
            indexed_generalizations: BTreeMap::new(),
            weighted_generalizations: BTreeMap::new(),
        };
        for (weighted, _) in &ordered {
            let hash = weighted.identity_hash();
            graph.dimension_space_points.insert(weighted.dimension_space_point().clone());
            graph.weighted_points.insert(hash, weighted.clone());
            graph.indexed_specializations.insert(hash, DimensionSpacePointSet::new());
            graph.weighted_specializations.insert(hash, BTreeMap::new());
            graph.indexed_generalizations.insert(hash, DimensionSpacePointSet::new());
            graph.weighted_generalizations.insert(hash, BTreeMap::new());
        }

        let mut edges = 0usize;
        for (specialization, specialization_weight) in &ordered {
            for (generalization, generalization_weight) in &ordered {
                if specialization.identity_hash() == generalization.identity_hash()
                    || !specializes(dimensions, specialization, generalization)
                {
                    continue;
                }
                let weight = specialization_weight.saturating_sub(*generalization_weight);
                graph.index_variation(
                    specialization.dimension_space_point(),
                    generalization.dimension_space_point(),
                    weight,
                )?;
                edges += 1;
            }
        }

        info!(
            dimensions = dimensions.len(),
            points = graph.dimension_space_points.len(),
            variations = edges,
            base,
            "variation graph built"
        );
        Ok(graph)
    }

    /// Builds the graph with the value-level constraints of `source` only.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn from_source<S>(source: &S) -> Result<Self, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        Self::new(source, &ContentDimensionZookeeper::new(source)?)
    }

    /// Builds the graph with an additional combination constraint.
    ///
    /// # Errors
    /// See [`new`](Self::new).
    pub fn with_constraint<S>(source: &S, constraint: &dyn CombinationConstraint) -> Result<Self, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        Self::new(source, &ContentDimensionZookeeper::with_constraint(source, constraint)?)
    }

    fn index_variation(
        &mut self,
        specialization: &DimensionSpacePoint,
        generalization: &DimensionSpacePoint,
        weight: u64,
    ) -> Result<(), DimensionSpaceError> {
        let specialization_hash = specialization.hash();
        let generalization_hash = generalization.hash();

        let by_weight = self
            .weighted_generalizations
            .entry(specialization_hash)
            .or_default();
        match by_weight.entry(weight) {
            Entry::Occupied(existing) => {
                return Err(DimensionSpaceError::AmbiguousGeneralizationWeight {
                    specialization: specialization.to_json(),
                    weight,
                    first: existing.get().to_json(),
                    second: generalization.to_json(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(generalization.clone());
            }
        }
        self.indexed_generalizations
            .entry(specialization_hash)
            .or_default()
            .insert(generalization.clone());
        self.indexed_specializations
            .entry(generalization_hash)
            .or_default()
            .insert(specialization.clone());
        self.weighted_specializations
            .entry(generalization_hash)
            .or_default()
            .entry(weight)
            .or_default()
            .insert(specialization.clone());

        debug!(%specialization, %generalization, weight, "variation indexed");
        Ok(())
    }

    fn lookup<'a, V>(
        &self,
        index: &'a BTreeMap<DimensionSpacePointHash, V>,
        point: &DimensionSpacePoint,
    ) -> Result<&'a V, DimensionSpaceError> {
        index
            .get(&point.hash())
            .filter(|_| self.dimension_space_points.contains(point))
            .ok_or_else(|| DimensionSpaceError::DimensionSpacePointNotFound {
                point: point.to_json(),
            })
    }

    /// Base used to normalize weights; `0` when no dimension is configured.
    pub fn weight_normalization_base(&self) -> u64 {
        self.weight_normalization_base
    }

    /// The allowed dimension subspace this graph covers.
    pub fn dimension_space_points(&self) -> &DimensionSpacePointSet {
        &self.dimension_space_points
    }

    /// Every weighted point, by hash.
    pub fn weighted_dimension_space_points(
        &self,
    ) -> &BTreeMap<DimensionSpacePointHash, WeightedDimensionSpacePoint> {
        &self.weighted_points
    }

    /// Weighted point with `hash`, if it is allowed.
    pub fn weighted_dimension_space_point_by_hash(
        &self,
        hash: &DimensionSpacePointHash,
    ) -> Option<&WeightedDimensionSpacePoint> {
        self.weighted_points.get(hash)
    }

    /// Weighted point for `point`; `None` if `point` is not allowed.
    pub fn weighted_dimension_space_point_by_dimension_space_point(
        &self,
        point: &DimensionSpacePoint,
    ) -> Option<&WeightedDimensionSpacePoint> {
        self.weighted_points
            .get(&point.hash())
            .filter(|weighted| weighted.dimension_space_point() == point)
    }

    /// All specializations of `generalization`, transitively.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if the point is
    /// not allowed.
    pub fn indexed_specializations(
        &self,
        generalization: &DimensionSpacePoint,
    ) -> Result<&DimensionSpacePointSet, DimensionSpaceError> {
        self.lookup(&self.indexed_specializations, generalization)
    }

    /// Specializations of `generalization`, grouped by variation weight.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if the point is
    /// not allowed.
    pub fn weighted_specializations(
        &self,
        generalization: &DimensionSpacePoint,
    ) -> Result<&WeightedSpecializations, DimensionSpaceError> {
        self.lookup(&self.weighted_specializations, generalization)
    }

    /// All generalizations of `specialization`, transitively.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if the point is
    /// not allowed.
    pub fn indexed_generalizations(
        &self,
        specialization: &DimensionSpacePoint,
    ) -> Result<&DimensionSpacePointSet, DimensionSpaceError> {
        self.lookup(&self.indexed_generalizations, specialization)
    }

    /// Generalizations of `specialization` keyed by variation weight.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if the point is
    /// not allowed.
    pub fn weighted_generalizations(
        &self,
        specialization: &DimensionSpacePoint,
    ) -> Result<&WeightedGeneralizations, DimensionSpaceError> {
        self.lookup(&self.weighted_generalizations, specialization)
    }

    /// The nearest generalization of `specialization`, i.e. the one with the
    /// lowest variation weight; `None` for points with no generalization.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if the point is
    /// not allowed.
    pub fn primary_generalization(
        &self,
        specialization: &DimensionSpacePoint,
    ) -> Result<Option<&DimensionSpacePoint>, DimensionSpaceError> {
        Ok(self
            .weighted_generalizations(specialization)?
            .values()
            .next())
    }

    /// Points without any generalization.
    pub fn root_generalizations(&self) -> DimensionSpacePointSet {
        self.dimension_space_points
            .iter()
            .filter(|point| {
                self.indexed_generalizations
                    .get(&point.hash())
                    .is_none_or(DimensionSpacePointSet::is_empty)
            })
            .cloned()
            .collect()
    }

    /// The full specialization subtree under `origin`, optionally including
    /// `origin` itself.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if `origin` is not
    /// allowed.
    pub fn specialization_set(
        &self,
        origin: &DimensionSpacePoint,
        include_origin: bool,
    ) -> Result<DimensionSpacePointSet, DimensionSpaceError> {
        self.specialization_set_excluding(origin, include_origin, &DimensionSpacePointSet::new())
    }

    /// Like [`specialization_set`](Self::specialization_set), leaving out the
    /// specializations in `excluded`. The origin is never excluded.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if `origin` is not
    /// allowed.
    pub fn specialization_set_excluding(
        &self,
        origin: &DimensionSpacePoint,
        include_origin: bool,
        excluded: &DimensionSpacePointSet,
    ) -> Result<DimensionSpacePointSet, DimensionSpaceError> {
        let mut set: DimensionSpacePointSet = self
            .indexed_specializations(origin)?
            .iter()
            .filter(|specialization| !excluded.contains(specialization))
            .cloned()
            .collect();
        if include_origin {
            set.insert(origin.clone());
        }
        Ok(set)
    }

    /// Relation of `subject` to `object`.
    ///
    /// # Errors
    /// [`DimensionSpaceError::DimensionSpacePointNotFound`] if either point is
    /// not allowed.
    pub fn variant_type(
        &self,
        subject: &DimensionSpacePoint,
        object: &DimensionSpacePoint,
    ) -> Result<VariantType, DimensionSpaceError> {
        self.lookup(&self.weighted_points, subject)?;
        let generalizations = self.indexed_generalizations(object)?;
        let specializations = self.indexed_specializations(object)?;
        let variant = if subject == object {
            VariantType::Same
        } else if generalizations.contains(subject) {
            VariantType::Generalization
        } else if specializations.contains(subject) {
            VariantType::Specialization
        } else {
            VariantType::Peer
        };
        Ok(variant)
    }
}

fn determine_weight_normalization_base(dimensions: &[ContentDimension]) -> u64 {
    dimensions
        .iter()
        .map(|dimension| u64::from(dimension.maximum_depth().value()) + 1)
        .max()
        .unwrap_or(0)
}

/// The subspace must span exactly the configured dimensions, and every value
/// it assigns must be the one the configuration declares.
fn ensure_subspace_of(
    dimensions: &[ContentDimension],
    zookeeper: &ContentDimensionZookeeper,
) -> Result<(), DimensionSpaceError> {
    let declared = dimensions.iter().map(ContentDimension::id);
    if !declared.eq(zookeeper.dimension_ids()) {
        return Err(DimensionSpaceError::DimensionMismatch {
            expected: dimensions.iter().map(|d| d.id().as_str().to_owned()).collect(),
            found: zookeeper
                .dimension_ids()
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
        });
    }
    for combination in zookeeper.allowed_combinations() {
        for (dimension, (_, value)) in dimensions.iter().zip(combination) {
            if dimension.value(&value.value) != Some(value) {
                return Err(DimensionSpaceError::UndeclaredValue {
                    dimension: dimension.id().as_str().to_owned(),
                    value: value.value.clone(),
                });
            }
        }
    }
    Ok(())
}

/// `true` if, in every dimension, the generalization's value is equal to or
/// an ancestor of the specialization's value.
fn specializes(
    dimensions: &[ContentDimension],
    specialization: &WeightedDimensionSpacePoint,
    generalization: &WeightedDimensionSpacePoint,
) -> bool {
    dimensions.iter().all(|dimension| {
        match (
            specialization.dimension_value(dimension.id()),
            generalization.dimension_value(dimension.id()),
        ) {
            (Some(special), Some(general)) => {
                dimension.is_generalization_of_or_equal(&general.value, &special.value)
            }
            _ => false,
        }
    })
}
