// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Hash-deduplicated sets of dimension space points.
use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DimensionSpaceError;
use crate::point::{DimensionSpacePoint, DimensionSpacePointHash};

/// A set of dimension space points, deduplicated by hash.
///
/// Iteration is in ascending hash order, which is deterministic but carries
/// no meaning.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DimensionSpacePointSet {
    points: BTreeMap<DimensionSpacePointHash, DimensionSpacePoint>,
}

impl DimensionSpacePointSet {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, point: DimensionSpacePoint) {
        self.points.insert(point.hash(), point);
    }

    /// Returns `true` if `point` is a member.
    pub fn contains(&self, point: &DimensionSpacePoint) -> bool {
        self.points.get(&point.hash()).is_some_and(|member| member == point)
    }

    /// Returns the member with `hash`, if any.
    pub fn get(&self, hash: &DimensionSpacePointHash) -> Option<&DimensionSpacePoint> {
        self.points.get(hash)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the set has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the points.
    pub fn iter(&self) -> impl Iterator<Item = &DimensionSpacePoint> {
        self.points.values()
    }

    /// Iterates over the member hashes.
    pub fn hashes(&self) -> impl Iterator<Item = &DimensionSpacePointHash> {
        self.points.keys()
    }

    /// Points in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut points = self.points.clone();
        points.extend(other.points.iter().map(|(hash, point)| (*hash, point.clone())));
        Self { points }
    }

    /// Points in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter().filter(|point| other.contains(point)).cloned().collect()
    }

    /// Points of this set that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.iter().filter(|point| !other.contains(point)).cloned().collect()
    }

    /// Returns `true` if every point of this set is in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.iter().all(|point| other.contains(point))
    }

    /// Encodes as a JSON array of point objects.
    #[must_use]
    pub fn to_json(&self) -> String {
        let points: Vec<String> = self.iter().map(DimensionSpacePoint::to_json).collect();
        format!("[{}]", points.join(","))
    }

    /// Decodes a JSON array of point objects.
    pub fn from_json(encoded: &str) -> Result<Self, DimensionSpaceError> {
        serde_json::from_str(encoded).map_err(|err| DimensionSpaceError::InvalidEncoding(err.to_string()))
    }
}

impl std::fmt::Debug for DimensionSpacePointSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<DimensionSpacePoint> for DimensionSpacePointSet {
    fn from_iter<I: IntoIterator<Item = DimensionSpacePoint>>(iter: I) -> Self {
        let mut set = Self::new();
        for point in iter {
            set.insert(point);
        }
        set
    }
}

impl Extend<DimensionSpacePoint> for DimensionSpacePointSet {
    fn extend<I: IntoIterator<Item = DimensionSpacePoint>>(&mut self, iter: I) {
        for point in iter {
            self.insert(point);
        }
    }
}

impl IntoIterator for DimensionSpacePointSet {
    type Item = DimensionSpacePoint;
    type IntoIter = btree_map::IntoValues<DimensionSpacePointHash, DimensionSpacePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_values()
    }
}

impl<'a> IntoIterator for &'a DimensionSpacePointSet {
    type Item = &'a DimensionSpacePoint;
    type IntoIter = btree_map::Values<'a, DimensionSpacePointHash, DimensionSpacePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.values()
    }
}

impl Serialize for DimensionSpacePointSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for DimensionSpacePointSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<DimensionSpacePoint>::deserialize(deserializer).map(|points| points.into_iter().collect())
    }
}
