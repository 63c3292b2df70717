// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-dimension specialization depths and their normalized form.
use content_dimension::{ContentDimensionId, ContentDimensionValueSpecializationDepth};

/// Specialization depth of each coordinate of a point, in dimension priority
/// order. Used for ranking only, never for identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DimensionSpacePointWeight {
    depths: Vec<(ContentDimensionId, ContentDimensionValueSpecializationDepth)>,
}

impl DimensionSpacePointWeight {
    /// Creates a weight from depths listed highest priority first.
    pub fn new(depths: Vec<(ContentDimensionId, ContentDimensionValueSpecializationDepth)>) -> Self {
        Self { depths }
    }

    /// Depth of the coordinate in `dimension`.
    pub fn depth(&self, dimension: &ContentDimensionId) -> Option<ContentDimensionValueSpecializationDepth> {
        self.depths
            .iter()
            .find(|(id, _)| id == dimension)
            .map(|(_, depth)| *depth)
    }

    /// Iterates over `(dimension, depth)` in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContentDimensionId, ContentDimensionValueSpecializationDepth)> {
        self.depths.iter().map(|(id, depth)| (id, *depth))
    }

    /// Combines the depths into one integer, reading them as digits of a
    /// base-`base` number with the highest-priority dimension most significant.
    ///
    /// With `base` greater than every depth, the difference between a
    /// specialization and any of its generalizations identifies that
    /// generalization uniquely. Returns `None` on overflow.
    pub fn normalize(&self, base: u64) -> Option<u64> {
        self.depths.iter().try_fold(0u64, |acc, (_, depth)| {
            acc.checked_mul(base)?.checked_add(u64::from(depth.value()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(depths: &[(&str, u32)]) -> DimensionSpacePointWeight {
        DimensionSpacePointWeight::new(
            depths
                .iter()
                .map(|(id, depth)| {
                    (
                        ContentDimensionId::new(*id).unwrap_or_else(|err| unreachable!("{err}")),
                        ContentDimensionValueSpecializationDepth(*depth),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn normalization_is_positional() {
        let w = weight(&[("dimensionA", 1), ("dimensionB", 2)]);
        assert_eq!(w.normalize(3), Some(5));
        assert_eq!(weight(&[("a", 2), ("b", 0), ("c", 1)]).normalize(4), Some(33));
        assert_eq!(weight(&[]).normalize(0), Some(0));
    }

    #[test]
    fn overflow_is_reported() {
        let depths: Vec<(String, u32)> = (0..80).map(|i| (format!("d{i}"), 1)).collect();
        let refs: Vec<(&str, u32)> = depths.iter().map(|(id, d)| (id.as_str(), *d)).collect();
        assert_eq!(weight(&refs).normalize(2), None);
    }

    #[test]
    fn depth_lookup() {
        let w = weight(&[("language", 2), ("market", 1)]);
        let language = ContentDimensionId::new("language").ok();
        assert_eq!(
            language.and_then(|id| w.depth(&id)),
            Some(ContentDimensionValueSpecializationDepth(2))
        );
        assert_eq!(w.iter().count(), 2);
    }
}
