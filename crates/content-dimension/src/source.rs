// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::dimension::ContentDimension;
use crate::ident::ContentDimensionId;

/// Port through which collaborators supply the configured dimensions.
///
/// The priority order decides iteration order of generated combinations and
/// the positional significance of each dimension in variation weights.
pub trait ContentDimensionSource {
    /// Returns the dimension with `id`, if configured.
    fn dimension(&self, id: &ContentDimensionId) -> Option<&ContentDimension> {
        self.dimensions_ordered_by_priority()
            .iter()
            .find(|dimension| dimension.id() == id)
    }

    /// All configured dimensions, highest priority first.
    fn dimensions_ordered_by_priority(&self) -> &[ContentDimension];
}

impl ContentDimensionSource for [ContentDimension] {
    fn dimensions_ordered_by_priority(&self) -> &[ContentDimension] {
        self
    }
}

impl ContentDimensionSource for Vec<ContentDimension> {
    fn dimensions_ordered_by_priority(&self) -> &[ContentDimension] {
        self
    }
}
