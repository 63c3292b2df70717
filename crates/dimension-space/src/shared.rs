// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Swappable handle to the current variation graph.
use std::sync::{Arc, PoisonError, RwLock};

use content_dimension::ContentDimensionSource;
use tracing::{info, warn};

use crate::error::DimensionSpaceError;
use crate::variation_graph::InterDimensionalVariationGraph;
use crate::zookeeper::CombinationConstraint;

/// Readers take a snapshot with [`load`](Self::load) and keep using it for as
/// long as they like; reconfiguration builds a complete graph off to the side
/// and replaces the snapshot only once that build succeeded.
#[derive(Debug)]
pub struct SharedVariationGraph {
    current: RwLock<Arc<InterDimensionalVariationGraph>>,
}

impl SharedVariationGraph {
    /// Wraps an already built graph.
    pub fn new(graph: InterDimensionalVariationGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    /// Builds the initial graph from `source`.
    pub fn from_source<S>(source: &S) -> Result<Self, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        InterDimensionalVariationGraph::from_source(source).map(Self::new)
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<InterDimensionalVariationGraph> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Rebuilds from `source` and swaps the new graph in.
    ///
    /// On error the previous graph stays current.
    pub fn reconfigure<S>(&self, source: &S) -> Result<Arc<InterDimensionalVariationGraph>, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        self.swap(InterDimensionalVariationGraph::from_source(source))
    }

    /// Like [`reconfigure`](Self::reconfigure) with an additional combination
    /// constraint.
    pub fn reconfigure_with<S>(
        &self,
        source: &S,
        constraint: &dyn CombinationConstraint,
    ) -> Result<Arc<InterDimensionalVariationGraph>, DimensionSpaceError>
    where
        S: ContentDimensionSource + ?Sized,
    {
        self.swap(InterDimensionalVariationGraph::with_constraint(source, constraint))
    }

    fn swap(
        &self,
        built: Result<InterDimensionalVariationGraph, DimensionSpaceError>,
    ) -> Result<Arc<InterDimensionalVariationGraph>, DimensionSpaceError> {
        let graph = match built {
            Ok(graph) => Arc::new(graph),
            Err(err) => {
                warn!(error = %err, "variation graph rebuild failed; keeping current graph");
                return Err(err);
            }
        };
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&graph);
        info!(points = graph.dimension_space_points().len(), "variation graph swapped");
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_dimension::ContentDimension;

    #[test]
    fn snapshots_survive_a_swap() {
        let one = vec![ContentDimension::builder("language")
            .value("de")
            .build()
            .unwrap_or_else(|err| unreachable!("{err}"))];
        let two = vec![ContentDimension::builder("language")
            .value("de")
            .value("fr")
            .build()
            .unwrap_or_else(|err| unreachable!("{err}"))];
        let shared = SharedVariationGraph::from_source(&one).unwrap_or_else(|err| unreachable!("{err}"));
        let before = shared.load();
        let swapped = shared.reconfigure(&two).map(|graph| graph.dimension_space_points().len());
        assert_eq!(swapped, Ok(2));
        assert_eq!(before.dimension_space_points().len(), 1);
        assert_eq!(shared.load().dimension_space_points().len(), 2);
    }
}
