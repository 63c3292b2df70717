// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dimension values and specialization depth.
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constraints::{ContentDimensionConstraintSet, ContentDimensionConstraints};
use crate::ident::ContentDimensionId;

/// Distance of a value from its root along generalization edges.
///
/// Root values have depth 0; each specialization step adds 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDimensionValueSpecializationDepth(pub u32);

impl ContentDimensionValueSpecializationDepth {
    /// Depth of root values.
    pub const ROOT: Self = Self(0);

    /// Returns the raw depth.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Depth one step further from the root.
    #[must_use]
    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ContentDimensionValueSpecializationDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single value of a content dimension.
///
/// The configuration payload is opaque to everything in this workspace; it is
/// carried through for collaborators (routing, labels, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDimensionValue {
    /// Raw value (e.g. `de_CH`).
    pub value: String,
    /// Distance from the dimension root.
    pub specialization_depth: ContentDimensionValueSpecializationDepth,
    /// Restrictions on values of other dimensions.
    #[serde(default)]
    pub constraints: ContentDimensionConstraintSet,
    /// Opaque configuration payload.
    #[serde(default)]
    pub configuration: Map<String, Value>,
}

impl ContentDimensionValue {
    /// Creates an unconstrained value without payload.
    pub fn new(value: impl Into<String>, depth: ContentDimensionValueSpecializationDepth) -> Self {
        Self {
            value: value.into(),
            specialization_depth: depth,
            constraints: ContentDimensionConstraintSet::empty(),
            configuration: Map::new(),
        }
    }

    /// Replaces the constraint set.
    pub fn with_constraints(mut self, constraints: ContentDimensionConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    /// Replaces the configuration payload.
    pub fn with_configuration(mut self, configuration: Map<String, Value>) -> Self {
        self.configuration = configuration;
        self
    }

    /// Returns the constraint table this value holds for `dimension`.
    pub fn constraints(&self, dimension: &ContentDimensionId) -> Option<&ContentDimensionConstraints> {
        self.constraints.constraints(dimension)
    }

    /// Returns whether this value may be combined with `other` of `dimension`.
    pub fn can_be_combined_with(&self, dimension: &ContentDimensionId, other: &Self) -> bool {
        self.constraints.allows(dimension, &other.value)
    }

    /// Looks up a payload entry by dotted path (e.g. `label.short`).
    pub fn configuration_value(&self, path: &str) -> Option<&Value> {
        lookup_configuration_path(&self.configuration, path)
    }
}

/// Resolves a dotted path inside a configuration payload.
///
/// Empty path segments never match.
pub fn lookup_configuration_path<'a>(configuration: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = segments.next().filter(|s| !s.is_empty())?;
    let mut current = configuration.get(first)?;
    for segment in segments {
        if segment.is_empty() {
            return None;
        }
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
