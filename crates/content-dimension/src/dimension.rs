// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The content dimension aggregate.
//!
//! Values live in an arena indexed by declaration order. Each slot carries its
//! parent's index (the direct generalization), so ancestor walks never touch
//! shared object references and depth lookups are constant time.
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ContentDimensionError;
use crate::ident::ContentDimensionId;
use crate::value::{
    lookup_configuration_path, ContentDimensionValue, ContentDimensionValueSpecializationDepth,
};

/// Directed edge from a value to its direct generalization, by raw value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentDimensionValueVariationEdge {
    /// The more specific value.
    pub specialization: String,
    /// Its direct generalization.
    pub generalization: String,
}

impl ContentDimensionValueVariationEdge {
    /// Creates an edge `specialization -> generalization`.
    pub fn new(specialization: impl Into<String>, generalization: impl Into<String>) -> Self {
        Self {
            specialization: specialization.into(),
            generalization: generalization.into(),
        }
    }
}

/// A validated, immutable content dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDimension {
    id: ContentDimensionId,
    /// Values in declaration order; positions are the arena indices.
    values: Vec<ContentDimensionValue>,
    /// Raw value -> arena index.
    index: BTreeMap<String, usize>,
    /// Direct generalization per arena index (`None` for roots).
    parents: Vec<Option<usize>>,
    /// Direct specializations per arena index, ascending.
    children: Vec<Vec<usize>>,
    default_value: usize,
    maximum_depth: ContentDimensionValueSpecializationDepth,
    configuration: Map<String, Value>,
}

impl ContentDimension {
    /// Validates values and edges and builds the dimension.
    ///
    /// The edges must form a forest: every value has at most one direct
    /// generalization, every chain ends at a root, and every declared depth
    /// equals the distance to that root. The first root in declaration order
    /// becomes the default value.
    pub fn new(
        id: ContentDimensionId,
        values: Vec<ContentDimensionValue>,
        edges: Vec<ContentDimensionValueVariationEdge>,
    ) -> Result<Self, ContentDimensionError> {
        let dimension = || id.as_str().to_owned();
        if values.is_empty() {
            return Err(ContentDimensionError::NoValues {
                dimension: dimension(),
            });
        }

        let mut index = BTreeMap::new();
        for (position, value) in values.iter().enumerate() {
            if index.insert(value.value.clone(), position).is_some() {
                return Err(ContentDimensionError::DuplicateValue {
                    dimension: dimension(),
                    value: value.value.clone(),
                });
            }
        }

        let lookup = |raw: &str| {
            index
                .get(raw)
                .copied()
                .ok_or_else(|| ContentDimensionError::UnknownValue {
                    dimension: dimension(),
                    value: raw.to_owned(),
                })
        };
        let mut parents: Vec<Option<usize>> = vec![None; values.len()];
        for edge in &edges {
            let specialization = lookup(&edge.specialization)?;
            let generalization = lookup(&edge.generalization)?;
            if parents[specialization].is_some() {
                return Err(ContentDimensionError::MultipleGeneralizations {
                    dimension: dimension(),
                    value: edge.specialization.clone(),
                });
            }
            parents[specialization] = Some(generalization);
        }

        let mut maximum_depth = ContentDimensionValueSpecializationDepth::ROOT;
        for (position, value) in values.iter().enumerate() {
            let expected = distance_to_root(&parents, position).ok_or_else(|| {
                ContentDimensionError::GeneralizationCycle {
                    dimension: dimension(),
                    value: value.value.clone(),
                }
            })?;
            if value.specialization_depth.value() != expected {
                return Err(ContentDimensionError::InconsistentDepth {
                    dimension: dimension(),
                    value: value.value.clone(),
                    declared: value.specialization_depth.value(),
                    expected,
                });
            }
            maximum_depth = maximum_depth.max(value.specialization_depth);
        }

        let mut children = vec![Vec::new(); values.len()];
        for (position, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                children[*parent].push(position);
            }
        }

        // Acyclic and non-empty, so at least one root exists.
        let default_value = parents.iter().position(Option::is_none).unwrap_or_default();

        debug!(
            dimension = %id,
            values = values.len(),
            maximum_depth = maximum_depth.value(),
            "content dimension constructed"
        );

        Ok(Self {
            id,
            values,
            index,
            parents,
            children,
            default_value,
            maximum_depth,
            configuration: Map::new(),
        })
    }

    /// Starts a builder that derives depths and edges from parent links.
    pub fn builder(id: impl Into<String>) -> ContentDimensionBuilder {
        ContentDimensionBuilder::new(id)
    }

    /// Designates `raw_value` as the default value; it must be a root.
    pub fn with_default_value(mut self, raw_value: &str) -> Result<Self, ContentDimensionError> {
        let Some(&position) = self.index.get(raw_value) else {
            return Err(ContentDimensionError::UnknownDefaultValue {
                dimension: self.id.as_str().to_owned(),
                value: raw_value.to_owned(),
            });
        };
        if self.parents[position].is_some() {
            return Err(ContentDimensionError::DefaultValueIsNotRoot {
                dimension: self.id.as_str().to_owned(),
                value: raw_value.to_owned(),
            });
        }
        self.default_value = position;
        Ok(self)
    }

    /// Attaches the opaque dimension-level configuration payload.
    pub fn with_configuration(mut self, configuration: Map<String, Value>) -> Self {
        self.configuration = configuration;
        self
    }

    /// Dimension identifier.
    pub fn id(&self) -> &ContentDimensionId {
        &self.id
    }

    /// Looks up a value by its raw string.
    pub fn value(&self, raw_value: &str) -> Option<&ContentDimensionValue> {
        self.index.get(raw_value).map(|&position| &self.values[position])
    }

    /// The designated default (root) value.
    pub fn root_value(&self) -> &ContentDimensionValue {
        &self.values[self.default_value]
    }

    /// All values of depth 0, in declaration order.
    pub fn root_values(&self) -> impl Iterator<Item = &ContentDimensionValue> {
        self.values
            .iter()
            .zip(&self.parents)
            .filter(|(_, parent)| parent.is_none())
            .map(|(value, _)| value)
    }

    /// All values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &ContentDimensionValue> {
        self.values.iter()
    }

    /// Number of declared values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; dimensions without values are rejected.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Direct specializations of `value`, in declaration order.
    ///
    /// Values that do not belong to this dimension have none.
    pub fn specializations(&self, value: &ContentDimensionValue) -> Vec<&ContentDimensionValue> {
        self.index
            .get(&value.value)
            .map(|&position| {
                self.children[position]
                    .iter()
                    .map(|&child| &self.values[child])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct generalization of `value`; `None` for roots and foreign values.
    pub fn generalization(&self, value: &ContentDimensionValue) -> Option<&ContentDimensionValue> {
        let position = *self.index.get(&value.value)?;
        self.parents[position].map(|parent| &self.values[parent])
    }

    /// Returns `true` if `generalization` equals `specialization` or lies on
    /// its generalization path. Unknown raw values are never related.
    pub fn is_generalization_of_or_equal(&self, generalization: &str, specialization: &str) -> bool {
        let (Some(&target), Some(&start)) =
            (self.index.get(generalization), self.index.get(specialization))
        else {
            return false;
        };
        let mut current = Some(start);
        while let Some(position) = current {
            if position == target {
                return true;
            }
            current = self.parents[position];
        }
        false
    }

    /// The variation edges, ordered by specialization declaration order.
    pub fn edges(&self) -> Vec<ContentDimensionValueVariationEdge> {
        self.parents
            .iter()
            .enumerate()
            .filter_map(|(position, parent)| {
                parent.map(|parent| {
                    ContentDimensionValueVariationEdge::new(
                        self.values[position].value.clone(),
                        self.values[parent].value.clone(),
                    )
                })
            })
            .collect()
    }

    /// Depth of the deepest value.
    pub fn maximum_depth(&self) -> ContentDimensionValueSpecializationDepth {
        self.maximum_depth
    }

    /// Dimension-level configuration payload.
    pub fn configuration(&self) -> &Map<String, Value> {
        &self.configuration
    }

    /// Looks up a dimension-level payload entry by dotted path.
    pub fn configuration_value(&self, path: &str) -> Option<&Value> {
        lookup_configuration_path(&self.configuration, path)
    }
}

/// Number of generalization steps from `position` to its root, or `None` if
/// the chain does not terminate.
fn distance_to_root(parents: &[Option<usize>], position: usize) -> Option<u32> {
    let mut steps = 0u32;
    let mut current = parents[position];
    while let Some(parent) = current {
        steps += 1;
        if steps as usize > parents.len() {
            return None;
        }
        current = parents[parent];
    }
    Some(steps)
}

/// Incremental construction of a [`ContentDimension`] from parent links.
///
/// Depths are derived from the links; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ContentDimensionBuilder {
    id: String,
    entries: Vec<(ContentDimensionValue, Option<String>)>,
    default_value: Option<String>,
    configuration: Map<String, Value>,
}

impl ContentDimensionBuilder {
    /// Starts an empty builder for dimension `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entries: Vec::new(),
            default_value: None,
            configuration: Map::new(),
        }
    }

    /// Adds a root value.
    pub fn value(self, raw_value: impl Into<String>) -> Self {
        self.insert(
            ContentDimensionValue::new(raw_value, ContentDimensionValueSpecializationDepth::ROOT),
            None,
        )
    }

    /// Adds `raw_value` as a direct specialization of `generalization`.
    pub fn specialization(self, raw_value: impl Into<String>, generalization: impl Into<String>) -> Self {
        self.insert(
            ContentDimensionValue::new(raw_value, ContentDimensionValueSpecializationDepth::ROOT),
            Some(generalization.into()),
        )
    }

    /// Adds a fully specified value; its declared depth is replaced by the
    /// derived one.
    pub fn insert(mut self, value: ContentDimensionValue, generalization: Option<String>) -> Self {
        self.entries.push((value, generalization));
        self
    }

    /// Designates the default value (must be a root).
    pub fn default_value(mut self, raw_value: impl Into<String>) -> Self {
        self.default_value = Some(raw_value.into());
        self
    }

    /// Sets the dimension-level configuration payload.
    pub fn configuration(mut self, configuration: Map<String, Value>) -> Self {
        self.configuration = configuration;
        self
    }

    /// Derives depths and edges, then validates via [`ContentDimension::new`].
    pub fn build(self) -> Result<ContentDimension, ContentDimensionError> {
        let id = ContentDimensionId::new(self.id)?;

        let mut positions = BTreeMap::new();
        for (position, (value, _)) in self.entries.iter().enumerate() {
            positions.entry(value.value.clone()).or_insert(position);
        }
        let mut parents = Vec::with_capacity(self.entries.len());
        for (_, generalization) in &self.entries {
            let parent = match generalization {
                None => None,
                Some(raw) => Some(*positions.get(raw).ok_or_else(|| {
                    ContentDimensionError::UnknownValue {
                        dimension: id.as_str().to_owned(),
                        value: raw.clone(),
                    }
                })?),
            };
            parents.push(parent);
        }

        let mut values = Vec::with_capacity(self.entries.len());
        let mut edges = Vec::new();
        for (position, (mut value, generalization)) in self.entries.into_iter().enumerate() {
            let depth = distance_to_root(&parents, position).ok_or_else(|| {
                ContentDimensionError::GeneralizationCycle {
                    dimension: id.as_str().to_owned(),
                    value: value.value.clone(),
                }
            })?;
            value.specialization_depth = ContentDimensionValueSpecializationDepth(depth);
            if let Some(generalization) = generalization {
                edges.push(ContentDimensionValueVariationEdge::new(
                    value.value.clone(),
                    generalization,
                ));
            }
            values.push(value);
        }

        let dimension = ContentDimension::new(id, values, edges)?.with_configuration(self.configuration);
        match self.default_value {
            Some(default_value) => dimension.with_default_value(&default_value),
            None => Ok(dimension),
        }
    }
}
