// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Configuration documents for content dimensions.
//!
//! A document maps dimension ids to their configuration, in priority order:
//!
//! ```json
//! {
//!   "language": {
//!     "defaultValue": "mul",
//!     "values": {
//!       "mul": {
//!         "specializations": { "de": {}, "en": {} },
//!         "constraints": { "market": { "*": true, "CH": false } },
//!         "label": "International"
//!       }
//!     },
//!     "label": "Language"
//!   }
//! }
//! ```
//!
//! Keys other than `values`, `defaultValue`, `specializations` and
//! `constraints` are kept as opaque payload. Reading the document from disk is
//! the caller's business.
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::info;

use crate::constraints::{ContentDimensionConstraintSet, ContentDimensionConstraints};
use crate::dimension::{ContentDimension, ContentDimensionBuilder};
use crate::error::ContentDimensionError;
use crate::ident::ContentDimensionId;
use crate::source::ContentDimensionSource;
use crate::value::{ContentDimensionValue, ContentDimensionValueSpecializationDepth};

/// Top-level document: dimension id -> configuration, in priority order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentDimensionsConfiguration(pub Vec<(String, DimensionConfiguration)>);

impl<'de> Deserialize<'de> for ContentDimensionsConfiguration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered::deserialize(deserializer).map(Self)
    }
}

impl Serialize for ContentDimensionsConfiguration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ordered::serialize(&self.0, serializer)
    }
}

/// Configuration of one dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionConfiguration {
    /// Root values (with nested specializations) in declaration order.
    #[serde(default, with = "ordered")]
    pub values: Vec<(String, ValueConfiguration)>,
    /// Designated default value; the first root when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    /// Opaque dimension-level payload.
    #[serde(flatten)]
    pub configuration: Map<String, Value>,
}

/// Configuration of one dimension value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueConfiguration {
    /// Direct specializations in declaration order.
    #[serde(default, with = "ordered", skip_serializing_if = "Vec::is_empty")]
    pub specializations: Vec<(String, ValueConfiguration)>,
    /// Constraint tables keyed by the constrained dimension; `*` is the wildcard.
    #[serde(
        default,
        deserialize_with = "constraint_tables",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub constraints: BTreeMap<String, BTreeMap<String, bool>>,
    /// Opaque value-level payload.
    #[serde(flatten)]
    pub configuration: Map<String, Value>,
}

/// Dimension source built from a configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationBasedContentDimensionSource {
    dimensions: Vec<ContentDimension>,
}

impl ConfigurationBasedContentDimensionSource {
    /// Wraps already constructed dimensions, rejecting duplicate ids.
    pub fn new(dimensions: Vec<ContentDimension>) -> Result<Self, ContentDimensionError> {
        for (position, dimension) in dimensions.iter().enumerate() {
            if dimensions[..position].iter().any(|d| d.id() == dimension.id()) {
                return Err(ContentDimensionError::DuplicateDimension {
                    dimension: dimension.id().as_str().to_owned(),
                });
            }
        }
        Ok(Self { dimensions })
    }

    /// Builds every dimension of the document, in document order.
    pub fn from_configuration(
        configuration: &ContentDimensionsConfiguration,
    ) -> Result<Self, ContentDimensionError> {
        let dimensions = configuration
            .0
            .iter()
            .map(|(id, dimension)| build_dimension(id, dimension))
            .collect::<Result<Vec<_>, _>>()?;
        let source = Self::new(dimensions)?;
        info!(
            dimensions = source.dimensions.len(),
            "content dimensions configured"
        );
        Ok(source)
    }

    /// Parses and builds a document from JSON text.
    pub fn from_json_str(document: &str) -> Result<Self, ContentDimensionError> {
        let configuration = serde_json::from_str(document).map_err(invalid_document)?;
        Self::from_configuration(&configuration)
    }

    /// Builds a document from an in-memory JSON value.
    pub fn from_json_value(document: Value) -> Result<Self, ContentDimensionError> {
        let configuration = serde_json::from_value(document).map_err(invalid_document)?;
        Self::from_configuration(&configuration)
    }
}

impl ContentDimensionSource for ConfigurationBasedContentDimensionSource {
    fn dimensions_ordered_by_priority(&self) -> &[ContentDimension] {
        &self.dimensions
    }
}

fn invalid_document(err: serde_json::Error) -> ContentDimensionError {
    ContentDimensionError::InvalidConfiguration {
        dimension: String::new(),
        message: err.to_string(),
    }
}

fn build_dimension(
    id: &str,
    configuration: &DimensionConfiguration,
) -> Result<ContentDimension, ContentDimensionError> {
    let mut builder = ContentDimension::builder(id).configuration(configuration.configuration.clone());
    for (raw_value, value) in &configuration.values {
        builder = add_value(builder, raw_value, value, None)?;
    }
    if let Some(default_value) = &configuration.default_value {
        builder = builder.default_value(default_value.clone());
    }
    builder.build()
}

fn add_value(
    builder: ContentDimensionBuilder,
    raw_value: &str,
    configuration: &ValueConfiguration,
    generalization: Option<&str>,
) -> Result<ContentDimensionBuilder, ContentDimensionError> {
    let value = ContentDimensionValue::new(raw_value, ContentDimensionValueSpecializationDepth::ROOT)
        .with_constraints(constraint_set(&configuration.constraints)?)
        .with_configuration(configuration.configuration.clone());
    let mut builder = builder.insert(value, generalization.map(str::to_owned));
    for (specialization, child) in &configuration.specializations {
        builder = add_value(builder, specialization, child, Some(raw_value))?;
    }
    Ok(builder)
}

fn constraint_set(
    constraints: &BTreeMap<String, BTreeMap<String, bool>>,
) -> Result<ContentDimensionConstraintSet, ContentDimensionError> {
    let mut tables = BTreeMap::new();
    for (dimension, entries) in constraints {
        tables.insert(
            ContentDimensionId::new(dimension.clone())?,
            ContentDimensionConstraints::from_configuration(entries),
        );
    }
    Ok(ContentDimensionConstraintSet::new(tables))
}

/// One constraint table; `[]` reads as an empty table.
struct ConstraintTable(BTreeMap<String, bool>);

impl<'de> Deserialize<'de> for ConstraintTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(MapOrEmptyList(PhantomData))
            .map(Self)
    }
}

fn constraint_tables<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, BTreeMap<String, bool>>, D::Error>
where
    D: Deserializer<'de>,
{
    let tables: BTreeMap<String, ConstraintTable> =
        deserializer.deserialize_any(MapOrEmptyList(PhantomData))?;
    Ok(tables
        .into_iter()
        .map(|(dimension, ConstraintTable(entries))| (dimension, entries))
        .collect())
}

/// Reads a string-keyed map. `null` and `[]` read as an empty map, since
/// exporters that cannot tell an empty map from an empty list emit those.
struct MapOrEmptyList<T>(PhantomData<T>);

impl<'de, T: DeserializeOwned> Visitor<'de> for MapOrEmptyList<T> {
    type Value = BTreeMap<String, T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map keyed by raw identifiers or an empty list")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BTreeMap::new())
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        match access.next_element::<IgnoredAny>()? {
            None => Ok(BTreeMap::new()),
            Some(_) => Err(de::Error::invalid_length(1, &self)),
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = access.next_entry::<String, T>()? {
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

/// Order-preserving (de)serialization of string-keyed maps.
///
/// `null` entries deserialize as `T::default()`; `[]` reads as no entries.
mod ordered {
    use super::{
        de, fmt, DeserializeOwned, Deserializer, IgnoredAny, MapAccess, PhantomData, SeqAccess,
        SerializeMap, Serializer, Visitor,
    };
    use serde::Serialize;

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S, T>(entries: &Vec<(String, T)>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        deserializer.deserialize_any(OrderedVisitor(PhantomData))
    }

    struct OrderedVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for OrderedVisitor<T>
    where
        T: DeserializeOwned + Default,
    {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map keyed by raw identifiers or an empty list")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            match access.next_element::<IgnoredAny>()? {
                None => Ok(Vec::new()),
                Some(_) => Err(de::Error::invalid_length(1, &self)),
            }
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, Option<T>>()? {
                entries.push((key, value.unwrap_or_default()));
            }
            Ok(entries)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subject() -> ConfigurationBasedContentDimensionSource {
        ConfigurationBasedContentDimensionSource::from_json_value(json!({
            "dimensionA": {
                "values": {
                    "valueA1": {
                        "constraints": {
                            "dimensionB": { "*": false, "valueB1": true, "valueB2": false }
                        },
                        "specializations": {
                            "valueA1.1": { "constraints": {} }
                        },
                        "dimensionValueConfiguration": { "key": "value" }
                    },
                    "valueA2": {
                        "constraints": {
                            "dimensionB": { "*": true, "valueB1": false, "valueB2": true }
                        }
                    }
                },
                "dimensionConfiguration": { "anotherKey": "anotherValue" }
            },
            "dimensionB": {
                "values": { "valueB1": {}, "valueB2": null, "valueB3": {} }
            }
        }))
        .unwrap_or_else(|err| unreachable!("fixture is valid: {err}"))
    }

    fn id(raw: &str) -> ContentDimensionId {
        ContentDimensionId::new(raw).unwrap_or_else(|err| unreachable!("{err}"))
    }

    #[test]
    fn empty_configuration_yields_no_dimensions() {
        let source = ConfigurationBasedContentDimensionSource::from_json_str("{}");
        assert_eq!(source.map(|s| s.dimensions_ordered_by_priority().len()), Ok(0));
    }

    #[test]
    fn dimensions_keep_document_order() {
        let source = subject();
        let ids: Vec<_> = source
            .dimensions_ordered_by_priority()
            .iter()
            .map(|d| d.id().as_str().to_owned())
            .collect();
        assert_eq!(ids, vec!["dimensionA", "dimensionB"]);
    }

    #[test]
    fn values_carry_depth_constraints_and_payload() {
        let source = subject();
        let a = source.dimension(&id("dimensionA"));
        let b = source.dimension(&id("dimensionB"));
        let (Some(a), Some(b)) = (a, b) else {
            unreachable!("both dimensions are configured");
        };

        let a1 = a.value("valueA1");
        assert_eq!(a1.map(|v| v.specialization_depth.value()), Some(0));
        let table = a1.and_then(|v| v.constraints(&id("dimensionB")));
        assert_eq!(table.map(|t| t.wildcard_allowed), Some(false));
        assert_eq!(
            table.map(|t| t.identifier_restrictions.clone()),
            Some(BTreeMap::from([
                ("valueB1".to_owned(), true),
                ("valueB2".to_owned(), false)
            ]))
        );
        assert_eq!(
            a1.and_then(|v| v.configuration_value("dimensionValueConfiguration.key")),
            Some(&json!("value"))
        );

        let a11 = a.value("valueA1.1");
        assert_eq!(a11.map(|v| v.specialization_depth.value()), Some(1));
        assert_eq!(a11.map(|v| v.constraints.is_empty()), Some(true));

        let a2 = a.value("valueA2");
        assert_eq!(
            a2.and_then(|v| v.constraints(&id("dimensionB")))
                .map(|t| t.wildcard_allowed),
            Some(true)
        );

        for raw in ["valueB1", "valueB2", "valueB3"] {
            let value = b.value(raw);
            assert_eq!(value.map(|v| v.specialization_depth.value()), Some(0));
            assert_eq!(value.map(|v| v.constraints.is_empty()), Some(true));
        }
    }

    #[test]
    fn specializations_are_linked() {
        let source = subject();
        let Some(a) = source.dimension(&id("dimensionA")) else {
            unreachable!("dimensionA is configured");
        };
        let (Some(a1), Some(a11), Some(a2)) = (a.value("valueA1"), a.value("valueA1.1"), a.value("valueA2"))
        else {
            unreachable!("values are configured");
        };
        assert_eq!(a.specializations(a1), vec![a11]);
        assert_eq!(a.generalization(a1), None);
        assert!(a.specializations(a11).is_empty());
        assert_eq!(a.generalization(a11), Some(a1));
        assert!(a.specializations(a2).is_empty());
        assert_eq!(a.generalization(a2), None);
    }

    #[test]
    fn maximum_depth_and_dimension_payload() {
        let source = subject();
        let a = source.dimension(&id("dimensionA"));
        let b = source.dimension(&id("dimensionB"));
        assert_eq!(a.map(|d| d.maximum_depth().value()), Some(1));
        assert_eq!(b.map(|d| d.maximum_depth().value()), Some(0));
        assert_eq!(
            a.and_then(|d| d.configuration_value("dimensionConfiguration.anotherKey")),
            Some(&json!("anotherValue"))
        );
    }

    #[test]
    fn default_value_is_honoured() {
        let source = ConfigurationBasedContentDimensionSource::from_json_value(json!({
            "language": { "defaultValue": "en", "values": { "de": {}, "en": {} } }
        }));
        let root = source
            .ok()
            .and_then(|s| s.dimension(&id("language")).map(|d| d.root_value().value.clone()));
        assert_eq!(root, Some("en".to_owned()));
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let err = ConfigurationBasedContentDimensionSource::from_json_str("[1, 2]").err();
        assert!(matches!(err, Some(ContentDimensionError::InvalidConfiguration { .. })));

        let err = ConfigurationBasedContentDimensionSource::from_json_value(json!({
            "language": { "values": {} }
        }))
        .err();
        assert!(matches!(err, Some(ContentDimensionError::NoValues { .. })));

        let err = ConfigurationBasedContentDimensionSource::from_json_value(json!({
            "language": { "values": { "de": { "specializations": { "de": {} } } } }
        }))
        .err();
        assert!(matches!(err, Some(ContentDimensionError::DuplicateValue { .. })));
    }

    #[test]
    fn empty_lists_read_as_empty_maps() {
        let source = ConfigurationBasedContentDimensionSource::from_json_value(json!({
            "dimensionA": {
                "values": {
                    "valueA1": { "constraints": [], "specializations": [] },
                    "valueA2": { "constraints": { "dimensionB": [] } }
                }
            },
            "dimensionB": { "values": { "valueB1": { "constraints": null } } }
        }))
        .unwrap_or_else(|err| unreachable!("{err}"));
        let Some(a) = source.dimension(&id("dimensionA")) else {
            unreachable!("dimensionA is configured");
        };
        assert_eq!(a.value("valueA1").map(|v| v.constraints.is_empty()), Some(true));
        let table = a.value("valueA2").and_then(|v| v.constraints(&id("dimensionB")));
        assert_eq!(table.map(|t| t.wildcard_allowed), Some(true));
        assert_eq!(table.map(|t| t.identifier_restrictions.is_empty()), Some(true));

        let err = ConfigurationBasedContentDimensionSource::from_json_value(json!({
            "language": { "values": { "de": { "constraints": ["market"] } } }
        }))
        .err();
        assert!(matches!(err, Some(ContentDimensionError::InvalidConfiguration { .. })));
    }

    #[test]
    fn duplicate_dimension_ids_are_rejected() {
        let make = || {
            ContentDimension::builder("language")
                .value("de")
                .build()
                .unwrap_or_else(|err| unreachable!("{err}"))
        };
        let err = ConfigurationBasedContentDimensionSource::new(vec![make(), make()]).err();
        assert_eq!(
            err,
            Some(ContentDimensionError::DuplicateDimension {
                dimension: "language".into()
            })
        );
    }
}
