// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Cross-dimension combination constraints carried by dimension values.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ident::ContentDimensionId;

/// Key used in configuration documents for the wildcard rule.
pub const WILDCARD: &str = "*";

/// Restrictions one value places on the values of a single other dimension.
///
/// An explicit entry for a raw value wins; every other value falls back to the
/// wildcard rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDimensionConstraints {
    /// Whether values without an explicit entry are allowed.
    pub wildcard_allowed: bool,
    /// Explicit allow (`true`) / deny (`false`) entries keyed by raw value.
    pub identifier_restrictions: BTreeMap<String, bool>,
}

impl ContentDimensionConstraints {
    /// Creates a constraint table.
    pub fn new(wildcard_allowed: bool, identifier_restrictions: BTreeMap<String, bool>) -> Self {
        Self {
            wildcard_allowed,
            identifier_restrictions,
        }
    }

    /// Builds a table from a configuration map where the `*` key holds the
    /// wildcard rule (allowed when absent).
    pub fn from_configuration(entries: &BTreeMap<String, bool>) -> Self {
        let mut identifier_restrictions = entries.clone();
        let wildcard_allowed = identifier_restrictions.remove(WILDCARD).unwrap_or(true);
        Self {
            wildcard_allowed,
            identifier_restrictions,
        }
    }

    /// Returns whether the raw value is allowed by this table.
    pub fn allows(&self, raw_value: &str) -> bool {
        self.identifier_restrictions
            .get(raw_value)
            .copied()
            .unwrap_or(self.wildcard_allowed)
    }
}

/// Constraint tables of one value, keyed by the constrained dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDimensionConstraintSet {
    constraints: BTreeMap<ContentDimensionId, ContentDimensionConstraints>,
}

impl ContentDimensionConstraintSet {
    /// Creates a set from per-dimension tables.
    pub fn new(constraints: BTreeMap<ContentDimensionId, ContentDimensionConstraints>) -> Self {
        Self { constraints }
    }

    /// The unconstrained set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the table for `dimension`, if any.
    pub fn constraints(&self, dimension: &ContentDimensionId) -> Option<&ContentDimensionConstraints> {
        self.constraints.get(dimension)
    }

    /// Returns whether `raw_value` of `dimension` is allowed. Dimensions without
    /// a table are unconstrained.
    pub fn allows(&self, dimension: &ContentDimensionId, raw_value: &str) -> bool {
        self.constraints
            .get(dimension)
            .map_or(true, |table| table.allows(raw_value))
    }

    /// Returns `true` when no dimension is constrained.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterates over the per-dimension tables in dimension id order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContentDimensionId, &ContentDimensionConstraints)> {
        self.constraints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_entries_override_wildcard() {
        let entries = BTreeMap::from([
            (WILDCARD.to_owned(), false),
            ("valueB1".to_owned(), true),
            ("valueB2".to_owned(), false),
        ]);
        let table = ContentDimensionConstraints::from_configuration(&entries);
        assert!(!table.wildcard_allowed);
        assert_eq!(table.identifier_restrictions.len(), 2);
        assert!(table.allows("valueB1"));
        assert!(!table.allows("valueB2"));
        assert!(!table.allows("valueB3"));
    }

    #[test]
    fn missing_wildcard_defaults_to_allowed() {
        let entries = BTreeMap::from([("lb".to_owned(), false)]);
        let table = ContentDimensionConstraints::from_configuration(&entries);
        assert!(table.allows("de"));
        assert!(!table.allows("lb"));
    }

    #[test]
    fn unconstrained_dimensions_allow_everything() {
        let language = ContentDimensionId::new("language").ok();
        let market = ContentDimensionId::new("market").ok();
        let (Some(language), Some(market)) = (language, market) else {
            unreachable!("static ids are valid");
        };
        let set = ContentDimensionConstraintSet::new(BTreeMap::from([(
            language.clone(),
            ContentDimensionConstraints::new(true, BTreeMap::from([("it".to_owned(), false)])),
        )]));
        assert!(!set.allows(&language, "it"));
        assert!(set.allows(&language, "de"));
        assert!(set.allows(&market, "anything"));
    }
}
