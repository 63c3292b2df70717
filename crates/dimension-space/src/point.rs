// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dimension space points and their content-derived hash.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use blake3::Hasher;
use content_dimension::{ContentDimensionError, ContentDimensionId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::DimensionSpaceError;

/// Domain separator for point hashes.
const POINT_HASH_DOMAIN: &[u8] = b"dimension-space-point:v1";

/// Stable 256-bit identity of a [`DimensionSpacePoint`].
///
/// `blake3(domain || len || (len(id) || id || len(value) || value)*)` over the
/// coordinates in ascending dimension id order, lengths as little-endian
/// `u64`. Persisted hashes stay valid as long as this encoding does.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DimensionSpacePointHash(pub [u8; 32]);

impl DimensionSpacePointHash {
    /// Lowercase hex rendering (64 chars).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses the hex rendering produced by [`to_hex`](Self::to_hex).
    pub fn from_hex(encoded: &str) -> Result<Self, DimensionSpaceError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(encoded, &mut bytes)
            .map_err(|_| DimensionSpaceError::InvalidHash(encoded.to_owned()))?;
        Ok(Self(bytes))
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for DimensionSpacePointHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DimensionSpacePointHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DimensionSpacePointHash({})", self.to_hex())
    }
}

impl FromStr for DimensionSpacePointHash {
    type Err = DimensionSpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for DimensionSpacePointHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DimensionSpacePointHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_hex(&encoded).map_err(serde::de::Error::custom)
    }
}

/// An assignment of one raw value per dimension.
///
/// Equality and hash are pure functions of the coordinate mapping; the order
/// in which coordinates were supplied never matters.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<ContentDimensionId, String>",
    into = "BTreeMap<ContentDimensionId, String>"
)]
pub struct DimensionSpacePoint {
    coordinates: BTreeMap<ContentDimensionId, String>,
    hash: DimensionSpacePointHash,
}

impl DimensionSpacePoint {
    /// Creates a point from a coordinate mapping.
    pub fn new(coordinates: BTreeMap<ContentDimensionId, String>) -> Self {
        let hash = hash_coordinates(&coordinates);
        Self { coordinates, hash }
    }

    /// The point without coordinates (the single point of a dimensionless space).
    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Creates a point from `(dimension id, raw value)` pairs.
    ///
    /// A repeated dimension keeps its last value.
    pub fn from_coordinates<I, K, V>(coordinates: I) -> Result<Self, ContentDimensionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut mapping: BTreeMap<ContentDimensionId, String> = BTreeMap::new();
        for (id, value) in coordinates {
            mapping.insert(ContentDimensionId::new(id)?, value.into());
        }
        Ok(Self::new(mapping))
    }

    /// Decodes the JSON object form (`{"language":"de"}`).
    pub fn from_json(encoded: &str) -> Result<Self, DimensionSpaceError> {
        serde_json::from_str(encoded).map_err(|err| DimensionSpaceError::InvalidEncoding(err.to_string()))
    }

    /// Encodes as a JSON object with keys in ascending order.
    #[must_use]
    pub fn to_json(&self) -> String {
        let object: Map<String, Value> = self
            .coordinates
            .iter()
            .map(|(id, value)| (id.as_str().to_owned(), Value::String(value.clone())))
            .collect();
        Value::Object(object).to_string()
    }

    /// The coordinate mapping.
    pub fn coordinates(&self) -> &BTreeMap<ContentDimensionId, String> {
        &self.coordinates
    }

    /// Raw value in `dimension`, if the point has one.
    pub fn coordinate(&self, dimension: &ContentDimensionId) -> Option<&str> {
        self.coordinates.get(dimension).map(String::as_str)
    }

    /// Identity hash.
    pub fn hash(&self) -> DimensionSpacePointHash {
        self.hash
    }

    /// Number of coordinates.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns `true` for the coordinate-less point.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Copy of this point with `dimension` set to `value`.
    #[must_use]
    pub fn vary(&self, dimension: ContentDimensionId, value: impl Into<String>) -> Self {
        let mut coordinates = self.coordinates.clone();
        coordinates.insert(dimension, value.into());
        Self::new(coordinates)
    }

    /// Returns `true` if `other` covers the same dimensions and differs from
    /// this point in `dimension` only.
    pub fn is_direct_variant_in_dimension(&self, other: &Self, dimension: &ContentDimensionId) -> bool {
        if self.coordinates.len() != other.coordinates.len() {
            return false;
        }
        let mut differs_in_dimension = false;
        for (id, value) in &self.coordinates {
            match other.coordinates.get(id) {
                None => return false,
                Some(other_value) if other_value == value => {}
                Some(_) if id == dimension => differs_in_dimension = true,
                Some(_) => return false,
            }
        }
        differs_in_dimension
    }
}

impl From<BTreeMap<ContentDimensionId, String>> for DimensionSpacePoint {
    fn from(coordinates: BTreeMap<ContentDimensionId, String>) -> Self {
        Self::new(coordinates)
    }
}

impl From<DimensionSpacePoint> for BTreeMap<ContentDimensionId, String> {
    fn from(point: DimensionSpacePoint) -> Self {
        point.coordinates
    }
}

impl fmt::Display for DimensionSpacePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl fmt::Debug for DimensionSpacePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DimensionSpacePoint({})", self.to_json())
    }
}

impl FromStr for DimensionSpacePoint {
    type Err = DimensionSpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

fn hash_coordinates(coordinates: &BTreeMap<ContentDimensionId, String>) -> DimensionSpacePointHash {
    let mut hasher = Hasher::new();
    hasher.update(POINT_HASH_DOMAIN);
    hasher.update(&(coordinates.len() as u64).to_le_bytes());
    for (id, value) in coordinates {
        hasher.update(&(id.as_str().len() as u64).to_le_bytes());
        hasher.update(id.as_str().as_bytes());
        hasher.update(&(value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }
    DimensionSpacePointHash(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(coordinates: &[(&str, &str)]) -> DimensionSpacePoint {
        DimensionSpacePoint::from_coordinates(coordinates.iter().copied())
            .unwrap_or_else(|err| unreachable!("{err}"))
    }

    fn id(raw: &str) -> ContentDimensionId {
        ContentDimensionId::new(raw).unwrap_or_else(|err| unreachable!("{err}"))
    }

    #[test]
    fn hash_ignores_coordinate_order() {
        let a = point(&[("language", "de"), ("market", "CH")]);
        let b = point(&[("market", "CH"), ("language", "de")]);
        assert_eq!(a, b);
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn hash_separates_key_and_value_boundaries() {
        let a = point(&[("ab", "c")]);
        let b = point(&[("a", "bc")]);
        assert_ne!(a.hash(), b.hash());
        assert_ne!(DimensionSpacePoint::empty().hash(), point(&[("a", "")]).hash());
    }

    #[test]
    fn json_form_is_sorted_and_reversible() {
        let p = point(&[("market", "CH"), ("language", "de")]);
        assert_eq!(p.to_json(), r#"{"language":"de","market":"CH"}"#);
        let decoded = DimensionSpacePoint::from_json(r#"{"market":"CH","language":"de"}"#);
        assert_eq!(decoded, Ok(p));
        assert_eq!(DimensionSpacePoint::empty().to_json(), "{}");
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            DimensionSpacePoint::from_json("[]"),
            Err(DimensionSpaceError::InvalidEncoding(_))
        ));
        assert!(matches!(
            DimensionSpacePoint::from_json(r#"{"":"de"}"#),
            Err(DimensionSpaceError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn hash_hex_round_trips() {
        let hash = point(&[("language", "de")]).hash();
        assert_eq!(hash.to_hex().len(), 64);
        assert_eq!(DimensionSpacePointHash::from_hex(&hash.to_hex()), Ok(hash));
        assert!(DimensionSpacePointHash::from_hex("zz").is_err());
    }

    #[test]
    fn vary_and_direct_variants() {
        let origin = point(&[("language", "de"), ("market", "CH")]);
        let varied = origin.vary(id("language"), "fr");
        assert_eq!(varied.coordinate(&id("language")), Some("fr"));
        assert_eq!(varied.coordinate(&id("market")), Some("CH"));
        assert!(origin.is_direct_variant_in_dimension(&varied, &id("language")));
        assert!(!origin.is_direct_variant_in_dimension(&varied, &id("market")));
        assert!(!origin.is_direct_variant_in_dimension(&origin, &id("language")));

        let both = varied.vary(id("market"), "LU");
        assert!(!origin.is_direct_variant_in_dimension(&both, &id("language")));
        let extended = origin.vary(id("segment"), "b2b");
        assert!(!origin.is_direct_variant_in_dimension(&extended, &id("segment")));
    }

    proptest! {
        #[test]
        fn hash_is_independent_of_permutation(
            coordinates in prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z_]{0,8}", 0..6),
            rotation in 0usize..6,
        ) {
            let mut pairs: Vec<(String, String)> = coordinates.into_iter().collect();
            let forward = DimensionSpacePoint::from_coordinates(pairs.clone())
                .unwrap_or_else(|err| unreachable!("{err}"));
            if !pairs.is_empty() {
                let shift = rotation % pairs.len();
                pairs.rotate_left(shift);
            }
            pairs.reverse();
            let permuted = DimensionSpacePoint::from_coordinates(pairs)
                .unwrap_or_else(|err| unreachable!("{err}"));
            prop_assert_eq!(forward.hash(), permuted.hash());
            let reparsed = DimensionSpacePoint::from_json(&permuted.to_json())
                .unwrap_or_else(|err| unreachable!("{err}"));
            prop_assert_eq!(reparsed.hash(), forward.hash());
        }
    }
}
