// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use content_dimension::{ConfigurationBasedContentDimensionSource, ContentDimension};
use dimension_space::{DimensionSpacePoint, DimensionSpacePointSet, InterDimensionalVariationGraph};

// =============================================================================
// FIXTURES
// =============================================================================

/// Routes `tracing` output to the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// `value1 -> { value1.1 -> value1.1.1, value1.2 }` under `id`.
pub fn variation_dimension(id: &str) -> ContentDimension {
    ContentDimension::builder(id)
        .value("value1")
        .specialization("value1.1", "value1")
        .specialization("value1.2", "value1")
        .specialization("value1.1.1", "value1.1")
        .build()
        .expect("variation dimension")
}

/// Two identical variation dimensions, `dimensionA` before `dimensionB`.
pub fn variation_example() -> Vec<ContentDimension> {
    vec![
        variation_dimension("dimensionA"),
        variation_dimension("dimensionB"),
    ]
}

/// The variation graph over [`variation_example`].
pub fn variation_graph() -> InterDimensionalVariationGraph {
    init_tracing();
    InterDimensionalVariationGraph::from_source(&variation_example()).expect("variation graph")
}

/// Linear specialization chain `<id>0 -> <id>1 -> ... -> <id>(levels - 1)`.
pub fn chain_dimension(id: &str, levels: u32) -> ContentDimension {
    let mut builder = ContentDimension::builder(id).value(format!("{id}0"));
    for level in 1..levels {
        builder = builder.specialization(format!("{id}{level}"), format!("{id}{}", level - 1));
    }
    builder.build().expect("chain dimension")
}

/// Flat market/language configuration where CH excludes `lb` and LU excludes
/// `it`.
pub fn market_language_source() -> ConfigurationBasedContentDimensionSource {
    ConfigurationBasedContentDimensionSource::from_json_str(
        r#"{
            "market": {
                "values": {
                    "CH": { "constraints": { "language": { "lb": false } } },
                    "LU": { "constraints": { "language": { "it": false } } }
                }
            },
            "language": {
                "values": { "de": {}, "fr": {}, "it": {}, "lb": {} }
            }
        }"#,
    )
    .expect("market/language configuration")
}

// =============================================================================
// POINTS
// =============================================================================

/// Point from `(dimension, value)` pairs.
pub fn point(coordinates: &[(&str, &str)]) -> DimensionSpacePoint {
    DimensionSpacePoint::from_coordinates(coordinates.iter().copied()).expect("point")
}

/// Point of the variation example.
pub fn ab(a: &str, b: &str) -> DimensionSpacePoint {
    point(&[("dimensionA", a), ("dimensionB", b)])
}

/// Point set of the variation example.
pub fn ab_set(coordinates: &[(&str, &str)]) -> DimensionSpacePointSet {
    coordinates.iter().map(|(a, b)| ab(a, b)).collect()
}

/// Every value of [`variation_dimension`], in declaration order.
pub const VARIATION_VALUES: [&str; 4] = ["value1", "value1.1", "value1.2", "value1.1.1"];
