// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

mod common;

use common::{market_language_source, point};
use content_dimension::ContentDimensionSource;
use dimension_space::{
    ContentDimensionZookeeper, DimensionSpacePointSet, InterDimensionalVariationGraph,
    PartialCombination, VariantType,
};

fn market_language(pairs: &[(&str, &str)]) -> DimensionSpacePointSet {
    pairs
        .iter()
        .map(|(market, language)| point(&[("market", *market), ("language", *language)]))
        .collect()
}

#[test]
fn constraints_restrict_the_cartesian_product() {
    common::init_tracing();
    let source = market_language_source();
    let zookeeper = ContentDimensionZookeeper::new(&source).unwrap();

    assert_eq!(
        zookeeper.allowed_dimension_subspace(),
        &market_language(&[
            ("CH", "de"),
            ("CH", "fr"),
            ("CH", "it"),
            ("LU", "de"),
            ("LU", "fr"),
            ("LU", "lb"),
        ])
    );
    assert_eq!(zookeeper.allowed_combinations().len(), 6);
    for combination in zookeeper.allowed_combinations() {
        let ids: Vec<_> = combination.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["market", "language"]);
    }
}

#[test]
fn constraints_are_checked_from_both_sides() {
    // Only the language side knows about the restriction here.
    let source = content_dimension::ConfigurationBasedContentDimensionSource::from_json_str(
        r#"{
            "market": { "values": { "CH": {}, "LU": {} } },
            "language": {
                "values": {
                    "de": {},
                    "lb": { "constraints": { "market": { "*": false, "LU": true } } }
                }
            }
        }"#,
    )
    .unwrap();
    let zookeeper = ContentDimensionZookeeper::new(&source).unwrap();
    assert_eq!(
        zookeeper.allowed_dimension_subspace(),
        &market_language(&[("CH", "de"), ("LU", "de"), ("LU", "lb")])
    );
}

#[test]
fn collaborator_constraint_narrows_the_subspace() {
    let source = market_language_source();
    let no_french = |partial: &PartialCombination<'_>| {
        partial.iter().all(|(dimension, value)| {
            dimension.id().as_str() != "language" || value.value != "fr"
        })
    };
    let zookeeper = ContentDimensionZookeeper::with_constraint(&source, &no_french).unwrap();
    assert_eq!(
        zookeeper.allowed_dimension_subspace(),
        &market_language(&[("CH", "de"), ("CH", "it"), ("LU", "de"), ("LU", "lb")])
    );

    let graph = InterDimensionalVariationGraph::with_constraint(&source, &no_french).unwrap();
    assert_eq!(graph.dimension_space_points(), zookeeper.allowed_dimension_subspace());
    assert!(graph
        .specialization_set(&point(&[("market", "CH"), ("language", "fr")]), true)
        .is_err());
}

#[test]
fn flat_dimensions_only_have_peers() {
    let source = market_language_source();
    let graph = InterDimensionalVariationGraph::from_source(&source).unwrap();
    assert_eq!(graph.weight_normalization_base(), 1);
    assert_eq!(source.dimensions_ordered_by_priority().len(), 2);

    let ch_de = point(&[("market", "CH"), ("language", "de")]);
    let lu_lb = point(&[("market", "LU"), ("language", "lb")]);
    assert_eq!(graph.variant_type(&ch_de, &lu_lb), Ok(VariantType::Peer));
    assert_eq!(graph.root_generalizations(), *graph.dimension_space_points());
    assert_eq!(graph.primary_generalization(&ch_de), Ok(None));
}
