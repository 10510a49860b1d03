/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the dataset module.

use super::*;
use crate::geometry::LatLon;

/// Tests the tag helpers.
#[test]
fn test_tag_helpers() {
    let mut dataset = Dataset::new();
    let node = dataset.add_node(
        1,
        Some(LatLon::new(47.0, 19.0)),
        &[("addr:housenumber", "1"), ("addr:street", "Fő utca")],
    );
    assert_eq!(dataset.get_tag(node, "addr:housenumber"), Some("1"));
    assert_eq!(dataset.get_tag(node, "addr:city"), None);
    assert_eq!(dataset.tag_or(node, "addr:city", ""), "");
    assert_eq!(dataset.has_key(node, "addr:street"), true);
    assert_eq!(dataset.has_any_key(node, &["addr:place", "addr:street"]), true);
    assert_eq!(dataset.has_any_key(node, &["addr:place", "addr:unit"]), false);
    assert_eq!(dataset.has_tag(node, "addr:housenumber", "1"), true);
    assert_eq!(dataset.has_tag_different(node, "addr:housenumber", "2"), true);
    assert_eq!(dataset.has_tag_different(node, "addr:housenumber", "1"), false);
    // Missing key is not "different".
    assert_eq!(dataset.has_tag_different(node, "name", "x"), false);
}

/// Tests that build_referrers() indexes both way nodes and relation members.
#[test]
fn test_referrers() {
    let mut dataset = Dataset::new();
    let node = dataset.add_node(1, Some(LatLon::new(0.0, 0.0)), &[]);
    let way = dataset.add_way(2, &[node], &[]);
    let relation = dataset.add_relation(3, &[("house", node)], &[]);
    dataset.build_referrers();
    assert_eq!(dataset.referrers(node), &[way, relation]);
    assert_eq!(dataset.referrers(way).is_empty(), true);
    assert_eq!(dataset.is_node(node), true);
    assert_eq!(dataset.is_way(way), true);
    assert_eq!(dataset.is_relation(relation), true);
    assert_eq!(dataset.members(relation).len(), 1);
    assert_eq!(dataset.members(relation)[0].role, "house");
}

/// Tests bbox_center() for each primitive kind.
#[test]
fn test_bbox_center() {
    let mut dataset = Dataset::new();
    let node1 = dataset.add_node(1, Some(LatLon::new(0.0, 0.0)), &[]);
    let node2 = dataset.add_node(2, Some(LatLon::new(1.0, 2.0)), &[]);
    let way = dataset.add_way(3, &[node1, node2], &[]);
    let relation = dataset.add_relation(4, &[("street", way)], &[]);
    assert_eq!(dataset.bbox_center(node1), Some(LatLon::new(0.0, 0.0)));
    assert_eq!(dataset.bbox_center(way), Some(LatLon::new(0.5, 1.0)));
    assert_eq!(dataset.bbox_center(relation), Some(LatLon::new(0.5, 1.0)));
}

/// Tests bbox_center() when no geometry is resolved.
#[test]
fn test_bbox_center_unresolved() {
    let mut dataset = Dataset::new();
    let node = dataset.add_node(1, None, &[]);
    let way = dataset.add_way(2, &[node], &[]);
    assert_eq!(dataset.bbox_center(node), None);
    assert_eq!(dataset.bbox_center(way), None);
}

/// Tests that a cyclic relation membership terminates.
#[test]
fn test_bbox_center_cycle() {
    let mut dataset = Dataset::new();
    let relation1 = dataset.add_relation(1, &[], &[]);
    let relation2 = dataset.add_relation(2, &[("", relation1)], &[]);
    // Patch the first relation to point back to the second one.
    if let PrimitiveKind::Relation(members) = &mut dataset.primitives[relation1.0].kind {
        members.push(Member {
            role: "".into(),
            member: relation2,
        });
    }
    assert_eq!(dataset.bbox_center(relation2), None);
}

/// Tests the usability flags.
#[test]
fn test_usability() {
    let mut dataset = Dataset::new();
    let node = dataset.add_node(1, Some(LatLon::new(0.0, 0.0)), &[]);
    assert_eq!(dataset.is_usable(node), true);
    dataset.set_deleted(node, true);
    assert_eq!(dataset.is_usable(node), false);
    dataset.set_deleted(node, false);
    dataset.set_incomplete(node, true);
    assert_eq!(dataset.is_usable(node), false);
    assert_eq!(dataset.is_incomplete(node), true);

    // A node without a coordinate is an incomplete placeholder.
    let placeholder = dataset.add_node(2, None, &[]);
    assert_eq!(dataset.is_usable(placeholder), false);
    assert_eq!(dataset.node_coord(placeholder), None);
}
