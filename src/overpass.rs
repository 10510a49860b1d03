/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! The overpass module loads a dataset from an Overpass API JSON export.

use crate::dataset;
use crate::geometry;
use anyhow::Context as _;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::HashMap;

/// One member of a relation element.
#[derive(Deserialize)]
struct OverpassMember {
    #[serde(rename = "type")]
    element_type: String,
    #[serde(rename = "ref")]
    reference: i64,
    role: String,
}

/// One node, way or relation record of the export.
#[derive(Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    element_type: String,
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    members: Vec<OverpassMember>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// The toplevel structure of an Overpass JSON answer.
#[derive(Deserialize)]
struct OverpassDocument {
    elements: Vec<OverpassElement>,
}

fn tag_pairs(tags: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    tags.iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect()
}

/// Parses an Overpass JSON export into a dataset. A way node or relation member that
/// references an object absent from the export becomes an incomplete placeholder, and a way
/// with such nodes is itself incomplete.
pub fn parse(json: &str) -> anyhow::Result<dataset::Dataset> {
    let document: OverpassDocument =
        serde_json::from_str(json).context("failed to parse the overpass JSON")?;
    let mut dataset = dataset::Dataset::new();
    let mut ids: HashMap<(String, i64), dataset::PrimitiveId> = HashMap::new();

    for element in document.elements.iter().filter(|e| e.element_type == "node") {
        let coord = match (element.lat, element.lon) {
            (Some(lat), Some(lon)) => Some(geometry::LatLon::new(lat, lon)),
            _ => None,
        };
        let id = dataset.add_node(element.id, coord, &tag_pairs(&element.tags));
        ids.insert(("node".to_string(), element.id), id);
    }

    for element in document.elements.iter().filter(|e| e.element_type == "way") {
        let mut nodes: Vec<dataset::PrimitiveId> = Vec::new();
        let mut incomplete = false;
        for node_id in &element.nodes {
            let key = ("node".to_string(), *node_id);
            let node = match ids.get(&key) {
                Some(value) => *value,
                None => {
                    let placeholder = dataset.add_node(*node_id, None, &[]);
                    ids.insert(key, placeholder);
                    incomplete = true;
                    placeholder
                }
            };
            nodes.push(node);
        }
        let id = dataset.add_way(element.id, &nodes, &tag_pairs(&element.tags));
        if incomplete {
            dataset.set_incomplete(id, true);
        }
        ids.insert(("way".to_string(), element.id), id);
    }

    for element in document
        .elements
        .iter()
        .filter(|e| e.element_type == "relation")
    {
        let mut members: Vec<(&str, dataset::PrimitiveId)> = Vec::new();
        for member in &element.members {
            let key = (member.element_type.to_string(), member.reference);
            let resolved = match ids.get(&key) {
                Some(value) => *value,
                None => {
                    // Not in the export, including a relation member defined only later in
                    // the file: an incomplete placeholder.
                    let placeholder = match member.element_type.as_str() {
                        "node" => dataset.add_node(member.reference, None, &[]),
                        "way" => dataset.add_way(member.reference, &[], &[]),
                        _ => dataset.add_relation(member.reference, &[], &[]),
                    };
                    dataset.set_incomplete(placeholder, true);
                    ids.insert(key, placeholder);
                    placeholder
                }
            };
            members.push((member.role.as_str(), resolved));
        }
        let id = dataset.add_relation(element.id, &members, &tag_pairs(&element.tags));
        ids.insert(("relation".to_string(), element.id), id);
    }

    dataset.build_referrers();
    Ok(dataset)
}
