/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! The dataset module contains the arena-backed object model the checks run on.

use crate::geometry;
use std::collections::BTreeMap;
use std::collections::HashSet;

/// An opaque handle to a primitive inside a Dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(usize);

/// One role + member pair of a relation.
#[derive(Clone, Debug)]
pub struct Member {
    /// The role of the member inside the relation, e.g. "house".
    pub role: String,
    /// The referenced primitive.
    pub member: PrimitiveId,
}

/// Kind-specific geometry of a primitive.
#[derive(Clone, Debug)]
pub enum PrimitiveKind {
    /// A single point; the coordinate is missing for placeholders.
    Node(Option<geometry::LatLon>),
    /// An ordered node list.
    Way(Vec<PrimitiveId>),
    /// An ordered member list.
    Relation(Vec<Member>),
}

/// A geographic object: tags plus kind-specific geometry.
#[derive(Clone, Debug)]
struct Primitive {
    osm_id: i64,
    tags: BTreeMap<String, String>,
    kind: PrimitiveKind,
    deleted: bool,
    incomplete: bool,
}

/// A bounding box over coordinates, in degrees.
#[derive(Clone, Copy, Debug)]
struct Bbox {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
}

impl Bbox {
    fn from_point(coord: &geometry::LatLon) -> Self {
        Bbox {
            min_lat: coord.lat,
            min_lon: coord.lon,
            max_lat: coord.lat,
            max_lon: coord.lon,
        }
    }

    fn union(&self, other: &Bbox) -> Self {
        Bbox {
            min_lat: self.min_lat.min(other.min_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lat: self.max_lat.max(other.max_lat),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    fn center(&self) -> geometry::LatLon {
        geometry::LatLon::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Owns every primitive of one validation run. The referrer index is built once, after all
/// primitives are in place; the checks never follow raw mutual references.
#[derive(Debug, Default)]
pub struct Dataset {
    primitives: Vec<Primitive>,
    referrers: Vec<Vec<PrimitiveId>>,
}

impl Dataset {
    /// Creates an empty Dataset.
    pub fn new() -> Self {
        Dataset::default()
    }

    fn add(&mut self, osm_id: i64, tags: &[(&str, &str)], kind: PrimitiveKind) -> PrimitiveId {
        let tags: BTreeMap<String, String> = tags
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.primitives.push(Primitive {
            osm_id,
            tags,
            kind,
            deleted: false,
            incomplete: false,
        });
        PrimitiveId(self.primitives.len() - 1)
    }

    /// Adds a node; a missing coordinate produces an incomplete placeholder.
    pub fn add_node(
        &mut self,
        osm_id: i64,
        coord: Option<geometry::LatLon>,
        tags: &[(&str, &str)],
    ) -> PrimitiveId {
        let incomplete = coord.is_none();
        let id = self.add(osm_id, tags, PrimitiveKind::Node(coord));
        self.primitives[id.0].incomplete = incomplete;
        id
    }

    /// Adds a way from an ordered node list.
    pub fn add_way(
        &mut self,
        osm_id: i64,
        nodes: &[PrimitiveId],
        tags: &[(&str, &str)],
    ) -> PrimitiveId {
        self.add(osm_id, tags, PrimitiveKind::Way(nodes.to_vec()))
    }

    /// Adds a relation from an ordered (role, member) list.
    pub fn add_relation(
        &mut self,
        osm_id: i64,
        members: &[(&str, PrimitiveId)],
        tags: &[(&str, &str)],
    ) -> PrimitiveId {
        let members: Vec<Member> = members
            .iter()
            .map(|(role, member)| Member {
                role: role.to_string(),
                member: *member,
            })
            .collect();
        self.add(osm_id, tags, PrimitiveKind::Relation(members))
    }

    /// Marks a primitive as not fully downloaded.
    pub fn set_incomplete(&mut self, id: PrimitiveId, incomplete: bool) {
        self.primitives[id.0].incomplete = incomplete;
    }

    /// Marks a primitive as deleted.
    pub fn set_deleted(&mut self, id: PrimitiveId, deleted: bool) {
        self.primitives[id.0].deleted = deleted;
    }

    /// Builds the back-reference index; call once, after the last add.
    pub fn build_referrers(&mut self) {
        self.referrers = vec![Vec::new(); self.primitives.len()];
        for (index, primitive) in self.primitives.iter().enumerate() {
            let referrer = PrimitiveId(index);
            match &primitive.kind {
                PrimitiveKind::Node(_) => {}
                PrimitiveKind::Way(nodes) => {
                    for node in nodes {
                        self.referrers[node.0].push(referrer);
                    }
                }
                PrimitiveKind::Relation(members) => {
                    for member in members {
                        self.referrers[member.member.0].push(referrer);
                    }
                }
            }
        }
    }

    /// Enumerates every primitive of the dataset, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = PrimitiveId> + '_ {
        (0..self.primitives.len()).map(PrimitiveId)
    }

    /// Returns the underlying OSM object ID.
    pub fn osm_id(&self, id: PrimitiveId) -> i64 {
        self.primitives[id.0].osm_id
    }

    /// Is this primitive a node?
    pub fn is_node(&self, id: PrimitiveId) -> bool {
        matches!(self.primitives[id.0].kind, PrimitiveKind::Node(_))
    }

    /// Is this primitive a way?
    pub fn is_way(&self, id: PrimitiveId) -> bool {
        matches!(self.primitives[id.0].kind, PrimitiveKind::Way(_))
    }

    /// Is this primitive a relation?
    pub fn is_relation(&self, id: PrimitiveId) -> bool {
        matches!(self.primitives[id.0].kind, PrimitiveKind::Relation(_))
    }

    /// Returns the value of a tag, if present.
    pub fn get_tag(&self, id: PrimitiveId, key: &str) -> Option<&str> {
        self.primitives[id.0].tags.get(key).map(|value| value.as_str())
    }

    /// Returns the value of a tag, falling back to a default.
    pub fn tag_or<'a>(&'a self, id: PrimitiveId, key: &str, default: &'a str) -> &'a str {
        self.get_tag(id, key).unwrap_or(default)
    }

    /// Does this primitive carry the given tag key?
    pub fn has_key(&self, id: PrimitiveId, key: &str) -> bool {
        self.primitives[id.0].tags.contains_key(key)
    }

    /// Does this primitive carry any of the given tag keys?
    pub fn has_any_key(&self, id: PrimitiveId, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has_key(id, key))
    }

    /// Does this primitive carry the given key with exactly the given value?
    pub fn has_tag(&self, id: PrimitiveId, key: &str, value: &str) -> bool {
        self.get_tag(id, key) == Some(value)
    }

    /// Does this primitive carry the given key with a different value?
    pub fn has_tag_different(&self, id: PrimitiveId, key: &str, value: &str) -> bool {
        match self.get_tag(id, key) {
            Some(actual) => actual != value,
            None => false,
        }
    }

    /// Returns the primitives referencing this one. Empty before build_referrers().
    pub fn referrers(&self, id: PrimitiveId) -> &[PrimitiveId] {
        match self.referrers.get(id.0) {
            Some(list) => list,
            None => &[],
        }
    }

    /// Returns the ordered member list of a relation; empty for other kinds.
    pub fn members(&self, id: PrimitiveId) -> &[Member] {
        match &self.primitives[id.0].kind {
            PrimitiveKind::Relation(members) => members,
            _ => &[],
        }
    }

    /// Returns the coordinate of a node, if resolved.
    pub fn node_coord(&self, id: PrimitiveId) -> Option<geometry::LatLon> {
        match &self.primitives[id.0].kind {
            PrimitiveKind::Node(coord) => *coord,
            _ => None,
        }
    }

    /// Returns the ordered node list of a way; empty for other kinds.
    pub fn way_nodes(&self, id: PrimitiveId) -> &[PrimitiveId] {
        match &self.primitives[id.0].kind {
            PrimitiveKind::Way(nodes) => nodes,
            _ => &[],
        }
    }

    fn bbox(&self, id: PrimitiveId, visited: &mut HashSet<PrimitiveId>) -> Option<Bbox> {
        if !visited.insert(id) {
            // Cyclic relation membership.
            return None;
        }

        match &self.primitives[id.0].kind {
            PrimitiveKind::Node(coord) => coord.map(|c| Bbox::from_point(&c)),
            PrimitiveKind::Way(nodes) => {
                let mut ret: Option<Bbox> = None;
                for node in nodes {
                    if let Some(coord) = self.node_coord(*node) {
                        let point = Bbox::from_point(&coord);
                        ret = Some(match ret {
                            Some(bbox) => bbox.union(&point),
                            None => point,
                        });
                    }
                }
                ret
            }
            PrimitiveKind::Relation(members) => {
                let mut ret: Option<Bbox> = None;
                for member in members {
                    if let Some(bbox) = self.bbox(member.member, visited) {
                        ret = Some(match ret {
                            Some(acc) => acc.union(&bbox),
                            None => bbox,
                        });
                    }
                }
                ret
            }
        }
    }

    /// Returns the center of the bounding box of a primitive, if any of its geometry is
    /// resolved.
    pub fn bbox_center(&self, id: PrimitiveId) -> Option<geometry::LatLon> {
        let mut visited: HashSet<PrimitiveId> = HashSet::new();
        self.bbox(id, &mut visited).map(|bbox| bbox.center())
    }

    /// A primitive is usable when it is neither deleted nor incomplete.
    pub fn is_usable(&self, id: PrimitiveId) -> bool {
        let primitive = &self.primitives[id.0];
        !primitive.deleted && !primitive.incomplete
    }

    /// Is this primitive not fully downloaded?
    pub fn is_incomplete(&self, id: PrimitiveId) -> bool {
        self.primitives[id.0].incomplete
    }
}

#[cfg(test)]
mod tests;
