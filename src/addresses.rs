/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! The addresses module contains the address and associatedStreet checks.

use crate::context;
use crate::dataset;
use crate::geometry;
use lazy_static::lazy_static;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

/// A house number without addr:street, addr:place or any other street context.
pub const HOUSE_NUMBER_WITHOUT_STREET: u32 = 2601;
/// The same address on multiple unrelated objects, or repeated inside a relation.
pub const DUPLICATE_HOUSE_NUMBER: u32 = 2602;
/// An associatedStreet relation whose members disagree on the street name.
pub const MULTIPLE_STREET_NAMES: u32 = 2603;
/// A primitive referenced by more than one associatedStreet relation.
pub const MULTIPLE_STREET_RELATIONS: u32 = 2604;
/// A house further from its street than the configured limit.
pub const HOUSE_NUMBER_TOO_FAR: u32 = 2605;

const ADDR_HOUSE_NUMBER: &str = "addr:housenumber";
const ADDR_INTERPOLATION: &str = "addr:interpolation";
const ADDR_NEIGHBOURHOOD: &str = "addr:neighbourhood";
const ADDR_PLACE: &str = "addr:place";
const ADDR_STREET: &str = "addr:street";
const ADDR_CITY: &str = "addr:city";
const ADDR_UNIT: &str = "addr:unit";
const ADDR_FLATS: &str = "addr:flats";
const ADDR_HOUSE_NAME: &str = "addr:housename";
const ADDR_POSTCODE: &str = "addr:postcode";
const ASSOCIATED_STREET: &str = "associatedStreet";

lazy_static! {
    static ref STREET_IGNORED_CHARS: regex::Regex = regex::Regex::new(r"[ -]").unwrap();
}

/// How likely a finding is to be a real problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Likely a real problem.
    Warning,
    /// Worth a look, lowest reported tier.
    Info,
}

/// One problem reported by the checker. Never mutated once appended.
#[derive(Clone, Debug)]
pub struct Finding {
    /// How likely this is a real problem.
    pub severity: Severity,
    /// One of the category code constants of this module.
    pub code: u32,
    /// Human-readable description.
    pub message: String,
    /// The involved primitives, the subject first.
    pub primitives: Vec<dataset::PrimitiveId>,
}

/// Where findings go. Append-only, never fails.
pub trait Sink {
    /// Records one finding.
    fn append(&mut self, finding: Finding);
}

impl Sink for Vec<Finding> {
    fn append(&mut self, finding: Finding) {
        self.push(finding);
    }
}

/// Validates addresses and associatedStreet relations of one dataset. The address index is
/// built lazily on the first duplicate check and dropped at the end of the run.
pub struct AddressChecker<'a> {
    ctx: &'a context::Context,
    dataset: &'a dataset::Dataset,
    addresses: Option<HashMap<String, Vec<dataset::PrimitiveId>>>,
    ignored_addresses: HashSet<String>,
}

impl<'a> AddressChecker<'a> {
    /// Creates a checker for one run over a dataset.
    pub fn new(ctx: &'a context::Context, dataset: &'a dataset::Dataset) -> Self {
        AddressChecker {
            ctx,
            dataset,
            addresses: None,
            ignored_addresses: HashSet::new(),
        }
    }

    /// Visits every primitive of the dataset once, then drops the run-scoped index.
    pub fn run(&mut self, sink: &mut dyn Sink) {
        let dataset = self.dataset;
        for p in dataset.ids() {
            self.visit(p, sink);
        }

        self.addresses = None;
        self.ignored_addresses.clear();
    }

    /// Runs every applicable check on one primitive.
    pub fn visit(&mut self, p: dataset::PrimitiveId, sink: &mut dyn Sink) {
        self.check_house_numbers_without_street(p, sink);
        self.check_for_duplicate(p, sink);
        if self.dataset.is_relation(p) && self.dataset.has_tag(p, "type", ASSOCIATED_STREET) {
            self.check_street_relation(p, sink);
        }
    }

    /// Collects the associatedStreet relations referencing p; more than one is itself a
    /// finding, warning level only if the relations disagree on their name.
    fn get_and_check_associated_streets(
        &self,
        p: dataset::PrimitiveId,
        sink: &mut dyn Sink,
    ) -> Vec<dataset::PrimitiveId> {
        let dataset = self.dataset;
        let list: Vec<dataset::PrimitiveId> = dataset
            .referrers(p)
            .iter()
            .copied()
            .filter(|r| dataset.is_relation(*r) && dataset.has_tag(*r, "type", ASSOCIATED_STREET))
            .collect();
        if list.len() > 1 {
            let severity = match dataset.get_tag(list[0], "name") {
                Some(name) if list.iter().all(|r| dataset.has_tag(*r, "name", name)) => {
                    Severity::Info
                }
                _ => Severity::Warning,
            };
            let mut primitives = vec![p];
            primitives.extend_from_slice(&list);
            sink.append(Finding {
                severity,
                code: MULTIPLE_STREET_RELATIONS,
                message: "Multiple associatedStreet relations".into(),
                primitives,
            });
        }

        list
    }

    /// Reports a house number that has neither a street-ish tag nor another source of street
    /// context: an associatedStreet relation or an interpolation way with a street.
    fn check_house_numbers_without_street(&self, p: dataset::PrimitiveId, sink: &mut dyn Sink) {
        let dataset = self.dataset;
        let associated_streets = self.get_and_check_associated_streets(p, sink);
        if !dataset.has_key(p, ADDR_HOUSE_NUMBER)
            || dataset.has_any_key(p, &[ADDR_STREET, ADDR_PLACE, ADDR_NEIGHBOURHOOD])
        {
            return;
        }

        if !associated_streets.is_empty() {
            return;
        }

        for referrer in dataset.referrers(p) {
            if dataset.is_way(*referrer)
                && dataset.has_key(*referrer, ADDR_INTERPOLATION)
                && dataset.has_key(*referrer, ADDR_STREET)
            {
                // The interpolation way supplies the street context.
                return;
            }
        }

        sink.append(Finding {
            severity: Severity::Warning,
            code: HOUSE_NUMBER_WITHOUT_STREET,
            message: "House number without street".into(),
            primitives: vec![p],
        });
    }

    /// A POI co-locates with a building's address legitimately, so it takes no part in
    /// duplicate reporting.
    fn is_poi(&self, p: dataset::PrimitiveId) -> bool {
        self.dataset.has_any_key(
            p,
            &[
                "shop",
                "amenity",
                "tourism",
                "leisure",
                "emergency",
                "craft",
                "entrance",
                "name",
            ],
        )
    }

    /// Does this primitive carry a complete address?
    fn has_address(&self, p: dataset::PrimitiveId) -> bool {
        self.dataset.has_key(p, ADDR_HOUSE_NUMBER)
            && self.dataset.has_any_key(p, &[ADDR_STREET, ADDR_PLACE])
    }

    /// Normalizes the address of p into its canonical comparison key. Spaces and dashes in
    /// the street name are ignored, so "Mozart-Gasse", "Mozart Gasse" and "Mozartgasse" are
    /// all seen as equal.
    fn simplified_address(&self, p: dataset::PrimitiveId) -> String {
        let dataset = self.dataset;
        let street = match dataset.get_tag(p, ADDR_STREET) {
            Some(value) => value,
            None => dataset.tag_or(p, ADDR_PLACE, ""),
        };
        let street = street.to_uppercase();
        let street = STREET_IGNORED_CHARS.replace_all(&street, "");
        let parts = [
            street.as_ref(),
            dataset.tag_or(p, ADDR_HOUSE_NUMBER, ""),
            dataset.tag_or(p, ADDR_HOUSE_NAME, ""),
            dataset.tag_or(p, ADDR_UNIT, ""),
            dataset.tag_or(p, ADDR_FLATS, ""),
        ];
        parts.join(" ").trim().to_uppercase()
    }

    /// Adds p to the address index, unless it is a POI or its key is ignored.
    fn collect_address(&mut self, p: dataset::PrimitiveId) {
        if self.is_poi(p) {
            return;
        }

        let simplified = self.simplified_address(p);
        if self.ignored_addresses.contains(&simplified) {
            return;
        }

        if let Some(addresses) = self.addresses.as_mut() {
            addresses.entry(simplified).or_default().push(p);
        }
    }

    /// Builds the address index in a single dataset scan. Addresses of objects that share an
    /// addr:unit node are ignored: it is quite reasonable that multiple buildings carry such
    /// an address. An ignored key that already gained an index bucket loses it, so
    /// suppression does not depend on visitation order.
    fn init_address_map(&mut self) {
        self.addresses = Some(HashMap::new());
        self.ignored_addresses.clear();
        let dataset = self.dataset;
        for p in dataset.ids() {
            if dataset.has_key(p, ADDR_UNIT) && dataset.is_node(p) {
                for referrer in dataset.referrers(p) {
                    if !self.has_address(*referrer) {
                        continue;
                    }

                    let simplified = self.simplified_address(*referrer);
                    if !self.ignored_addresses.contains(&simplified) {
                        self.ignored_addresses.insert(simplified);
                    } else if let Some(addresses) = self.addresses.as_mut() {
                        addresses.remove(&simplified);
                    }
                }
            }
            if self.has_address(p) {
                self.collect_address(p);
            }
        }
    }

    /// Rough distance between two primitives: great-circle distance of their bounding box
    /// centers. None when either geometry is unresolved.
    fn get_distance(&self, a: dataset::PrimitiveId, b: dataset::PrimitiveId) -> Option<f64> {
        match (self.dataset.bbox_center(a), self.dataset.bbox_center(b)) {
            (Some(center_a), Some(center_b)) => {
                Some(geometry::great_circle_distance(&center_a, &center_b))
            }
            _ => None,
        }
    }

    /// Decides how serious one duplicate pair is, from the city and postcode tags plus the
    /// physical distance. Symmetric in p and p2. None means the pair is not worth reporting.
    fn classify_duplicate(
        &self,
        p: dataset::PrimitiveId,
        p2: dataset::PrimitiveId,
        distance: f64,
    ) -> Option<Severity> {
        let dataset = self.dataset;
        let city1 = dataset.get_tag(p, ADDR_CITY);
        let city2 = dataset.get_tag(p2, ADDR_CITY);
        let postcode1 = dataset.get_tag(p, ADDR_POSTCODE);
        let postcode2 = dataset.get_tag(p2, ADDR_POSTCODE);
        if let (Some(city1), Some(city2)) = (city1, city2) {
            if city1 == city2 {
                if postcode1.is_none() || postcode2.is_none() || postcode1 == postcode2 {
                    return Some(Severity::Warning);
                }

                // Identical address including the city, but the postcode differs: most
                // likely perfectly fine.
                return Some(Severity::Info);
            }

            // The address differs only by city: notify if very close, otherwise ignore.
            if distance < 200.0 {
                return Some(Severity::Info);
            }

            return None;
        }

        // At least one address has no city specified.
        if postcode1.is_some() && postcode1 == postcode2 {
            // Identical address including the postcode.
            return Some(Severity::Warning);
        }

        // City and postcode are unclear: warn if very close, otherwise only notify.
        if distance < 200.0 {
            Some(Severity::Warning)
        } else {
            Some(Severity::Info)
        }
    }

    /// Reports every other primitive sharing p's canonical address key. Each primitive is
    /// visited independently, so a bucket of size n produces n*(n-1) findings.
    fn check_for_duplicate(&mut self, p: dataset::PrimitiveId, sink: &mut dyn Sink) {
        if self.addresses.is_none() {
            self.init_address_map();
        }

        if self.is_poi(p) || !self.has_address(p) {
            return;
        }

        let simplified = self.simplified_address(p);
        if self.ignored_addresses.contains(&simplified) {
            return;
        }

        let addresses = match &self.addresses {
            Some(value) => value,
            None => {
                return;
            }
        };
        let bucket = match addresses.get(&simplified) {
            Some(value) => value,
            None => {
                return;
            }
        };
        for p2 in bucket {
            if *p2 == p {
                continue;
            }

            // The pair cannot be classified without a distance.
            let distance = match self.get_distance(p, *p2) {
                Some(value) => value,
                None => {
                    continue;
                }
            };
            let severity = match self.classify_duplicate(p, *p2, distance) {
                Some(value) => value,
                None => {
                    continue;
                }
            };
            sink.append(Finding {
                severity,
                code: DUPLICATE_HOUSE_NUMBER,
                message: format!(
                    "Duplicate house numbers '{}' ({}m)",
                    simplified, distance as i64
                ),
                primitives: vec![p, *p2],
            });
        }
    }

    /// Validates one associatedStreet relation in a single pass over its members: duplicate
    /// house numbers, street name consistency and house-to-street distance.
    fn check_street_relation(&self, r: dataset::PrimitiveId, sink: &mut dyn Sink) {
        let dataset = self.dataset;
        let relation_name = dataset.get_tag(r, "name");
        // Occurrences of each house number, to find duplicates.
        let mut number_buckets: BTreeMap<String, Vec<dataset::PrimitiveId>> = BTreeMap::new();
        // Members that disagree with the relation on the street name, the relation first.
        let mut conflicting_names: Vec<dataset::PrimitiveId> = Vec::new();
        let mut houses: Vec<dataset::PrimitiveId> = Vec::new();
        let mut streets: Vec<dataset::PrimitiveId> = Vec::new();
        for member in dataset.members(r) {
            let p = member.member;
            if member.role == "house" {
                if !houses.contains(&p) {
                    houses.push(p);
                }
                if let Some(number) = dataset.get_tag(p, ADDR_HOUSE_NUMBER) {
                    let number = number.trim().to_uppercase();
                    number_buckets.entry(number).or_default().push(p);
                }
                if let Some(name) = relation_name
                    && dataset.has_tag_different(p, ADDR_STREET, name)
                {
                    if conflicting_names.is_empty() {
                        conflicting_names.push(r);
                    }
                    if !conflicting_names.contains(&p) {
                        conflicting_names.push(p);
                    }
                }
            } else if member.role == "street" {
                if dataset.is_way(p) && !streets.contains(&p) {
                    streets.push(p);
                }
                if let Some(name) = relation_name
                    && dataset.has_tag_different(p, "name", name)
                {
                    if conflicting_names.is_empty() {
                        conflicting_names.push(r);
                    }
                    if !conflicting_names.contains(&p) {
                        conflicting_names.push(p);
                    }
                }
            }
        }

        for (number, bucket) in &number_buckets {
            if bucket.len() > 1 {
                sink.append(Finding {
                    severity: Severity::Warning,
                    code: DUPLICATE_HOUSE_NUMBER,
                    message: format!("House number '{}' duplicated", number),
                    primitives: bucket.clone(),
                });
            }
        }

        if !conflicting_names.is_empty() {
            sink.append(Finding {
                severity: Severity::Warning,
                code: MULTIPLE_STREET_NAMES,
                message: "Multiple street names in relation".into(),
                primitives: conflicting_names,
            });
        }

        if streets.is_empty() {
            return;
        }

        for house in houses {
            if dataset.is_usable(house) {
                self.check_distance(house, &streets, sink);
            }
        }
    }

    /// Reports a house that is not within the configured distance of any segment of the
    /// given street ways. An interpolation way is checked node by node instead of as a
    /// single centroid; unresolved geometry and incomplete street ways suppress the finding.
    fn check_distance(
        &self,
        house: dataset::PrimitiveId,
        streets: &[dataset::PrimitiveId],
        sink: &mut dyn Sink,
    ) {
        let dataset = self.dataset;
        let centroid: geometry::LatLon;
        if dataset.is_node(house) {
            centroid = match dataset.node_coord(house) {
                Some(value) => value,
                None => {
                    return;
                }
            };
        } else if dataset.is_way(house) {
            if dataset.has_key(house, ADDR_INTERPOLATION) {
                for node in dataset.way_nodes(house) {
                    if dataset.has_key(*node, ADDR_HOUSE_NUMBER) {
                        self.check_distance(*node, streets, sink);
                    }
                }
                return;
            }

            let coords: Vec<geometry::LatLon> = dataset
                .way_nodes(house)
                .iter()
                .filter_map(|node| dataset.node_coord(*node))
                .collect();
            centroid = match geometry::centroid(&coords) {
                Some(value) => value,
                None => {
                    return;
                }
            };
        } else {
            // Multipolygon houses are out of scope.
            return;
        }

        let max_distance = self.ctx.get_max_street_distance();
        let mut has_incomplete_ways = false;
        for street in streets {
            for pair in dataset.way_nodes(*street).windows(2) {
                match (dataset.node_coord(pair[0]), dataset.node_coord(pair[1])) {
                    (Some(a), Some(b)) => {
                        if geometry::distance_to_segment(&centroid, &a, &b) <= max_distance {
                            return;
                        }
                    }
                    _ => {
                        log::warn!(
                            "addresses: skipped a segment of way {} with an unresolved endpoint",
                            dataset.osm_id(*street)
                        );
                    }
                }
            }
            if !has_incomplete_ways && dataset.is_incomplete(*street) {
                has_incomplete_ways = true;
            }
        }

        // The distance to a partially downloaded street cannot be trusted.
        if has_incomplete_ways {
            return;
        }

        let mut primitives = vec![house];
        primitives.extend_from_slice(streets);
        sink.append(Finding {
            severity: Severity::Warning,
            code: HOUSE_NUMBER_TOO_FAR,
            message: "House number too far from street".into(),
            primitives,
        });
    }
}
