/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! The geometry module contains coordinate math shared by the address checks.

/// Mean radius used for both the great-circle and the projected math, in meters.
const EARTH_RADIUS: f64 = 6378137.0;

/// A geographic coordinate, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    /// Latitude, -90..=90.
    pub lat: f64,
    /// Longitude, -180..=180.
    pub lon: f64,
}

impl LatLon {
    /// Creates a new LatLon.
    pub fn new(lat: f64, lon: f64) -> Self {
        LatLon { lat, lon }
    }
}

/// A point in a local planar projection, in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EastNorth {
    /// Easting, relative to the projection origin.
    pub east: f64,
    /// Northing, relative to the projection origin.
    pub north: f64,
}

/// Returns the great-circle (haversine) distance between two coordinates, in meters.
pub fn great_circle_distance(a: &LatLon, b: &LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().asin()
}

/// Returns the centroid of a coordinate list, or None for an empty list.
pub fn centroid(coords: &[LatLon]) -> Option<LatLon> {
    if coords.is_empty() {
        return None;
    }

    let lat = coords.iter().map(|c| c.lat).sum::<f64>() / coords.len() as f64;
    let lon = coords.iter().map(|c| c.lon).sum::<f64>() / coords.len() as f64;
    Some(LatLon::new(lat, lon))
}

/// Projects a coordinate to a plane around an origin, equirectangularly. Distances on the
/// resulting plane are in meters and are accurate near the origin.
pub fn project(point: &LatLon, origin: &LatLon) -> EastNorth {
    let east = (point.lon - origin.lon).to_radians() * origin.lat.to_radians().cos() * EARTH_RADIUS;
    let north = (point.lat - origin.lat).to_radians() * EARTH_RADIUS;
    EastNorth { east, north }
}

/// Returns the planar distance between two projected points, in meters.
pub fn planar_distance(a: &EastNorth, b: &EastNorth) -> f64 {
    ((a.east - b.east).powi(2) + (a.north - b.north).powi(2)).sqrt()
}

/// Returns the point of the a-b segment that is closest to p.
pub fn closest_point_on_segment(a: &EastNorth, b: &EastNorth, p: &EastNorth) -> EastNorth {
    let dx = b.east - a.east;
    let dy = b.north - a.north;
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        // Degenerate segment.
        return *a;
    }

    let t = ((p.east - a.east) * dx + (p.north - a.north) * dy) / len2;
    let t = t.clamp(0.0, 1.0);
    EastNorth {
        east: a.east + t * dx,
        north: a.north + t * dy,
    }
}

/// Returns the planar distance from p to the a-b segment, in meters. The projection is
/// centered on p, so the result is locally in meters at p's latitude.
pub fn distance_to_segment(p: &LatLon, a: &LatLon, b: &LatLon) -> f64 {
    let p_en = project(p, p);
    let a_en = project(a, p);
    let b_en = project(b, p);
    let closest = closest_point_on_segment(&a_en, &b_en, &p_en);
    planar_distance(&closest, &p_en)
}

#[cfg(test)]
mod tests;
