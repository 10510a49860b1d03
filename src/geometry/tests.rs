/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the geometry module.

use super::*;

/// Tests great_circle_distance() for a zero-length path.
#[test]
fn test_great_circle_distance_same_point() {
    let p = LatLon::new(47.0, 19.0);
    assert_eq!(great_circle_distance(&p, &p), 0.0);
}

/// Tests great_circle_distance() against one degree of longitude on the equator.
#[test]
fn test_great_circle_distance_equator_degree() {
    let a = LatLon::new(0.0, 0.0);
    let b = LatLon::new(0.0, 1.0);
    let distance = great_circle_distance(&a, &b);
    assert_eq!((distance - 111319.49).abs() < 1.0, true);
}

/// Tests that great_circle_distance() is symmetric.
#[test]
fn test_great_circle_distance_symmetric() {
    let a = LatLon::new(47.5, 19.0);
    let b = LatLon::new(47.6, 19.1);
    assert_eq!(great_circle_distance(&a, &b), great_circle_distance(&b, &a));
}

/// Tests centroid() for the empty list.
#[test]
fn test_centroid_empty() {
    assert_eq!(centroid(&[]).is_none(), true);
}

/// Tests centroid() for the happy path.
#[test]
fn test_centroid_happy() {
    let coords = [LatLon::new(0.0, 0.0), LatLon::new(2.0, 4.0)];
    assert_eq!(centroid(&coords), Some(LatLon::new(1.0, 2.0)));
}

/// Tests closest_point_on_segment() when the closest point is inside the segment.
#[test]
fn test_closest_point_on_segment_inside() {
    let a = EastNorth {
        east: 0.0,
        north: 0.0,
    };
    let b = EastNorth {
        east: 10.0,
        north: 0.0,
    };
    let p = EastNorth {
        east: 5.0,
        north: 3.0,
    };
    let closest = closest_point_on_segment(&a, &b, &p);
    assert_eq!(
        closest,
        EastNorth {
            east: 5.0,
            north: 0.0
        }
    );
    assert_eq!(planar_distance(&closest, &p), 3.0);
}

/// Tests closest_point_on_segment() when the closest point is clamped to an endpoint.
#[test]
fn test_closest_point_on_segment_clamped() {
    let a = EastNorth {
        east: 0.0,
        north: 0.0,
    };
    let b = EastNorth {
        east: 10.0,
        north: 0.0,
    };
    let p = EastNorth {
        east: -5.0,
        north: 3.0,
    };
    assert_eq!(closest_point_on_segment(&a, &b, &p), a);
}

/// Tests closest_point_on_segment() for a zero-length segment.
#[test]
fn test_closest_point_on_segment_degenerate() {
    let a = EastNorth {
        east: 1.0,
        north: 2.0,
    };
    let p = EastNorth {
        east: 4.0,
        north: 6.0,
    };
    assert_eq!(closest_point_on_segment(&a, &a, &p), a);
    assert_eq!(planar_distance(&a, &p), 5.0);
}

/// Tests distance_to_segment() for a point next to an east-west street.
#[test]
fn test_distance_to_segment() {
    let a = LatLon::new(0.0, -0.01);
    let b = LatLon::new(0.0, 0.01);
    let p = LatLon::new(0.001, 0.0);
    let distance = distance_to_segment(&p, &a, &b);
    assert_eq!((distance - 111.32).abs() < 0.1, true);
}
