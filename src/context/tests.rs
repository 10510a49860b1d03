/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! Tests for the context module.

use super::*;

/// Tests the default max street distance.
#[test]
fn test_default() {
    let ctx = Context::new();
    assert_eq!(ctx.get_max_street_distance(), 200.0);
}

/// Tests overriding the max street distance.
#[test]
fn test_set_max_street_distance() {
    let mut ctx = Context::new();
    ctx.set_max_street_distance(50.0);
    assert_eq!(ctx.get_max_street_distance(), 50.0);
}
