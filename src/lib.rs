/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

//! Checks for errors in OSM addresses and associatedStreet relations.

pub mod addresses;
pub mod context;
pub mod dataset;
pub mod geometry;
pub mod overpass;
