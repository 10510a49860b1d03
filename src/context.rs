/*
 * Copyright 2025 Miklos Vajna
 *
 * SPDX-License-Identifier: MIT
 */

#![deny(warnings)]
#![warn(clippy::all)]
#![warn(missing_docs)]

//! The context module contains the configuration of one validation run.

/// Configuration of a validation run, provided by the host and passed to every check. The
/// checker keeps no other cross-run state.
#[derive(Clone, Debug)]
pub struct Context {
    max_street_distance: f64,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            max_street_distance: 200.0,
        }
    }
}

impl Context {
    /// Creates a context with the default settings.
    pub fn new() -> Self {
        Context::default()
    }

    /// Maximum permitted house-to-street planar distance, in meters.
    pub fn get_max_street_distance(&self) -> f64 {
        self.max_street_distance
    }

    /// Overrides the maximum house-to-street distance.
    pub fn set_max_street_distance(&mut self, meters: f64) {
        self.max_street_distance = meters;
    }
}

#[cfg(test)]
mod tests;
