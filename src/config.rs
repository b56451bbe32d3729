//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that drives playback, controls,
//! intake and logging, plus helpers to load it from disk and environment.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
