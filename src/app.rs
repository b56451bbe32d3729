//! Application module: the cursor model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list cursor, the
//! follow-playback flag and the startup directories.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
