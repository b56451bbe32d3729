//! File intake: turns directories on disk into `FileEntry` values.
//!
//! Entries carry a MIME type classified from the file extension; the
//! playlist decides what to accept based on it.

mod display;
mod intake;
mod model;

pub use display::display_from_fields;
pub use intake::{mime_for_path, scan};
pub use model::FileEntry;

#[cfg(test)]
mod tests;
