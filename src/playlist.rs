//! The playlist/transport controller.
//!
//! `PlaylistController` owns the track list and the current-track cursor,
//! drives a single `MediaSource`, and projects a read-only `PlaylistView`
//! for the UI.

mod controller;
mod error;
mod model;
mod view;

pub use controller::{ControllerOptions, PlaylistController};
pub use error::{PlaylistError, Result};
pub use model::{EndPolicy, IntakeReport, PlaybackState, Track, TrackId};
pub use view::{PlaylistView, TrackRow, format_clock};
