//! Playlist value types: tracks, playback state and end-of-list policy.

use std::fmt;
use std::time::Duration;

use crate::media::ResourceHandle;

/// Identifies a track for as long as it stays in the playlist. Never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(pub(crate) u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub struct Track {
    pub id: TrackId,
    pub display_name: String,
    pub resource: ResourceHandle,
    /// Unknown until the media source reports it.
    pub duration: Option<Duration>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track loaded.
    #[default]
    Idle,
    /// Bound, waiting for the play request to settle.
    Loading,
    Playing,
    Paused,
    /// Playback was declined; a user action may retry.
    Blocked,
    /// The last track finished and nothing followed it.
    Ended,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Blocked => "Blocked (press play)",
            Self::Ended => "Ended",
        }
    }
}

/// What happens when the current track finishes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EndPolicy {
    /// Always advance, wrapping from the last track to the first.
    #[default]
    Wrap,
    /// Advance until the last track, then stop in `Ended`.
    StopAtEnd,
}

impl EndPolicy {
    pub fn toggled(self) -> Self {
        match self {
            Self::Wrap => Self::StopAtEnd,
            Self::StopAtEnd => Self::Wrap,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Wrap => "Wrap",
            Self::StopAtEnd => "Stop at end",
        }
    }
}

/// Result of offering files to the playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeReport {
    /// Appended to the playlist.
    pub accepted: usize,
    /// Not audio; dropped silently.
    pub skipped: usize,
    /// Audio, but its resource could not be acquired.
    pub failed: usize,
}
