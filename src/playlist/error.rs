use thiserror::Error;

use super::model::TrackId;

/// Caller misuse of the playlist. Expected outcomes (blocked playback,
/// empty playlists, rejected files) are states or counts, not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaylistError {
    #[error("track index {index} out of range for playlist of {len}")]
    InvalidIndex { index: usize, len: usize },
    #[error("no track {0} in the playlist")]
    UnknownTrack(TrackId),
}

pub type Result<T> = std::result::Result<T, PlaylistError>;
