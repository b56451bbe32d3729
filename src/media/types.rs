//! Small value types shared by media sources and their consumers.

use std::fmt;
use std::time::Duration;

/// Monotonic tag identifying one binding of a resource into a media source.
///
/// Every event a source emits carries the generation of the binding that
/// produced it, so consumers can drop results that belong to an older one.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub const ZERO: Self = Self(0);

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    #[cfg(test)]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// How a play request settled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Ok,
    /// The platform declined to start playback. Expected; a user action
    /// may retry it.
    Blocked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Duration of the bound resource became known.
    MetadataReady {
        generation: Generation,
        duration: Duration,
    },
    /// Playback position advanced.
    TimeUpdate {
        generation: Generation,
        position: Duration,
    },
    /// The bound resource played to its end.
    Ended { generation: Generation },
    /// A play request started playback.
    Played { generation: Generation },
    /// A play request was declined.
    PlayBlocked { generation: Generation },
}

impl MediaEvent {
    /// The event reporting how a play request for `generation` settled.
    pub fn settled(generation: Generation, outcome: PlayOutcome) -> Self {
        match outcome {
            PlayOutcome::Ok => Self::Played { generation },
            PlayOutcome::Blocked => Self::PlayBlocked { generation },
        }
    }

    pub fn generation(&self) -> Generation {
        match self {
            Self::MetadataReady { generation, .. }
            | Self::TimeUpdate { generation, .. }
            | Self::Ended { generation }
            | Self::Played { generation }
            | Self::PlayBlocked { generation } => *generation,
        }
    }
}
