use std::time::Duration;

use super::model::{EndPolicy, PlaybackState, TrackId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    pub id: TrackId,
    pub display_name: String,
}

/// Read-only snapshot of the controller for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistView {
    pub tracks: Vec<TrackRow>,
    pub current_index: Option<usize>,
    pub playback_state: PlaybackState,
    pub current_time: Duration,
    /// `None` until the media source reports it.
    pub duration: Option<Duration>,
    pub volume: f32,
    pub end_policy: EndPolicy,
}

impl PlaylistView {
    /// Display name of the current track.
    pub fn title(&self) -> Option<&str> {
        self.current_index
            .and_then(|i| self.tracks.get(i))
            .map(|t| t.display_name.as_str())
    }

    /// Whether next/previous have anything to move to.
    pub fn can_navigate(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn can_toggle(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.current_index == Some(index)
    }

    /// `elapsed / total`, with an unknown total rendered as `--:--`.
    pub fn progress_text(&self) -> String {
        format!(
            "{} / {}",
            format_clock(Some(self.current_time)),
            format_clock(self.duration)
        )
    }

    /// Played fraction in `[0, 1]`, when the duration is known.
    pub fn progress_ratio(&self) -> Option<f64> {
        let total = self.duration.filter(|d| !d.is_zero())?;
        Some((self.current_time.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0))
    }
}

/// Format as `MM:SS`, or `H:MM:SS` past an hour. Unknown is `--:--`.
pub fn format_clock(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "--:--".to_string();
    };
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
