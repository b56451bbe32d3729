use std::time::Duration;

use tracing::{debug, info, warn};

use crate::library::FileEntry;
use crate::media::{Generation, MediaEvent, MediaSource, PlayOutcome, ResourceProvider};

use super::error::{PlaylistError, Result};
use super::model::{EndPolicy, IntakeReport, PlaybackState, Track, TrackId};
use super::view::{PlaylistView, TrackRow};

#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    pub end_policy: EndPolicy,
    pub volume: f32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            end_policy: EndPolicy::Wrap,
            volume: 1.0,
        }
    }
}

/// Owns the playlist and drives one `MediaSource`.
///
/// All calls are synchronous; the media source answers later through
/// `handle_event`. Every bind bumps the selection generation, and events
/// from older generations are dropped, so a late answer for a track that
/// is no longer current cannot overwrite the state of the one that is.
pub struct PlaylistController<M: MediaSource, R: ResourceProvider> {
    media: M,
    resources: R,
    tracks: Vec<Track>,
    current: Option<usize>,
    state: PlaybackState,
    generation: Generation,
    /// Generation of the play request still waiting to settle.
    pending_play: Option<Generation>,
    position: Duration,
    volume: f32,
    end_policy: EndPolicy,
    next_id: u64,
}

impl<M: MediaSource, R: ResourceProvider> PlaylistController<M, R> {
    pub fn new(mut media: M, resources: R, options: ControllerOptions) -> Self {
        let volume = sanitize_volume(options.volume, 1.0);
        media.set_volume(volume);
        Self {
            media,
            resources,
            tracks: Vec::new(),
            current: None,
            state: PlaybackState::Idle,
            generation: Generation::ZERO,
            pending_play: None,
            position: Duration::ZERO,
            volume,
            end_policy: options.end_policy,
            next_id: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[cfg(test)]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[cfg(test)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[cfg(test)]
    pub fn position(&self) -> Duration {
        self.position
    }

    #[cfg(test)]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn end_policy(&self) -> EndPolicy {
        self.end_policy
    }

    pub fn set_end_policy(&mut self, policy: EndPolicy) {
        self.end_policy = policy;
    }

    #[cfg(test)]
    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    #[cfg(test)]
    pub fn resources(&self) -> &R {
        &self.resources
    }

    pub fn index_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// Append the audio entries of `files`. Non-audio entries are skipped.
    ///
    /// When nothing is current yet and something was accepted, the first
    /// track is selected. Otherwise playback is left alone.
    pub fn add_tracks<I>(&mut self, files: I) -> IntakeReport
    where
        I: IntoIterator<Item = FileEntry>,
    {
        let mut report = IntakeReport::default();

        for entry in files {
            if !entry.is_audio() {
                debug!(path = %entry.path.display(), mime = %entry.mime_type, "skipping non-audio file");
                report.skipped += 1;
                continue;
            }
            match self.resources.create(&entry) {
                Ok(resource) => {
                    self.next_id += 1;
                    self.tracks.push(Track {
                        id: TrackId(self.next_id),
                        display_name: entry.display_name,
                        resource,
                        duration: None,
                    });
                    report.accepted += 1;
                }
                Err(e) => {
                    warn!(error = %e, "could not acquire resource");
                    report.failed += 1;
                }
            }
        }

        info!(
            accepted = report.accepted,
            skipped = report.skipped,
            failed = report.failed,
            total = self.tracks.len(),
            "tracks added"
        );

        if report.accepted > 0 && self.current.is_none() {
            self.load(0);
        }
        report
    }

    /// Drop the whole playlist, then add `files` as with `add_tracks`.
    pub fn replace_tracks<I>(&mut self, files: I) -> IntakeReport
    where
        I: IntoIterator<Item = FileEntry>,
    {
        self.clear();
        self.add_tracks(files)
    }

    /// Select the track at `index` and start it.
    ///
    /// Selecting the current track never rebinds it: it resumes when paused
    /// or blocked, and does nothing while playing or loading.
    pub fn select_track(&mut self, index: usize) -> Result<()> {
        if index >= self.tracks.len() {
            return Err(PlaylistError::InvalidIndex {
                index,
                len: self.tracks.len(),
            });
        }

        if self.current != Some(index) {
            self.load(index);
            return Ok(());
        }

        match self.state {
            PlaybackState::Playing | PlaybackState::Loading => {}
            PlaybackState::Ended => self.restart(),
            PlaybackState::Paused | PlaybackState::Blocked | PlaybackState::Idle => {
                self.request_play()
            }
        }
        Ok(())
    }

    pub fn select_id(&mut self, id: TrackId) -> Result<()> {
        let index = self.index_of(id).ok_or(PlaylistError::UnknownTrack(id))?;
        self.select_track(index)
    }

    pub fn toggle_play_pause(&mut self) {
        match self.state {
            PlaybackState::Playing | PlaybackState::Loading => {
                self.media.pause();
                self.pending_play = None;
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused | PlaybackState::Blocked => self.request_play(),
            PlaybackState::Ended => self.restart(),
            PlaybackState::Idle => {
                if !self.tracks.is_empty() {
                    self.load(0);
                }
            }
        }
    }

    /// Advance to the next track, wrapping past the end. No-op when empty.
    pub fn next(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let index = match self.current {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.load(index);
    }

    /// Step back to the previous track, wrapping before the start. No-op when empty.
    pub fn previous(&mut self) {
        let len = self.tracks.len();
        if len == 0 {
            return;
        }
        let index = match self.current {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.load(index);
    }

    /// Seek within the current track. Negative or non-finite targets mean zero.
    pub fn seek_to(&mut self, seconds: f64) {
        let Some(index) = self.current else {
            return;
        };
        let seconds = if seconds.is_finite() {
            seconds.max(0.0)
        } else {
            0.0
        };
        let mut target = Duration::from_secs_f64(seconds);
        if let Some(total) = self.tracks[index].duration {
            target = target.min(total);
        }
        self.media.seek(target);
        self.position = target;
    }

    pub fn seek_by(&mut self, delta_seconds: f64) {
        self.seek_to(self.position.as_secs_f64() + delta_seconds);
    }

    pub fn set_volume(&mut self, level: f32) {
        self.volume = sanitize_volume(level, self.volume);
        self.media.set_volume(self.volume);
    }

    pub fn adjust_volume(&mut self, delta: f32) {
        self.set_volume(self.volume + delta);
    }

    /// Remove a track and release its resource.
    ///
    /// Removing the current track unbinds the media source first and
    /// leaves the controller `Idle` with nothing selected.
    pub fn remove_track(&mut self, id: TrackId) -> Result<()> {
        let index = self.index_of(id).ok_or(PlaylistError::UnknownTrack(id))?;

        match self.current {
            Some(c) if c == index => {
                self.media.unbind();
                self.reset_selection();
            }
            Some(c) if index < c => self.current = Some(c - 1),
            _ => {}
        }

        let track = self.tracks.remove(index);
        debug!(id = %track.id, "track removed");
        self.resources.release(track.resource);
        Ok(())
    }

    /// Empty the playlist, releasing every resource.
    pub fn clear(&mut self) {
        if self.current.is_some() {
            self.media.unbind();
        }
        self.reset_selection();
        for track in self.tracks.drain(..) {
            self.resources.release(track.resource);
        }
    }

    /// Teardown: stop playback and release everything. Safe to call twice.
    pub fn shutdown(&mut self) {
        if self.is_empty() && self.current.is_none() {
            return;
        }
        info!(tracks = self.tracks.len(), "shutting down playlist");
        self.clear();
    }

    /// Apply an event from the media source.
    pub fn handle_event(&mut self, event: MediaEvent) {
        let generation = event.generation();
        if generation != self.generation || self.current.is_none() {
            debug!(%generation, current = %self.generation, ?event, "discarding stale media event");
            return;
        }

        match event {
            MediaEvent::MetadataReady { duration, .. } => {
                if let Some(track) = self.current.and_then(|i| self.tracks.get_mut(i)) {
                    track.duration = Some(duration);
                }
            }
            MediaEvent::TimeUpdate { position, .. } => self.position = position,
            MediaEvent::Played { .. } => self.settle(generation, PlayOutcome::Ok),
            MediaEvent::PlayBlocked { .. } => self.settle(generation, PlayOutcome::Blocked),
            MediaEvent::Ended { .. } => {
                if self.state == PlaybackState::Playing {
                    self.track_ended();
                } else {
                    debug!(state = ?self.state, "ignoring end outside of playback");
                }
            }
        }
    }

    pub fn view(&self) -> PlaylistView {
        PlaylistView {
            tracks: self
                .tracks
                .iter()
                .map(|t| TrackRow {
                    id: t.id,
                    display_name: t.display_name.clone(),
                })
                .collect(),
            current_index: self.current,
            playback_state: self.state,
            current_time: self.position,
            duration: self.current_track().and_then(|t| t.duration),
            volume: self.volume,
            end_policy: self.end_policy,
        }
    }

    fn settle(&mut self, generation: Generation, outcome: PlayOutcome) {
        if self.pending_play != Some(generation) {
            debug!(%generation, ?outcome, "play settled without a pending request");
            return;
        }
        self.pending_play = None;
        self.state = match outcome {
            PlayOutcome::Ok => PlaybackState::Playing,
            PlayOutcome::Blocked => {
                warn!(%generation, "playback blocked");
                PlaybackState::Blocked
            }
        };
    }

    fn track_ended(&mut self) {
        let Some(index) = self.current else {
            return;
        };
        let is_last = index + 1 >= self.tracks.len();
        if self.end_policy == EndPolicy::StopAtEnd && is_last {
            debug!("end of playlist");
            self.state = PlaybackState::Ended;
            return;
        }
        self.next();
    }

    /// Make `index` current: bind it under a fresh generation and request play.
    fn load(&mut self, index: usize) {
        self.current = Some(index);
        self.generation = self.generation.next();
        self.position = Duration::ZERO;

        let track = &self.tracks[index];
        debug!(index, id = %track.id, generation = %self.generation, "loading track");
        self.media.bind(&track.resource, self.generation);
        self.request_play();
    }

    fn restart(&mut self) {
        self.media.seek(Duration::ZERO);
        self.position = Duration::ZERO;
        self.request_play();
    }

    fn request_play(&mut self) {
        self.pending_play = Some(self.generation);
        self.state = PlaybackState::Loading;
        self.media.play(self.generation);
    }

    /// Forget the current track and invalidate anything in flight for it.
    fn reset_selection(&mut self) {
        self.current = None;
        self.state = PlaybackState::Idle;
        self.pending_play = None;
        self.position = Duration::ZERO;
        self.generation = self.generation.next();
    }
}

impl<M: MediaSource, R: ResourceProvider> Drop for PlaylistController<M, R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn sanitize_volume(level: f32, fallback: f32) -> f32 {
    if level.is_nan() {
        fallback
    } else {
        level.clamp(0.0, 1.0)
    }
}
