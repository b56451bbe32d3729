use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use super::sink::{SinkError, create_sink_at, open_source, probe_duration};
use super::types::{Generation, MediaEvent, PlayOutcome};

const TICK: Duration = Duration::from_millis(200);
const FADE_STEPS: u32 = 20;

#[derive(Debug)]
pub(super) enum AudioCmd {
    Bind {
        path: PathBuf,
        generation: Generation,
    },
    Unbind,
    Play(Generation),
    Pause,
    Seek(Duration),
    SetVolume(f32),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// The single playback slot owned by the audio thread.
pub(super) struct Slot {
    stream: Option<OutputStream>,
    events: Sender<MediaEvent>,
    path: Option<PathBuf>,
    generation: Generation,
    sink: Option<Sink>,
    duration: Option<Duration>,
    pending_seek: Option<Duration>,
    playing: bool,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    volume: f32,
}

impl Slot {
    pub(super) fn new(stream: Option<OutputStream>, events: Sender<MediaEvent>) -> Self {
        Self {
            stream,
            events,
            path: None,
            generation: Generation::ZERO,
            sink: None,
            duration: None,
            pending_seek: None,
            playing: false,
            started_at: None,
            accumulated: Duration::ZERO,
            volume: 1.0,
        }
    }

    fn emit(&self, event: MediaEvent) {
        if self.events.send(event).is_err() {
            debug!("media event receiver is gone");
        }
    }

    pub(super) fn position(&self) -> Duration {
        let pos = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(total) => pos.min(total),
            None => pos,
        }
    }

    #[cfg(test)]
    pub(super) fn is_playing(&self) -> bool {
        self.playing
    }

    #[cfg(test)]
    pub(super) fn volume(&self) -> f32 {
        self.volume
    }

    #[cfg(test)]
    pub(super) fn set_position(&mut self, position: Duration) {
        self.accumulated = position;
        self.started_at = None;
    }

    pub(super) fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Bind { path, generation } => self.bind(path, generation),
            AudioCmd::Unbind => self.unbind(),
            AudioCmd::Play(generation) => self.play(generation),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(position) => self.seek(position),
            AudioCmd::SetVolume(level) => self.set_volume(level),
            AudioCmd::Quit { fade_out_ms } => {
                self.fade_out(Duration::from_millis(fade_out_ms));
                self.unbind();
            }
        }
    }

    fn stop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn reset(&mut self) {
        self.stop_sink();
        self.duration = None;
        self.pending_seek = None;
        self.playing = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    fn bind(&mut self, path: PathBuf, generation: Generation) {
        self.reset();
        self.generation = generation;
        let duration = probe_duration(&path);
        debug!(%generation, path = %path.display(), ?duration, "bound");
        self.path = Some(path);
        if let Some(total) = duration {
            self.duration_known(total);
        }
    }

    fn unbind(&mut self) {
        self.reset();
        self.path = None;
    }

    fn play(&mut self, generation: Generation) {
        if generation != self.generation || self.path.is_none() {
            debug!(%generation, current = %self.generation, "play request for a binding that is gone");
            self.emit(MediaEvent::settled(generation, PlayOutcome::Blocked));
            return;
        }

        if self.sink.is_none() {
            if let Err(e) = self.build_sink() {
                warn!(%generation, error = %e, "playback blocked");
                self.emit(MediaEvent::settled(generation, PlayOutcome::Blocked));
                return;
            }
        }

        if let Some(sink) = &self.sink {
            sink.play();
        }
        if !self.playing {
            self.playing = true;
            self.started_at = Some(Instant::now());
        }
        self.emit(MediaEvent::settled(generation, PlayOutcome::Ok));
    }

    fn build_sink(&mut self) -> Result<(), SinkError> {
        if self.stream.is_none() {
            return Err(SinkError::NoOutput);
        }
        let Some(path) = self.path.clone() else {
            return Ok(());
        };

        let source = open_source(&path)?;
        if self.duration.is_none() {
            if let Some(total) = rodio::Source::total_duration(&source) {
                self.duration_known(total);
            }
        }

        if let Some(stream) = self.stream.as_ref() {
            self.sink = Some(create_sink_at(stream, source, self.accumulated, self.volume));
        }
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if self.playing {
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.playing = false;
        }
    }

    fn seek(&mut self, target: Duration) {
        if self.path.is_none() {
            return;
        }
        match self.duration {
            Some(total) => self.apply_seek(target.min(total)),
            // Zero is always in range; a restart must not wait for metadata.
            None if target.is_zero() => {
                self.pending_seek = None;
                self.apply_seek(Duration::ZERO);
            }
            None => {
                debug!(?target, "duration unknown, deferring seek");
                self.pending_seek = Some(target);
            }
        }
    }

    /// Record the resource duration and apply any seek that was waiting for it.
    pub(super) fn duration_known(&mut self, total: Duration) {
        self.duration = Some(total);
        self.emit(MediaEvent::MetadataReady {
            generation: self.generation,
            duration: total,
        });
        if let Some(target) = self.pending_seek.take() {
            self.apply_seek(target.min(total));
        }
    }

    fn apply_seek(&mut self, position: Duration) {
        self.accumulated = position;
        self.started_at = self.playing.then(Instant::now);

        if self.sink.is_some() {
            // Scrubbing: rebuild the sink and skip into the file.
            self.stop_sink();
            match self.build_sink() {
                Ok(()) => {
                    if self.playing {
                        if let Some(sink) = &self.sink {
                            sink.play();
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to reopen source while seeking");
                    self.playing = false;
                    self.started_at = None;
                }
            }
        }

        self.emit(MediaEvent::TimeUpdate {
            generation: self.generation,
            position,
        });
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = if level.is_nan() {
            self.volume
        } else {
            level.clamp(0.0, 1.0)
        };
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    /// Periodic progress: report the position while playing, or the end
    /// once the sink has drained.
    pub(super) fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let drained = self.sink.as_ref().is_none_or(Sink::empty);
        if drained {
            self.accumulated = self.position();
            self.started_at = None;
            self.playing = false;
            self.emit(MediaEvent::Ended {
                generation: self.generation,
            });
        } else {
            self.emit(MediaEvent::TimeUpdate {
                generation: self.generation,
                position: self.position(),
            });
        }
    }

    fn fade_out(&mut self, fade: Duration) {
        let Some(sink) = &self.sink else {
            return;
        };
        if self.playing && !fade.is_zero() {
            let step = (fade / FADE_STEPS).max(Duration::from_millis(1));
            for i in 1..=FADE_STEPS {
                let t = i as f32 / FADE_STEPS as f32;
                sink.set_volume(self.volume * (1.0 - t));
                thread::sleep(step);
            }
        }
        sink.set_volume(0.0);
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which would
                // scribble over the terminal UI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                error!(error = %e, "no audio output device, every play will be blocked");
                None
            }
        };

        let mut slot = Slot::new(stream, events);
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(TICK.saturating_sub(last_tick.elapsed())) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    slot.handle(AudioCmd::Quit { fade_out_ms });
                    break;
                }
                Ok(cmd) => slot.handle(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            if last_tick.elapsed() >= TICK {
                slot.tick();
                last_tick = Instant::now();
            }
        }
        debug!("audio thread exiting");
    })
}
