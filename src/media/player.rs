use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;

use crate::config::AudioSettings;

use super::resource::ResourceHandle;
use super::source::MediaSource;
use super::thread::{AudioCmd, spawn_audio_thread};
use super::types::{Generation, MediaEvent};

/// `MediaSource` backed by a `rodio` sink on a dedicated audio thread.
pub struct RodioSource {
    tx: Sender<AudioCmd>,
    join: Option<JoinHandle<()>>,
    quit_fade_out_ms: u64,
}

impl RodioSource {
    /// Start the audio thread. Events are delivered on the returned receiver.
    pub fn spawn(settings: &AudioSettings) -> (Self, Receiver<MediaEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<MediaEvent>();

        let join = spawn_audio_thread(rx, event_tx);

        let source = Self {
            tx,
            join: Some(join),
            quit_fade_out_ms: settings.quit_fade_out_ms,
        };
        (source, event_rx)
    }

    #[cfg(test)]
    pub(super) fn quit_fade_out_ms(&self) -> u64 {
        self.quit_fade_out_ms
    }

    fn send(&self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            debug!(cmd = ?e.0, "audio thread is gone, dropping command");
        }
    }

    /// Fade out, stop the audio thread and wait for it. Idempotent.
    pub fn quit_softly(&mut self) {
        let Some(join) = self.join.take() else {
            return;
        };
        self.send(AudioCmd::Quit {
            fade_out_ms: self.quit_fade_out_ms,
        });
        if join.join().is_err() {
            tracing::error!("audio thread panicked");
        }
    }
}

impl MediaSource for RodioSource {
    fn bind(&mut self, resource: &ResourceHandle, generation: Generation) {
        self.send(AudioCmd::Bind {
            path: resource.path().to_path_buf(),
            generation,
        });
    }

    fn unbind(&mut self) {
        self.send(AudioCmd::Unbind);
    }

    fn play(&mut self, generation: Generation) {
        self.send(AudioCmd::Play(generation));
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(AudioCmd::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(AudioCmd::SetVolume(level));
    }
}

impl Drop for RodioSource {
    fn drop(&mut self) {
        self.quit_softly();
    }
}
