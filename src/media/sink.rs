//! Opening files for `rodio` and preparing sinks.
//!
//! A source is opened first so its reported duration can be inspected
//! before deciding where to start; the sink is then built paused at that
//! position.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

use lofty::file::AudioFile;
use rodio::decoder::DecoderError;
use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

pub(super) type FileDecoder = Decoder<BufReader<File>>;

#[derive(Debug, Error)]
pub(super) enum SinkError {
    #[error("no audio output device")]
    NoOutput,
    #[error("failed to open file: {0}")]
    Open(#[from] io::Error),
    #[error("failed to decode file: {0}")]
    Decode(#[from] DecoderError),
}

/// Open and decode `path`.
pub(super) fn open_source(path: &Path) -> Result<FileDecoder, SinkError> {
    let file = File::open(path)?;
    Ok(Decoder::new(BufReader::new(file))?)
}

/// Create a paused `Sink` playing `source` from `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    source: FileDecoder,
    start_at: Duration,
    volume: f32,
) -> Sink {
    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(source.skip_duration(start_at));
    sink.set_volume(volume);
    sink.pause();
    sink
}

/// Read the duration from container headers, without decoding.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}
