use std::time::Duration;

use super::resource::ResourceHandle;
use super::types::Generation;

/// A single playback slot.
///
/// Calls return immediately. Outcomes arrive later as `MediaEvent`s tagged
/// with the generation passed to `bind`, on whatever channel the
/// implementation was created with.
pub trait MediaSource {
    /// Replace the bound resource with `resource` and rewind to zero.
    /// Does not start playback.
    fn bind(&mut self, resource: &ResourceHandle, generation: Generation);

    /// Drop the bound resource, leaving the slot empty.
    fn unbind(&mut self);

    /// Request playback. Settles as `Played` or `PlayBlocked`, never panics.
    fn play(&mut self, generation: Generation);

    /// Pause playback. No-op when nothing is bound.
    fn pause(&mut self);

    /// Move the playback position. Clamped to the duration when it is known;
    /// otherwise held until the duration arrives.
    fn seek(&mut self, position: Duration);

    /// Output volume in `[0, 1]`.
    fn set_volume(&mut self, level: f32);
}
