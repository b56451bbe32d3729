//! Media source abstraction and the `rodio` playback backend.
//!
//! A `MediaSource` plays one bound resource at a time and reports what
//! happens to it through `MediaEvent`s pushed on a channel.

mod player;
mod resource;
mod sink;
mod source;
mod thread;
mod types;

pub use player::RodioSource;
pub use resource::{FileResources, ResourceError, ResourceHandle, ResourceProvider};
pub use source::MediaSource;
pub use types::{Generation, MediaEvent, PlayOutcome};
