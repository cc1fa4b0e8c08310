pub mod handle;

use crate::playback::machine::EndReason;
use crate::playback::snapshot::StorySnapshot;
pub use handle::StoryProgressHandle;

/// Updates published while a story session runs
#[derive(Debug, Clone)]
pub enum StoryProgress {
    /// Anything observable changed (slide, pause, mute)
    StateChanged { snapshot: StorySnapshot },
    /// Per-frame progress of the current slide, for the progress bar
    FrameUpdate { index: usize, progress: f64 },
    /// The slide's timer ran out on its own
    SlideCompleted { index: usize },
    /// The session is over; no further events follow
    SessionEnded { reason: EndReason },
}
