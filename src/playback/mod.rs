pub mod intent;
pub mod machine;
pub mod progress;
pub mod service;
pub mod snapshot;
pub mod timer;

use crate::catalog::CatalogError;
use thiserror::Error;

pub use intent::{dispatch, Intent};
pub use machine::{
    EndReason, PlaybackMachine, PlaybackSession, PlaybackState, SessionListener, Transition,
};
pub use progress::StoryProgress;
pub use service::{StoryHandle, StoryService};
pub use snapshot::{SlideView, StorySnapshot};
pub use timer::{ProgressTimer, TimerEvent};

/// Errors raised by the playback core
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Progress fraction {0} is outside [0, 1)")]
    InvalidFraction(f64),
    #[error("Cannot {intent} while {state:?}")]
    InvalidTransition {
        intent: &'static str,
        state: PlaybackState,
    },
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
