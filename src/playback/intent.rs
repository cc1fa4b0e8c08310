use tokio::time::Instant;
use tracing::{debug, error};

use super::machine::{PlaybackMachine, Transition};
use super::PlaybackError;

/// Pre-classified user input accepted by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Tap on the left half: previous slide
    TapLeft,
    /// Tap on the right half: next slide
    TapRight,
    /// Long press began: pause
    HoldStart,
    /// Long press released: resume
    HoldEnd,
    ToggleMute,
    TogglePause,
    Close,
}

/// Apply an intent to the machine.
///
/// Intents that make no sense in the current state (a double tap on pause, a
/// release without a hold) are dropped and reported as `Ok(None)`. Any other
/// error means the machine's own preconditions were broken.
pub fn dispatch(
    machine: &mut PlaybackMachine,
    intent: Intent,
    now: Instant,
) -> Result<Option<Transition>, PlaybackError> {
    let result = match intent {
        Intent::TapLeft => machine.previous(now),
        Intent::TapRight => machine.next(now),
        Intent::HoldStart => machine.pause(now),
        Intent::HoldEnd => machine.resume(now),
        Intent::ToggleMute => machine.toggle_mute(),
        Intent::TogglePause => machine.toggle_pause(now),
        Intent::Close => machine.close(now),
    };

    match result {
        Ok(transition) => Ok(Some(transition)),
        Err(PlaybackError::InvalidTransition { intent: name, state }) => {
            debug!("Ignoring {:?} ({} while {:?})", intent, name, state);
            Ok(None)
        }
        Err(e) => {
            error!("Failed to apply {:?}: {}", intent, e);
            Err(e)
        }
    }
}
