use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use super::snapshot::{SlideView, StorySnapshot};
use super::timer::{ProgressTimer, TimerEvent};
use super::PlaybackError;
use crate::catalog::StoryCatalog;

/// Coarse state of a viewing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Terminal. The session values have already been reset for the next open.
    Finished,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The last slide's timer ran out (or the user skipped past it)
    Completed,
    /// The user closed the viewer
    Closed,
}

/// Mutable state of one viewing session
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub current_index: usize,
    /// Fraction of the current slide elapsed, in `[0, 1]`
    pub progress: f64,
    pub paused: bool,
    pub muted: bool,
    /// How many times "previous" was pressed on the first slide
    pub rewind_count: u32,
}

impl PlaybackSession {
    pub fn new() -> Self {
        PlaybackSession {
            current_index: 0,
            progress: 0.0,
            paused: false,
            muted: false,
            rewind_count: 0,
        }
    }

    fn reset_position(&mut self) {
        self.current_index = 0;
        self.progress = 0.0;
        self.paused = false;
        self.rewind_count = 0;
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What a single transition did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Advanced { from: usize, to: usize },
    SteppedBack { from: usize, to: usize },
    /// "Previous" on the first slide restarted it
    Rewound { index: usize, rewind_count: u32 },
    Paused { progress: f64 },
    Resumed { progress: f64 },
    MuteToggled { muted: bool },
    Finished { reason: EndReason },
}

/// Notified once per `Finished` transition
pub trait SessionListener: Send {
    fn session_ended(&mut self, reason: EndReason);
}

impl<F> SessionListener for F
where
    F: FnMut(EndReason) + Send,
{
    fn session_ended(&mut self, reason: EndReason) {
        self(reason)
    }
}

/// Owns a viewing session and applies timer completions and user intents to it.
///
/// Invariants:
/// - `current_index` stays in `[0, catalog.len() - 1]`
/// - the timer runs if and only if the state is `Playing`
/// - while paused, `session.progress` is the exact resume point
pub struct PlaybackMachine {
    catalog: StoryCatalog,
    timer: ProgressTimer,
    session: PlaybackSession,
    state: PlaybackState,
    listener: Box<dyn SessionListener>,
}

impl PlaybackMachine {
    /// Open a fresh session on slide 0 and start its timer
    pub fn open(
        catalog: StoryCatalog,
        base_duration: Duration,
        listener: impl SessionListener + 'static,
        now: Instant,
    ) -> Result<Self, PlaybackError> {
        let mut timer = ProgressTimer::new(base_duration);
        timer.start(0.0, now)?;

        info!(
            "Opening story session: {} slides, {:?} per slide",
            catalog.len(),
            base_duration
        );

        Ok(PlaybackMachine {
            catalog,
            timer,
            session: PlaybackSession::new(),
            state: PlaybackState::Playing,
            listener: Box::new(listener),
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn catalog(&self) -> &StoryCatalog {
        &self.catalog
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlaybackState::Finished
    }

    /// When the running slide will complete, if a timer is live
    pub fn timer_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Live progress of the current slide
    pub fn progress_at(&self, now: Instant) -> f64 {
        match self.state {
            PlaybackState::Playing => self.timer.fraction_at(now),
            _ => self.session.progress,
        }
    }

    /// Sample the timer. Applies the completion transition when the slide is over.
    pub fn tick(&mut self, now: Instant) -> Result<Option<Transition>, PlaybackError> {
        if self.state != PlaybackState::Playing {
            return Ok(None);
        }

        match self.timer.poll(now) {
            Some(TimerEvent::Completed { run, at }) => {
                debug!(
                    "Slide {} completed (timer run {})",
                    self.session.current_index, run
                );
                self.session.progress = 1.0;
                // The next slide starts when this one actually ended, not when we noticed.
                self.advance_or_finish(at).map(Some)
            }
            Some(TimerEvent::Tick { fraction, .. }) => {
                self.session.progress = fraction;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Skip to the next slide, or end the session on the last one
    pub fn next(&mut self, now: Instant) -> Result<Transition, PlaybackError> {
        self.prepare("next", now)?;
        self.timer.cancel(now);
        self.session.progress = 0.0;
        self.advance_or_finish(now)
    }

    /// Go back one slide. On the first slide, replay it instead.
    pub fn previous(&mut self, now: Instant) -> Result<Transition, PlaybackError> {
        self.prepare("previous", now)?;

        if self.session.paused {
            self.session.paused = false;
            self.state = PlaybackState::Playing;
        }
        self.session.progress = 0.0;
        self.timer.cancel(now);

        let from = self.session.current_index;
        let transition = if from > 0 {
            self.session.current_index = from - 1;
            Transition::SteppedBack { from, to: from - 1 }
        } else {
            self.session.rewind_count += 1;
            Transition::Rewound {
                index: 0,
                rewind_count: self.session.rewind_count,
            }
        };
        self.timer.start(0.0, now)?;

        debug!("Previous: {:?}", transition);
        Ok(transition)
    }

    /// Suspend the current slide, remembering how far it got
    pub fn pause(&mut self, now: Instant) -> Result<Transition, PlaybackError> {
        self.prepare("pause", now)?;
        if self.state != PlaybackState::Playing {
            return Err(self.invalid("pause"));
        }

        let progress = self.timer.cancel(now);
        self.session.progress = progress;
        self.session.paused = true;
        self.state = PlaybackState::Paused;

        debug!(
            "Paused slide {} at {:.3}",
            self.session.current_index, progress
        );
        Ok(Transition::Paused { progress })
    }

    /// Continue the current slide from where it was paused
    pub fn resume(&mut self, now: Instant) -> Result<Transition, PlaybackError> {
        self.prepare("resume", now)?;
        if self.state != PlaybackState::Paused {
            return Err(self.invalid("resume"));
        }

        self.session.paused = false;
        self.state = PlaybackState::Playing;

        let progress = self.session.progress;
        if progress >= 1.0 {
            // Paused on the very last instant of the slide.
            return self.advance_or_finish(now);
        }
        self.timer.start(progress, now)?;

        debug!(
            "Resumed slide {} from {:.3}",
            self.session.current_index, progress
        );
        Ok(Transition::Resumed { progress })
    }

    pub fn toggle_pause(&mut self, now: Instant) -> Result<Transition, PlaybackError> {
        match self.state {
            PlaybackState::Playing => self.pause(now),
            PlaybackState::Paused => self.resume(now),
            PlaybackState::Finished => Err(self.invalid("toggle pause")),
        }
    }

    pub fn toggle_mute(&mut self) -> Result<Transition, PlaybackError> {
        if self.state == PlaybackState::Finished {
            return Err(self.invalid("toggle mute"));
        }
        self.session.muted = !self.session.muted;
        debug!("Muted: {}", self.session.muted);
        Ok(Transition::MuteToggled {
            muted: self.session.muted,
        })
    }

    /// End the session immediately, whatever it was doing
    pub fn close(&mut self, now: Instant) -> Result<Transition, PlaybackError> {
        if self.state == PlaybackState::Finished {
            return Err(self.invalid("close"));
        }
        Ok(self.finish(EndReason::Closed, now))
    }

    /// Observable state for the renderer
    pub fn snapshot(&self, now: Instant) -> Result<StorySnapshot, PlaybackError> {
        let item = self.catalog.get(self.session.current_index)?;
        Ok(StorySnapshot {
            state: self.state,
            current_index: self.session.current_index,
            progress: self.progress_at(now),
            paused: self.session.paused,
            muted: self.session.muted,
            rewind_count: self.session.rewind_count,
            slide_count: self.catalog.len(),
            slide: SlideView {
                id: item.id,
                kind: item.kind,
                media: item.media.clone(),
                playing: self.state == PlaybackState::Playing,
                muted: self.session.muted,
            },
        })
    }

    /// Reject intents on a finished session and apply any completion that is already due
    fn prepare(&mut self, intent: &'static str, now: Instant) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Finished {
            return Err(self.invalid(intent));
        }
        while self.tick(now)?.is_some() {
            if self.state == PlaybackState::Finished {
                break;
            }
        }
        if self.state == PlaybackState::Finished {
            return Err(self.invalid(intent));
        }
        Ok(())
    }

    fn advance_or_finish(&mut self, now: Instant) -> Result<Transition, PlaybackError> {
        let from = self.session.current_index;
        if from >= self.catalog.last_index() {
            return Ok(self.finish(EndReason::Completed, now));
        }

        let to = from + 1;
        self.session.current_index = to;
        self.session.progress = 0.0;
        if self.state == PlaybackState::Playing {
            self.timer.start(0.0, now)?;
        }

        debug!("Advanced from slide {} to {}", from, to);
        Ok(Transition::Advanced { from, to })
    }

    fn finish(&mut self, reason: EndReason, now: Instant) -> Transition {
        self.timer.cancel(now);
        self.state = PlaybackState::Finished;
        info!(
            "Story session finished ({:?}) on slide {}",
            reason, self.session.current_index
        );
        self.listener.session_ended(reason);
        self.session.reset_position();
        Transition::Finished { reason }
    }

    fn invalid(&self, intent: &'static str) -> PlaybackError {
        PlaybackError::InvalidTransition {
            intent,
            state: self.state,
        }
    }
}
