use crate::catalog::StoryCatalog;
use crate::config::PlaybackConfig;
use crate::playback::intent::{dispatch, Intent};
use crate::playback::machine::{EndReason, PlaybackMachine, SessionListener, Transition};
use crate::playback::progress::{StoryProgress, StoryProgressHandle};
use crate::playback::snapshot::StorySnapshot;
use crate::playback::PlaybackError;
use std::time::Duration;
use tokio::sync::{mpsc as tokio_mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

/// Commands sent to the story service
#[derive(Debug)]
pub enum StoryCommand {
    Intent(Intent),
    Snapshot(oneshot::Sender<StorySnapshot>),
}

/// Handle to a running story session for sending intents
#[derive(Clone)]
pub struct StoryHandle {
    command_tx: tokio_mpsc::UnboundedSender<StoryCommand>,
    progress_handle: StoryProgressHandle,
}

impl StoryHandle {
    /// Queue an intent. Intents sent after the session ended are dropped.
    pub fn send(&self, intent: Intent) {
        let _ = self.command_tx.send(StoryCommand::Intent(intent));
    }

    pub fn tap_left(&self) {
        self.send(Intent::TapLeft);
    }

    pub fn tap_right(&self) {
        self.send(Intent::TapRight);
    }

    pub fn hold_start(&self) {
        self.send(Intent::HoldStart);
    }

    pub fn hold_end(&self) {
        self.send(Intent::HoldEnd);
    }

    pub fn toggle_mute(&self) {
        self.send(Intent::ToggleMute);
    }

    pub fn toggle_pause(&self) {
        self.send(Intent::TogglePause);
    }

    pub fn close(&self) {
        self.send(Intent::Close);
    }

    /// Current state, after every intent queued before this call has been applied.
    ///
    /// Returns `None` once the session has ended.
    pub async fn snapshot(&self) -> Option<StorySnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(StoryCommand::Snapshot(reply_tx))
            .ok()?;
        reply_rx.await.ok()
    }

    pub fn subscribe_progress(&self) -> tokio_mpsc::UnboundedReceiver<StoryProgress> {
        self.progress_handle.subscribe_all()
    }

    /// True once the session has ended and the service stopped
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }
}

/// Two handles are equal when they drive the same session
impl PartialEq for StoryHandle {
    fn eq(&self, other: &Self) -> bool {
        self.command_tx.same_channel(&other.command_tx)
    }
}

/// Publishes the end of the session to progress subscribers
struct ProgressListener {
    progress_tx: tokio_mpsc::UnboundedSender<StoryProgress>,
}

impl SessionListener for ProgressListener {
    fn session_ended(&mut self, reason: EndReason) {
        let _ = self.progress_tx.send(StoryProgress::SessionEnded { reason });
    }
}

/// Event loop that owns one story session.
///
/// Timer completions, intents and frame ticks are handled one at a time on a
/// single task, so the session is never mutated re-entrantly. A completion that
/// is due wins over queued intents, which in turn win over frame updates.
pub struct StoryService {
    machine: PlaybackMachine,
    command_rx: tokio_mpsc::UnboundedReceiver<StoryCommand>,
    progress_tx: tokio_mpsc::UnboundedSender<StoryProgress>,
    frame_interval: Duration,
}

impl StoryService {
    /// Open a fresh session and spawn its event loop on `runtime_handle`
    pub fn start(
        catalog: StoryCatalog,
        config: PlaybackConfig,
        runtime_handle: &tokio::runtime::Handle,
    ) -> Result<StoryHandle, PlaybackError> {
        let (command_tx, command_rx) = tokio_mpsc::unbounded_channel();
        let (progress_tx, progress_rx) = tokio_mpsc::unbounded_channel();

        let progress_handle = StoryProgressHandle::new(progress_rx, runtime_handle);

        let listener = ProgressListener {
            progress_tx: progress_tx.clone(),
        };
        let machine =
            PlaybackMachine::open(catalog, config.base_duration, listener, Instant::now())?;

        let service = StoryService {
            machine,
            command_rx,
            progress_tx,
            frame_interval: config.frame_interval,
        };
        runtime_handle.spawn(service.run());

        Ok(StoryHandle {
            command_tx,
            progress_handle,
        })
    }

    async fn run(mut self) {
        info!("StoryService started");
        self.publish_state(Instant::now());

        let mut frames = tokio::time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let deadline = self.machine.timer_deadline();

            tokio::select! {
                biased;

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_timer(Instant::now());
                }
                command = self.command_rx.recv() => {
                    match command {
                        Some(StoryCommand::Intent(intent)) => {
                            self.on_intent(intent, Instant::now());
                        }
                        Some(StoryCommand::Snapshot(reply)) => {
                            if let Some(snapshot) = self.snapshot(Instant::now()) {
                                let _ = reply.send(snapshot);
                            }
                        }
                        None => {
                            info!("All story handles dropped, closing session");
                            if let Err(e) = self.machine.close(Instant::now()) {
                                debug!("Session already over: {}", e);
                            }
                            break;
                        }
                    }
                }
                _ = frames.tick(), if self.machine.is_playing() => {
                    self.on_frame(Instant::now());
                }
            }

            if self.machine.is_finished() {
                break;
            }
        }

        info!("StoryService stopped");
    }

    fn on_timer(&mut self, now: Instant) {
        let index = self.machine.session().current_index;
        if self.machine.timer_deadline().is_some_and(|d| d <= now) {
            let _ = self
                .progress_tx
                .send(StoryProgress::SlideCompleted { index });
        }

        match self.machine.tick(now) {
            Ok(Some(transition)) => self.after_transition(transition, now),
            Ok(None) => {}
            Err(e) => error!("Failed to advance after slide {}: {}", index, e),
        }
    }

    fn on_intent(&mut self, intent: Intent, now: Instant) {
        debug!("Intent: {:?}", intent);
        if let Ok(Some(transition)) = dispatch(&mut self.machine, intent, now) {
            self.after_transition(transition, now);
        }
    }

    fn on_frame(&mut self, now: Instant) {
        if self.machine.timer_deadline().is_some_and(|d| d <= now) {
            self.on_timer(now);
            return;
        }

        if let Err(e) = self.machine.tick(now) {
            error!("Failed to sample slide timer: {}", e);
            return;
        }
        let session = self.machine.session();
        let _ = self.progress_tx.send(StoryProgress::FrameUpdate {
            index: session.current_index,
            progress: session.progress,
        });
    }

    fn after_transition(&mut self, transition: Transition, now: Instant) {
        debug!("Transition: {:?}", transition);
        if !self.machine.is_finished() {
            self.publish_state(now);
        }
    }

    fn publish_state(&self, now: Instant) {
        if let Some(snapshot) = self.snapshot(now) {
            let _ = self
                .progress_tx
                .send(StoryProgress::StateChanged { snapshot });
        }
    }

    fn snapshot(&self, now: Instant) -> Option<StorySnapshot> {
        match self.machine.snapshot(now) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                error!("Failed to snapshot story session: {}", e);
                None
            }
        }
    }
}
