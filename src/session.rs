use crate::catalog::StoryCatalog;
use crate::config::PlaybackConfig;
use crate::playback::{PlaybackError, StoryHandle, StoryService};
use tracing::info;

/// Entry screen shown while no story is open
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileCard {
    pub display_name: String,
    /// CSS color of the ring around the avatar
    pub outline_color: String,
    /// Avatar URL; a placeholder is drawn when unset
    pub image: Option<String>,
}

impl Default for ProfileCard {
    fn default() -> Self {
        ProfileCard {
            display_name: "Binaryhood".to_string(),
            outline_color: "#33ad1d".to_string(),
            image: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerScreen {
    Profile,
    Story,
}

/// Opens and tears down story sessions.
///
/// At most one session is live. Each `open` starts from slide 0 with fresh
/// session values; nothing carries over from a previous session.
pub struct StoryViewer {
    catalog: StoryCatalog,
    config: PlaybackConfig,
    runtime: tokio::runtime::Handle,
    active: Option<StoryHandle>,
    opened: u64,
}

impl StoryViewer {
    pub fn new(
        catalog: StoryCatalog,
        config: PlaybackConfig,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        StoryViewer {
            catalog,
            config,
            runtime,
            active: None,
            opened: 0,
        }
    }

    /// Start a new session, closing the live one first if any
    pub fn open(&mut self) -> Result<StoryHandle, PlaybackError> {
        self.close();

        let handle = StoryService::start(self.catalog.clone(), self.config, &self.runtime)?;
        self.opened += 1;
        info!(
            "Opened story session #{} ({} slides)",
            self.opened,
            self.catalog.len()
        );

        self.active = Some(handle.clone());
        Ok(handle)
    }

    /// Close the live session. No-op when nothing is open.
    pub fn close(&mut self) {
        if let Some(handle) = self.active.take() {
            if !handle.is_closed() {
                info!("Closing story session #{}", self.opened);
                handle.close();
            }
        }
    }

    pub fn screen(&self) -> ViewerScreen {
        match &self.active {
            Some(handle) if !handle.is_closed() => ViewerScreen::Story,
            _ => ViewerScreen::Profile,
        }
    }

    /// Handle to the live session, if it has not ended
    pub fn active(&self) -> Option<&StoryHandle> {
        self.active.as_ref().filter(|handle| !handle.is_closed())
    }

    pub fn catalog(&self) -> &StoryCatalog {
        &self.catalog
    }

    pub fn sessions_opened(&self) -> u64 {
        self.opened
    }
}

impl Drop for StoryViewer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StoryKind;
    use crate::playback::{PlaybackState, StoryProgress};
    use std::time::Duration;

    fn viewer(slides: usize) -> StoryViewer {
        let catalog =
            StoryCatalog::from_entries((0..slides).map(|i| (StoryKind::Image, format!("{i}.png"))))
                .unwrap();
        let config = PlaybackConfig {
            base_duration: Duration::from_millis(1000),
            frame_interval: Duration::from_millis(100),
        };
        StoryViewer::new(catalog, config, tokio::runtime::Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn starts_on_the_profile_screen() {
        let viewer = viewer(2);
        assert_eq!(viewer.screen(), ViewerScreen::Profile);
        assert_eq!(viewer.sessions_opened(), 0);
        assert!(viewer.active().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn open_and_close_switch_screens() {
        let mut viewer = viewer(2);
        let handle = viewer.open().unwrap();
        assert_eq!(viewer.screen(), ViewerScreen::Story);

        viewer.close();
        assert_eq!(viewer.screen(), ViewerScreen::Profile);
        assert!(handle.snapshot().await.is_none());
        assert!(handle.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn reopening_starts_fresh_and_tears_down_the_old_session() {
        let mut viewer = viewer(3);
        let first = viewer.open().unwrap();
        first.tap_right();
        first.toggle_mute();
        assert_eq!(first.snapshot().await.unwrap().current_index, 1);

        let second = viewer.open().unwrap();
        assert!(first.snapshot().await.is_none());

        let snapshot = second.snapshot().await.unwrap();
        assert_eq!(snapshot.current_index, 0);
        assert!(!snapshot.muted);
        assert_eq!(snapshot.state, PlaybackState::Playing);
        assert_eq!(viewer.sessions_opened(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn natural_finish_returns_to_profile() {
        let mut viewer = viewer(1);
        let handle = viewer.open().unwrap();
        let mut progress_rx = handle.subscribe_progress();

        while let Some(progress) = progress_rx.recv().await {
            if matches!(progress, StoryProgress::SessionEnded { .. }) {
                break;
            }
        }

        assert!(handle.snapshot().await.is_none());
        assert_eq!(viewer.screen(), ViewerScreen::Profile);
    }
}
