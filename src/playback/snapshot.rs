use super::machine::PlaybackState;
use crate::catalog::{MediaRef, StoryKind};

/// What the rendering backend needs to draw the current slide
#[derive(Debug, Clone, PartialEq)]
pub struct SlideView {
    pub id: usize,
    pub kind: StoryKind,
    pub media: MediaRef,
    pub playing: bool,
    pub muted: bool,
}

impl SlideView {
    /// Unknown kinds leave a blank slide
    pub fn renders_nothing(&self) -> bool {
        self.kind == StoryKind::Unknown
    }
}

/// Point-in-time view of a session, pulled or pushed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct StorySnapshot {
    pub state: PlaybackState,
    pub current_index: usize,
    /// Live progress of the current slide
    pub progress: f64,
    pub paused: bool,
    pub muted: bool,
    pub rewind_count: u32,
    pub slide_count: usize,
    pub slide: SlideView,
}

impl StorySnapshot {
    /// Fill of the progress segment for slide `index`: full for slides already
    /// seen, live progress for the current one, empty for the rest.
    pub fn fill_fraction(&self, index: usize) -> f64 {
        if index < self.current_index {
            1.0
        } else if index == self.current_index {
            self.progress
        } else {
            0.0
        }
    }

    pub fn fills(&self) -> Vec<f64> {
        (0..self.slide_count)
            .map(|index| self.fill_fraction(index))
            .collect()
    }

    /// Same snapshot with the current slide's progress replaced
    pub fn with_progress(&self, progress: f64) -> Self {
        StorySnapshot {
            progress,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_at(current_index: usize, progress: f64) -> StorySnapshot {
        StorySnapshot {
            state: PlaybackState::Playing,
            current_index,
            progress,
            paused: false,
            muted: false,
            rewind_count: 0,
            slide_count: 4,
            slide: SlideView {
                id: current_index,
                kind: StoryKind::Image,
                media: MediaRef::new("slide.png"),
                playing: true,
                muted: false,
            },
        }
    }

    #[test]
    fn fills_split_into_seen_current_and_upcoming() {
        let snapshot = snapshot_at(2, 0.4);
        assert_eq!(snapshot.fills(), vec![1.0, 1.0, 0.4, 0.0]);
    }

    #[test]
    fn first_slide_has_no_completed_segments() {
        let snapshot = snapshot_at(0, 0.0);
        assert_eq!(snapshot.fills(), vec![0.0; 4]);
        assert_eq!(snapshot.fill_fraction(10), 0.0);
    }

    #[test]
    fn with_progress_only_moves_the_current_segment() {
        let snapshot = snapshot_at(1, 0.1).with_progress(0.9);
        assert_eq!(snapshot.fills(), vec![1.0, 0.9, 0.0, 0.0]);
        assert_eq!(snapshot.current_index, 1);
    }

    #[test]
    fn unknown_kind_renders_nothing() {
        let mut snapshot = snapshot_at(0, 0.0);
        assert!(!snapshot.slide.renders_nothing());
        snapshot.slide.kind = StoryKind::Unknown;
        assert!(snapshot.slide.renders_nothing());
    }
}
