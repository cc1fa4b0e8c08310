pub mod profile;
pub mod progress_bars;
pub mod slide;
pub mod story_controls;
pub mod story_hooks;
pub mod story_screen;

pub use profile::ProfileScreen;
pub use progress_bars::ProgressBars;
pub use slide::SlideSurface;
pub use story_controls::StoryControls;
pub use story_hooks::*;
pub use story_screen::StoryScreen;
