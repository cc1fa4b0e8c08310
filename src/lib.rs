// Library exports for integration tests and the desktop binary

pub mod catalog;
pub mod config;
pub mod gesture;
pub mod playback;
pub mod session;

#[cfg(feature = "desktop")]
pub mod ui;

pub use catalog::{StoryCatalog, StoryItem, StoryKind};
pub use config::{Config, PlaybackConfig};
pub use playback::{Intent, StoryHandle, StoryProgress, StoryService, StorySnapshot};
pub use session::{ProfileCard, StoryViewer, ViewerScreen};

#[cfg(feature = "desktop")]
pub use ui::AppContext;
