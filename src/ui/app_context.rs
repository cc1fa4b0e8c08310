use crate::config;
use crate::session::StoryViewer;
use std::sync::{Arc, Mutex};

/// The viewer is shared between the UI thread and whoever else opens sessions
pub type SharedViewer = Arc<Mutex<StoryViewer>>;

#[derive(Clone)]
pub struct AppContext {
    pub config: config::Config,
    pub viewer: SharedViewer,
}
