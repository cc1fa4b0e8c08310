use crate::ui::{AppContext, SharedViewer};
use dioxus::prelude::*;

/// Hook to access the story viewer
pub fn use_story_viewer() -> SharedViewer {
    let context = use_context::<AppContext>();
    context.viewer.clone()
}
