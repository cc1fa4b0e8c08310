use dioxus::desktop::{Config as DioxusConfig, WindowBuilder};
use dioxus::prelude::*;
use std::sync::PoisonError;
use tracing::{debug, error};

use crate::playback::StoryHandle;
use crate::session::ViewerScreen;
use crate::ui::components::*;
use crate::ui::AppContext;

pub const STORY_CSS: &str = r#"
html, body { margin: 0; height: 100%; background: #000; font-family: sans-serif; user-select: none; }
.profile-screen { height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; background: #fff; }
.profile-ring { border: 5px solid; border-radius: 80px; padding: 0; background: none; cursor: pointer; }
.profile-image { width: 100px; height: 100px; border-radius: 50px; object-fit: cover; display: block; }
.profile-placeholder { display: flex; align-items: center; justify-content: center; background: #222; color: #fff; font-size: 40px; }
.profile-name { margin-top: 8px; font-size: 18px; text-align: center; }
.story-screen { position: relative; height: 100vh; overflow: hidden; background: #000; }
.slide-media { position: absolute; width: 100%; height: 100%; object-fit: cover; border-radius: 18px; }
.slide-animation { display: flex; align-items: center; justify-content: center; }
.animation-spinner { width: 64px; height: 64px; border-radius: 50%; border: 4px solid rgba(255,255,255,0.3); border-top-color: #fff; animation: story-spin 1s linear infinite; }
@keyframes story-spin { to { transform: rotate(360deg); } }
.tap-surface { position: absolute; inset: 0; }
.tap-surface:active { opacity: 0.9; }
.story-overlay { position: absolute; top: 0; left: 0; right: 0; pointer-events: none; }
.progress-row { display: flex; padding: 10px 10px 0; height: 3px; }
.progress-track { flex: 1; height: 3px; margin: 0 2px; background: rgba(255,255,255,0.5); }
.progress-fill { height: 3px; background: #fff; }
.story-top-bar { display: flex; align-items: center; justify-content: space-between; padding: 12px 15px; color: #fff; }
.story-controls { display: flex; align-items: center; pointer-events: auto; }
.control-button { width: 32px; height: 32px; margin-left: 10px; border: none; background: none; color: #fff; font-size: 20px; cursor: pointer; }
"#;

pub fn make_config() -> DioxusConfig {
    DioxusConfig::default().with_window(make_window())
}

fn make_window() -> WindowBuilder {
    WindowBuilder::new()
        .with_title("storyreel")
        .with_always_on_top(false)
        .with_inner_size(dioxus::desktop::LogicalSize::new(420, 760))
}

#[component]
pub fn App() -> Element {
    debug!("Rendering app component");

    let profile = use_context::<AppContext>().config.profile;
    let viewer = use_story_viewer();
    let mut screen = use_signal(|| ViewerScreen::Profile);
    let mut session = use_signal(|| None::<StoryHandle>);

    let story = use_memo(move || match screen() {
        ViewerScreen::Story => session(),
        ViewerScreen::Profile => None,
    });

    let open_viewer = viewer.clone();
    let open_story = move |_: ()| {
        let mut viewer = open_viewer.lock().unwrap_or_else(PoisonError::into_inner);
        match viewer.open() {
            Ok(handle) => session.set(Some(handle)),
            Err(e) => error!("Failed to open story: {}", e),
        }
        screen.set(viewer.screen());
    };

    let close_story = move |_: ()| {
        let mut viewer = viewer.lock().unwrap_or_else(PoisonError::into_inner);
        viewer.close();
        session.set(None);
        screen.set(viewer.screen());
    };

    rsx! {
        style { {STORY_CSS} }
        if let Some(handle) = story() {
            StoryScreen { handle, on_finish: close_story }
        } else {
            ProfileScreen { profile, on_open: open_story }
        }
    }
}
