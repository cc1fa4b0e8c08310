use crate::gesture::{PressTracker, TapSide, LONG_PRESS};
use crate::playback::{StoryHandle, StoryProgress, StorySnapshot};
use dioxus::desktop::use_window;
use dioxus::prelude::*;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{ProgressBars, SlideSurface, StoryControls};

#[component]
pub fn StoryScreen(handle: StoryHandle, on_finish: EventHandler<()>) -> Element {
    let window = use_window();
    let mut snapshot = use_signal(|| None::<StorySnapshot>);
    let mut tracker = use_signal(PressTracker::default);

    // Subscribe to session progress
    use_effect({
        let handle = handle.clone();
        move || {
            let handle = handle.clone();
            spawn(async move {
                let mut progress_rx = handle.subscribe_progress();
                if let Some(initial) = handle.snapshot().await {
                    snapshot.set(Some(initial));
                }

                while let Some(progress) = progress_rx.recv().await {
                    match progress {
                        StoryProgress::StateChanged { snapshot: next } => {
                            snapshot.set(Some(next));
                        }
                        StoryProgress::FrameUpdate { index, progress } => {
                            let in_step = matches!(
                                &*snapshot.read(),
                                Some(current) if current.current_index == index
                            );
                            if in_step {
                                if let Some(current) = &mut *snapshot.write() {
                                    current.progress = progress;
                                }
                            } else if let Some(fresh) = handle.snapshot().await {
                                snapshot.set(Some(fresh));
                            }
                        }
                        StoryProgress::SlideCompleted { index } => {
                            debug!("Slide {} completed", index);
                        }
                        StoryProgress::SessionEnded { reason } => {
                            info!("Story session ended: {:?}", reason);
                            on_finish.call(());
                            break;
                        }
                    }
                }
            });
        }
    });

    let press_handle = handle.clone();
    let release_handle = handle.clone();
    let leave_handle = handle.clone();
    let mute_handle = handle.clone();
    let pause_handle = handle.clone();
    let close_handle = handle.clone();

    let on_press = move |evt: MouseEvent| {
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        let side = TapSide::from_position(evt.client_coordinates().x, size.width);
        if let Some(intent) = tracker.write().press(side, Instant::now()) {
            press_handle.send(intent);
        }

        let handle = press_handle.clone();
        spawn(async move {
            tokio::time::sleep(LONG_PRESS).await;
            let held = tracker.write().poll(Instant::now());
            if let Some(intent) = held {
                handle.send(intent);
            }
        });
    };

    let on_release = move |_: MouseEvent| {
        let released = tracker.write().release(Instant::now());
        if let Some(intent) = released {
            release_handle.send(intent);
        }
    };

    let on_leave = move |_: MouseEvent| {
        let abandoned = tracker.write().cancel();
        if let Some(intent) = abandoned {
            leave_handle.send(intent);
        }
    };

    rsx! {
        div { class: "story-screen",
            if let Some(current) = snapshot() {
                SlideSurface { slide: current.slide.clone() }
                div {
                    class: "tap-surface",
                    onmousedown: on_press,
                    onmouseup: on_release,
                    onmouseleave: on_leave,
                }
                div { class: "story-overlay",
                    ProgressBars { fills: current.fills() }
                    div { class: "story-top-bar",
                        span { "{current.current_index + 1} / {current.slide_count}" }
                        StoryControls {
                            muted: current.muted,
                            paused: current.paused,
                            on_toggle_mute: move |_| mute_handle.toggle_mute(),
                            on_toggle_pause: move |_| pause_handle.toggle_pause(),
                            on_close: move |_| {
                                close_handle.close();
                                on_finish.call(());
                            },
                        }
                    }
                }
            }
        }
    }
}
