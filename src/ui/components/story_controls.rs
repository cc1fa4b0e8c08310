use dioxus::prelude::*;

#[component]
pub fn StoryControls(
    muted: bool,
    paused: bool,
    on_toggle_mute: EventHandler<()>,
    on_toggle_pause: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "story-controls",
            button {
                class: "control-button",
                title: if muted { "Unmute" } else { "Mute" },
                onclick: move |_| on_toggle_mute.call(()),
                if muted { "🔇" } else { "🔊" }
            }
            button {
                class: "control-button",
                title: if paused { "Play" } else { "Pause" },
                onclick: move |_| on_toggle_pause.call(()),
                if paused { "▶" } else { "⏸" }
            }
            button {
                class: "control-button",
                title: "Close",
                onclick: move |_| on_close.call(()),
                "✕"
            }
        }
    }
}
