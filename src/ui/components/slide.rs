use crate::catalog::StoryKind;
use crate::playback::SlideView;
use dioxus::prelude::*;

/// Draws the current slide according to its kind
#[component]
pub fn SlideSurface(slide: SlideView) -> Element {
    let media = slide.media.to_string();

    match slide.kind {
        StoryKind::Image => rsx! {
            img { class: "slide-media", src: "{media}" }
        },
        StoryKind::Video => rsx! {
            StoryVideo { media, playing: slide.playing, muted: slide.muted }
        },
        StoryKind::Animation => rsx! {
            div { class: "slide-media slide-animation", "data-source": "{media}",
                div {
                    class: "animation-spinner",
                    style: if slide.playing { "animation-play-state: running;" } else { "animation-play-state: paused;" },
                }
            }
        },
        StoryKind::Unknown => rsx! {},
    }
}

#[component]
fn StoryVideo(media: String, playing: bool, muted: bool) -> Element {
    // The element keeps its own playback clock; follow the session's pause and mute
    use_effect(use_reactive!(|(playing, muted)| {
        let action = if playing { "play" } else { "pause" };
        let _ = document::eval(&format!(
            "const video = document.getElementById('story-video'); \
             if (video) {{ video.muted = {muted}; video.{action}(); }}"
        ));
    }));

    rsx! {
        video {
            id: "story-video",
            class: "slide-media",
            src: "{media}",
            autoplay: playing,
            muted,
        }
    }
}
