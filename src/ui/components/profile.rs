use crate::session::ProfileCard;
use dioxus::prelude::*;

/// Avatar with a colored ring; pressing it opens the reel
#[component]
pub fn ProfileScreen(profile: ProfileCard, on_open: EventHandler<()>) -> Element {
    let initial = profile
        .display_name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();

    rsx! {
        div { class: "profile-screen",
            button {
                class: "profile-ring",
                style: "border-color: {profile.outline_color};",
                onclick: move |_| on_open.call(()),
                if let Some(image) = profile.image.clone() {
                    img { class: "profile-image", src: "{image}" }
                } else {
                    div { class: "profile-image profile-placeholder", "{initial}" }
                }
            }
            div { class: "profile-name", "{profile.display_name}" }
        }
    }
}
