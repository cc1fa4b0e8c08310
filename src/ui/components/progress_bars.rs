use dioxus::prelude::*;

/// One segment per slide, filled by how much of it has been shown
#[component]
pub fn ProgressBars(fills: Vec<f64>) -> Element {
    rsx! {
        div { class: "progress-row",
            for (index, fill) in fills.into_iter().enumerate() {
                div { key: "{index}", class: "progress-track",
                    div {
                        class: "progress-fill",
                        style: "width: {fill.clamp(0.0, 1.0) * 100.0}%;",
                    }
                }
            }
        }
    }
}
