use crate::Screen;
use dioxus::prelude::*;

#[component]
pub fn NavigationBar(current_screen: Screen, on_navigate: EventHandler<Screen>) -> Element {
    let nav_style = "display: flex; justify-content: space-around; padding: 10px; background: #f0f0f0; border-top: 1px solid #ddd;";
    let albums_active = !matches!(current_screen, Screen::Unsorted);

    rsx! {
        div {
            style: "{nav_style}",

            button {
                style: if albums_active {
                    "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #0066cc; color: #ffffff;"
                } else {
                    "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #ffffff; color: #333;"
                },
                onclick: move |_| on_navigate.call(Screen::Albums),
                "🖼 Albums"
            }

            button {
                style: if !albums_active {
                    "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #0066cc; color: #ffffff;"
                } else {
                    "flex: 1; padding: 12px; margin: 0 5px; border: none; border-radius: 8px; cursor: pointer; font-size: 14px; text-align: center; background: #ffffff; color: #333;"
                },
                onclick: move |_| on_navigate.call(Screen::Unsorted),
                "🗂 Unsorted"
            }
        }
    }
}
