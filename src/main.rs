use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

mod components;
mod config;
mod error;
mod sample;

use components::{AlbumScreen, AlbumsListScreen, NavigationBar, UnsortedScreen};
use photo_kit::Album;

/// Screen navigation for the demo
#[derive(Clone, PartialEq, Debug)]
pub enum Screen {
    Albums,
    Album(Album),
    Unsorted,
}

fn main() {
    env_logger::init();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let mut current_screen = use_signal(|| Screen::Albums);

    // One sample library per run; the dispatcher receiver is pumped below.
    let boot = use_hook(|| {
        let config = config::load();
        match sample::build_services(&config) {
            Ok((services, receiver)) => {
                Some((config, services, Rc::new(RefCell::new(Some(receiver)))))
            }
            Err(e) => {
                log::error!("Failed to open the sample library: {}", e);
                None
            }
        }
    });

    let Some((config, services, receiver)) = boot else {
        return rsx! {
            div { style: "padding: 32px; font-family: sans-serif; color: #a00;",
                "Could not open the photo library. Check photos_root in photo-browser.toml."
            }
        };
    };

    use_context_provider(|| config);
    use_context_provider(|| services);
    let generation = use_context_provider(|| Signal::new(0u64));

    // The UI-thread pump: every swap an observer schedules runs here, then
    // a generation bump re-renders the subscribed views.
    use_future(move || {
        let receiver = Rc::clone(&receiver);
        let mut generation = generation;
        async move {
            let Some(mut receiver) = receiver.borrow_mut().take() else {
                return;
            };
            while receiver.run_next().await {
                generation += 1;
            }
        }
    });

    rsx! {
        div { style: "display: flex; flex-direction: column; height: 100vh; font-family: sans-serif;",

            // Main Content
            div { style: "flex: 1; overflow-y: auto;",
                match current_screen() {
                    Screen::Albums => rsx! {
                        AlbumsListScreen { on_navigate: move |s| current_screen.set(s) }
                    },
                    Screen::Album(album) => rsx! {
                        AlbumScreen { album, on_navigate: move |s| current_screen.set(s) }
                    },
                    Screen::Unsorted => rsx! {
                        UnsortedScreen {}
                    },
                }
            }

            // Bottom Navigation Bar
            NavigationBar {
                current_screen: current_screen(),
                on_navigate: move |screen| current_screen.set(screen),
            }
        }
    }
}
