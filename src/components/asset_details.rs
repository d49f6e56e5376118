use std::sync::Arc;

use dioxus::prelude::*;

use photo_kit::{Asset, PhotoLibraryServices, StaticAsset};

use super::thumbnail::ImageLoadState;
use crate::sample;

/// Full-screen details for one asset: a full-size preview, the favorite
/// toggle, and the albums containing it. Backed by an observable
/// [`Asset`], so a committed favorite edit flows back in through the
/// change pipeline and re-renders the heart.
#[component]
pub fn AssetDetails(asset: StaticAsset, on_close: EventHandler<()>) -> Element {
    let services: PhotoLibraryServices = use_context();
    let generation: Signal<u64> = use_context();
    let live = use_hook({
        let asset = asset.clone();
        move || Asset::observing(asset, &services)
    });
    let _ = generation();

    let mut image = use_signal(|| ImageLoadState::Loading);
    use_future({
        let live = Arc::clone(&live);
        move || {
            let live = Arc::clone(&live);
            async move {
                let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
                live.get_full_size_preview_image(None, move |result, _info| {
                    let _ = tx.send(result.map(|image| sample::data_url(image.as_ref())));
                });
                while let Some(result) = rx.recv().await {
                    match result {
                        Ok(Some(url)) => image.set(ImageLoadState::Loaded(url)),
                        Ok(None) => image.set(ImageLoadState::Failed),
                        Err(e) => {
                            log::warn!("Full-size preview failed: {}", e);
                            image.set(ImageLoadState::Failed);
                        }
                    }
                }
            }
        }
    });

    let is_favorite = live.is_favorite();
    let heart = if is_favorite { "♥" } else { "♡" };
    let album_titles: Vec<String> = live.albums().iter().map(|album| album.title()).collect();
    let toggled = Arc::clone(&live);

    rsx! {
        div { style: "position: fixed; inset: 0; background: rgba(0, 0, 0, 0.85); display: flex; flex-direction: column; align-items: center; padding: 24px; overflow-y: auto; z-index: 10;",
            div { style: "width: 100%; max-width: 700px; display: flex; justify-content: space-between; align-items: center;",
                button {
                    style: "border: none; background: none; color: white; font-size: 22px; cursor: pointer;",
                    onclick: move |_| on_close.call(()),
                    "✕"
                }
                button {
                    style: "border: none; background: none; color: #ff4060; font-size: 28px; cursor: pointer;",
                    onclick: move |_| {
                        toggled.toggle_favorite(|result| {
                            if let Err(e) = result {
                                log::warn!("Favorite toggle failed: {}", e);
                            }
                        });
                    },
                    "{heart}"
                }
            }
            div { style: "flex: 1; width: 100%; max-width: 700px; display: flex; align-items: center; justify-content: center; margin: 16px 0;",
                match image() {
                    ImageLoadState::Loaded(url) => rsx! {
                        img {
                            style: "max-width: 100%; max-height: 70vh; object-fit: contain;",
                            src: "{url}",
                        }
                    },
                    ImageLoadState::Loading => rsx! {
                        div { style: "color: #999;", "Loading…" }
                    },
                    ImageLoadState::Failed => rsx! {
                        div { style: "width: 320px; height: 240px; background: #555;" }
                    },
                }
            }
            div { style: "width: 100%; max-width: 700px; color: white;",
                h3 { style: "font-size: 16px; margin-bottom: 8px;", "Albums" }
                if album_titles.is_empty() {
                    p { style: "color: #aaa;", "Not in any album." }
                }
                for title in album_titles {
                    p { style: "margin: 2px 0;", "{title}" }
                }
            }
        }
    }
}
