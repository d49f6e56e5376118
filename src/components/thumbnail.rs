use dioxus::prelude::*;

use photo_kit::platform::{ContentMode, ImageSize};
use photo_kit::{PhotoLibraryServices, StaticAsset};

use crate::config::AppConfig;
use crate::sample;

#[derive(Debug, Clone, PartialEq)]
pub enum ImageLoadState {
    Loading,
    Loaded(String),
    Failed,
}

/// A square grid thumbnail. Requests an aspect-fill preview once and keeps
/// showing the best delivery so far.
#[component]
pub fn Thumbnail(asset: StaticAsset) -> Element {
    let services: PhotoLibraryServices = use_context();
    let config: AppConfig = use_context();
    let mut state = use_signal(|| ImageLoadState::Loading);

    use_future(move || {
        let services = services.clone();
        let asset = asset.clone();
        let edge = config.thumbnail_edge as f64;
        async move {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            asset.get_preview_image(
                services.images.as_ref(),
                ImageSize::square(edge),
                ContentMode::AspectFill,
                None,
                move |result, _info| {
                    let _ = tx.send(result.map(|image| sample::data_url(image.as_ref())));
                },
            );
            while let Some(result) = rx.recv().await {
                match result {
                    Ok(Some(url)) => state.set(ImageLoadState::Loaded(url)),
                    Ok(None) => state.set(ImageLoadState::Failed),
                    Err(e) => {
                        log::warn!("Thumbnail request failed: {}", e);
                        state.set(ImageLoadState::Failed);
                    }
                }
            }
        }
    });

    rsx! {
        div { style: "aspect-ratio: 1; overflow: hidden; background: #f0f0f0; border-radius: 6px;",
            match state() {
                ImageLoadState::Loaded(url) => rsx! {
                    img {
                        style: "width: 100%; height: 100%; object-fit: cover;",
                        src: "{url}",
                    }
                },
                ImageLoadState::Loading => rsx! {
                    div { style: "width: 100%; height: 100%; display: flex; align-items: center; justify-content: center; color: #bbb;",
                        "…"
                    }
                },
                ImageLoadState::Failed => rsx! {
                    div { style: "width: 100%; height: 100%; background: #ddd;" }
                },
            }
        }
    }
}
