use std::sync::Arc;

use dioxus::prelude::*;

use photo_kit::observer::ChangePublisher;
use photo_kit::platform::{ChangeObserver, PhotoChange};
use photo_kit::{
    Album, LazyFetchResults, MainDispatcher, PhotoLibraryObserver, PhotoLibraryServices,
    StaticAsset,
};

use super::asset_details::AssetDetails;
use super::thumbnail::Thumbnail;
use crate::Screen;

/// Keeps one album's asset grid live against the library.
pub struct AlbumModel {
    fetch_results: LazyFetchResults<StaticAsset>,
    will_change: ChangePublisher,
    dispatcher: Arc<dyn MainDispatcher>,
}

impl AlbumModel {
    pub fn new(album: &Album, services: &PhotoLibraryServices) -> Arc<Self> {
        Arc::new(Self {
            fetch_results: album.fetch_assets(services.assets.as_ref()),
            will_change: ChangePublisher::new(),
            dispatcher: Arc::clone(&services.dispatcher),
        })
    }
}

impl PhotoLibraryObserver for AlbumModel {
    type Wrapper = StaticAsset;

    fn fetch_results(&self) -> &LazyFetchResults<StaticAsset> {
        &self.fetch_results
    }

    fn will_change(&self) -> &ChangePublisher {
        &self.will_change
    }

    fn dispatcher(&self) -> &Arc<dyn MainDispatcher> {
        &self.dispatcher
    }
}

impl ChangeObserver for AlbumModel {
    fn photo_library_did_change(self: Arc<Self>, change: &dyn PhotoChange) {
        self.process_change(change);
    }
}

#[component]
pub fn AlbumScreen(album: Album, on_navigate: EventHandler<Screen>) -> Element {
    let services: PhotoLibraryServices = use_context();
    let generation: Signal<u64> = use_context();
    let mut selection = use_signal(|| None::<StaticAsset>);

    let model = use_hook({
        let album = album.clone();
        move || {
            let model = AlbumModel::new(&album, &services);
            Arc::clone(&model).register_photo_observation(services.library.as_ref());
            model
        }
    });
    let _ = generation();

    let assets = model.fetch_results().to_vec();
    let title = album.title();

    rsx! {
        div { style: "padding: 16px; max-width: 900px; margin: 0 auto;",
            button {
                style: "border: none; background: none; color: #0066cc; font-size: 15px; cursor: pointer; padding: 4px 0;",
                onclick: move |_| on_navigate.call(Screen::Albums),
                "← Albums"
            }
            h1 { style: "font-size: 24px; margin: 8px 0 16px;", "{title}" }
            if assets.is_empty() {
                p { style: "color: #888;", "This album is empty." }
            }
            div { style: "display: grid; grid-template-columns: repeat(3, 1fr); gap: 8px;",
                for (key, asset) in assets.into_iter().map(|a| (a.id().to_string(), a)) {
                    AssetCell {
                        key: "{key}",
                        asset,
                        on_select: move |selected| selection.set(Some(selected)),
                    }
                }
            }
            if let Some(asset) = selection() {
                AssetDetails { asset, on_close: move |_| selection.set(None) }
            }
        }
    }
}

#[component]
pub fn AssetCell(asset: StaticAsset, on_select: EventHandler<StaticAsset>) -> Element {
    let selected = asset.clone();
    rsx! {
        button {
            style: "border: none; background: none; padding: 0; cursor: pointer;",
            onclick: move |_| on_select.call(selected.clone()),
            Thumbnail { asset }
        }
    }
}
