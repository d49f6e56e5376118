use dioxus::prelude::*;

use photo_kit::{unsorted_assets, PhotoLibraryServices, StaticAsset};

use super::album_view::AssetCell;
use super::asset_details::AssetDetails;

/// Assets that belong to no album.
#[component]
pub fn UnsortedScreen() -> Element {
    let services: PhotoLibraryServices = use_context();
    let mut selection = use_signal(|| None::<StaticAsset>);
    let mut assets = use_signal(|| None::<Vec<StaticAsset>>);

    // Load on mount
    use_effect(move || {
        let list = unsorted_assets(services.assets.as_ref(), services.collections.as_ref());
        assets.set(Some(list));
    });

    rsx! {
        div { style: "padding: 16px; max-width: 900px; margin: 0 auto;",
            h1 { style: "font-size: 24px; margin: 8px 0 16px;", "Unsorted" }
            match assets() {
                Some(assets) => rsx! {
                    if assets.is_empty() {
                        p { style: "color: #888;", "Every asset is in an album." }
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
                },
                None => rsx! {
                    p { style: "color: #888;", "Loading…" }
                },
            }
            if let Some(asset) = selection() {
                AssetDetails { asset, on_close: move |_| selection.set(None) }
            }
        }
    }
}
