use std::sync::Arc;

use dioxus::prelude::*;

use photo_kit::observer::ChangePublisher;
use photo_kit::platform::{ChangeObserver, PhotoChange};
use photo_kit::{
    LazyFetchResults, MainDispatcher, PhotoCollection, PhotoLibraryObserver, PhotoLibraryServices,
};

use crate::Screen;

/// Keeps the top-level collection list live against the library.
pub struct AlbumsModel {
    fetch_results: LazyFetchResults<PhotoCollection>,
    will_change: ChangePublisher,
    dispatcher: Arc<dyn MainDispatcher>,
}

impl AlbumsModel {
    pub fn new(services: &PhotoLibraryServices) -> Arc<Self> {
        Arc::new(Self {
            fetch_results: PhotoCollection::fetch_top_level(services.collections.as_ref()),
            will_change: ChangePublisher::new(),
            dispatcher: Arc::clone(&services.dispatcher),
        })
    }
}

impl PhotoLibraryObserver for AlbumsModel {
    type Wrapper = PhotoCollection;

    fn fetch_results(&self) -> &LazyFetchResults<PhotoCollection> {
        &self.fetch_results
    }

    fn will_change(&self) -> &ChangePublisher {
        &self.will_change
    }

    fn dispatcher(&self) -> &Arc<dyn MainDispatcher> {
        &self.dispatcher
    }
}

impl ChangeObserver for AlbumsModel {
    fn photo_library_did_change(self: Arc<Self>, change: &dyn PhotoChange) {
        self.process_change(change);
    }
}

#[component]
pub fn AlbumsListScreen(on_navigate: EventHandler<Screen>) -> Element {
    let services: PhotoLibraryServices = use_context();
    let generation: Signal<u64> = use_context();
    let model = use_hook(move || {
        let model = AlbumsModel::new(&services);
        Arc::clone(&model).register_photo_observation(services.library.as_ref());
        model
    });
    // Re-render whenever the library pump applies an update.
    let _ = generation();

    let collections = model.fetch_results().to_vec();

    rsx! {
        div { style: "padding: 16px; max-width: 700px; margin: 0 auto;",
            h1 { style: "font-size: 24px; margin: 8px 0 16px;", "Albums" }
            if collections.is_empty() {
                p { style: "color: #888;", "No albums found in the photo library." }
            }
            for (key, collection) in collections.into_iter().map(|c| (c.id().to_string(), c)) {
                CollectionRow {
                    key: "{key}",
                    collection,
                    depth: 0,
                    on_navigate,
                }
            }
        }
    }
}

/// One row of the collection tree. Folders expand in place; albums
/// navigate to their grid.
#[component]
fn CollectionRow(
    collection: PhotoCollection,
    depth: usize,
    on_navigate: EventHandler<Screen>,
) -> Element {
    let services: PhotoLibraryServices = use_context();
    let mut expanded = use_signal(|| false);
    let indent = 16 + depth * 20;

    match collection {
        PhotoCollection::Album(album) => {
            let title = album.title();
            rsx! {
                button {
                    style: "display: block; width: 100%; text-align: left; padding: 10px 12px; padding-left: {indent}px; font-size: 16px; border: none; border-bottom: 1px solid #eee; background: white; cursor: pointer;",
                    onclick: move |_| on_navigate.call(Screen::Album(album.clone())),
                    "🖼 {title}"
                }
            }
        }
        PhotoCollection::Folder(folder) => {
            let title = folder.title();
            let marker = if expanded() { "▼" } else { "▶" };
            let children = if expanded() {
                folder.get_collections(services.collections.as_ref())
            } else {
                Vec::new()
            };
            rsx! {
                button {
                    style: "display: block; width: 100%; text-align: left; padding: 10px 12px; padding-left: {indent}px; font-size: 16px; font-weight: 600; border: none; border-bottom: 1px solid #eee; background: #fafafa; cursor: pointer;",
                    onclick: move |_| expanded.set(!expanded()),
                    "{marker} 📂 {title}"
                }
                for (key, child) in children.into_iter().map(|c| (c.id().to_string(), c)) {
                    CollectionRow {
                        key: "{key}",
                        collection: child,
                        depth: depth + 1,
                        on_navigate,
                    }
                }
            }
        }
        unknown @ PhotoCollection::Unknown(_) => {
            let title = unknown.title();
            rsx! {
                div { style: "padding: 10px 12px; padding-left: {indent}px; color: #aaa;",
                    "{title}"
                }
            }
        }
    }
}
