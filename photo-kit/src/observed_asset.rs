//! A live, self-updating asset handle.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock, RwLock, Weak};

use chrono::{DateTime, Utc};

use crate::asset::{PreviewInfo, StaticAsset};
use crate::collection::Album;
use crate::error::AssetError;
use crate::fetch_results::LazyFetchResults;
use crate::observer::{Animation, ChangePublisher};
use crate::platform::{
    AssetHandle, ChangeDetails, ChangeObserver, ContentMode, ImageHandle, ImageRequestOptions,
    ImageSize, PhotoChange, PhotoObject,
};
use crate::PhotoLibraryServices;

/// A shared, observable wrapper around one asset.
///
/// On construction the freshest copy of the handle is loaded; after
/// [`register_photo_observation`](Asset::register_photo_observation) the
/// instance follows the library: relevant mutations announce through
/// [`will_change`](Asset::will_change) and then update the held handle (and
/// the containing-albums results, once loaded) on the UI thread.
///
/// Construction is two-phase so a half-built instance never reaches the
/// shared registry: build the `Arc`, then attach it. [`Asset::observing`]
/// does both.
pub struct Asset {
    handle: RwLock<Arc<dyn AssetHandle>>,
    albums: OnceLock<LazyFetchResults<Album>>,
    will_change: ChangePublisher,
    change_animation: Mutex<Animation>,
    services: PhotoLibraryServices,
}

impl Asset {
    /// Builds the shared handle without registering it for changes.
    pub fn new(asset: StaticAsset, services: &PhotoLibraryServices) -> Arc<Asset> {
        let handle = services
            .assets
            .fetch_asset(asset.id())
            .unwrap_or_else(|| asset.handle());
        Arc::new(Asset {
            handle: RwLock::new(handle),
            albums: OnceLock::new(),
            will_change: ChangePublisher::new(),
            change_animation: Mutex::new(Animation::default()),
            services: services.clone(),
        })
    }

    /// Builds the handle and attaches it to the change registry.
    pub fn observing(asset: StaticAsset, services: &PhotoLibraryServices) -> Arc<Asset> {
        let this = Asset::new(asset, services);
        Arc::clone(&this).register_photo_observation();
        this
    }

    /// Attaches this instance (weakly) to the library's notification
    /// registry. Call exactly once per instance.
    pub fn register_photo_observation(self: Arc<Self>) {
        let library = Arc::clone(&self.services.library);
        library.register(Arc::downgrade(&self) as Weak<dyn ChangeObserver>);
    }

    /// A snapshot of the currently held handle.
    pub fn static_asset(&self) -> StaticAsset {
        StaticAsset::new(self.handle())
    }

    pub fn handle(&self) -> Arc<dyn AssetHandle> {
        let handle = self.handle.read().unwrap();
        Arc::clone(&*handle)
    }

    pub fn id(&self) -> String {
        self.handle.read().unwrap().local_identifier().to_string()
    }

    pub fn is_favorite(&self) -> bool {
        self.handle.read().unwrap().is_favorite()
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.handle.read().unwrap().creation_date()
    }

    /// Fired immediately before each observed update is applied.
    pub fn will_change(&self) -> &ChangePublisher {
        &self.will_change
    }

    pub fn change_animation(&self) -> Animation {
        *self.change_animation.lock().unwrap()
    }

    pub fn set_change_animation(&self, animation: Animation) {
        *self.change_animation.lock().unwrap() = animation;
    }

    /// The albums containing this asset. Loaded from the library on first
    /// access and kept live from then on.
    pub fn albums(&self) -> &LazyFetchResults<Album> {
        self.albums.get_or_init(|| {
            self.static_asset()
                .fetch_all_albums(self.services.collections.as_ref())
        })
    }

    /// Whether [`albums`](Self::albums) has been loaded yet.
    pub fn albums_loaded(&self) -> bool {
        self.albums.get().is_some()
    }

    pub fn get_all_albums(&self) -> Vec<Album> {
        self.static_asset()
            .get_all_albums(self.services.collections.as_ref())
    }

    pub fn get_preview_image(
        &self,
        target_size: ImageSize,
        content_mode: ContentMode,
        options: Option<&ImageRequestOptions>,
        result_handler: impl Fn(Result<Arc<dyn ImageHandle>, AssetError>, HashSet<PreviewInfo>)
            + Send
            + 'static,
    ) {
        self.static_asset().get_preview_image(
            self.services.images.as_ref(),
            target_size,
            content_mode,
            options,
            result_handler,
        );
    }

    pub fn get_full_size_preview_image(
        &self,
        options: Option<&ImageRequestOptions>,
        result_handler: impl Fn(Result<Arc<dyn ImageHandle>, AssetError>, HashSet<PreviewInfo>)
            + Send
            + 'static,
    ) {
        self.static_asset().get_full_size_preview_image(
            self.services.images.as_ref(),
            options,
            result_handler,
        );
    }

    pub fn get_full_image_data(
        &self,
        completion: impl FnOnce(Result<Vec<u8>, AssetError>) + Send + 'static,
    ) {
        self.static_asset()
            .get_full_image_data(self.services.resources.as_ref(), completion);
    }

    pub fn edit_favorite_state(
        &self,
        is_favorite: bool,
        completion: impl FnOnce(Result<(), AssetError>) + Send + 'static,
    ) {
        self.static_asset().edit_favorite_state(
            self.services.library.as_ref(),
            is_favorite,
            completion,
        );
    }

    pub fn favorite(&self, completion: impl FnOnce(Result<(), AssetError>) + Send + 'static) {
        self.edit_favorite_state(true, completion);
    }

    pub fn unfavorite(&self, completion: impl FnOnce(Result<(), AssetError>) + Send + 'static) {
        self.edit_favorite_state(false, completion);
    }

    pub fn toggle_favorite(&self, completion: impl FnOnce(Result<(), AssetError>) + Send + 'static) {
        self.edit_favorite_state(!self.is_favorite(), completion);
    }

    pub async fn edit_favorite_state_async(&self, is_favorite: bool) -> Result<(), AssetError> {
        self.static_asset()
            .edit_favorite_state_async(self.services.library.as_ref(), is_favorite)
            .await
    }

    pub async fn toggle_favorite_async(&self) -> Result<(), AssetError> {
        self.edit_favorite_state_async(!self.is_favorite()).await
    }

    fn process_asset(self: Arc<Self>, change: &dyn PhotoChange) {
        let current = self.handle();
        let Some(updated) = change.asset_after_changes(&current) else {
            return;
        };
        log::debug!(
            "asset {} changed; scheduling handle update",
            current.local_identifier()
        );
        let dispatcher = Arc::clone(&self.services.dispatcher);
        dispatcher.dispatch(Box::new(move || {
            self.will_change.send(self.change_animation());
            *self.handle.write().unwrap() = updated;
        }));
    }

    fn process_albums(self: Arc<Self>, change: &dyn PhotoChange) {
        let current = match self.albums.get() {
            Some(albums) => albums.raw(),
            // Never been loaded; nothing to keep live.
            None => return,
        };
        let Some(updated) = ChangeDetails::change_details(change, &current) else {
            return;
        };
        log::debug!("asset {} album membership changed; scheduling update", self.id());
        let dispatcher = Arc::clone(&self.services.dispatcher);
        dispatcher.dispatch(Box::new(move || {
            self.will_change.send(self.change_animation());
            if let Some(albums) = self.albums.get() {
                albums.replace(updated);
            }
        }));
    }
}

impl ChangeObserver for Asset {
    fn photo_library_did_change(self: Arc<Self>, change: &dyn PhotoChange) {
        Arc::clone(&self).process_asset(change);
        self.process_albums(change);
    }
}
