//! The snapshot asset wrapper and its request/response operations.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use crate::collection::Album;
use crate::error::AssetError;
use crate::fetch_results::{FetchableWrapper, LazyFetchResults};
use crate::platform::{
    AssetFetcher, AssetHandle, ChangeRequest, CollectionFetcher, ContentMode, FetchResult,
    ImageHandle, ImageRequestOptions, ImageRequestService, ImageSize, PhotoLibrary, PhotoObject,
    ResourceDataService,
};

/// Informational flags delivered alongside a preview image result. A single
/// delivery may carry several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewInfo {
    /// The image had to come from cloud storage.
    Cloud,
    /// A degraded placeholder; a better delivery may follow.
    Thumbnail,
    RequestId(i32),
    Canceled,
}

/// An immutable wrapper around one platform asset handle at a point in
/// time. It does not observe the library; see [`Asset`](crate::Asset) for
/// the self-updating form.
#[derive(Clone)]
pub struct StaticAsset {
    handle: Arc<dyn AssetHandle>,
}

impl StaticAsset {
    pub fn new(handle: Arc<dyn AssetHandle>) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> Arc<dyn AssetHandle> {
        Arc::clone(&self.handle)
    }

    pub fn id(&self) -> &str {
        self.handle.local_identifier()
    }

    pub fn is_favorite(&self) -> bool {
        self.handle.is_favorite()
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.handle.creation_date()
    }

    pub fn fetch_assets(fetcher: &dyn AssetFetcher) -> LazyFetchResults<StaticAsset> {
        LazyFetchResults::new(fetcher.fetch_all_assets(None))
    }

    pub fn get_assets(fetcher: &dyn AssetFetcher) -> Vec<StaticAsset> {
        let raw = fetcher.fetch_all_assets(None);
        (0..raw.count())
            .map(|index| StaticAsset::new(raw.object_at(index)))
            .collect()
    }

    /// The albums containing this asset, as a lazy view.
    pub fn fetch_all_albums(&self, fetcher: &dyn CollectionFetcher) -> LazyFetchResults<Album> {
        LazyFetchResults::new(fetcher.fetch_albums_containing(&self.handle, None))
    }

    pub fn get_all_albums(&self, fetcher: &dyn CollectionFetcher) -> Vec<Album> {
        let raw = fetcher.fetch_albums_containing(&self.handle, None);
        (0..raw.count())
            .map(|index| Album::new(raw.object_at(index)))
            .collect()
    }

    /// Issues one platform image request. The handler may run more than
    /// once (a degraded delivery followed by the final one) and always
    /// receives a definite outcome plus the informational flag set.
    pub fn get_preview_image(
        &self,
        images: &dyn ImageRequestService,
        target_size: ImageSize,
        content_mode: ContentMode,
        options: Option<&ImageRequestOptions>,
        result_handler: impl Fn(Result<Arc<dyn ImageHandle>, AssetError>, HashSet<PreviewInfo>)
            + Send
            + 'static,
    ) {
        images.request_image(
            &self.handle,
            target_size,
            content_mode,
            options,
            Box::new(move |image, info| {
                let mut flags = HashSet::new();
                if info.in_cloud {
                    flags.insert(PreviewInfo::Cloud);
                }
                if info.degraded {
                    flags.insert(PreviewInfo::Thumbnail);
                }
                if let Some(request_id) = info.request_id {
                    flags.insert(PreviewInfo::RequestId(request_id));
                }
                if info.cancelled {
                    flags.insert(PreviewInfo::Canceled);
                }
                match image {
                    Some(image) => result_handler(Ok(image), flags),
                    None => {
                        let failure = match info.error {
                            Some(error) => AssetError::Platform(error),
                            None => AssetError::Unknown,
                        };
                        result_handler(Err(failure), flags);
                    }
                }
            }),
        );
    }

    /// Requests the largest available representation, aspect-fit.
    pub fn get_full_size_preview_image(
        &self,
        images: &dyn ImageRequestService,
        options: Option<&ImageRequestOptions>,
        result_handler: impl Fn(Result<Arc<dyn ImageHandle>, AssetError>, HashSet<PreviewInfo>)
            + Send
            + 'static,
    ) {
        self.get_preview_image(
            images,
            ImageSize::MAXIMUM,
            ContentMode::AspectFit,
            options,
            result_handler,
        );
    }

    /// Reads the asset's first backing resource in full. Chunks are
    /// accumulated and delivered as one concatenation.
    pub fn get_full_image_data(
        &self,
        resources: &dyn ResourceDataService,
        completion: impl FnOnce(Result<Vec<u8>, AssetError>) + Send + 'static,
    ) {
        let Some(resource) = resources.resources_for(&self.handle).into_iter().next() else {
            return completion(Err(AssetError::NoResources));
        };
        let received = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink = Arc::clone(&received);
        resources.request_data(
            &resource,
            Box::new(move |chunk| sink.lock().unwrap().extend_from_slice(chunk)),
            Box::new(move |error| {
                let data = std::mem::take(&mut *received.lock().unwrap());
                if data.is_empty() {
                    completion(Err(error
                        .map(AssetError::Platform)
                        .unwrap_or(AssetError::Unknown)));
                } else {
                    completion(Ok(data));
                }
            }),
        );
    }

    /// Like [`get_full_image_data`](Self::get_full_image_data), but calls
    /// `completion` with the accumulated data after every chunk. Prefer the
    /// one-shot form unless a consumer can genuinely use partial data.
    pub fn get_full_image_data_progressively(
        &self,
        resources: &dyn ResourceDataService,
        completion: impl Fn(Result<Vec<u8>, AssetError>) + Send + Sync + 'static,
    ) {
        let Some(resource) = resources.resources_for(&self.handle).into_iter().next() else {
            return completion(Err(AssetError::NoResources));
        };
        let completion = Arc::new(completion);
        let received = Arc::new(Mutex::new(Vec::<u8>::new()));
        let per_chunk = Arc::clone(&completion);
        resources.request_data(
            &resource,
            Box::new(move |chunk| {
                let mut data = received.lock().unwrap();
                data.extend_from_slice(chunk);
                (*per_chunk)(Ok(data.clone()));
            }),
            Box::new(move |error| {
                if let Some(error) = error {
                    (*completion)(Err(AssetError::Platform(error)));
                }
            }),
        );
    }

    /// Sets the favorite flag through one atomic library transaction. When
    /// the requested state already matches, completes successfully without
    /// submitting anything.
    pub fn edit_favorite_state(
        &self,
        library: &dyn PhotoLibrary,
        is_favorite: bool,
        completion: impl FnOnce(Result<(), AssetError>) + Send + 'static,
    ) {
        if is_favorite == self.handle.is_favorite() {
            return completion(Ok(()));
        }
        let asset = Arc::clone(&self.handle);
        library.perform_changes(
            ChangeRequest::SetFavorite { asset, is_favorite },
            Box::new(move |success, error| {
                if success {
                    completion(Ok(()));
                } else {
                    completion(Err(error
                        .map(AssetError::Platform)
                        .unwrap_or(AssetError::Unknown)));
                }
            }),
        );
    }

    pub fn favorite(
        &self,
        library: &dyn PhotoLibrary,
        completion: impl FnOnce(Result<(), AssetError>) + Send + 'static,
    ) {
        self.edit_favorite_state(library, true, completion);
    }

    pub fn unfavorite(
        &self,
        library: &dyn PhotoLibrary,
        completion: impl FnOnce(Result<(), AssetError>) + Send + 'static,
    ) {
        self.edit_favorite_state(library, false, completion);
    }

    pub fn toggle_favorite(
        &self,
        library: &dyn PhotoLibrary,
        completion: impl FnOnce(Result<(), AssetError>) + Send + 'static,
    ) {
        self.edit_favorite_state(library, !self.is_favorite(), completion);
    }

    /// Async façade over [`edit_favorite_state`](Self::edit_favorite_state);
    /// the callback form is the single implementation.
    pub async fn edit_favorite_state_async(
        &self,
        library: &dyn PhotoLibrary,
        is_favorite: bool,
    ) -> Result<(), AssetError> {
        let (tx, rx) = oneshot::channel();
        self.edit_favorite_state(library, is_favorite, move |result| {
            let _ = tx.send(result);
        });
        rx.await.unwrap_or(Err(AssetError::Unknown))
    }

    pub async fn toggle_favorite_async(
        &self,
        library: &dyn PhotoLibrary,
    ) -> Result<(), AssetError> {
        self.edit_favorite_state_async(library, !self.is_favorite())
            .await
    }
}

impl FetchableWrapper for StaticAsset {
    type Wrapped = dyn AssetHandle;

    fn from_handle(handle: Arc<dyn AssetHandle>) -> Self {
        StaticAsset::new(handle)
    }

    fn id(&self) -> &str {
        StaticAsset::id(self)
    }
}

impl PartialEq for StaticAsset {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for StaticAsset {}

impl Hash for StaticAsset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for StaticAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticAsset")
            .field("id", &self.id())
            .field("is_favorite", &self.is_favorite())
            .finish()
    }
}
