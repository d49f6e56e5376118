//! Test doubles for the platform seam, shared by the unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use chrono::{DateTime, Utc};

use crate::dispatch::{MainDispatcher, MainTask};
use crate::platform::{
    AlbumFetchResult, AssetCollectionHandle, AssetFetchResult, AssetFetcher, AssetHandle,
    AssetResourceHandle, ChangeCompletion, ChangeDetails, ChangeObserver, ChangeRequest,
    CollectionFetchResult, CollectionFetcher, CollectionHandle, CollectionListHandle,
    ContentMode, DataChunkHandler, DataCompletion, FetchOptions, FetchResult, ImageHandle,
    ImageRequestOptions, ImageRequestService, ImageResultHandler, ImageResultInfo, ImageSize,
    PhotoChange, PhotoLibrary, PhotoObject, PlatformError, ResourceDataService,
};

pub(crate) fn platform_error(message: &'static str) -> PlatformError {
    #[derive(Debug)]
    struct TestError(&'static str);

    impl std::fmt::Display for TestError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl std::error::Error for TestError {}

    Arc::new(TestError(message))
}

// Handles

pub(crate) struct MockAssetHandle {
    id: String,
    favorite: bool,
    created: Option<DateTime<Utc>>,
}

impl MockAssetHandle {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            favorite: false,
            created: None,
        })
    }

    pub fn favorited(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            favorite: true,
            created: None,
        })
    }
}

impl PhotoObject for MockAssetHandle {
    fn local_identifier(&self) -> &str {
        &self.id
    }
}

impl AssetHandle for MockAssetHandle {
    fn is_favorite(&self) -> bool {
        self.favorite
    }

    fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.created
    }
}

pub(crate) struct MockAlbumHandle {
    id: String,
    title: Option<String>,
}

impl MockAlbumHandle {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            title: None,
        })
    }

    pub fn titled(id: &str, title: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            title: Some(title.to_string()),
        })
    }
}

impl PhotoObject for MockAlbumHandle {
    fn local_identifier(&self) -> &str {
        &self.id
    }
}

impl CollectionHandle for MockAlbumHandle {
    fn localized_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn as_asset_collection(self: Arc<Self>) -> Option<Arc<dyn AssetCollectionHandle>> {
        Some(self)
    }
}

impl AssetCollectionHandle for MockAlbumHandle {}

pub(crate) struct MockFolderHandle {
    id: String,
    title: Option<String>,
}

impl MockFolderHandle {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            title: None,
        })
    }

    pub fn titled(id: &str, title: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            title: Some(title.to_string()),
        })
    }
}

impl PhotoObject for MockFolderHandle {
    fn local_identifier(&self) -> &str {
        &self.id
    }
}

impl CollectionHandle for MockFolderHandle {
    fn localized_title(&self) -> Option<String> {
        self.title.clone()
    }

    fn as_collection_list(self: Arc<Self>) -> Option<Arc<dyn CollectionListHandle>> {
        Some(self)
    }
}

impl CollectionListHandle for MockFolderHandle {}

/// A collection that is neither an album nor a folder.
pub(crate) struct MockPlainCollectionHandle {
    id: String,
}

impl MockPlainCollectionHandle {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self { id: id.to_string() })
    }
}

impl PhotoObject for MockPlainCollectionHandle {
    fn local_identifier(&self) -> &str {
        &self.id
    }
}

impl CollectionHandle for MockPlainCollectionHandle {
    fn localized_title(&self) -> Option<String> {
        None
    }
}

// Fetch results

pub(crate) struct MockFetchResult<T: ?Sized> {
    pub items: Vec<Arc<T>>,
    pub contains_result: bool,
    pub contains_calls: Mutex<Vec<Arc<T>>>,
    pub object_at_calls: Mutex<Vec<usize>>,
}

impl<T: ?Sized> MockFetchResult<T> {
    pub fn new(items: Vec<Arc<T>>) -> Arc<Self> {
        Self::with_contains(items, false)
    }

    pub fn with_contains(items: Vec<Arc<T>>, contains_result: bool) -> Arc<Self> {
        Arc::new(Self {
            items,
            contains_result,
            contains_calls: Mutex::new(Vec::new()),
            object_at_calls: Mutex::new(Vec::new()),
        })
    }
}

impl<T: ?Sized + Send + Sync> FetchResult<T> for MockFetchResult<T> {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn object_at(&self, index: usize) -> Arc<T> {
        self.object_at_calls.lock().unwrap().push(index);
        Arc::clone(&self.items[index])
    }

    fn contains(&self, object: &Arc<T>) -> bool {
        self.contains_calls.lock().unwrap().push(Arc::clone(object));
        self.contains_result
    }
}

// Enumeration services

#[derive(Default)]
pub(crate) struct MockAssetFetcher {
    pub result: Option<AssetFetchResult>,
    pub by_album: HashMap<String, AssetFetchResult>,
    pub all_result: Option<AssetFetchResult>,
    pub reloaded: HashMap<String, Arc<dyn AssetHandle>>,
    pub fetch_assets_albums: Mutex<Vec<Arc<dyn AssetCollectionHandle>>>,
}

impl MockAssetFetcher {
    pub fn returning(result: AssetFetchResult) -> Self {
        Self {
            result: Some(result),
            ..Self::default()
        }
    }

    fn empty() -> AssetFetchResult {
        MockFetchResult::new(Vec::new())
    }
}

impl AssetFetcher for MockAssetFetcher {
    fn fetch_assets(
        &self,
        album: &Arc<dyn AssetCollectionHandle>,
        _options: Option<&FetchOptions>,
    ) -> AssetFetchResult {
        self.fetch_assets_albums
            .lock()
            .unwrap()
            .push(Arc::clone(album));
        if let Some(result) = self.by_album.get(album.local_identifier()) {
            return Arc::clone(result);
        }
        self.result.clone().unwrap_or_else(Self::empty)
    }

    fn fetch_all_assets(&self, _options: Option<&FetchOptions>) -> AssetFetchResult {
        self.all_result.clone().unwrap_or_else(Self::empty)
    }

    fn fetch_asset(&self, local_identifier: &str) -> Option<Arc<dyn AssetHandle>> {
        self.reloaded.get(local_identifier).cloned()
    }
}

#[derive(Default)]
pub(crate) struct MockCollectionFetcher {
    pub top_level: Option<CollectionFetchResult>,
    pub children: Option<CollectionFetchResult>,
    pub containing: Option<AlbumFetchResult>,
    pub fetch_collections_folders: Mutex<Vec<Arc<dyn CollectionListHandle>>>,
    pub containing_assets: Mutex<Vec<Arc<dyn AssetHandle>>>,
}

impl MockCollectionFetcher {
    fn empty<T: ?Sized + Send + Sync + 'static>() -> Arc<dyn FetchResult<T>> {
        MockFetchResult::<T>::new(Vec::new())
    }
}

impl CollectionFetcher for MockCollectionFetcher {
    fn fetch_collections(
        &self,
        folder: &Arc<dyn CollectionListHandle>,
        _options: Option<&FetchOptions>,
    ) -> CollectionFetchResult {
        self.fetch_collections_folders
            .lock()
            .unwrap()
            .push(Arc::clone(folder));
        self.children.clone().unwrap_or_else(Self::empty)
    }

    fn fetch_top_level_collections(&self, _options: Option<&FetchOptions>) -> CollectionFetchResult {
        self.top_level.clone().unwrap_or_else(Self::empty)
    }

    fn fetch_albums_containing(
        &self,
        asset: &Arc<dyn AssetHandle>,
        _options: Option<&FetchOptions>,
    ) -> AlbumFetchResult {
        self.containing_assets
            .lock()
            .unwrap()
            .push(Arc::clone(asset));
        self.containing.clone().unwrap_or_else(Self::empty)
    }
}

// Changes and the library

#[derive(Default)]
pub(crate) struct MockChange {
    pub asset_results: Option<AssetFetchResult>,
    pub collection_results: Option<CollectionFetchResult>,
    pub album_results: Option<AlbumFetchResult>,
    pub changed_asset: Option<Arc<dyn AssetHandle>>,
}

impl ChangeDetails<dyn AssetHandle> for MockChange {
    fn change_details(&self, _current: &AssetFetchResult) -> Option<AssetFetchResult> {
        self.asset_results.clone()
    }
}

impl ChangeDetails<dyn CollectionHandle> for MockChange {
    fn change_details(&self, _current: &CollectionFetchResult) -> Option<CollectionFetchResult> {
        self.collection_results.clone()
    }
}

impl ChangeDetails<dyn AssetCollectionHandle> for MockChange {
    fn change_details(&self, _current: &AlbumFetchResult) -> Option<AlbumFetchResult> {
        self.album_results.clone()
    }
}

impl PhotoChange for MockChange {
    fn asset_after_changes(&self, _asset: &Arc<dyn AssetHandle>) -> Option<Arc<dyn AssetHandle>> {
        self.changed_asset.clone()
    }
}

pub(crate) struct MockPhotoLibrary {
    pub observers: Mutex<Vec<Weak<dyn ChangeObserver>>>,
    pub change_requests: Mutex<Vec<ChangeRequest>>,
    pub next_result: Mutex<(bool, Option<PlatformError>)>,
}

impl MockPhotoLibrary {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            observers: Mutex::new(Vec::new()),
            change_requests: Mutex::new(Vec::new()),
            next_result: Mutex::new((true, None)),
        })
    }

    pub fn failing(error: Option<PlatformError>) -> Arc<Self> {
        let library = Self::new();
        *library.next_result.lock().unwrap() = (false, error);
        library
    }

    pub fn registered_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }

    pub fn request_count(&self) -> usize {
        self.change_requests.lock().unwrap().len()
    }

    /// Delivers a change to every live registered observer, the way the
    /// platform posts notifications.
    pub fn post(&self, change: &dyn PhotoChange) {
        let observers = self.observers.lock().unwrap().clone();
        for observer in observers {
            if let Some(observer) = observer.upgrade() {
                observer.photo_library_did_change(change);
            }
        }
    }
}

impl PhotoLibrary for MockPhotoLibrary {
    fn register(&self, observer: Weak<dyn ChangeObserver>) {
        self.observers.lock().unwrap().push(observer);
    }

    fn perform_changes(&self, request: ChangeRequest, completion: ChangeCompletion) {
        self.change_requests.lock().unwrap().push(request);
        let (success, error) = self.next_result.lock().unwrap().clone();
        completion(success, error);
    }
}

// Image and data services

pub(crate) struct MockImage {
    pub width: u32,
    pub height: u32,
}

impl ImageHandle for MockImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

pub(crate) type ImageDelivery = (Option<Arc<dyn ImageHandle>>, ImageResultInfo);

#[derive(Default)]
pub(crate) struct MockImageService {
    pub deliveries: Vec<ImageDelivery>,
    pub requests: Mutex<Vec<(ImageSize, ContentMode)>>,
}

impl MockImageService {
    pub fn delivering(deliveries: Vec<ImageDelivery>) -> Self {
        Self {
            deliveries,
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl ImageRequestService for MockImageService {
    fn request_image(
        &self,
        _asset: &Arc<dyn AssetHandle>,
        target_size: ImageSize,
        content_mode: ContentMode,
        _options: Option<&ImageRequestOptions>,
        mut handler: ImageResultHandler,
    ) {
        self.requests.lock().unwrap().push((target_size, content_mode));
        for (image, info) in &self.deliveries {
            handler(image.clone(), info.clone());
        }
    }
}

pub(crate) struct MockResource {
    pub filename: String,
}

impl MockResource {
    pub fn new(filename: &str) -> Arc<dyn AssetResourceHandle> {
        Arc::new(Self {
            filename: filename.to_string(),
        })
    }
}

impl AssetResourceHandle for MockResource {
    fn original_filename(&self) -> &str {
        &self.filename
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(Default)]
pub(crate) struct MockResourceService {
    pub resources: Vec<Arc<dyn AssetResourceHandle>>,
    pub chunks: Vec<Vec<u8>>,
    pub completion_error: Option<PlatformError>,
}

impl ResourceDataService for MockResourceService {
    fn resources_for(&self, _asset: &Arc<dyn AssetHandle>) -> Vec<Arc<dyn AssetResourceHandle>> {
        self.resources.clone()
    }

    fn request_data(
        &self,
        _resource: &Arc<dyn AssetResourceHandle>,
        mut chunk_handler: DataChunkHandler,
        completion: DataCompletion,
    ) {
        for chunk in &self.chunks {
            chunk_handler(chunk);
        }
        completion(self.completion_error.clone());
    }
}

// Dispatch

/// Queues dispatched tasks so a test can control when the "UI thread" runs.
#[derive(Default)]
pub(crate) struct QueueDispatcher {
    pub tasks: Mutex<Vec<MainTask>>,
}

impl QueueDispatcher {
    pub fn run_all(&self) {
        let tasks: Vec<MainTask> = std::mem::take(&mut *self.tasks.lock().unwrap());
        for task in tasks {
            task();
        }
    }
}

impl MainDispatcher for QueueDispatcher {
    fn dispatch(&self, task: MainTask) {
        self.tasks.lock().unwrap().push(task);
    }
}
