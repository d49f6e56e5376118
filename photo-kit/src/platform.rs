//! The abstract platform seam.
//!
//! Everything the library needs from the host photo library is expressed as
//! a trait here: opaque object handles, fetch results, enumeration services,
//! the change-notification registry, and the image/data request services.
//! Applications wire in one implementation (the real platform bridge, or an
//! in-memory library); tests substitute mocks.
//!
//! Handles and fetch results are owned by the platform. Wrappers only hold
//! references to them and never mutate them in place; a library mutation is
//! observed as a wholesale replacement of the fetch-result reference.

use std::any::Any;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};

/// An error reported by the platform, passed through unchanged.
pub type PlatformError = Arc<dyn std::error::Error + Send + Sync>;

// Object handles

/// An opaque object owned by the platform photo library.
pub trait PhotoObject: Send + Sync {
    /// Stable, platform-assigned identifier for this object.
    fn local_identifier(&self) -> &str;
}

/// A single photo asset.
pub trait AssetHandle: PhotoObject {
    fn is_favorite(&self) -> bool;
    fn creation_date(&self) -> Option<DateTime<Utc>>;
}

/// The base collection type. Concrete platform collections are either asset
/// collections (albums) or collection lists (folders); the capability
/// downcasts below are how a caller finds out which.
pub trait CollectionHandle: PhotoObject {
    fn localized_title(&self) -> Option<String>;

    fn as_asset_collection(self: Arc<Self>) -> Option<Arc<dyn AssetCollectionHandle>> {
        None
    }

    fn as_collection_list(self: Arc<Self>) -> Option<Arc<dyn CollectionListHandle>> {
        None
    }
}

/// A collection that holds assets directly (an album).
pub trait AssetCollectionHandle: CollectionHandle {}

/// A collection that holds other collections (a folder).
pub trait CollectionListHandle: CollectionHandle {}

// Fetch results

/// An ordered, counted, platform-owned view over handles matching a query.
///
/// The platform may replace a fetch result wholesale when the library
/// changes, but never mutates one in place. Reading is thread-safe.
pub trait FetchResult<T: ?Sized>: Send + Sync {
    fn count(&self) -> usize;

    /// Panics if `index >= count()`; an out-of-bounds read is a programmer
    /// error, not a recoverable condition.
    fn object_at(&self, index: usize) -> Arc<T>;

    /// The platform's own membership test.
    fn contains(&self, object: &Arc<T>) -> bool;
}

pub type AssetFetchResult = Arc<dyn FetchResult<dyn AssetHandle>>;
pub type CollectionFetchResult = Arc<dyn FetchResult<dyn CollectionHandle>>;
pub type AlbumFetchResult = Arc<dyn FetchResult<dyn AssetCollectionHandle>>;

/// Options accepted by the enumeration services.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub include_hidden: bool,
    pub fetch_limit: Option<usize>,
}

// Enumeration services

/// Fetches assets from the platform.
pub trait AssetFetcher: Send + Sync {
    fn fetch_assets(
        &self,
        album: &Arc<dyn AssetCollectionHandle>,
        options: Option<&FetchOptions>,
    ) -> AssetFetchResult;

    fn fetch_all_assets(&self, options: Option<&FetchOptions>) -> AssetFetchResult;

    /// The freshest handle for a known identifier, if the asset still exists.
    fn fetch_asset(&self, local_identifier: &str) -> Option<Arc<dyn AssetHandle>>;
}

/// Fetches collections from the platform.
pub trait CollectionFetcher: Send + Sync {
    fn fetch_collections(
        &self,
        folder: &Arc<dyn CollectionListHandle>,
        options: Option<&FetchOptions>,
    ) -> CollectionFetchResult;

    fn fetch_top_level_collections(&self, options: Option<&FetchOptions>) -> CollectionFetchResult;

    fn fetch_albums_containing(
        &self,
        asset: &Arc<dyn AssetHandle>,
        options: Option<&FetchOptions>,
    ) -> AlbumFetchResult;
}

// Change notifications

/// Receives library change notifications. Delivery happens on an arbitrary
/// platform background thread; implementations re-dispatch any state
/// mutation to the UI thread themselves.
pub trait ChangeObserver: Send + Sync {
    fn photo_library_did_change(self: Arc<Self>, change: &dyn PhotoChange);
}

/// Yields an updated fetch result for a currently held one, or `None` when
/// this change does not affect it. The irrelevant case is the frequent one
/// and is silently ignored by observers.
pub trait ChangeDetails<T: ?Sized> {
    fn change_details(&self, current: &Arc<dyn FetchResult<T>>) -> Option<Arc<dyn FetchResult<T>>>;
}

/// An opaque, point-in-time description of a library mutation, queryable
/// per fetch result (one supertrait per underlying handle type) and per
/// single asset.
pub trait PhotoChange:
    ChangeDetails<dyn AssetHandle>
    + ChangeDetails<dyn CollectionHandle>
    + ChangeDetails<dyn AssetCollectionHandle>
    + Send
    + Sync
{
    /// The post-change handle for one asset, if this change touched it.
    fn asset_after_changes(&self, _asset: &Arc<dyn AssetHandle>) -> Option<Arc<dyn AssetHandle>> {
        None
    }
}

/// A single atomic mutation submitted to the platform's persistent store.
#[derive(Clone)]
pub enum ChangeRequest {
    SetFavorite {
        asset: Arc<dyn AssetHandle>,
        is_favorite: bool,
    },
}

pub type ChangeCompletion = Box<dyn FnOnce(bool, Option<PlatformError>) + Send>;

/// The process-wide photo library: observer registry plus transaction
/// service. Observers are held weakly; dropping the last strong reference
/// to an observer ends its observation lifetime.
pub trait PhotoLibrary: Send + Sync {
    fn register(&self, observer: Weak<dyn ChangeObserver>);

    fn perform_changes(&self, request: ChangeRequest, completion: ChangeCompletion);
}

// Image requests

/// A decoded image produced by the platform's image pipeline. Opaque to
/// this library; hosts downcast through `as_any` to their concrete type.
pub trait ImageHandle: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    /// Requests the largest representation the platform can deliver.
    pub const MAXIMUM: ImageSize = ImageSize {
        width: f64::MAX,
        height: f64::MAX,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(edge: f64) -> Self {
        Self::new(edge, edge)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    AspectFit,
    AspectFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// May deliver a degraded image first and a full-quality one later.
    #[default]
    Opportunistic,
    HighQualityFormat,
    FastFormat,
}

#[derive(Debug, Clone, Default)]
pub struct ImageRequestOptions {
    pub delivery_mode: DeliveryMode,
    pub network_access_allowed: bool,
}

/// Side-band information delivered with each image result.
#[derive(Debug, Clone, Default)]
pub struct ImageResultInfo {
    pub in_cloud: bool,
    pub degraded: bool,
    pub request_id: Option<i32>,
    pub cancelled: bool,
    pub error: Option<PlatformError>,
}

/// May be invoked more than once per request (degraded, then final).
pub type ImageResultHandler = Box<dyn FnMut(Option<Arc<dyn ImageHandle>>, ImageResultInfo) + Send>;

pub trait ImageRequestService: Send + Sync {
    fn request_image(
        &self,
        asset: &Arc<dyn AssetHandle>,
        target_size: ImageSize,
        content_mode: ContentMode,
        options: Option<&ImageRequestOptions>,
        handler: ImageResultHandler,
    );
}

// Resource data

/// One backing data resource of an asset. Opaque to this library; the
/// owning data service recovers its concrete type through `as_any`.
pub trait AssetResourceHandle: Send + Sync {
    fn original_filename(&self) -> &str;
    fn as_any(&self) -> &dyn Any;
}

pub type DataChunkHandler = Box<dyn FnMut(&[u8]) + Send>;
pub type DataCompletion = Box<dyn FnOnce(Option<PlatformError>) + Send>;

pub trait ResourceDataService: Send + Sync {
    fn resources_for(&self, asset: &Arc<dyn AssetHandle>) -> Vec<Arc<dyn AssetResourceHandle>>;

    /// Streams the resource's bytes through `chunk_handler`, then resolves
    /// `completion` exactly once.
    fn request_data(
        &self,
        resource: &Arc<dyn AssetResourceHandle>,
        chunk_handler: DataChunkHandler,
        completion: DataCompletion,
    );
}
