//! Platform object handles served by the sample library.
//!
//! Handles are immutable snapshots; the store mints a fresh one on every
//! fetch, the way the real platform returns fresh objects per access.

use std::any::Any;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use photo_kit::platform::{
    AssetCollectionHandle, AssetHandle, AssetResourceHandle, CollectionHandle,
    CollectionListHandle, FetchResult, ImageHandle, PhotoObject,
};

pub struct SampleAssetHandle {
    pub id: String,
    pub favorite: bool,
    pub created: Option<DateTime<Utc>>,
}

impl PhotoObject for SampleAssetHandle {
    fn local_identifier(&self) -> &str {
        &self.id
    }
}

impl AssetHandle for SampleAssetHandle {
    fn is_favorite(&self) -> bool {
        self.favorite
    }

    fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.created
    }
}

pub struct SampleAlbumHandle {
    pub id: String,
    pub title: String,
}

impl PhotoObject for SampleAlbumHandle {
    fn local_identifier(&self) -> &str {
        &self.id
    }
}

impl CollectionHandle for SampleAlbumHandle {
    fn localized_title(&self) -> Option<String> {
        Some(self.title.clone())
    }

    fn as_asset_collection(self: Arc<Self>) -> Option<Arc<dyn AssetCollectionHandle>> {
        Some(self)
    }
}

impl AssetCollectionHandle for SampleAlbumHandle {}

pub struct SampleFolderHandle {
    pub id: String,
    pub title: String,
}

impl PhotoObject for SampleFolderHandle {
    fn local_identifier(&self) -> &str {
        &self.id
    }
}

impl CollectionHandle for SampleFolderHandle {
    fn localized_title(&self) -> Option<String> {
        Some(self.title.clone())
    }

    fn as_collection_list(self: Arc<Self>) -> Option<Arc<dyn CollectionListHandle>> {
        Some(self)
    }
}

impl CollectionListHandle for SampleFolderHandle {}

/// An immutable, Vec-backed fetch result.
pub struct SnapshotFetchResult<T: ?Sized + PhotoObject> {
    items: Vec<Arc<T>>,
}

impl<T: ?Sized + PhotoObject> SnapshotFetchResult<T> {
    pub fn new(items: Vec<Arc<T>>) -> Self {
        Self { items }
    }
}

impl<T: ?Sized + PhotoObject + 'static> FetchResult<T> for SnapshotFetchResult<T> {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn object_at(&self, index: usize) -> Arc<T> {
        Arc::clone(&self.items[index])
    }

    fn contains(&self, object: &Arc<T>) -> bool {
        self.items
            .iter()
            .any(|item| item.local_identifier() == object.local_identifier())
    }
}

/// A decoded preview, carried as a data URL ready for an `img` tag.
pub struct SampleImage {
    pub width: u32,
    pub height: u32,
    pub data_url: String,
}

impl ImageHandle for SampleImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The data URL behind an image delivered by the sample library, if the
/// handle came from it.
pub fn data_url(image: &dyn ImageHandle) -> Option<String> {
    image
        .as_any()
        .downcast_ref::<SampleImage>()
        .map(|image| image.data_url.clone())
}

pub struct SampleResource {
    pub asset_id: String,
    pub filename: String,
}

impl AssetResourceHandle for SampleResource {
    fn original_filename(&self) -> &str {
        &self.filename
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
