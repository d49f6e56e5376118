//! Change descriptions posted by the sample library.

use std::collections::HashSet;
use std::sync::Arc;

use photo_kit::platform::{
    AlbumFetchResult, AssetCollectionHandle, AssetFetchResult, AssetHandle, ChangeDetails,
    CollectionFetchResult, CollectionHandle, FetchResult, PhotoChange, PhotoObject,
};

use super::handles::SnapshotFetchResult;
use super::store::SampleStore;

/// Describes one committed mutation. Fetch results are considered affected
/// when any of their members changed; the details are a rebuilt snapshot
/// with fresh handles.
pub struct SampleChange {
    store: Arc<SampleStore>,
    changed: HashSet<String>,
}

impl SampleChange {
    pub fn new(store: Arc<SampleStore>, changed: impl IntoIterator<Item = String>) -> Self {
        Self {
            store,
            changed: changed.into_iter().collect(),
        }
    }
}

impl ChangeDetails<dyn AssetHandle> for SampleChange {
    fn change_details(&self, current: &AssetFetchResult) -> Option<AssetFetchResult> {
        let ids: Vec<String> = (0..current.count())
            .map(|index| current.object_at(index).local_identifier().to_string())
            .collect();
        if !ids.iter().any(|id| self.changed.contains(id)) {
            return None;
        }
        let items: Vec<Arc<dyn AssetHandle>> = ids
            .iter()
            .filter_map(|id| self.store.asset_handle(id))
            .collect();
        Some(Arc::new(SnapshotFetchResult::new(items)) as AssetFetchResult)
    }
}

// Favorite edits never alter the collection tree or album membership.

impl ChangeDetails<dyn CollectionHandle> for SampleChange {
    fn change_details(&self, _current: &CollectionFetchResult) -> Option<CollectionFetchResult> {
        None
    }
}

impl ChangeDetails<dyn AssetCollectionHandle> for SampleChange {
    fn change_details(&self, _current: &AlbumFetchResult) -> Option<AlbumFetchResult> {
        None
    }
}

impl PhotoChange for SampleChange {
    fn asset_after_changes(&self, asset: &Arc<dyn AssetHandle>) -> Option<Arc<dyn AssetHandle>> {
        let id = asset.local_identifier();
        if !self.changed.contains(id) {
            return None;
        }
        self.store.asset_handle(id)
    }
}
