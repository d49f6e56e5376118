//! Albums, folders, and the classified collection union.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::asset::StaticAsset;
use crate::fetch_results::{FetchableWrapper, LazyFetchResults};
use crate::platform::{
    AssetCollectionHandle, AssetFetcher, CollectionFetcher, CollectionHandle,
    CollectionListHandle, FetchResult, PhotoObject,
};

/// A platform collection classified at construction: an album holding
/// assets, a folder holding child collections, or an unknown subtype kept
/// as its raw handle.
#[derive(Clone)]
pub enum PhotoCollection {
    Album(Album),
    Folder(Folder),
    Unknown(Arc<dyn CollectionHandle>),
}

impl PhotoCollection {
    pub fn id(&self) -> &str {
        match self {
            PhotoCollection::Album(album) => album.id(),
            PhotoCollection::Folder(folder) => folder.id(),
            PhotoCollection::Unknown(handle) => handle.local_identifier(),
        }
    }

    /// Classifies `handle` by capability. The platform is only expected to
    /// hand out albums and folders, but the base collection type is open;
    /// an unexpected subtype is kept as-is rather than trapping.
    pub fn new(handle: Arc<dyn CollectionHandle>) -> Self {
        if let Some(album) = Arc::clone(&handle).as_asset_collection() {
            PhotoCollection::Album(Album::new(album))
        } else if let Some(folder) = Arc::clone(&handle).as_collection_list() {
            PhotoCollection::Folder(Folder::new(folder))
        } else {
            PhotoCollection::Unknown(handle)
        }
    }

    /// The wrapped platform handle, whatever the variant.
    pub fn handle(&self) -> Arc<dyn CollectionHandle> {
        match self {
            PhotoCollection::Album(album) => album.handle() as Arc<dyn CollectionHandle>,
            PhotoCollection::Folder(folder) => folder.handle() as Arc<dyn CollectionHandle>,
            PhotoCollection::Unknown(handle) => Arc::clone(handle),
        }
    }

    pub fn title(&self) -> String {
        match self {
            PhotoCollection::Album(album) => album.title(),
            PhotoCollection::Folder(folder) => folder.title(),
            PhotoCollection::Unknown(handle) => handle.localized_title().unwrap_or_default(),
        }
    }

    /// Eagerly realized children; `None` unless this is a folder.
    pub fn children(&self, fetcher: &dyn CollectionFetcher) -> Option<Vec<PhotoCollection>> {
        match self {
            PhotoCollection::Folder(folder) => Some(folder.get_collections(fetcher)),
            _ => None,
        }
    }

    /// Lazy child view; `None` unless this is a folder.
    pub fn lazy_children(
        &self,
        fetcher: &dyn CollectionFetcher,
    ) -> Option<LazyFetchResults<PhotoCollection>> {
        match self {
            PhotoCollection::Folder(folder) => Some(folder.fetch_collections(fetcher)),
            _ => None,
        }
    }

    pub fn fetch_top_level(fetcher: &dyn CollectionFetcher) -> LazyFetchResults<PhotoCollection> {
        LazyFetchResults::new(fetcher.fetch_top_level_collections(None))
    }

    pub fn get_top_level(fetcher: &dyn CollectionFetcher) -> Vec<PhotoCollection> {
        let raw = fetcher.fetch_top_level_collections(None);
        (0..raw.count())
            .map(|index| PhotoCollection::new(raw.object_at(index)))
            .collect()
    }
}

impl FetchableWrapper for PhotoCollection {
    type Wrapped = dyn CollectionHandle;

    fn from_handle(handle: Arc<dyn CollectionHandle>) -> Self {
        PhotoCollection::new(handle)
    }

    fn id(&self) -> &str {
        PhotoCollection::id(self)
    }
}

impl PartialEq for PhotoCollection {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other) && self.id() == other.id()
    }
}

impl Eq for PhotoCollection {}

impl Hash for PhotoCollection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for PhotoCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            PhotoCollection::Album(_) => "Album",
            PhotoCollection::Folder(_) => "Folder",
            PhotoCollection::Unknown(_) => "Unknown",
        };
        f.debug_struct(variant)
            .field("id", &self.id())
            .field("title", &self.title())
            .finish()
    }
}

/// A leaf collection holding assets.
#[derive(Clone)]
pub struct Album {
    handle: Arc<dyn AssetCollectionHandle>,
}

impl Album {
    pub fn new(handle: Arc<dyn AssetCollectionHandle>) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> Arc<dyn AssetCollectionHandle> {
        Arc::clone(&self.handle)
    }

    pub fn id(&self) -> &str {
        self.handle.local_identifier()
    }

    pub fn title(&self) -> String {
        self.handle.localized_title().unwrap_or_default()
    }

    pub fn fetch_assets(&self, fetcher: &dyn AssetFetcher) -> LazyFetchResults<StaticAsset> {
        LazyFetchResults::new(fetcher.fetch_assets(&self.handle, None))
    }

    pub fn get_assets(&self, fetcher: &dyn AssetFetcher) -> Vec<StaticAsset> {
        let raw = fetcher.fetch_assets(&self.handle, None);
        (0..raw.count())
            .map(|index| StaticAsset::new(raw.object_at(index)))
            .collect()
    }

    /// Delegates to the platform result set's membership test with the
    /// asset's exact wrapped handle.
    pub fn contains(&self, fetcher: &dyn AssetFetcher, asset: &StaticAsset) -> bool {
        fetcher
            .fetch_assets(&self.handle, None)
            .contains(&asset.handle())
    }
}

impl FetchableWrapper for Album {
    type Wrapped = dyn AssetCollectionHandle;

    fn from_handle(handle: Arc<dyn AssetCollectionHandle>) -> Self {
        Album::new(handle)
    }

    fn id(&self) -> &str {
        Album::id(self)
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Album {}

impl Hash for Album {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Album")
            .field("id", &self.id())
            .field("title", &self.title())
            .finish()
    }
}

/// A container collection holding child collections.
#[derive(Clone)]
pub struct Folder {
    handle: Arc<dyn CollectionListHandle>,
}

impl Folder {
    pub fn new(handle: Arc<dyn CollectionListHandle>) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> Arc<dyn CollectionListHandle> {
        Arc::clone(&self.handle)
    }

    pub fn id(&self) -> &str {
        self.handle.local_identifier()
    }

    pub fn title(&self) -> String {
        self.handle.localized_title().unwrap_or_default()
    }

    pub fn fetch_collections(
        &self,
        fetcher: &dyn CollectionFetcher,
    ) -> LazyFetchResults<PhotoCollection> {
        LazyFetchResults::new(fetcher.fetch_collections(&self.handle, None))
    }

    pub fn get_collections(&self, fetcher: &dyn CollectionFetcher) -> Vec<PhotoCollection> {
        let raw = fetcher.fetch_collections(&self.handle, None);
        (0..raw.count())
            .map(|index| PhotoCollection::new(raw.object_at(index)))
            .collect()
    }
}

impl PartialEq for Folder {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Folder {}

impl Hash for Folder {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Folder")
            .field("id", &self.id())
            .field("title", &self.title())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{
        MockAlbumHandle, MockAssetFetcher, MockAssetHandle, MockCollectionFetcher,
        MockFetchResult, MockFolderHandle, MockPlainCollectionHandle,
    };
    use crate::platform::{AssetFetchResult, AssetHandle, CollectionFetchResult};

    fn same_object<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
        Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
    }

    #[test]
    fn test_classifies_album() {
        let handle = MockAlbumHandle::new("album-1");
        let collection = PhotoCollection::new(Arc::clone(&handle) as Arc<dyn CollectionHandle>);

        match &collection {
            PhotoCollection::Album(album) => assert!(same_object(&album.handle(), &handle)),
            other => panic!("expected an album, got {:?}", other),
        }
    }

    #[test]
    fn test_classifies_folder() {
        let handle = MockFolderHandle::new("folder-1");
        let collection = PhotoCollection::new(Arc::clone(&handle) as Arc<dyn CollectionHandle>);

        match &collection {
            PhotoCollection::Folder(folder) => assert!(same_object(&folder.handle(), &handle)),
            other => panic!("expected a folder, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_subtype_falls_back_to_unknown() {
        let handle = MockPlainCollectionHandle::new("other-1");
        let collection = PhotoCollection::new(Arc::clone(&handle) as Arc<dyn CollectionHandle>);

        match &collection {
            PhotoCollection::Unknown(kept) => assert!(same_object(kept, &handle)),
            other => panic!("expected unknown, got {:?}", other),
        }
        assert_eq!(collection.id(), "other-1");
        assert_eq!(collection.title(), "");
    }

    #[test]
    fn test_title_defaults_to_empty() {
        let album = Album::new(MockAlbumHandle::new("a") as Arc<dyn AssetCollectionHandle>);
        assert_eq!(album.title(), "");

        let titled = Album::new(
            MockAlbumHandle::titled("b", "Holidays") as Arc<dyn AssetCollectionHandle>
        );
        assert_eq!(titled.title(), "Holidays");

        let folder =
            PhotoCollection::new(MockFolderHandle::titled("f", "2023") as Arc<dyn CollectionHandle>);
        assert_eq!(folder.title(), "2023");
    }

    #[test]
    fn test_folder_get_collections_preserves_order_and_identity() {
        let a = MockAlbumHandle::new("a") as Arc<dyn CollectionHandle>;
        let b = MockFolderHandle::new("b") as Arc<dyn CollectionHandle>;
        let c = MockAlbumHandle::new("c") as Arc<dyn CollectionHandle>;
        let fetcher = MockCollectionFetcher {
            children: Some(MockFetchResult::new(vec![
                Arc::clone(&a),
                Arc::clone(&b),
                Arc::clone(&c),
            ]) as CollectionFetchResult),
            ..MockCollectionFetcher::default()
        };

        let folder = Folder::new(MockFolderHandle::new("parent") as Arc<dyn CollectionListHandle>);
        let children = folder.get_collections(&fetcher);

        assert_eq!(children.len(), 3);
        let ids: Vec<&str> = children.iter().map(|child| child.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        for (child, handle) in children.iter().zip([&a, &b, &c]) {
            assert!(same_object(&child.handle(), handle));
        }
        // The fetch went to the folder we asked about.
        let recorded = fetcher.fetch_collections_folders.lock().unwrap();
        assert!(same_object(&recorded[0], &folder.handle()));
    }

    #[test]
    fn test_children_only_for_folders() {
        let fetcher = MockCollectionFetcher::default();
        let album =
            PhotoCollection::new(MockAlbumHandle::new("a") as Arc<dyn CollectionHandle>);
        assert!(album.children(&fetcher).is_none());
        assert!(album.lazy_children(&fetcher).is_none());

        let folder =
            PhotoCollection::new(MockFolderHandle::new("f") as Arc<dyn CollectionHandle>);
        assert_eq!(folder.children(&fetcher), Some(Vec::new()));
        assert!(folder.lazy_children(&fetcher).is_some());
    }

    #[test]
    fn test_empty_album_fetch() {
        let fetcher = MockAssetFetcher::default();
        let album = Album::new(MockAlbumHandle::new("a") as Arc<dyn AssetCollectionHandle>);

        let assets = album.fetch_assets(&fetcher);
        assert_eq!(assets.len(), 0);
        assert!(assets.is_empty());
    }

    #[test]
    fn test_fetch_assets_queries_this_album() {
        let handle = MockAlbumHandle::new("a");
        let fetcher = MockAssetFetcher::default();
        let album = Album::new(Arc::clone(&handle) as Arc<dyn AssetCollectionHandle>);

        album.fetch_assets(&fetcher);
        let recorded = fetcher.fetch_assets_albums.lock().unwrap();
        assert!(same_object(&recorded[0], &handle));
    }

    #[test]
    fn test_contains_delegates_to_result_set() {
        for expected in [true, false] {
            let asset_handle = MockAssetHandle::new("asset-1");
            let asset = StaticAsset::new(Arc::clone(&asset_handle) as Arc<dyn AssetHandle>);
            let result = MockFetchResult::with_contains(Vec::new(), expected);
            let fetcher = MockAssetFetcher::returning(
                Arc::clone(&result) as AssetFetchResult
            );
            let album = Album::new(MockAlbumHandle::new("a") as Arc<dyn AssetCollectionHandle>);

            assert_eq!(album.contains(&fetcher, &asset), expected);
            let probed = result.contains_calls.lock().unwrap();
            assert!(same_object(&probed[0], &asset_handle));
        }
    }

    #[test]
    fn test_top_level_enumeration() {
        let a = MockAlbumHandle::new("a") as Arc<dyn CollectionHandle>;
        let f = MockFolderHandle::new("f") as Arc<dyn CollectionHandle>;
        let fetcher = MockCollectionFetcher {
            top_level: Some(
                MockFetchResult::new(vec![Arc::clone(&a), Arc::clone(&f)]) as CollectionFetchResult
            ),
            ..MockCollectionFetcher::default()
        };

        let eager = PhotoCollection::get_top_level(&fetcher);
        assert_eq!(eager.len(), 2);
        assert!(matches!(eager[0], PhotoCollection::Album(_)));
        assert!(matches!(eager[1], PhotoCollection::Folder(_)));

        let lazy = PhotoCollection::fetch_top_level(&fetcher);
        assert_eq!(lazy.len(), 2);
        assert_eq!(lazy.get(0).id(), "a");
    }

    #[test]
    fn test_collection_equality_by_identity() {
        let left = PhotoCollection::new(MockAlbumHandle::new("same") as Arc<dyn CollectionHandle>);
        let right = PhotoCollection::new(MockAlbumHandle::new("same") as Arc<dyn CollectionHandle>);
        let folder = PhotoCollection::new(MockFolderHandle::new("same") as Arc<dyn CollectionHandle>);

        assert_eq!(left, right);
        assert_ne!(left, folder);
    }
}
