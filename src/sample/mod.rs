//! An in-memory photo library scanned from a directory tree.
//!
//! This is the demo's stand-in for the real platform: it implements every
//! service trait in `photo_kit::platform`, serves previews as data URLs,
//! and drives the change-observation pipeline end to end. A favorite
//! toggle mutates the store on a background thread and then posts a change
//! notification to every registered observer, exactly the delivery shape
//! the library's observers are written against.

mod change;
mod handles;
mod store;

pub use handles::data_url;

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, Weak};

use image::imageops::FilterType;
use image::ImageFormat;
use photo_kit::platform::{
    AlbumFetchResult, AssetCollectionHandle, AssetFetchResult, AssetFetcher, AssetHandle,
    AssetResourceHandle, ChangeCompletion, ChangeObserver, ChangeRequest, CollectionFetchResult,
    CollectionFetcher, CollectionHandle, CollectionListHandle, ContentMode, DataChunkHandler,
    DataCompletion, FetchOptions, ImageHandle, ImageRequestOptions, ImageRequestService,
    ImageResultHandler, ImageResultInfo, ImageSize, PhotoLibrary, PhotoObject, PlatformError,
    ResourceDataService,
};
use photo_kit::{ChannelDispatcher, MainTaskReceiver, PhotoLibraryServices};

use crate::config::AppConfig;
use crate::error::AppError;
use change::SampleChange;
use handles::{SampleImage, SampleResource, SnapshotFetchResult};
use store::SampleStore;

const DATA_CHUNK_SIZE: usize = 64 * 1024;

static NEXT_REQUEST_ID: AtomicI32 = AtomicI32::new(1);

/// The sample platform: one object implementing every service seam.
pub struct SampleLibrary {
    store: Arc<SampleStore>,
    observers: Mutex<Vec<Weak<dyn ChangeObserver>>>,
}

impl SampleLibrary {
    pub fn open(root: &Path) -> Result<Arc<Self>, AppError> {
        let store = SampleStore::scan(root)?;
        Ok(Arc::new(Self {
            store,
            observers: Mutex::new(Vec::new()),
        }))
    }

    fn snapshot_assets(&self, ids: &[String]) -> AssetFetchResult {
        let items: Vec<Arc<dyn AssetHandle>> = ids
            .iter()
            .filter_map(|id| self.store.asset_handle(id))
            .collect();
        Arc::new(SnapshotFetchResult::new(items))
    }

    fn snapshot_collections(&self, ids: &[String]) -> CollectionFetchResult {
        let items: Vec<Arc<dyn CollectionHandle>> = ids
            .iter()
            .filter_map(|id| self.store.collection_handle(id))
            .collect();
        Arc::new(SnapshotFetchResult::new(items))
    }
}

impl AssetFetcher for SampleLibrary {
    fn fetch_assets(
        &self,
        album: &Arc<dyn AssetCollectionHandle>,
        _options: Option<&FetchOptions>,
    ) -> AssetFetchResult {
        self.snapshot_assets(&self.store.album_asset_ids(album.local_identifier()))
    }

    fn fetch_all_assets(&self, _options: Option<&FetchOptions>) -> AssetFetchResult {
        self.snapshot_assets(&self.store.all_asset_ids())
    }

    fn fetch_asset(&self, local_identifier: &str) -> Option<Arc<dyn AssetHandle>> {
        self.store.asset_handle(local_identifier)
    }
}

impl CollectionFetcher for SampleLibrary {
    fn fetch_collections(
        &self,
        folder: &Arc<dyn CollectionListHandle>,
        _options: Option<&FetchOptions>,
    ) -> CollectionFetchResult {
        self.snapshot_collections(&self.store.folder_child_ids(folder.local_identifier()))
    }

    fn fetch_top_level_collections(&self, _options: Option<&FetchOptions>) -> CollectionFetchResult {
        self.snapshot_collections(&self.store.top_level_ids())
    }

    fn fetch_albums_containing(
        &self,
        asset: &Arc<dyn AssetHandle>,
        _options: Option<&FetchOptions>,
    ) -> AlbumFetchResult {
        let items: Vec<Arc<dyn AssetCollectionHandle>> = self
            .store
            .album_ids_containing(asset.local_identifier())
            .iter()
            .filter_map(|id| self.store.album_handle(id))
            .collect();
        Arc::new(SnapshotFetchResult::new(items))
    }
}

impl PhotoLibrary for SampleLibrary {
    fn register(&self, observer: Weak<dyn ChangeObserver>) {
        self.observers.lock().unwrap().push(observer);
    }

    fn perform_changes(&self, request: ChangeRequest, completion: ChangeCompletion) {
        let ChangeRequest::SetFavorite { asset, is_favorite } = request;
        let store = Arc::clone(&self.store);
        let observers = self.observers.lock().unwrap().clone();

        // Commit and notify from a background thread, the way the platform
        // delivers transaction results and change notifications.
        std::thread::spawn(move || {
            let id = asset.local_identifier().to_string();
            if store.set_favorite(&id, is_favorite) {
                log::debug!("Committed favorite={} for asset {}", is_favorite, id);
                completion(true, None);
                let change = SampleChange::new(store, [id]);
                for observer in &observers {
                    if let Some(observer) = observer.upgrade() {
                        observer.photo_library_did_change(&change);
                    }
                }
            } else {
                let error: PlatformError =
                    Arc::new(AppError::NotFound(format!("asset {}", id)));
                completion(false, Some(error));
            }
        });
    }
}

impl ImageRequestService for SampleLibrary {
    fn request_image(
        &self,
        asset: &Arc<dyn AssetHandle>,
        target_size: ImageSize,
        content_mode: ContentMode,
        _options: Option<&ImageRequestOptions>,
        mut handler: ImageResultHandler,
    ) {
        let store = Arc::clone(&self.store);
        let id = asset.local_identifier().to_string();
        let request_id = NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed);

        std::thread::spawn(move || {
            let info = ImageResultInfo {
                request_id: Some(request_id),
                ..ImageResultInfo::default()
            };
            match load_preview(&store, &id, target_size, content_mode) {
                Ok(image) => handler(Some(Arc::new(image) as Arc<dyn ImageHandle>), info),
                Err(error) => {
                    log::warn!("Preview for {} failed: {}", id, error);
                    handler(
                        None,
                        ImageResultInfo {
                            error: Some(Arc::new(error)),
                            ..info
                        },
                    );
                }
            }
        });
    }
}

impl ResourceDataService for SampleLibrary {
    fn resources_for(&self, asset: &Arc<dyn AssetHandle>) -> Vec<Arc<dyn AssetResourceHandle>> {
        match self.store.asset_path(asset.local_identifier()) {
            Some(path) => {
                let filename = path
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                vec![Arc::new(SampleResource {
                    asset_id: asset.local_identifier().to_string(),
                    filename,
                }) as Arc<dyn AssetResourceHandle>]
            }
            None => Vec::new(),
        }
    }

    fn request_data(
        &self,
        resource: &Arc<dyn AssetResourceHandle>,
        mut chunk_handler: DataChunkHandler,
        completion: DataCompletion,
    ) {
        let Some(resource) = resource.as_any().downcast_ref::<SampleResource>() else {
            let error: PlatformError =
                Arc::new(AppError::NotFound("foreign resource handle".to_string()));
            return completion(Some(error));
        };
        let store = Arc::clone(&self.store);
        let asset_id = resource.asset_id.clone();

        std::thread::spawn(move || {
            let Some(path) = store.asset_path(&asset_id) else {
                let error: PlatformError =
                    Arc::new(AppError::NotFound(format!("asset {}", asset_id)));
                return completion(Some(error));
            };
            match std::fs::read(&path) {
                Ok(bytes) => {
                    for chunk in bytes.chunks(DATA_CHUNK_SIZE) {
                        chunk_handler(chunk);
                    }
                    completion(None);
                }
                Err(error) => completion(Some(Arc::new(AppError::Io(error)))),
            }
        });
    }
}

fn load_preview(
    store: &SampleStore,
    id: &str,
    target_size: ImageSize,
    content_mode: ContentMode,
) -> Result<SampleImage, AppError> {
    let path = store
        .asset_path(id)
        .ok_or_else(|| AppError::NotFound(format!("asset {}", id)))?;
    let decoded = image::open(&path).map_err(|e| AppError::Image(e.to_string()))?;

    let target_width = target_size.width.min(u32::MAX as f64) as u32;
    let target_height = target_size.height.min(u32::MAX as f64) as u32;
    let resized = if target_width >= decoded.width() && target_height >= decoded.height() {
        decoded
    } else {
        match content_mode {
            ContentMode::AspectFit => decoded.thumbnail(target_width, target_height),
            ContentMode::AspectFill => {
                decoded.resize_to_fill(target_width, target_height, FilterType::Triangle)
            }
        }
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = image::DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg)
        .map_err(|e| AppError::Image(e.to_string()))?;

    use base64::{engine::general_purpose, Engine as _};
    let encoded = general_purpose::STANDARD.encode(buffer.into_inner());

    Ok(SampleImage {
        width: rgb.width(),
        height: rgb.height(),
        data_url: format!("data:image/jpeg;base64,{}", encoded),
    })
}

/// Opens the configured sample library and wires the full service bundle.
/// The returned receiver must be pumped on the UI thread.
pub fn build_services(
    config: &AppConfig,
) -> Result<(PhotoLibraryServices, MainTaskReceiver), AppError> {
    let library = SampleLibrary::open(Path::new(&config.photos_root))?;
    let (dispatcher, receiver) = ChannelDispatcher::new();
    let services = PhotoLibraryServices {
        library: Arc::clone(&library) as _,
        assets: Arc::clone(&library) as _,
        collections: Arc::clone(&library) as _,
        images: Arc::clone(&library) as _,
        resources: Arc::clone(&library) as _,
        dispatcher,
    };
    Ok((services, receiver))
}
