//! The scanned, in-memory library state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use photo_kit::platform::{AssetCollectionHandle, AssetHandle, CollectionHandle};
use uuid::Uuid;

use super::handles::{SampleAlbumHandle, SampleAssetHandle, SampleFolderHandle};
use crate::error::AppError;

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

struct AssetRecord {
    path: PathBuf,
    favorite: bool,
    created: Option<DateTime<Utc>>,
}

struct AlbumRecord {
    title: String,
    asset_ids: Vec<String>,
}

struct FolderRecord {
    title: String,
    child_ids: Vec<String>,
}

#[derive(Default)]
struct StoreInner {
    assets: BTreeMap<String, AssetRecord>,
    /// Scan order, used for stable enumeration.
    asset_order: Vec<String>,
    albums: BTreeMap<String, AlbumRecord>,
    folders: BTreeMap<String, FolderRecord>,
    top_level: Vec<String>,
}

/// The mutable library state. Reads mint fresh snapshot handles; the only
/// mutation is the favorite flag, driven by `perform_changes`.
pub struct SampleStore {
    inner: RwLock<StoreInner>,
}

impl SampleStore {
    /// Scans `root` into a library: a directory of images becomes an album,
    /// a directory of directories becomes a folder, and images directly in
    /// `root` become assets in no album.
    pub fn scan(root: &Path) -> Result<Arc<Self>, AppError> {
        let mut inner = StoreInner::default();

        for entry in sorted_entries(root)? {
            if entry.is_dir() {
                let id = scan_collection(&mut inner, &entry)?;
                inner.top_level.push(id);
            } else if is_image_file(&entry) {
                add_asset(&mut inner, &entry);
            }
        }

        log::info!(
            "Scanned {}: {} assets, {} albums, {} folders",
            root.display(),
            inner.assets.len(),
            inner.albums.len(),
            inner.folders.len()
        );

        Ok(Arc::new(Self {
            inner: RwLock::new(inner),
        }))
    }

    pub fn asset_handle(&self, id: &str) -> Option<Arc<dyn AssetHandle>> {
        let inner = self.inner.read().unwrap();
        inner.assets.get(id).map(|record| {
            Arc::new(SampleAssetHandle {
                id: id.to_string(),
                favorite: record.favorite,
                created: record.created,
            }) as Arc<dyn AssetHandle>
        })
    }

    pub fn album_handle(&self, id: &str) -> Option<Arc<dyn AssetCollectionHandle>> {
        let inner = self.inner.read().unwrap();
        inner.albums.get(id).map(|record| {
            Arc::new(SampleAlbumHandle {
                id: id.to_string(),
                title: record.title.clone(),
            }) as Arc<dyn AssetCollectionHandle>
        })
    }

    pub fn collection_handle(&self, id: &str) -> Option<Arc<dyn CollectionHandle>> {
        let inner = self.inner.read().unwrap();
        if let Some(record) = inner.albums.get(id) {
            return Some(Arc::new(SampleAlbumHandle {
                id: id.to_string(),
                title: record.title.clone(),
            }) as Arc<dyn CollectionHandle>);
        }
        inner.folders.get(id).map(|record| {
            Arc::new(SampleFolderHandle {
                id: id.to_string(),
                title: record.title.clone(),
            }) as Arc<dyn CollectionHandle>
        })
    }

    pub fn all_asset_ids(&self) -> Vec<String> {
        self.inner.read().unwrap().asset_order.clone()
    }

    pub fn album_asset_ids(&self, album_id: &str) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        inner
            .albums
            .get(album_id)
            .map(|record| record.asset_ids.clone())
            .unwrap_or_default()
    }

    pub fn folder_child_ids(&self, folder_id: &str) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        inner
            .folders
            .get(folder_id)
            .map(|record| record.child_ids.clone())
            .unwrap_or_default()
    }

    pub fn top_level_ids(&self) -> Vec<String> {
        self.inner.read().unwrap().top_level.clone()
    }

    pub fn album_ids_containing(&self, asset_id: &str) -> Vec<String> {
        let inner = self.inner.read().unwrap();
        inner
            .albums
            .iter()
            .filter(|(_, record)| record.asset_ids.iter().any(|id| id == asset_id))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn asset_path(&self, id: &str) -> Option<PathBuf> {
        let inner = self.inner.read().unwrap();
        inner.assets.get(id).map(|record| record.path.clone())
    }

    /// Returns false when the asset is unknown.
    pub fn set_favorite(&self, id: &str, favorite: bool) -> bool {
        let mut inner = self.inner.write().unwrap();
        match inner.assets.get_mut(id) {
            Some(record) => {
                record.favorite = favorite;
                true
            }
            None => false,
        }
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    Ok(entries)
}

fn add_asset(inner: &mut StoreInner, path: &Path) -> String {
    let id = Uuid::new_v4().to_string();
    let created = std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .ok()
        .map(DateTime::<Utc>::from);
    inner.assets.insert(
        id.clone(),
        AssetRecord {
            path: path.to_path_buf(),
            favorite: false,
            created,
        },
    );
    inner.asset_order.push(id.clone());
    id
}

fn scan_collection(inner: &mut StoreInner, dir: &Path) -> Result<String, AppError> {
    let title = dir
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let entries = sorted_entries(dir)?;
    let subdirs: Vec<&PathBuf> = entries.iter().filter(|entry| entry.is_dir()).collect();

    let id = Uuid::new_v4().to_string();
    if subdirs.is_empty() {
        let asset_ids = entries
            .iter()
            .filter(|entry| is_image_file(entry))
            .map(|entry| add_asset(inner, entry))
            .collect();
        inner.albums.insert(id.clone(), AlbumRecord { title, asset_ids });
    } else {
        let mut child_ids = Vec::new();
        for subdir in subdirs {
            child_ids.push(scan_collection(inner, subdir)?);
        }
        for entry in entries.iter().filter(|entry| is_image_file(entry)) {
            log::debug!(
                "Ignoring loose image {} inside folder {}",
                entry.display(),
                title
            );
        }
        inner.folders.insert(id.clone(), FolderRecord { title, child_ids });
    }
    Ok(id)
}
