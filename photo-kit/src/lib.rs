//! # photo-kit
//!
//! Typed, observable wrappers over a platform photo library, built for
//! declarative UIs.
//!
//! The platform's loosely-typed, reference-counted collection and asset
//! objects stay behind the trait seam in [`platform`]; this crate presents
//! them as value-oriented wrappers instead:
//! - Albums, folders, and a classified [`PhotoCollection`] union
//! - Snapshot ([`StaticAsset`]) and observable ([`Asset`]) asset forms
//! - [`LazyFetchResults`], a randomly-indexable, identity-caching view over
//!   a platform fetch result
//! - [`PhotoLibraryObserver`], which keeps any fetch-result-backed state
//!   live as the library mutates underneath it
//!
//! ## Change observation
//!
//! Library mutations arrive on platform background threads. Observers
//! filter each change against the result set they hold and, when relevant,
//! schedule announce-then-swap on the UI thread through a
//! [`MainDispatcher`]. See the `photo-browser` demo application for the
//! full wiring.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use photo_kit::{PhotoCollection, PhotoLibraryServices};
//!
//! let collections = PhotoCollection::get_top_level(services.collections.as_ref());
//! for collection in &collections {
//!     println!("{}: {}", collection.id(), collection.title());
//! }
//! ```

use std::sync::Arc;

pub mod asset;
pub mod collection;
pub mod dispatch;
pub mod error;
pub mod fetch_results;
pub mod observed_asset;
pub mod observer;
pub mod platform;
pub mod unsorted;

#[cfg(test)]
pub(crate) mod mocks;

pub use asset::{PreviewInfo, StaticAsset};
pub use collection::{Album, Folder, PhotoCollection};
pub use dispatch::{
    ChannelDispatcher, ImmediateDispatcher, MainDispatcher, MainTask, MainTaskReceiver,
};
pub use error::AssetError;
pub use fetch_results::{FetchableWrapper, LazyFetchResults};
pub use observed_asset::Asset;
pub use observer::{Animation, ChangePublisher, PhotoLibraryObserver};
pub use unsorted::unsorted_assets;

/// The platform services an application wires together once and hands to
/// everything that talks to the photo library. Injected explicitly (no
/// process-wide mutable default), so tests substitute fakes per instance.
#[derive(Clone)]
pub struct PhotoLibraryServices {
    pub library: Arc<dyn platform::PhotoLibrary>,
    pub assets: Arc<dyn platform::AssetFetcher>,
    pub collections: Arc<dyn platform::CollectionFetcher>,
    pub images: Arc<dyn platform::ImageRequestService>,
    pub resources: Arc<dyn platform::ResourceDataService>,
    pub dispatcher: Arc<dyn MainDispatcher>,
}
