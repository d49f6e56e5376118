//! Finding assets that belong to no album.

use std::collections::HashSet;

use crate::asset::StaticAsset;
use crate::collection::PhotoCollection;
use crate::platform::{AssetFetcher, CollectionFetcher};

/// Every asset that is not a member of any album.
///
/// One pass over the collection tree builds the union of album member ids,
/// then the full asset list is filtered against it. Probing each asset's
/// containing albums individually would cost one fetch per asset and grows
/// quadratically with library size; the subtraction stays linear.
pub fn unsorted_assets(
    assets: &dyn AssetFetcher,
    collections: &dyn CollectionFetcher,
) -> Vec<StaticAsset> {
    let mut sorted_ids: HashSet<String> = HashSet::new();
    let mut pending = PhotoCollection::get_top_level(collections);
    while let Some(collection) = pending.pop() {
        match collection {
            PhotoCollection::Album(album) => {
                for asset in album.get_assets(assets) {
                    sorted_ids.insert(asset.id().to_string());
                }
            }
            PhotoCollection::Folder(folder) => {
                pending.extend(folder.get_collections(collections));
            }
            PhotoCollection::Unknown(_) => {}
        }
    }

    StaticAsset::get_assets(assets)
        .into_iter()
        .filter(|asset| !sorted_ids.contains(asset.id()))
        .collect()
}
