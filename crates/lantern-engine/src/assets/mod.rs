//! Concurrent loading of named image and sound manifests.

mod fetch;
mod image;
mod loader;
mod manifest;

pub use fetch::{Fetch, FileFetcher, MemoryFetcher};
pub use self::image::Image;
pub use loader::{AssetBag, AssetLoader, PendingAssets, Progress, MAX_ASSET_WORKERS};
pub use manifest::AssetManifest;
