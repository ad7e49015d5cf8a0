pub mod catalog_sync;
pub mod slug_service;

pub use catalog_sync::{CatalogSync, SyncReport};
pub use slug_service::{SlugOptions, SlugService};
