pub mod metadata;
pub mod slug_store;

pub use metadata::{AlbumMetadata, ArtistMetadata, MetadataError, MetadataSource};
pub use slug_store::{SlugStore, StoreError};
