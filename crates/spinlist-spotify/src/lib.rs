pub mod client;
pub mod config;
pub mod images;
pub mod mapping;

pub use client::{SpotifyClient, SpotifyClientError};
pub use config::SpotifyConfig;
pub use images::{ImageSize, SpotifyImage, image_url, largest_image_url};
