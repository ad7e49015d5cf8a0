use serde::Deserialize;

/// An entry of the `images` array the Web API returns for albums and artists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpotifyImage {
  pub url: String,
  pub height: Option<u32>,
  pub width: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
  Large,
  Medium,
  Small,
}

impl ImageSize {
  /// Position in the array. Assumes the API's largest-first ordering.
  fn index(self) -> usize {
    match self {
      ImageSize::Large => 0,
      ImageSize::Medium => 1,
      ImageSize::Small => 2,
    }
  }
}

/// URL of the image at `size`, falling back to the first one.
pub fn image_url(images: &[SpotifyImage], size: ImageSize) -> Option<String> {
  images.get(size.index()).or_else(|| images.first()).map(|img| img.url.clone())
}

/// URL of the tallest image; images without a height count as 0.
pub fn largest_image_url(images: &[SpotifyImage]) -> Option<String> {
  let mut largest = images.first()?;
  for img in images {
    if img.height.unwrap_or(0) > largest.height.unwrap_or(0) {
      largest = img;
    }
  }
  Some(largest.url.clone())
}
