use std::collections::HashSet;

use crate::domain::{Namespace, Slug};
use crate::ports::{SlugStore, StoreError};

/// Returns `base` or the lowest `base-N` (N >= 2) not yet taken in `namespace`.
///
/// One bulk prefix read, then every candidate is checked in memory. The
/// result is only free at the time of the read; the insert that follows is
/// what actually claims it.
pub async fn find_available_slug<S>(store: &S, namespace: Namespace, base: &str) -> Result<Slug, StoreError>
where
  S: SlugStore + ?Sized,
{
  let taken = store.slugs_with_prefix(namespace, base).await?;
  let slug = next_available(base, taken.iter().map(Slug::as_str));

  tracing::debug!(%namespace, base, taken = taken.len(), %slug, "probed slug");

  Ok(Slug::new(slug))
}

/// Pure half of [`find_available_slug`].
///
/// `base` itself is the implicit first variant; there is never a `-1`.
pub fn next_available<'a>(base: &str, taken: impl IntoIterator<Item = &'a str>) -> String {
  let taken: HashSet<&str> = taken.into_iter().collect();

  if !taken.contains(base) {
    return base.to_owned();
  }

  let mut counter: u64 = 2;
  loop {
    let candidate = format!("{base}-{counter}");
    if !taken.contains(candidate.as_str()) {
      return candidate;
    }
    counter += 1;
  }
}
