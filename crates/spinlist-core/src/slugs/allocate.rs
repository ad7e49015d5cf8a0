use tracing::{debug, warn};

use crate::domain::{ExternalId, Namespace, Slug};
use crate::errors::CoreError;
use crate::ports::{SlugStore, StoreError};
use crate::slugs::probe::find_available_slug;

/// Base used when a name normalizes to nothing (`"!!!"`, non-Latin scripts).
pub const FALLBACK_BASE: &str = "untitled";

/// Outcome of [`claim_slug`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
  /// This call inserted the mapping.
  Created(Slug),
  /// A concurrent caller mapped the same external id first; this is its slug.
  Existing(Slug),
}

impl Claim {
  pub fn slug(&self) -> &Slug {
    match self {
      Claim::Created(slug) | Claim::Existing(slug) => slug,
    }
  }

  pub fn into_slug(self) -> Slug {
    match self {
      Claim::Created(slug) | Claim::Existing(slug) => slug,
    }
  }

  pub fn is_created(&self) -> bool {
    matches!(self, Claim::Created(_))
  }
}

/// Probes for a free variant of `base` and inserts it for `external_id`.
///
/// No lock is taken. The store's uniqueness constraints arbitrate:
/// - conflict and the external id now has a slug: another caller won the race
///   for the same entity, its slug is returned and nothing is raised;
/// - conflict and the external id still has no slug: the slug value went to a
///   different entity between probe and insert, so probe again, up to
///   `max_attempts` times;
/// - any other store failure is returned as is.
pub async fn claim_slug<S>(
  store: &S,
  namespace: Namespace,
  external_id: &ExternalId,
  base: &str,
  max_attempts: u32,
) -> Result<Claim, CoreError>
where
  S: SlugStore + ?Sized,
{
  let base = if base.is_empty() { FALLBACK_BASE } else { base };
  let max_attempts = max_attempts.max(1);

  for attempt in 1..=max_attempts {
    let slug = find_available_slug(store, namespace, base).await?;

    match store.insert_slug(namespace, external_id, &slug).await {
      Ok(()) => return Ok(Claim::Created(slug)),
      Err(StoreError::Conflict(reason)) => {
        if let Some(winner) = store.find_slug(namespace, external_id).await? {
          warn!(%namespace, %external_id, %winner, %reason, "lost slug race, using winner's slug");
          return Ok(Claim::Existing(winner));
        }
        debug!(%namespace, %external_id, %slug, attempt, "slug taken by another entity, probing again");
      }
      Err(err) => return Err(err.into()),
    }
  }

  Err(CoreError::Conflict(format!(
    "could not claim a {namespace} slug for {external_id} from base \"{base}\" after {max_attempts} attempts"
  )))
}
