//! Slug allocation and resolution.
//!
//! Leaf to root:
//! - [`generate_slug`]: normalizes a display name into a URL-safe token.
//! - [`is_id`]: tells opaque identifiers apart from human-readable slugs.
//! - [`find_available_slug`]: lowest free numeric variant of a base, in one read.
//! - [`claim_slug`]: optimistic insert with a fallback read on conflict.
//!
//! The get-or-create and resolve flows that tie these together live in
//! [`SlugService`](crate::services::SlugService).

mod allocate;
mod classify;
mod generate;
mod probe;

pub use allocate::{Claim, FALLBACK_BASE, claim_slug};
pub use classify::{is_external_id, is_id, is_uuid};
pub use generate::generate_slug;
pub use probe::{find_available_slug, next_available};
