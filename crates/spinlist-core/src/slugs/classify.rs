use uuid::Uuid;

/// Length of the provider's opaque base62 ids.
const EXTERNAL_ID_LEN: usize = 22;

/// Textual length of a hyphenated UUID.
const UUID_LEN: usize = 36;

/// Whether a path segment is already an identifier rather than a slug.
///
/// Identifiers never hit the slug table: routing uses them as-is.
pub fn is_id(value: &str) -> bool {
  is_external_id(value) || is_uuid(value)
}

/// Exactly 22 ASCII letters or digits, any case.
pub fn is_external_id(value: &str) -> bool {
  value.len() == EXTERNAL_ID_LEN && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Canonical `8-4-4-4-12` hex form, case-insensitive.
pub fn is_uuid(value: &str) -> bool {
  // The hyphenated form is the only 36-char layout `Uuid` accepts.
  value.len() == UUID_LEN && Uuid::try_parse(value).is_ok()
}
