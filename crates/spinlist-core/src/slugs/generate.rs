use unicode_normalization::UnicodeNormalization;

/// Converts a display name into a URL-safe slug.
///
/// Lowercases, decomposes (NFD) so that accents fall off their base letter,
/// keeps only `[a-z0-9]`, and turns every run of whitespace and hyphens into
/// a single hyphen. Anything else (punctuation, symbols, non-Latin scripts) is
/// dropped without leaving a separator, so `"AC/DC"` becomes `"acdc"`.
///
/// Total and pure: the empty string maps to the empty string.
pub fn generate_slug(name: &str) -> String {
  let lowered = name.to_lowercase();
  let mut slug = String::with_capacity(lowered.len());
  let mut pending_hyphen = false;

  for c in lowered.nfd() {
    if c.is_ascii_lowercase() || c.is_ascii_digit() {
      if pending_hyphen && !slug.is_empty() {
        slug.push('-');
      }
      pending_hyphen = false;
      slug.push(c);
    } else if is_separator(c) {
      pending_hyphen = true;
    }
  }

  slug
}

/// Hyphen, or whitespace as ECMAScript's `\s` defines it: Unicode White_Space
/// minus NEL (U+0085), plus the BOM (U+FEFF).
fn is_separator(c: char) -> bool {
  match c {
    '-' | '\u{feff}' => true,
    '\u{85}' => false,
    _ => c.is_whitespace(),
  }
}
