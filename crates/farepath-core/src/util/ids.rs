//! Route identifier normalization.

/// Normalize a location identifier: trim surrounding whitespace and
/// upper-case it.
///
/// Two inputs that differ only in case or surrounding whitespace
/// normalize to the same identifier.
///
/// ```
/// use farepath_core::normalize_id;
///
/// assert_eq!(normalize_id("  gru "), "GRU");
/// ```
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}
