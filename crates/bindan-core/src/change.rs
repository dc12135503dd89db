//! Change detection
//!
//! Addresses are compared as plain strings. No canonicalization happens, so
//! two spellings of the same IPv6 address count as a change.

/// Whether `current` differs from the last recorded address
///
/// A missing baseline always counts as a change.
pub fn has_changed(last: Option<&str>, current: &str) -> bool {
    last != Some(current)
}
