//! GUID normalization and comparison.
//!
//! The normalization contract: strip braces, map underscores to hyphens,
//! trim surrounding whitespace, lower-case. Two identifiers are "the same"
//! when their normalized forms are byte-equal, so `{ABC}` and `abc` compare
//! equal while remaining distinct from `abd`.

use std::borrow::Cow;

use uuid::Uuid;

/// The reserved all-zero GUID.
///
/// Depending on context it means "no concrete record" or "everyone".
pub const GUID_EMPTY: &str = "00000000-0000-0000-0000-000000000000";

/// Normalize an identifier: strip braces, underscores to hyphens, trim,
/// lower-case.
///
/// Borrows the input when it is already in normalized form.
#[must_use]
pub fn clean_guid(v: &str) -> Cow<'_, str> {
    let trimmed = v.trim();
    if trimmed.len() == v.len()
        && !trimmed
            .chars()
            .any(|c| c == '{' || c == '}' || c == '_' || c.is_ascii_uppercase())
    {
        return Cow::Borrowed(v);
    }
    Cow::Owned(
        trimmed
            .chars()
            .filter(|c| *c != '{' && *c != '}')
            .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
            .collect(),
    )
}

/// Compare two identifiers under the [`clean_guid`] normalization.
#[must_use]
pub fn same_guid(a: &str, b: &str) -> bool {
    clean_guid(a) == clean_guid(b)
}

/// Whether the identifier is the reserved all-zero GUID.
#[must_use]
pub fn is_empty_guid(v: &str) -> bool {
    same_guid(v, GUID_EMPTY)
}

/// Whether the value parses as a well-formed GUID once normalized.
///
/// Stricter than [`clean_guid`]: free-form ids like `"org1"` normalize fine
/// but are not GUIDs.
#[must_use]
pub fn is_guid(v: &str) -> bool {
    Uuid::parse_str(&clean_guid(v)).is_ok()
}
