//! Value-shape predicates.
//!
//! Optional string fields on platform documents routinely hold `""` where
//! "absent" is meant. These helpers give the rest of the platform one
//! definition of "actually present".

/// Whether an optional string field holds a non-empty value.
#[must_use]
pub fn is_non_empty_string(v: Option<&str>) -> bool {
    v.is_some_and(|s| !s.is_empty())
}

/// The trimmed value, or `None` when absent or blank.
#[must_use]
pub fn trimmed_or_none(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}
