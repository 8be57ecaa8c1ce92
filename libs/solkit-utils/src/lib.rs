//! Shared value and GUID utilities for the solution platform.
//!
//! Identifiers on the platform are strings that are usually GUIDs but may
//! arrive with braces, underscores, or mixed case depending on the producing
//! system. All identifier comparison goes through [`clean_guid`] /
//! [`same_guid`] so the rest of the platform never has to care about the
//! textual form.

pub mod guid;
pub mod value;

pub use guid::{GUID_EMPTY, clean_guid, is_empty_guid, is_guid, same_guid};
pub use value::{is_non_empty_string, trimmed_or_none};
