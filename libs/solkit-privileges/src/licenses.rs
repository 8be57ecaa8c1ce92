//! License gating, independent of RBAC.
//!
//! Two entry points with different default postures:
//!
//! - [`check_licenses`] — the feature gate used by the decision engine.
//!   Permissive by default: no solution (or an empty catalog) means no
//!   licensing is configured, so the check passes.
//! - [`has_license`] — strict membership in the user's own license list,
//!   with no default-license fallback.

use crate::models::Context;
use crate::roles::{ROLE_SOLUTION_ADMIN, has_role};

/// Whether the context is licensed for a feature or entity key
/// (e.g. `"Entity.contact"` or `"Entity.contact.lead"`).
///
/// The effective license set is the user's own licenses plus every solution
/// license flagged as default. A license passes when it exists in the
/// solution catalog (case-insensitive) and that catalog entry's features
/// contain the key (trimmed, case-insensitive).
#[must_use]
pub fn check_licenses(context: &Context, feature_or_entity_name: &str) -> bool {
    // licensing is only enforced when a solution with a catalog exists
    let Some(solution) = context.solution.as_ref() else {
        return true;
    };

    let Some(user) = context.user.as_ref() else {
        return false;
    };

    if has_role(context, ROLE_SOLUTION_ADMIN, None).is_held() {
        return true;
    }

    if feature_or_entity_name.is_empty() {
        return false;
    }

    if solution.licenses.is_empty() {
        return true;
    }

    let mut effective: Vec<&str> = user.licenses.iter().map(String::as_str).collect();
    effective.extend(
        solution
            .licenses
            .iter()
            .filter(|l| l.is_default)
            .map(|l| l.name.as_str()),
    );

    let wanted = feature_or_entity_name.trim();
    effective.iter().any(|license| {
        solution
            .licenses
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(license))
            .is_some_and(|l| {
                l.features
                    .iter()
                    .any(|f| f.trim().eq_ignore_ascii_case(wanted))
            })
    })
}

/// Whether the user directly holds the named license.
///
/// Stricter than [`check_licenses`]: requires both user and solution, and
/// does not fall back to default licenses. An empty solution catalog still
/// passes (nothing to gate on).
#[must_use]
pub fn has_license(context: &Context, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let Some(user) = context.user.as_ref() else {
        return false;
    };
    let Some(solution) = context.solution.as_ref() else {
        return false;
    };

    if solution.licenses.is_empty() {
        return true;
    }

    if user.licenses.is_empty() {
        return false;
    }

    user.licenses
        .iter()
        .any(|license| license.eq_ignore_ascii_case(name))
}
