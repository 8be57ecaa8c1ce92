//! Role resolution.
//!
//! Two implicit roles sit above the user's explicit role list:
//!
//! - [`ROLE_SOLUTION_ADMIN`] — held by whoever owns the current solution;
//!   supersedes every other check in the engine.
//! - [`ROLE_ORG_ADMIN`] — held by the owner of the user's organization.
//!
//! Everything else is a case-insensitive literal match against
//! `user.roles`, preserving the stored casing in the returned label.

use crate::models::{Context, Record, org_ids_match};
use solkit_utils::same_guid;

/// Implicit role of the solution owner.
pub const ROLE_SOLUTION_ADMIN: &str = "SOLUTION-ADMIN";

/// Implicit role of the organization owner.
pub const ROLE_ORG_ADMIN: &str = "ORG-ADMIN";

/// Outcome of a role check.
///
/// `InvalidContext` marks configuration errors (missing user, organization
/// mismatch, empty role name) as distinct from a legitimate `NotHeld`; both
/// are falsy through [`RoleOutcome::is_held`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleOutcome {
    /// The role is held; carries the label in its source casing.
    Held(String),
    /// The role is not held.
    NotHeld,
    /// The context cannot support role checks at all.
    InvalidContext,
}

impl RoleOutcome {
    #[must_use]
    pub fn is_held(&self) -> bool {
        matches!(self, Self::Held(_))
    }

    /// The matched role label, if held.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Held(label) => Some(label),
            Self::NotHeld | Self::InvalidContext => None,
        }
    }
}

/// Whether the requesting user owns the current solution.
///
/// Requires a non-empty effective solution id; when a record is given its
/// `solution_id` must match. Ownership compares `solution.owned_by` against
/// the effective user id.
#[must_use]
pub fn is_solution_owner(context: &Context, record: Option<&Record>) -> bool {
    let Some(solution_id) = context.effective_solution_id() else {
        return false;
    };

    if let Some(record) = record {
        let matches = record
            .solution_id
            .as_deref()
            .is_some_and(|rid| same_guid(rid, solution_id));
        if !matches {
            return false;
        }
    }

    let Some(owned_by) = context
        .solution
        .as_ref()
        .map(|s| s.owned_by.as_str())
        .filter(|s| !s.is_empty())
    else {
        return false;
    };

    context
        .effective_user_id()
        .is_some_and(|uid| same_guid(owned_by, uid))
}

/// Resolve whether the user holds `role_name`, optionally with respect to a
/// record.
///
/// Solution ownership is always tested first and reported as
/// `SOLUTION-ADMIN` whatever role was asked for.
#[must_use]
pub fn has_role(context: &Context, role_name: &str, record: Option<&Record>) -> RoleOutcome {
    let Some(user) = context.user.as_ref() else {
        return RoleOutcome::InvalidContext;
    };

    if !org_ids_match(context.organization_id.as_deref(), &user.organization_id) {
        return RoleOutcome::InvalidContext;
    }

    if role_name.is_empty() {
        return RoleOutcome::InvalidContext;
    }

    if is_solution_owner(context, record) {
        return RoleOutcome::Held(ROLE_SOLUTION_ADMIN.to_owned());
    }

    if role_name == ROLE_ORG_ADMIN {
        if let Some(org) = context.organization.as_ref() {
            let owns_org = !org.owned_by.is_empty()
                && !user.id.is_empty()
                && same_guid(&org.owned_by, &user.id);
            let record_in_org = record.is_none_or(|r| {
                same_guid(&org.id, r.organization_id.as_deref().unwrap_or(""))
            });
            if owns_org && record_in_org {
                return RoleOutcome::Held(ROLE_ORG_ADMIN.to_owned());
            }
        }
    }

    user.roles
        .iter()
        .find(|role| role.eq_ignore_ascii_case(role_name))
        .map_or(RoleOutcome::NotHeld, |role| {
            RoleOutcome::Held(role.clone())
        })
}

/// The first role in `role_names` the user holds, short-circuiting.
#[must_use]
pub fn has_any_role<S: AsRef<str>>(
    context: &Context,
    role_names: &[S],
    record: Option<&Record>,
) -> Option<String> {
    role_names.iter().find_map(|name| {
        match has_role(context, name.as_ref(), record) {
            RoleOutcome::Held(label) => Some(label),
            RoleOutcome::NotHeld | RoleOutcome::InvalidContext => None,
        }
    })
}

/// Whether the user holds every role in `role_names`. An empty list fails.
#[must_use]
pub fn has_all_roles<S: AsRef<str>>(
    context: &Context,
    role_names: &[S],
    record: Option<&Record>,
) -> bool {
    if role_names.is_empty() {
        return false;
    }
    role_names
        .iter()
        .all(|name| has_role(context, name.as_ref(), record).is_held())
}
