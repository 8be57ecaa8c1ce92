//! Ownership, membership, and security-token predicates.
//!
//! A record's `security` list carries ACL tokens of the form
//! `"<r|a>.<principal>"` where `r` grants read, `a` grants author (which
//! implies read). The principal is a user id, a team id, or the reserved
//! empty GUID meaning "everyone". Principal comparison follows the
//! `same_guid` contract (brace-, case-, underscore-insensitive).

use crate::models::{Context, Record, User};
use solkit_utils::{GUID_EMPTY, same_guid};

const READER_PREFIXES: [&str; 2] = ["r", "a"];
const AUTHOR_PREFIXES: [&str; 1] = ["a"];

/// Whether any ACL token grants one of `prefixes` to `principal`.
fn acl_grants(security: &[String], prefixes: &[&str], principal: &str) -> bool {
    if principal.is_empty() {
        return false;
    }
    security.iter().any(|token| {
        token.split_once('.').is_some_and(|(prefix, id)| {
            prefixes.contains(&prefix) && same_guid(id, principal)
        })
    })
}

fn acl_grants_any(context: &Context, security: &[String], prefixes: &[&str]) -> bool {
    let Some(user) = context.user.as_ref() else {
        return false;
    };

    if acl_grants(security, prefixes, &user.id) || acl_grants(security, prefixes, GUID_EMPTY) {
        return true;
    }

    user.team_ids
        .iter()
        .any(|team_id| acl_grants(security, prefixes, team_id))
}

/// Whether the context user may read via the security list (`r.` or `a.`
/// tokens for the user, their teams, or everyone).
#[must_use]
pub fn is_reader(context: &Context, security: &[String]) -> bool {
    acl_grants_any(context, security, &READER_PREFIXES)
}

/// Whether the context user is an author via the security list (`a.` tokens
/// only).
#[must_use]
pub fn is_author(context: &Context, security: &[String]) -> bool {
    acl_grants_any(context, security, &AUTHOR_PREFIXES)
}

/// Whether the user owns the record: same organization and the record's
/// `owned_by` is the user's id.
#[must_use]
pub fn is_owner(user: &User, record: &Record) -> bool {
    if user.id.is_empty() || user.organization_id.is_empty() {
        return false;
    }
    let same_org = record
        .organization_id
        .as_deref()
        .is_some_and(|org| same_guid(org, &user.organization_id));
    same_org
        && record
            .owned_by
            .as_deref()
            .is_some_and(|owner| same_guid(owner, &user.id))
}

/// Whether the user has a membership entry for the record (same
/// organization required).
#[must_use]
pub fn is_member(user: &User, record: &Record) -> bool {
    if user.id.is_empty() || user.organization_id.is_empty() {
        return false;
    }
    let same_org = record
        .organization_id
        .as_deref()
        .is_some_and(|org| same_guid(org, &user.organization_id));
    same_org && user.membership.contains_key(&record.id)
}

/// Whether the user's membership on the record carries `role_name`
/// (exact match).
#[must_use]
pub fn has_member_role(user: &User, record: &Record, role_name: &str) -> bool {
    is_member(user, record)
        && user
            .membership
            .get(&record.id)
            .is_some_and(|m| m.roles.iter().any(|r| r == role_name))
}

/// Whether the record belongs to the user's organization. Both ids must be
/// present and non-empty.
#[must_use]
pub fn record_owned_by_organization(user: &User, record: &Record) -> bool {
    let Some(record_org) = record.organization_id.as_deref().filter(|s| !s.is_empty()) else {
        return false;
    };
    !user.organization_id.is_empty() && same_guid(record_org, &user.organization_id)
}
