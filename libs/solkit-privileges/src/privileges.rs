//! Privilege-token grammar and role-based privilege matching.
//!
//! Two token shapes live here:
//!
//! - RBAC grant strings like `"contact.read.All"` attached to solution
//!   roles, matched by [`has_privilege`] as whole comma-delimited entries.
//! - Dispatch tokens (`USER.*`, `ENTITY.*`, `ROLE.*`, `HAS_LICENSE.*`,
//!   `HAS_NO_LICENSE.*`) parsed once into [`PrivilegeToken`] and folded by
//!   the engine's `check_privileges`.

use std::str::FromStr;

use crate::models::{Context, PrivilegeType};
use solkit_utils::same_guid;

/// Combinator for folding a list of privilege tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    /// Every token must pass (seeds `true`).
    And,
    /// Any token may pass (seeds `false`).
    Or,
}

/// A parsed privilege-dispatch token.
///
/// The grammar is closed: unrecognized prefixes or selectors are a
/// [`TokenParseError`] rather than a silent no-op, so callers can observe
/// malformed policy strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegeToken {
    /// `USER.Current` — passes when a user is present.
    UserCurrent,
    /// `USER.Anonymous` — passes when no user (or an id-less user) is
    /// present.
    UserAnonymous,
    /// `ENTITY.<name>[.<type>][.<prType>]` — entity existence plus an
    /// entity-privilege check (`prType` defaults to read).
    Entity {
        name: String,
        entity_type: Option<String>,
        pr_type: PrivilegeType,
    },
    /// `ROLE.<name>` — role resolution.
    Role(String),
    /// `HAS_LICENSE.<name>` — strict license membership.
    HasLicense(String),
    /// `HAS_NO_LICENSE.<name>` — negated strict license membership.
    HasNoLicense(String),
}

/// Failure to parse a privilege-dispatch token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenParseError {
    #[error("empty privilege token")]
    Empty,

    #[error("unrecognized privilege prefix `{0}`")]
    UnknownPrefix(String),

    #[error("unrecognized USER selector `{0}` (expected Current or Anonymous)")]
    UnknownUserSelector(String),

    #[error("privilege token `{0}` is missing its argument")]
    MissingArgument(String),
}

impl FromStr for PrivilegeToken {
    type Err = TokenParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(TokenParseError::Empty);
        }

        let segments: Vec<&str> = s.split('.').collect();
        let argument = |index: usize| {
            segments
                .get(index)
                .copied()
                .filter(|seg| !seg.is_empty())
                .ok_or_else(|| TokenParseError::MissingArgument(s.to_owned()))
        };

        match segments[0].to_ascii_uppercase().as_str() {
            "USER" => match argument(1)? {
                "Current" => Ok(Self::UserCurrent),
                "Anonymous" => Ok(Self::UserAnonymous),
                other => Err(TokenParseError::UnknownUserSelector(other.to_owned())),
            },
            "ENTITY" => {
                let name = argument(1)?.to_owned();
                let entity_type = segments
                    .get(2)
                    .copied()
                    .filter(|seg| !seg.is_empty())
                    .map(ToOwned::to_owned);
                let pr_type = segments
                    .get(3)
                    .copied()
                    .filter(|seg| !seg.is_empty())
                    .map_or(PrivilegeType::Read, PrivilegeType::from);
                Ok(Self::Entity {
                    name,
                    entity_type,
                    pr_type,
                })
            }
            "ROLE" => Ok(Self::Role(argument(1)?.to_owned())),
            "HAS_LICENSE" => Ok(Self::HasLicense(argument(1)?.to_owned())),
            "HAS_NO_LICENSE" => Ok(Self::HasNoLicense(argument(1)?.to_owned())),
            other => Err(TokenParseError::UnknownPrefix(other.to_owned())),
        }
    }
}

/// Whether the user's roles grant an RBAC token like `"contact.read"`.
///
/// The organization owner always passes. Otherwise every solution role whose
/// name appears in the user's role list is scanned, and the token must
/// appear as a whole comma-delimited entry in that role's (lower-cased,
/// space-stripped) privilege string.
#[must_use]
pub fn has_privilege(context: &Context, privilege: &str) -> bool {
    if privilege.is_empty() {
        return false;
    }

    let Some(user) = context.user.as_ref() else {
        return false;
    };

    // the organization owner has full permission
    if let Some(org) = context.organization.as_ref() {
        if !user.id.is_empty() && !org.owned_by.is_empty() && same_guid(&user.id, &org.owned_by) {
            return true;
        }
    }

    if user.roles.is_empty() {
        return false;
    }

    let Some(solution) = context.solution.as_ref() else {
        return false;
    };

    let memberships = format!(
        ",{},",
        user.roles.join(",").to_lowercase().replace(' ', "")
    );
    let wanted = format!(",{},", privilege.to_lowercase());

    solution.roles.iter().any(|role| {
        !role.value.is_empty()
            && memberships.contains(&format!(",{},", role.value.to_lowercase()))
            && !role.privileges.is_empty()
            && format!(",{},", role.privileges.to_lowercase().replace(' ', ""))
                .contains(&wanted)
    })
}
