//! Data model for privilege evaluation.
//!
//! Contexts and records arrive from the platform as JSON documents with
//! camel-cased fields; everything here is serde-derived with defaults so
//! partial documents deserialize cleanly. Identifiers are free-form strings
//! (the platform also uses non-GUID ids like `"org1"`) and are always
//! compared through `solkit_utils::same_guid`, never byte-equality.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use solkit_utils::is_non_empty_string;

/// Per-request evaluation context: who is asking, in which organization,
/// under which solution.
///
/// The top-level id fields mirror the embedded objects; the engine prefers
/// the objects and falls back to the ids when an object was not loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Context {
    pub organization_id: Option<String>,
    pub user_id: Option<String>,
    pub solution_id: Option<String>,
    pub organization: Option<Organization>,
    pub user: Option<User>,
    pub solution: Option<Solution>,
}

impl Context {
    /// The user id: `user_id`, else the embedded user's id.
    #[must_use]
    pub fn effective_user_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.user.as_ref().map(|u| u.id.as_str()))
            .filter(|s| !s.is_empty())
    }

    /// The solution id: `solution_id`, else the embedded solution's id.
    #[must_use]
    pub fn effective_solution_id(&self) -> Option<&str> {
        self.solution_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.solution.as_ref().map(|s| s.id.as_str()))
            .filter(|s| !s.is_empty())
    }
}

/// An organization (tenant). `owned_by` is the user id of its owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: String,
    pub owned_by: String,
}

/// The requesting user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub organization_id: String,
    /// Explicit role names, matched case-insensitively.
    pub roles: Vec<String>,
    /// Team ids, usable as ACL principals on record security lists.
    pub team_ids: Vec<String>,
    /// License names held directly by the user.
    pub licenses: Vec<String>,
    /// Per-record membership, keyed by record id.
    pub membership: HashMap<String, Membership>,
}

/// A user's membership on a specific record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Membership {
    pub roles: Vec<String>,
}

/// A solution: the deployable unit a tenant runs, carrying the role and
/// license catalogs and the entity metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Solution {
    pub id: String,
    pub owned_by: String,
    pub roles: Vec<SolutionRole>,
    pub licenses: Vec<SolutionLicense>,
    pub entities: Vec<EntityDef>,
}

/// A role defined by the solution, granting a set of privilege tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolutionRole {
    /// Role name, matched case-insensitively against the user's roles.
    pub value: String,
    /// Comma-joined privilege tokens, e.g. `"contact.read, contact.all"`.
    pub privileges: String,
}

/// A license in the solution's catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolutionLicense {
    pub name: String,
    /// Default licenses are granted to every user of the solution.
    pub is_default: bool,
    /// Feature keys this license unlocks, e.g. `"Entity.contact"`.
    pub features: Vec<String>,
}

/// Entity metadata, looked up by `(entity_name, entity_type)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntityDef {
    pub entity_name: String,
    pub entity_type: Option<String>,
    /// URL slug, used by the platform's routing layer.
    pub slug: Option<String>,
    pub disable_create: bool,
    pub disable_update: bool,
    pub disable_delete: bool,
}

/// An entity instance under evaluation. Externally owned and read-only to
/// the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    /// Record id; the reserved all-zero GUID means "no concrete record"
    /// (entity-level check).
    pub id: String,
    pub entity_name: Option<String>,
    pub entity_type: Option<String>,
    pub organization_id: Option<String>,
    pub solution_id: Option<String>,
    /// User id of the record owner.
    pub owned_by: Option<String>,
    /// Global records are universally readable.
    pub is_global: bool,
    pub disable_create: bool,
    pub disable_update: bool,
    pub disable_delete: bool,
    /// System-managed flags, honored alongside the top-level ones.
    pub system: Option<SystemFlags>,
    /// ACL tokens: `"r.<principal>"` (reader) or `"a.<principal>"` (author);
    /// the principal is a user id, team id, or the empty GUID ("everyone").
    pub security: Vec<String>,
}

impl Record {
    /// Whether the record lacks a concrete id (missing or the empty GUID).
    #[must_use]
    pub fn has_no_id(&self) -> bool {
        self.id.is_empty() || solkit_utils::is_empty_guid(&self.id)
    }
}

/// System-managed disable flags nested under `Record::system`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemFlags {
    pub disable_update: bool,
    pub disable_delete: bool,
}

/// The operation being checked.
///
/// Parsed case-insensitively; anything outside the well-known set is carried
/// as `Custom` (lower-cased) and treated like the write operations by the
/// decision engine's final switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum PrivilegeType {
    #[default]
    Read,
    Create,
    Update,
    Delete,
    ChangeOwner,
    Custom(String),
}

impl PrivilegeType {
    /// Canonical lower-case token, as used in privilege strings.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::ChangeOwner => "change-owner",
            Self::Custom(s) => s,
        }
    }
}

impl From<&str> for PrivilegeType {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            // empty defaults to read
            "read" | "" => Self::Read,
            "create" => Self::Create,
            "update" => Self::Update,
            "delete" => Self::Delete,
            "change-owner" => Self::ChangeOwner,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl fmt::Display for PrivilegeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether two organization ids satisfy the context invariant.
///
/// Both-absent counts as matching; a one-sided id is a mismatch.
pub(crate) fn org_ids_match(context_org_id: Option<&str>, user_org_id: &str) -> bool {
    let ctx = context_org_id.unwrap_or("");
    if !is_non_empty_string(Some(ctx)) && !is_non_empty_string(Some(user_org_id)) {
        return true;
    }
    solkit_utils::same_guid(ctx, user_org_id)
}
