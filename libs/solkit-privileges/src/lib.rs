//! Privilege and authorization engine for the solution platform.
//!
//! This crate decides, for a per-request [`Context`] and a [`Record`],
//! whether a requested operation is allowed:
//!
//! - [`PrivilegeEngine`] — the decision orchestrator (record/entity checks,
//!   privilege-token folds), carrying an injected [`DecisionLog`].
//! - [`roles`] — implicit `SOLUTION-ADMIN` / `ORG-ADMIN` roles and explicit
//!   user-role resolution.
//! - [`licenses`] — feature/entity license gating, independent of RBAC.
//! - [`privileges`] — the privilege-token grammar and role-based matching.
//! - [`acl`] — ownership, membership, and `r.`/`a.` security-token
//!   predicates.
//! - [`metadata`] — entity-definition lookup on a [`Solution`].
//!
//! ## Usage
//!
//! ```
//! use solkit_privileges::{Context, PrivilegeEngine, PrivilegeType, Record};
//!
//! let engine = PrivilegeEngine::new();
//! let context = Context::default();
//! let record = Record::default();
//!
//! // Fails closed: an empty context grants nothing.
//! assert!(!engine.check_record_privilege(&context, &record, &PrivilegeType::Read));
//! ```

pub mod acl;
pub mod engine;
pub mod licenses;
pub mod metadata;
pub mod models;
pub mod privileges;
pub mod roles;
pub mod trace;

pub use acl::{
    has_member_role, is_author, is_member, is_owner, is_reader, record_owned_by_organization,
};
pub use engine::{EntityExists, PrivilegeEngine};
pub use licenses::{check_licenses, has_license};
pub use metadata::{lookup_entity, lookup_entity_by_slug};
pub use models::{
    Context, EntityDef, Membership, Organization, PrivilegeType, Record, Solution, SolutionLicense,
    SolutionRole, SystemFlags, User,
};
pub use privileges::{Combine, PrivilegeToken, TokenParseError, has_privilege};
pub use roles::{
    ROLE_ORG_ADMIN, ROLE_SOLUTION_ADMIN, RoleOutcome, has_all_roles, has_any_role, has_role,
    is_solution_owner,
};
pub use trace::{DecisionLog, NoOpLog, TracingLog};
