//! Centralized per-table authorization rules.
//!
//! Every data-access path resolves the acting identity once per request (see
//! [`crate::auth`]) and asks this module for a [`Scope`] before touching the
//! database. The scope is translated into a query predicate exactly once per
//! statement; decisions are never re-evaluated per row.
//!
//! Each table×operation pair yields a single consolidated decision: where an
//! owner check and a role check both grant access they are merged into one
//! rule here, never left as two independently evaluated permissive rules.
//!
//! Denials are silent. A denied read scopes to zero rows and a denied write
//! affects zero rows; callers detect denial from affected-row counts.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role of an acting identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Site engineer: owns and submits daily reports.
    Engineer,
    /// Project manager: read access to all reports and activities.
    ProjectManager,
    /// Admin: full access to every table.
    Admin,
    /// Trusted automation identity (email dispatch job). Bypasses all rules.
    Service,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Engineer => "engineer",
            Role::ProjectManager => "project_manager",
            Role::Admin => "admin",
            Role::Service => "service",
        }
    }

    /// Parse a stored role string. The service role is never stored in the
    /// users table, so it is not parseable here.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "engineer" => Some(Role::Engineer),
            "project_manager" => Some(Role::ProjectManager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Roles that may review reports across all sites.
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Role::ProjectManager | Role::Admin | Role::Service)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The acting identity, resolved once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    /// The automation identity used by the dispatch job.
    pub fn service() -> Self {
        Self {
            id: Uuid::nil(),
            role: Role::Service,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Service)
    }
}

/// Operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

/// Row scope granted for a table×operation pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every row.
    All,
    /// Only rows owned by this user id (the meaning of "owned" is per table:
    /// `users.id`, `user_sessions.user_id`, `daily_reports.engineer_id`, or
    /// the parent report's engineer for activities and media).
    Owned(Uuid),
    /// No rows.
    Denied,
}

impl Scope {
    pub fn is_denied(&self) -> bool {
        matches!(self, Scope::Denied)
    }

    /// Whether a specific owner id passes this scope.
    pub fn permits_owner(&self, owner: Uuid) -> bool {
        match self {
            Scope::All => true,
            Scope::Owned(id) => *id == owner,
            Scope::Denied => false,
        }
    }
}

/// `users` table: read own row or any row as admin; insert/delete admin only;
/// update own row or admin.
pub fn users_scope(actor: &Actor, op: Operation) -> Scope {
    if actor.is_admin() {
        return Scope::All;
    }
    match op {
        Operation::Select | Operation::Update => Scope::Owned(actor.id),
        Operation::Insert | Operation::Delete => Scope::Denied,
    }
}

/// Whether the actor may change a user's role. Role is immutable except to
/// admins, regardless of row ownership.
pub fn may_change_role(actor: &Actor) -> bool {
    actor.is_admin()
}

/// `user_sessions` table: all operations require ownership; admins may
/// additionally read.
pub fn sessions_scope(actor: &Actor, op: Operation) -> Scope {
    if actor.role == Role::Service {
        return Scope::All;
    }
    match op {
        Operation::Select if actor.role == Role::Admin => Scope::All,
        _ => Scope::Owned(actor.id),
    }
}

/// `daily_reports` table: owner or reviewer may read; only the owning
/// engineer may insert/update; only admins may delete.
pub fn reports_scope(actor: &Actor, op: Operation) -> Scope {
    if actor.role == Role::Service {
        return Scope::All;
    }
    match op {
        Operation::Select => {
            if actor.role.is_reviewer() {
                Scope::All
            } else {
                Scope::Owned(actor.id)
            }
        }
        Operation::Insert | Operation::Update => match actor.role {
            Role::Engineer => Scope::Owned(actor.id),
            // Admins manage users and deletion, not report content.
            _ => Scope::Denied,
        },
        Operation::Delete => {
            if actor.role == Role::Admin {
                Scope::All
            } else {
                Scope::Denied
            }
        }
    }
}

/// `report_activities` table: delegates to the parent report's ownership;
/// reads additionally allow reviewers. Ownership here means the parent
/// report's `engineer_id`.
pub fn activities_scope(actor: &Actor, op: Operation) -> Scope {
    match op {
        Operation::Select => reports_scope(actor, Operation::Select),
        // Writes follow the parent report's write rules; cascade delete is
        // carried by the engine when the parent report is deleted.
        Operation::Insert | Operation::Update | Operation::Delete => {
            reports_scope(actor, Operation::Update)
        }
    }
}

/// `media_files` table: insert/select/delete require the parent report's
/// engineer. Unlike reports and activities there is NO project_manager/admin
/// bypass; the asymmetry is inherited from the source system and kept
/// deliberately (pending stakeholder review, see DESIGN.md).
pub fn media_scope(actor: &Actor, _op: Operation) -> Scope {
    match actor.role {
        Role::Service => Scope::All,
        _ => Scope::Owned(actor.id),
    }
}

/// `email_recipients` table: admin or service only.
pub fn recipients_scope(actor: &Actor, _op: Operation) -> Scope {
    if actor.is_admin() {
        Scope::All
    } else {
        Scope::Denied
    }
}

/// `email_logs` table: admin or service only.
pub fn email_logs_scope(actor: &Actor, _op: Operation) -> Scope {
    if actor.is_admin() {
        Scope::All
    } else {
        Scope::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engineer() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Engineer)
    }

    fn manager() -> Actor {
        Actor::new(Uuid::new_v4(), Role::ProjectManager)
    }

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Admin)
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Engineer, Role::ProjectManager, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        // The service role is never persisted, so it never parses back.
        assert_eq!(Role::parse("service"), None);
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_engineer_reads_only_own_reports() {
        let e = engineer();
        assert_eq!(reports_scope(&e, Operation::Select), Scope::Owned(e.id));
        assert!(!reports_scope(&e, Operation::Select).permits_owner(Uuid::new_v4()));
        assert!(reports_scope(&e, Operation::Select).permits_owner(e.id));
    }

    #[test]
    fn test_reviewers_read_all_reports() {
        assert_eq!(reports_scope(&manager(), Operation::Select), Scope::All);
        assert_eq!(reports_scope(&admin(), Operation::Select), Scope::All);
    }

    #[test]
    fn test_only_owning_engineer_writes_reports() {
        let e = engineer();
        assert_eq!(reports_scope(&e, Operation::Insert), Scope::Owned(e.id));
        assert_eq!(reports_scope(&e, Operation::Update), Scope::Owned(e.id));
        // Managers and admins cannot author report content.
        assert_eq!(reports_scope(&manager(), Operation::Update), Scope::Denied);
        assert_eq!(reports_scope(&admin(), Operation::Insert), Scope::Denied);
    }

    #[test]
    fn test_only_admin_deletes_reports() {
        assert_eq!(reports_scope(&engineer(), Operation::Delete), Scope::Denied);
        assert_eq!(reports_scope(&manager(), Operation::Delete), Scope::Denied);
        assert_eq!(reports_scope(&admin(), Operation::Delete), Scope::All);
    }

    #[test]
    fn test_activities_delegate_to_parent_report() {
        let e = engineer();
        assert_eq!(activities_scope(&e, Operation::Select), Scope::Owned(e.id));
        assert_eq!(activities_scope(&e, Operation::Insert), Scope::Owned(e.id));
        assert_eq!(activities_scope(&manager(), Operation::Select), Scope::All);
        assert_eq!(
            activities_scope(&manager(), Operation::Update),
            Scope::Denied
        );
    }

    #[test]
    fn test_media_has_no_reviewer_bypass() {
        // Reviewers may read reports but NOT media files.
        let m = manager();
        let a = admin();
        assert_eq!(media_scope(&m, Operation::Select), Scope::Owned(m.id));
        assert_eq!(media_scope(&a, Operation::Select), Scope::Owned(a.id));
        let e = engineer();
        assert_eq!(media_scope(&e, Operation::Insert), Scope::Owned(e.id));
    }

    #[test]
    fn test_users_table_rules() {
        let e = engineer();
        assert_eq!(users_scope(&e, Operation::Select), Scope::Owned(e.id));
        assert_eq!(users_scope(&e, Operation::Update), Scope::Owned(e.id));
        assert_eq!(users_scope(&e, Operation::Insert), Scope::Denied);
        assert_eq!(users_scope(&e, Operation::Delete), Scope::Denied);
        assert_eq!(users_scope(&admin(), Operation::Delete), Scope::All);
        assert!(!may_change_role(&e));
        assert!(may_change_role(&admin()));
    }

    #[test]
    fn test_sessions_owner_only_with_admin_read() {
        let e = engineer();
        assert_eq!(sessions_scope(&e, Operation::Select), Scope::Owned(e.id));
        assert_eq!(sessions_scope(&e, Operation::Delete), Scope::Owned(e.id));
        assert_eq!(sessions_scope(&admin(), Operation::Select), Scope::All);
        let a = admin();
        assert_eq!(sessions_scope(&a, Operation::Update), Scope::Owned(a.id));
    }

    #[test]
    fn test_email_tables_admin_or_service_only() {
        for actor in [engineer(), manager()] {
            assert_eq!(recipients_scope(&actor, Operation::Select), Scope::Denied);
            assert_eq!(email_logs_scope(&actor, Operation::Insert), Scope::Denied);
        }
        assert_eq!(recipients_scope(&admin(), Operation::Insert), Scope::All);
        assert_eq!(
            email_logs_scope(&Actor::service(), Operation::Insert),
            Scope::All
        );
    }

    #[test]
    fn test_service_bypasses_everything() {
        let s = Actor::service();
        for op in [
            Operation::Select,
            Operation::Insert,
            Operation::Update,
            Operation::Delete,
        ] {
            assert_eq!(users_scope(&s, op), Scope::All);
            assert_eq!(sessions_scope(&s, op), Scope::All);
            assert_eq!(reports_scope(&s, op), Scope::All);
            assert_eq!(activities_scope(&s, op), Scope::All);
            assert_eq!(media_scope(&s, op), Scope::All);
            assert_eq!(recipients_scope(&s, op), Scope::All);
            assert_eq!(email_logs_scope(&s, op), Scope::All);
        }
    }
}
