/// Authorization policy for task operations
///
/// Gates every per-task operation (read-one, update, delete) and shapes list
/// queries based on the requester's role and relationship to the task.
///
/// # Permission Model
///
/// - A task's owner may read, update, and delete it.
/// - An `admin` may do the same to any task; the role check is an
///   unconditional override.
/// - Ownership never grants elevated role — only standing on that one task.
///
/// These checks are pure per-request decisions over state supplied by the
/// caller (`task.owner_id`, the requester's id and role); they never touch
/// storage themselves.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::authorization::authorize_task_access;
/// use taskforge_shared::auth::middleware::AuthContext;
/// use taskforge_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let auth = AuthContext::new(owner, UserRole::User);
///
/// assert!(authorize_task_access(&auth, owner).is_ok());
/// assert!(authorize_task_access(&auth, Uuid::new_v4()).is_err());
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Requester neither owns the resource nor holds the admin role
    #[error("Not authorized to access this task")]
    NotAuthorized,
}

/// Which tasks a list operation may return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
    /// Every task in storage (admin only)
    All,

    /// Only tasks owned by the given user
    OwnedBy(Uuid),
}

/// Checks whether the requester may read, update, or delete a task
///
/// Permitted iff the requester owns the task or holds the admin role.
/// Existence of the task must be established by the caller first (NotFound
/// before Forbidden).
///
/// # Errors
///
/// Returns `AuthzError::NotAuthorized` when the requester is a non-owner
/// without the admin role.
pub fn authorize_task_access(auth: &AuthContext, task_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id == task_owner_id || auth.role.is_admin() {
        return Ok(());
    }

    Err(AuthzError::NotAuthorized)
}

/// Determines the visible task set for a list operation
///
/// Admins see everything unless they explicitly narrow to their own tasks
/// (`mine_only` — a query concern, not an authorization change). Regular
/// users always see only their own tasks regardless of `mine_only`.
pub fn task_list_scope(auth: &AuthContext, mine_only: bool) -> TaskScope {
    if auth.role.is_admin() && !mine_only {
        TaskScope::All
    } else {
        TaskScope::OwnedBy(auth.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    #[test]
    fn test_owner_has_access() {
        let owner = Uuid::new_v4();
        let auth = AuthContext::new(owner, UserRole::User);

        assert!(authorize_task_access(&auth, owner).is_ok());
    }

    #[test]
    fn test_non_owner_user_is_denied() {
        let auth = AuthContext::new(Uuid::new_v4(), UserRole::User);

        assert_eq!(
            authorize_task_access(&auth, Uuid::new_v4()),
            Err(AuthzError::NotAuthorized)
        );
    }

    #[test]
    fn test_admin_overrides_ownership() {
        let auth = AuthContext::new(Uuid::new_v4(), UserRole::Admin);

        assert!(authorize_task_access(&auth, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn test_user_list_scope_is_always_own() {
        let user_id = Uuid::new_v4();
        let auth = AuthContext::new(user_id, UserRole::User);

        assert_eq!(task_list_scope(&auth, false), TaskScope::OwnedBy(user_id));
        assert_eq!(task_list_scope(&auth, true), TaskScope::OwnedBy(user_id));
    }

    #[test]
    fn test_admin_list_scope() {
        let admin_id = Uuid::new_v4();
        let auth = AuthContext::new(admin_id, UserRole::Admin);

        assert_eq!(task_list_scope(&auth, false), TaskScope::All);
        // Explicit narrowing to own tasks
        assert_eq!(task_list_scope(&auth, true), TaskScope::OwnedBy(admin_id));
    }

    #[test]
    fn test_authz_error_display() {
        assert!(AuthzError::NotAuthorized
            .to_string()
            .contains("Not authorized"));
    }
}
