/// Role assignment policy applied at registration
///
/// Decides which role a newly registering user is granted. This is a pure
/// function of its inputs: it never touches storage. The caller is
/// responsible for reading the user count and persisting the resolved role
/// inside one transaction, so that two concurrent first registrations cannot
/// both win the bootstrap rule.
///
/// # Rules (first match wins)
///
/// 1. No users exist yet → the registrant becomes `admin`, unconditionally.
///    This bootstraps the system's first administrator without an
///    out-of-band secret.
/// 2. The registrant asked for `admin` → the supplied secret must equal the
///    configured admin secret. On mismatch registration fails and no user is
///    created.
/// 3. Otherwise → `user`.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::registration::resolve_role;
/// use taskforge_shared::models::user::UserRole;
///
/// // Bootstrap: first user is admin even without asking
/// let role = resolve_role(None, None, 0, "s3cret").unwrap();
/// assert_eq!(role, UserRole::Admin);
///
/// // Later registrants need the secret to become admin
/// let role = resolve_role(Some(UserRole::Admin), Some("s3cret"), 5, "s3cret").unwrap();
/// assert_eq!(role, UserRole::Admin);
///
/// assert!(resolve_role(Some(UserRole::Admin), Some("wrong"), 5, "s3cret").is_err());
/// ```

use subtle::ConstantTimeEq;

use crate::models::user::UserRole;

/// Error type for registration policy decisions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Admin role was requested but the supplied secret didn't match
    #[error("Invalid admin secret key")]
    InvalidAdminSecret,
}

/// Resolves the role to grant a new registrant
///
/// # Arguments
///
/// * `requested_role` - Role the registrant asked for, already parsed into
///   the closed enum (None when absent from the request)
/// * `supplied_secret` - Secret accompanying an admin request, if any
/// * `current_user_count` - Number of users registered so far, read inside
///   the same transaction that will persist the new user
/// * `admin_secret` - The configured admin bootstrap secret
///
/// # Errors
///
/// Returns `RegistrationError::InvalidAdminSecret` when admin was requested
/// with a wrong or missing secret. The caller must not create any user record
/// in that case.
pub fn resolve_role(
    requested_role: Option<UserRole>,
    supplied_secret: Option<&str>,
    current_user_count: i64,
    admin_secret: &str,
) -> Result<UserRole, RegistrationError> {
    if current_user_count == 0 {
        return Ok(UserRole::Admin);
    }

    if requested_role == Some(UserRole::Admin) {
        if secrets_match(supplied_secret.unwrap_or(""), admin_secret) {
            return Ok(UserRole::Admin);
        }
        return Err(RegistrationError::InvalidAdminSecret);
    }

    Ok(UserRole::User)
}

/// Constant-time secret comparison
///
/// Length is still observable; the contents are not.
fn secrets_match(supplied: &str, expected: &str) -> bool {
    supplied.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "configured-admin-secret";

    #[test]
    fn test_first_user_becomes_admin_unconditionally() {
        // No requested role, no secret
        assert_eq!(resolve_role(None, None, 0, SECRET), Ok(UserRole::Admin));

        // Explicit user request is still overridden
        assert_eq!(
            resolve_role(Some(UserRole::User), None, 0, SECRET),
            Ok(UserRole::Admin)
        );

        // Admin request with a wrong secret wins the bootstrap anyway
        assert_eq!(
            resolve_role(Some(UserRole::Admin), Some("wrong"), 0, SECRET),
            Ok(UserRole::Admin)
        );
    }

    #[test]
    fn test_admin_request_with_correct_secret() {
        assert_eq!(
            resolve_role(Some(UserRole::Admin), Some(SECRET), 1, SECRET),
            Ok(UserRole::Admin)
        );
        assert_eq!(
            resolve_role(Some(UserRole::Admin), Some(SECRET), 100, SECRET),
            Ok(UserRole::Admin)
        );
    }

    #[test]
    fn test_admin_request_with_wrong_secret_fails() {
        assert_eq!(
            resolve_role(Some(UserRole::Admin), Some("wrong"), 1, SECRET),
            Err(RegistrationError::InvalidAdminSecret)
        );
    }

    #[test]
    fn test_admin_request_with_missing_secret_fails() {
        assert_eq!(
            resolve_role(Some(UserRole::Admin), None, 1, SECRET),
            Err(RegistrationError::InvalidAdminSecret)
        );
    }

    #[test]
    fn test_secret_comparison_is_exact() {
        // Prefixes, suffixes, and case variants don't match
        assert_eq!(
            resolve_role(Some(UserRole::Admin), Some("configured-admin"), 1, SECRET),
            Err(RegistrationError::InvalidAdminSecret)
        );
        assert_eq!(
            resolve_role(
                Some(UserRole::Admin),
                Some("CONFIGURED-ADMIN-SECRET"),
                1,
                SECRET
            ),
            Err(RegistrationError::InvalidAdminSecret)
        );
    }

    #[test]
    fn test_default_role_is_user() {
        assert_eq!(resolve_role(None, None, 1, SECRET), Ok(UserRole::User));
        assert_eq!(
            resolve_role(Some(UserRole::User), None, 42, SECRET),
            Ok(UserRole::User)
        );

        // A stray secret on a plain user registration is ignored
        assert_eq!(
            resolve_role(Some(UserRole::User), Some(SECRET), 1, SECRET),
            Ok(UserRole::User)
        );
    }
}
