/// Authentication and authorization utilities
///
/// This module provides the security core of TaskForge:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token generation and validation
/// - [`registration`]: Role assignment policy applied at registration
/// - [`authorization`]: Ownership/role checks gating task operations
/// - [`middleware`]: Request authentication and the `AuthContext` extractor
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Bearer Tokens**: HS256-signed JWTs with configurable expiration
/// - **Admin Secret**: compared in constant time
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::auth::password::{hash_password, verify_password};
/// use taskforge_shared::auth::registration::resolve_role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // First registered user bootstraps as admin
/// let role = resolve_role(None, None, 0, "configured-secret")?;
/// assert!(role.is_admin());
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod registration;
