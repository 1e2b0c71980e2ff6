/// Authentication endpoints
///
/// Handles user registration, login, and current-user lookup.
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Create an account; role is decided by the
///   role assignment policy
/// - `POST /v1/auth/login` - Exchange credentials for a bearer token
/// - `GET /v1/auth/me` - Return the authenticated user's profile
///
/// # Role assignment
///
/// The very first registrant becomes `admin`. After that, a registrant asking
/// for `admin` must supply the configured admin secret; everyone else is a
/// plain `user`. The count check and the insert run in one transaction,
/// serialized by an advisory lock, so concurrent first registrations cannot
/// both become the bootstrap admin.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::validation_error,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use taskforge_shared::{
    auth::{jwt, middleware::AuthContext, password, registration::resolve_role},
    models::user::{CreateUser, User, UserRole},
};

/// Registration request body
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address (must be unique, case-insensitive)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (plaintext over TLS; stored only as an Argon2id hash)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Requested role ("user" or "admin", case-insensitive)
    ///
    /// Absent means no preference; the policy decides.
    pub role: Option<String>,

    /// Secret accompanying an admin role request
    pub admin_secret: Option<String>,
}

/// Login request body
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of a user account
///
/// Never includes the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Assigned role
    pub role: UserRole,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Response for successful registration or login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,

    /// The authenticated user
    pub user: UserResponse,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "s3cret-pass",
///   "name": "Jane Doe",
///   "role": "admin",
///   "admin_secret": "..."
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Admin requested with a wrong or missing secret
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed (including unknown roles)
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(validation_error)?;

    // Unknown role strings are rejected outright rather than defaulted
    let requested_role = match req.role.as_deref() {
        Some(raw) => Some(raw.parse::<UserRole>().map_err(|e| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "role".to_string(),
                message: e.to_string(),
            }])
        })?),
        None => None,
    };

    let password_hash = password::hash_password(&req.password)?;

    // The count read and the insert must observe the same user set, or two
    // concurrent first registrations could both bootstrap as admin. The
    // advisory lock serializes registrations for the transaction's lifetime.
    let mut tx = state.db.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(REGISTRATION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let user_count = User::count(&mut *tx).await?;

    let role = resolve_role(
        requested_role,
        req.admin_secret.as_deref(),
        user_count,
        state.admin_secret(),
    )?;

    let user = User::create(
        &mut *tx,
        CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
            role,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %user.id,
        role = %user.role,
        "User registered"
    );

    let claims = jwt::Claims::new(user.id, state.token_expiry());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Advisory lock key serializing registrations
///
/// Arbitrary but stable; must not collide with other advisory locks in the
/// same database.
const REGISTRATION_LOCK_KEY: i64 = 0x5461736b_466f7267; // "TaskForg"

/// Login with email and password
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "s3cret-pass"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Wrong email or password. The message is identical
///   for both cases so responses don't reveal which emails are registered.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_error)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let claims = jwt::Claims::new(user.id, state.token_expiry());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Returns the authenticated user's profile
///
/// # Endpoint
///
/// ```text
/// GET /v1/auth/me
/// Authorization: Bearer <token>
/// ```
pub async fn me(State(state): State<AppState>, auth: AuthContext) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            name: "".to_string(),
            role: None,
            admin_secret: None,
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("name"));
    }

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "longenough".to_string(),
            name: "Jane".to_string(),
            role: Some("admin".to_string()),
            admin_secret: Some("secret".to_string()),
        };

        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_user_response_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            name: "Jane".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response: UserResponse = user.into();
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
    }
}
