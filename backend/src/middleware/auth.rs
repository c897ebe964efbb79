//! Authentication middleware
//!
//! Verifies bearer tokens issued by the identity provider and exposes the
//! caller's role to handlers

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use shared::{role_allowed, UserRole};

use crate::error::{AppError, AppResult, ErrorDetail, ErrorResponse};

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub role: Option<UserRole>,
}

impl AuthUser {
    /// Check if the user holds one of the given roles
    pub fn has_role(&self, allowed: &[UserRole]) -> bool {
        role_allowed(self.role, allowed)
    }
}

/// Authentication middleware that validates JWT tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => return unauthorized_response("Missing or invalid Authorization header"),
    };

    let jwt_secret = match jwt_secret() {
        Some(secret) => secret,
        None => {
            tracing::error!("JWT secret is not configured; rejecting request");
            return unauthorized_response("Authentication is not configured");
        }
    };

    let auth_user = match decode_jwt(token, &jwt_secret).and_then(auth_user_from_claims) {
        Ok(user) => user,
        Err(msg) => return unauthorized_response(&msg),
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

const DEVELOPMENT_SECRET: &str = "development-secret-key";

/// Signing secret from `POS__JWT__SECRET` (or `POS_JWT_SECRET`). Middleware
/// runs without state, so this reads the environment directly.
pub fn jwt_secret() -> Option<String> {
    let configured = std::env::var("POS__JWT__SECRET")
        .or_else(|_| std::env::var("POS_JWT_SECRET"))
        .ok();
    let environment =
        std::env::var("POS_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    resolve_jwt_secret(configured, &environment)
}

/// Production never falls back to the development secret
fn resolve_jwt_secret(configured: Option<String>, environment: &str) -> Option<String> {
    match configured.filter(|s| !s.trim().is_empty()) {
        Some(secret) => Some(secret),
        None if environment == "production" => None,
        None => Some(DEVELOPMENT_SECRET.to_string()),
    }
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    /// Application role; absent for users without a profile
    #[serde(default)]
    role: Option<String>,
    exp: i64,
    #[serde(default)]
    iat: i64,
}

/// Decode and validate JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    let mut validation = Validation::default();
    // Provider tokens carry an audience we do not check
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

fn auth_user_from_claims(claims: Claims) -> Result<AuthUser, String> {
    let user_id =
        uuid::Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

    // Unknown role names are treated as no role
    let role = claims.role.as_deref().and_then(|r| r.parse().ok());

    Ok(AuthUser { user_id, role })
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message_en: message.to_string(),
            message_es: "No autorizado".to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message_en: "Authentication required".to_string(),
                        message_es: "Debes iniciar sesión".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

/// Role guard for use in handlers, called before any read or write
pub fn require_role(user: &AuthUser, allowed: &[UserRole]) -> AppResult<()> {
    if user.has_role(allowed) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.user_id, role = ?user.role, "Role check failed");
        Err(AppError::InsufficientPermissions)
    }
}
