//! JWT Authentication
//!
//! Issues HS256 access tokens at login and validates them on every `/expenses` request.
//! The token subject is the user id; the middleware parses it and stores an [`AuthUser`]
//! in the request extensions for handlers to pick up.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind, get_current_timestamp,
};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::AppState;
use crate::config::AuthSettings;
use crate::entities::User;
use crate::errors::{Error, Result};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    algorithm: Algorithm,
    /// Lifetime of issued tokens in seconds
    pub token_ttl_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    /// Minimum secret length for security
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Creates a config signing with `secret`.
    ///
    /// # Errors
    /// [`Error::Config`] if the secret is shorter than [`Self::MIN_SECRET_LENGTH`] bytes.
    pub fn try_new(secret: impl Into<String>, token_ttl_secs: u64) -> Result<Self> {
        let secret = secret.into();
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(Error::Config {
                message: format!(
                    "JWT secret must be at least {} bytes, got {}",
                    Self::MIN_SECRET_LENGTH,
                    secret.len()
                ),
            });
        }
        Ok(Self {
            secret,
            algorithm: Algorithm::HS256,
            token_ttl_secs,
        })
    }

    /// Builds the config from application settings; the secret must be set.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self> {
        let secret = settings.jwt_secret.clone().ok_or_else(|| Error::Config {
            message: "JWT_SECRET_KEY is not set".to_string(),
        })?;
        Self::try_new(secret, settings.token_ttl_secs)
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject: the user id as a decimal string
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
}

impl AuthClaims {
    /// Claims for `user_id` valid for `ttl_secs` from `issued_at`.
    #[must_use]
    pub fn for_user(user_id: i64, issued_at: u64, ttl_secs: u64) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: issued_at.saturating_add(ttl_secs),
            iat: issued_at,
        }
    }

    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse()
            .map_err(|_| Error::unauthorized("Token subject is not a user id"))
    }
}

/// Caller identity established by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// Authenticated user's id
    pub user_id: i64,
}

/// A freshly signed access token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT
    pub token: String,
    /// Seconds until expiry
    pub expires_in: u64,
}

/// Signs arbitrary claims with the configured key.
pub fn sign_claims(claims: &AuthClaims, config: &JwtConfig) -> Result<String> {
    let key = EncodingKey::from_secret(config.secret.as_bytes());
    encode(&Header::new(config.algorithm), claims, &key).map_err(Into::into)
}

/// Issues an access token for `user_id`, valid for the configured lifetime from now.
pub fn issue_token(user_id: i64, config: &JwtConfig) -> Result<IssuedToken> {
    let claims = AuthClaims::for_user(user_id, get_current_timestamp(), config.token_ttl_secs);
    Ok(IssuedToken {
        token: sign_claims(&claims, config)?,
        expires_in: config.token_ttl_secs,
    })
}

/// Extract the token from an `Authorization` header value
pub fn extract_token(auth_header: &str) -> Result<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            Error::unauthorized("Invalid authorization header format. Expected: Bearer <token>")
        })
}

/// Validate JWT token and extract claims
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<AuthClaims> {
    let mut validation = Validation::new(config.algorithm);
    validation.set_required_spec_claims(&["exp", "sub"]);

    let key = DecodingKey::from_secret(config.secret.as_bytes());

    let token_data = decode::<AuthClaims>(token, &key, &validation).map_err(|e| {
        if e.kind() == &ErrorKind::ExpiredSignature {
            Error::unauthorized("Token has expired")
        } else {
            Error::unauthorized(format!("Token validation failed: {e}"))
        }
    })?;

    Ok(token_data.claims)
}

/// Require authentication middleware
///
/// Validates the bearer token, checks that its subject still exists, and stores the
/// caller's [`AuthUser`] in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| Error::unauthorized("Authorization header is required"))?;

    let token = extract_token(auth_header)?;
    let claims = validate_token(token, &state.jwt)?;
    let user_id = claims.user_id()?;

    // A validly signed token can outlive its user, e.g. across a `reset`
    if User::find_by_id(user_id).one(state.db.as_ref()).await?.is_none() {
        warn!(user_id, "Token subject does not exist");
        return Err(Error::unauthorized("Unknown user"));
    }

    debug!(user_id, path = %request.uri().path(), "Authenticated request");
    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}
