use std::sync::Arc;

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{Role, User};

/// Source of the authenticated user. Read-only for the core.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;
}

/// Identity fixed at construction, e.g. after login or in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<User>,
}

impl StaticIdentity {
    pub fn new(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// Claims carried by the session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,
    pub role: i64,
    #[serde(default)]
    pub subjects: Vec<i64>,
    pub exp: usize,
    pub iat: usize,
}

impl From<SessionClaims> for User {
    fn from(claims: SessionClaims) -> Self {
        User::new(claims.sub, Role::from_code(claims.role)).with_subjects(claims.subjects)
    }
}

#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: Option<Arc<Vec<u8>>>,
}

impl TokenCodec {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            secret: config.jwt_secret.as_ref().map(|s| Arc::new(s.clone().into_bytes())),
        }
    }

    /// Without a configured secret the signature is not checked; the server
    /// still verifies it on every request.
    pub fn decode(&self, token: &str) -> AppResult<SessionClaims> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let key = match &self.secret {
            Some(secret) => DecodingKey::from_secret(secret),
            None => {
                validation.insecure_disable_signature_validation();
                DecodingKey::from_secret(&[])
            }
        };

        jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|err| AppError::token(err.to_string()))
    }

    pub fn encode(&self, user: &User, exp_hours: i64) -> AppResult<String> {
        use chrono::{Duration, Utc};

        let secret = self
            .secret
            .as_ref()
            .ok_or_else(|| AppError::configuration("JWT_SECRET not set"))?;

        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours);
        let claims = SessionClaims {
            sub: user.id,
            role: user.role.map(Role::code).unwrap_or(0),
            subjects: user.subjects.iter().copied().collect(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
            .map_err(|err| AppError::token(err.to_string()))
    }
}

/// Identity decoded from a session token. An unreadable or expired token
/// yields no user, which closes every permission.
#[derive(Debug, Clone)]
pub struct TokenIdentity {
    user: Option<User>,
}

impl TokenIdentity {
    pub fn from_token(codec: &TokenCodec, token: &str) -> Self {
        let user = match codec.decode(token) {
            Ok(claims) => Some(User::from(claims)),
            Err(err) => {
                tracing::warn!(error = %err, "session token rejected");
                None
            }
        };
        Self { user }
    }
}

impl IdentityProvider for TokenIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(secret: Option<&str>) -> TokenCodec {
        TokenCodec::new(&SessionConfig {
            jwt_secret: secret.map(String::from),
        })
    }

    #[test]
    fn token_round_trip_restores_user() {
        let codec = codec(Some("test-secret"));
        let user = User::new(12, Some(Role::Tutor)).with_subjects([3, 4]);
        let token = codec.encode(&user, 1).unwrap();

        let identity = TokenIdentity::from_token(&codec, &token);
        assert_eq!(identity.current_user(), Some(user));
    }

    #[test]
    fn unsigned_decode_when_secret_missing() {
        let token = codec(Some("server-secret"))
            .encode(&User::new(5, Some(Role::Student)), 1)
            .unwrap();

        let claims = codec(None).decode(&token).unwrap();
        assert_eq!(claims.sub, 5);
        assert_eq!(claims.role, 3);
    }

    #[test]
    fn wrong_secret_yields_no_user() {
        let token = codec(Some("a")).encode(&User::new(5, Some(Role::Admin)), 1).unwrap();
        let identity = TokenIdentity::from_token(&codec(Some("b")), &token);
        assert_eq!(identity.current_user(), None);
    }

    #[test]
    fn anonymous_identity_has_no_user() {
        assert!(StaticIdentity::anonymous().current_user().is_none());
    }
}
