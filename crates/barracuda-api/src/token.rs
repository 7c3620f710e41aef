//! Signed, time-limited admin credentials (JWT, HS256).

use barracuda_core::admin::{Admin, AdminRole};
use chrono::{Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tokens are valid for 24 hours from issue.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// Admin id.
  pub sub:   u64,
  pub email: String,
  pub role:  AdminRole,
  /// Issued at (unix timestamp).
  pub iat:   i64,
  /// Expiry (unix timestamp).
  pub exp:   i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
  /// Well-formed and correctly signed, but past its expiry.
  #[error("Token expired")]
  Expired,
  /// Malformed, forged, or signed with a different key.
  #[error("Invalid token")]
  Invalid,
}

/// Signing and verification keys derived from the configured secret.
pub struct TokenKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
}

impl TokenKeys {
  pub fn new(secret: &str) -> Self {
    TokenKeys {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
    }
  }

  /// Issue a token for `admin` with the standard 24-hour validity window.
  pub fn sign(&self, admin: &Admin) -> Result<String, jsonwebtoken::errors::Error> {
    self.sign_with_ttl(admin, Duration::hours(TOKEN_TTL_HOURS))
  }

  /// Issue a token with an explicit validity window. Exposed for tests that
  /// need an already-expired token.
  pub fn sign_with_ttl(
    &self,
    admin: &Admin,
    ttl: Duration,
  ) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
      sub:   admin.id,
      email: admin.email.clone(),
      role:  admin.role,
      iat:   now,
      exp:   now + ttl.num_seconds(),
    };
    jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
  }

  /// Verify signature and expiry, distinguishing an expired-but-well-formed
  /// token from a malformed or forged one.
  pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
      .map(|data| data.claims)
      .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
      })
  }
}

#[cfg(test)]
mod tests {
  use barracuda_core::admin::{Admin, AdminRole};
  use chrono::{Duration, Utc};

  use super::{Claims, TokenError, TokenKeys};

  fn admin() -> Admin {
    Admin {
      id:            7,
      email:         "admin@affiiate.com".into(),
      password_hash: "$argon2id$fake".into(),
      name:          "Super Admin".into(),
      role:          AdminRole::SuperAdmin,
      created_at:    Utc::now(),
      last_login:    None,
    }
  }

  #[test]
  fn sign_then_verify_roundtrips_claims() {
    let keys = TokenKeys::new("secret");
    let token = keys.sign(&admin()).unwrap();
    let claims: Claims = keys.verify(&token).unwrap();
    assert_eq!(claims.sub, 7);
    assert_eq!(claims.email, "admin@affiiate.com");
    assert_eq!(claims.role, AdminRole::SuperAdmin);
    assert!(claims.exp > claims.iat);
  }

  #[test]
  fn expired_token_is_distinguished_from_garbage() {
    let keys = TokenKeys::new("secret");
    let stale = keys
      .sign_with_ttl(&admin(), Duration::seconds(-61))
      .unwrap();
    assert_eq!(keys.verify(&stale).unwrap_err(), TokenError::Expired);
    assert_eq!(
      keys.verify("not.a.token").unwrap_err(),
      TokenError::Invalid
    );
  }

  #[test]
  fn token_signed_with_other_secret_is_invalid() {
    let keys = TokenKeys::new("secret");
    let other = TokenKeys::new("different");
    let token = other.sign(&admin()).unwrap();
    assert_eq!(keys.verify(&token).unwrap_err(), TokenError::Invalid);
  }
}
