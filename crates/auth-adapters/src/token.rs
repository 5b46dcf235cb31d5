//! HS256 session tokens. Stateless: the token is the session, exactly as
//! the hosted auth provider's access tokens behaved.

use chrono::{Duration, Utc};
use domains::{GatewayError, Result, SessionIdentity};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub email: String,
    /// Expiration time (seconds since epoch)
    pub exp: i64,
    /// Issued at
    pub iat: i64,
}

pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenCodec {
    pub fn new(secret: &SecretString, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            decoding: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, identity: &SessionIdentity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.account_id.to_string(),
            email: identity.email.clone(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| GatewayError::Internal(format!("token signing failed: {e}")))
    }

    /// `None` for expired, malformed or foreign-signed tokens.
    pub fn verify(&self, token: &str) -> Option<SessionIdentity> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        let account_id = Uuid::parse_str(&data.claims.sub).ok()?;
        Some(SessionIdentity {
            account_id,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(ttl_hours: i64) -> JwtTokenCodec {
        JwtTokenCodec::new(&SecretString::from("test-secret"), ttl_hours)
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let codec = codec(24);
        let identity = SessionIdentity {
            account_id: Uuid::new_v4(),
            email: "dak@example.com".to_string(),
        };
        let token = codec.issue(&identity).unwrap();
        assert_eq!(codec.verify(&token), Some(identity));
    }

    #[test]
    fn expired_tokens_resolve_to_none() {
        let codec = codec(-1);
        let identity = SessionIdentity {
            account_id: Uuid::new_v4(),
            email: "dak@example.com".to_string(),
        };
        let token = codec.issue(&identity).unwrap();
        assert_eq!(codec.verify(&token), None);
    }

    #[test]
    fn garbage_tokens_resolve_to_none() {
        assert_eq!(codec(24).verify("not.a.token"), None);
    }
}
