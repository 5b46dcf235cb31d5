//! The `SessionGateway` implementation: accounts + profiles behind argon2
//! verification and JWT issuance.

use std::sync::Arc;

use async_trait::async_trait;
use domains::{
    AccountStore, GatewayError, NewAccount, Profile, ProfileStore, Result, Session,
    SessionGateway, SessionIdentity, SignUpOutcome,
};
use tracing::{debug, instrument};

use crate::password::ArgonPasswordHasher;
use crate::token::JwtTokenCodec;

pub struct JwtSessionGateway {
    accounts: Arc<dyn AccountStore>,
    profiles: Arc<dyn ProfileStore>,
    hasher: ArgonPasswordHasher,
    tokens: JwtTokenCodec,
}

impl JwtSessionGateway {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        profiles: Arc<dyn ProfileStore>,
        tokens: JwtTokenCodec,
    ) -> Self {
        Self {
            accounts,
            profiles,
            hasher: ArgonPasswordHasher,
            tokens,
        }
    }
}

#[async_trait]
impl SessionGateway for JwtSessionGateway {
    /// Account and profile are created together; a duplicate email
    /// surfaces as `Conflict` before the profile write.
    #[instrument(skip(self, password))]
    async fn sign_up(
        &self,
        email: String,
        password: String,
        username: String,
    ) -> Result<SignUpOutcome> {
        let password_hash = self.hasher.hash(&password)?;
        let credential = self
            .accounts
            .insert(NewAccount {
                email: email.trim().to_string(),
                password_hash,
            })
            .await?;
        self.profiles
            .insert(Profile {
                id: credential.account.id,
                username: username.trim().to_string(),
            })
            .await?;
        debug!(account_id = %credential.account.id, "account created");
        Ok(SignUpOutcome::PendingVerification)
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: String, password: String) -> Result<Session> {
        let credential = self
            .accounts
            .find_by_email(email.trim().to_string())
            .await?
            .ok_or_else(|| GatewayError::Unauthorized("invalid credentials".to_string()))?;
        if !self.hasher.verify(&password, &credential.password_hash) {
            return Err(GatewayError::Unauthorized("invalid credentials".to_string()));
        }

        let identity = SessionIdentity {
            account_id: credential.account.id,
            email: credential.account.email,
        };
        let token = self.tokens.issue(&identity)?;
        Ok(Session { identity, token })
    }

    async fn current_session(&self, token: String) -> Result<Option<SessionIdentity>> {
        Ok(self.tokens.verify(&token))
    }

    /// Tokens are stateless; the cookie drop is the real invalidation.
    async fn sign_out(&self, _token: String) -> Result<()> {
        debug!("session signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use storage_adapters::MemoryGateway;

    fn gateway() -> JwtSessionGateway {
        let store = Arc::new(MemoryGateway::new());
        JwtSessionGateway::new(
            store.clone(),
            store,
            JwtTokenCodec::new(&SecretString::from("test-secret"), 24),
        )
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_round_trip() {
        let auth = gateway();
        let outcome = auth
            .sign_up(
                "dak@example.com".to_string(),
                "secret1".to_string(),
                "다꾸장인".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(outcome, SignUpOutcome::PendingVerification);

        let session = auth
            .sign_in("dak@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap();
        assert_eq!(session.identity.email, "dak@example.com");

        let resolved = auth.current_session(session.token).await.unwrap();
        assert_eq!(resolved, Some(session.identity));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let auth = gateway();
        auth.sign_up(
            "dak@example.com".to_string(),
            "secret1".to_string(),
            "다꾸장인".to_string(),
        )
        .await
        .unwrap();

        let err = auth
            .sign_in("dak@example.com".to_string(), "wrong".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let auth = gateway();
        auth.sign_up(
            "dak@example.com".to_string(),
            "secret1".to_string(),
            "다꾸장인".to_string(),
        )
        .await
        .unwrap();

        let err = auth
            .sign_up(
                "dak@example.com".to_string(),
                "secret2".to_string(),
                "딴사람".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let err = gateway()
            .sign_in("nobody@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized(_)));
    }
}
