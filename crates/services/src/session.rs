//! # Session Context
//!
//! Explicitly passed context holding the current authenticated identity and
//! profile. Constructed per scope (the binary resolves one per request from
//! the session cookie), never a process-wide singleton. Consumers that need
//! to react to identity changes subscribe via a watch channel; updates are
//! visible to subscribers before the triggering operation returns, so any
//! dependent navigation observes the new identity.

use std::sync::Arc;

use domains::{
    ProfileStore, Session, SessionGateway, SignUpOutcome,
};
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, ServiceError};

/// The signed-in user as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub username: Option<String>,
}

/// Sign-up form input. Validation runs before any gateway call.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl SignUpForm {
    /// Client-side rules from the sign-up page: a display name, matching
    /// passwords, minimum length six.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(ServiceError::Validation(
                "닉네임을 입력해 주세요.".to_string(),
            ));
        }
        if self.password != self.password_confirm {
            return Err(ServiceError::Validation(
                "비밀번호가 일치하지 않습니다.".to_string(),
            ));
        }
        if self.password.chars().count() < 6 {
            return Err(ServiceError::Validation(
                "비밀번호는 6자 이상이어야 합니다.".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct SessionContext {
    auth: Arc<dyn SessionGateway>,
    profiles: Arc<dyn ProfileStore>,
    state: watch::Sender<Option<CurrentUser>>,
}

impl SessionContext {
    pub fn new(auth: Arc<dyn SessionGateway>, profiles: Arc<dyn ProfileStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            auth,
            profiles,
            state,
        }
    }

    /// Initialization at scope start: restores an existing session from a
    /// previously issued token, if one is present and still valid. Garbage
    /// or expired tokens resolve to an anonymous context, not an error.
    pub async fn resolve(
        auth: Arc<dyn SessionGateway>,
        profiles: Arc<dyn ProfileStore>,
        token: Option<String>,
    ) -> Self {
        let ctx = Self::new(auth, profiles);
        if let Some(token) = token {
            ctx.restore(token).await;
        }
        ctx
    }

    async fn restore(&self, token: String) {
        match self.auth.current_session(token).await {
            Ok(Some(identity)) => {
                let username = self.username_of(identity.account_id).await;
                self.state.send_replace(Some(CurrentUser {
                    id: identity.account_id,
                    email: identity.email,
                    username,
                }));
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "session restore failed"),
        }
    }

    pub fn current(&self) -> Option<CurrentUser> {
        self.state.borrow().clone()
    }

    /// Subscribers observe sign-in/sign-out synchronously: the channel is
    /// updated before `sign_in`/`sign_out` return.
    pub fn subscribe(&self) -> watch::Receiver<Option<CurrentUser>> {
        self.state.subscribe()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self
            .auth
            .sign_in(email.to_string(), password.to_string())
            .await?;
        let username = self.username_of(session.identity.account_id).await;
        self.state.send_replace(Some(CurrentUser {
            id: session.identity.account_id,
            email: session.identity.email.clone(),
            username,
        }));
        Ok(session)
    }

    /// Creates the account and profile. The identity is not signed in: the
    /// user lands on a "verify your email, then log in" screen.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<SignUpOutcome> {
        form.validate()?;
        let outcome = self
            .auth
            .sign_up(form.email, form.password, form.username)
            .await?;
        Ok(outcome)
    }

    pub async fn sign_out(&self, token: Option<String>) {
        if let Some(token) = token {
            if let Err(err) = self.auth.sign_out(token).await {
                warn!(error = %err, "sign-out bookkeeping failed");
            }
        }
        self.state.send_replace(None);
    }

    async fn username_of(&self, account_id: Uuid) -> Option<String> {
        match self.profiles.get(account_id).await {
            Ok(profile) => profile.map(|p| p.username),
            Err(err) => {
                warn!(error = %err, "profile lookup failed");
                None
            }
        }
    }
}
