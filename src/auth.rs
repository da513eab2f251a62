// src/auth.rs
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::service_client::{
    ApiGateway, PASSWORD_RESET_CONFIRM_ENDPOINT, PASSWORD_RESET_ENDPOINT, PROFILE_ENDPOINT,
    REGISTRATION_ENDPOINT, TOKEN_ENDPOINT, TOKEN_REFRESH_ENDPOINT,
};
use crate::error::ApiError;
use crate::session::{Credential, SessionStore};
use crate::types::response::{RefreshResponse, TokenPair};
use crate::types::UserProfile;

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Serialize)]
struct PasswordResetRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Values from a password reset link plus the new password, twice
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetConfirm {
    pub uid: String,
    pub token: String,
    pub new_password1: String,
    pub new_password2: String,
}

/// Account operations. Only `login`, `refresh` and `logout` touch the stored
/// credential.
pub struct AuthClient {
    gateway: Arc<ApiGateway>,
    session: Arc<SessionStore>,
}

impl AuthClient {
    pub fn new(gateway: Arc<ApiGateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let pair: TokenPair = self
            .gateway
            .post_json(TOKEN_ENDPOINT, &LoginRequest { username, password }, false)
            .await?;

        self.session.set_credential(Credential::from(pair));
        info!("Logged in as {}", username);
        Ok(())
    }

    /// Trade the refresh token for a new access token. A server that does not
    /// rotate refresh tokens leaves the stored one in place.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let current = self.session.credential().ok_or(ApiError::Unauthenticated)?;

        let outcome: Result<RefreshResponse, ApiError> = self
            .gateway
            .post_json(
                TOKEN_REFRESH_ENDPOINT,
                &RefreshRequest {
                    refresh: current.refresh(),
                },
                false,
            )
            .await;

        match outcome {
            Ok(response) => {
                let refresh = response
                    .refresh
                    .unwrap_or_else(|| current.refresh().to_string());
                self.session
                    .set_credential(Credential::new(response.access, refresh));
                info!("Access token refreshed");
                Ok(())
            }
            Err(e @ ApiError::ClientRejected { status: 401, .. }) => {
                warn!("Refresh token rejected, clearing credential");
                self.session.clear_credential();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub fn logout(&self) {
        self.session.clear_credential();
        info!("Logged out");
    }

    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), ApiError> {
        let _: Value = self
            .gateway
            .post_json(REGISTRATION_ENDPOINT, request, false)
            .await?;
        info!("Registered account {}", request.username);
        Ok(())
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        let _: Value = self
            .gateway
            .post_json(PASSWORD_RESET_ENDPOINT, &PasswordResetRequest { email }, false)
            .await?;
        info!("Password reset requested");
        Ok(())
    }

    pub async fn confirm_password_reset(
        &self,
        confirm: &PasswordResetConfirm,
    ) -> Result<(), ApiError> {
        let _: Value = self
            .gateway
            .post_json(PASSWORD_RESET_CONFIRM_ENDPOINT, confirm, false)
            .await?;
        info!("Password reset confirmed");
        Ok(())
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.gateway.get(PROFILE_ENDPOINT, true).await
    }
}
