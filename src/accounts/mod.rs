// Registration and login

use crate::auth::token::TokenService;
use crate::core::error::ApiError;
use crate::models::api::{LoginResponse, RegisterResponse};
use crate::models::user::UserAccount;
use crate::stores::user_store::UserStore;
use crate::utils::id::new_object_id;
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AccountService {
    users: Arc<UserStore>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(users: Arc<UserStore>, tokens: Arc<TokenService>, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Create an account and return a token for it.
    ///
    /// Fails with `Conflict` if the email is already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<RegisterResponse, ApiError> {
        validate_credentials(email, password)?;

        if self.users.find_by_email(email).is_some() {
            warn!(email = %email, "Registration for existing email");
            return Err(ApiError::Conflict);
        }

        let password_hash = hash_password(password.to_string(), self.bcrypt_cost).await?;
        let account = UserAccount::new(new_object_id(), email.to_string(), password_hash);

        // lost a race with a concurrent registration
        if !self.users.insert(account.clone())? {
            return Err(ApiError::Conflict);
        }

        let token = self.tokens.issue(&account.id)?;
        info!(account_id = %account.id, "Account registered");

        Ok(RegisterResponse {
            token,
            id: account.id,
            email: account.email,
        })
    }

    /// Check credentials and return a token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let Some(account) = self.users.find_by_email(email) else {
            info!("Login with unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        if !verify_password(password.to_string(), account.password.clone()).await? {
            info!(account_id = %account.id, "Login with wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account.id)?;
        info!(account_id = %account.id, "Login succeeded");

        Ok(LoginResponse { token })
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::InvalidArgument("email is required".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::InvalidArgument("password is required".to_string()));
    }
    Ok(())
}

// bcrypt is CPU bound; keep it off the async workers
async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("Password hashing task failed")?
        .context("Failed to hash password")?;
    Ok(hash)
}

async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("Password verification task failed")?
        .context("Stored password hash is malformed")?;
    Ok(valid)
}
