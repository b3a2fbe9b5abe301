use crate::core::config::AuthConfig;
use crate::core::error::ApiError;
use crate::utils::time::current_timestamp;
use anyhow::Context;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Payload carried by every bearer token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "_id")]
    pub account_id: String,
    pub iat: i64,
}

/// Signs and verifies HS256 bearer tokens with the server-held private key
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_private_key.as_bytes();

        // Tokens carry no expiry
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, account_id: &str) -> Result<String, ApiError> {
        let claims = TokenClaims {
            account_id: account_id.to_string(),
            iat: current_timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("Failed to sign token")?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, ApiError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                ApiError::InvalidToken
            })
    }
}
