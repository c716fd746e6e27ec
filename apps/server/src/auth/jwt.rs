//! HS256 access tokens

use crate::{config::AuthConfig, models::Role, Error, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// `users.user_id`
    pub sub: i32,
    pub role: Role,
    /// `patient_id` or `provider_id`, depending on `role`.
    pub role_id: i32,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: usize,
}

impl TokenManager {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_seconds: config.token_ttl_seconds as usize,
        }
    }

    pub fn issue(&self, user_id: i32, role: Role, role_id: i32, email: &str) -> Result<String> {
        let now = now_epoch_seconds();
        let claims = Claims {
            sub: user_id,
            role,
            role_id,
            email: email.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| Error::Internal(format!("Failed to sign token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::Unauthorized(format!("Invalid token: {e}")))
    }
}

fn now_epoch_seconds() -> usize {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(secret: &str) -> TokenManager {
        TokenManager::new(&AuthConfig {
            jwt_secret: secret.to_string(),
            token_ttl_seconds: 3600,
            bcrypt_cost: 4,
        })
    }

    #[test]
    fn issued_tokens_verify() {
        let tokens = manager("test-secret");
        let token = tokens.issue(3, Role::Provider, 11, "doc@example.com").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, 3);
        assert_eq!(claims.role, Role::Provider);
        assert_eq!(claims.role_id, 11);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn foreign_signature_is_unauthorized() {
        let token = manager("one").issue(1, Role::Patient, 1, "a@b.co").unwrap();
        let err = manager("two").verify(&token).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn garbage_is_unauthorized() {
        assert!(matches!(
            manager("s").verify("not.a.token"),
            Err(Error::Unauthorized(_))
        ));
    }
}
