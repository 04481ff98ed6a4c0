//! Session token verification.
//!
//! The identity provider issues and signs session JWTs; this side only
//! verifies the signature and expiry and reads the claims.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use ledgerly_core::config::AuthConfig;
use ledgerly_core::error::AppError;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The identity provider's user id.
    pub sub: String,
    /// Email claim, when the provider includes one.
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Validates session tokens signed by the identity provider.
#[derive(Clone)]
pub struct SessionDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl SessionDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.session_secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate a session token.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, AppError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid session token: {e}")))?;

        if token_data.claims.sub.is_empty() {
            return Err(AppError::unauthorized("Session token has no subject"));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config() -> AuthConfig {
        AuthConfig {
            session_secret: "test_session_secret".into(),
            leeway_seconds: 5,
        }
    }

    fn token(claims: &SessionClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_round_trip() {
        let decoder = SessionDecoder::new(&config());
        let claims = SessionClaims {
            sub: "user_1".into(),
            email: Some("owner@example.com".into()),
            exp: chrono::Utc::now().timestamp() + 600,
        };

        let decoded = decoder.decode(&token(&claims, "test_session_secret")).unwrap();
        assert_eq!(decoded.sub, "user_1");
        assert_eq!(decoded.email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let decoder = SessionDecoder::new(&config());
        let claims = SessionClaims {
            sub: "user_1".into(),
            email: None,
            exp: chrono::Utc::now().timestamp() + 600,
        };

        assert!(decoder.decode(&token(&claims, "other_secret")).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let decoder = SessionDecoder::new(&config());
        let claims = SessionClaims {
            sub: "user_1".into(),
            email: None,
            exp: chrono::Utc::now().timestamp() - 600,
        };

        assert!(
            decoder
                .decode(&token(&claims, "test_session_secret"))
                .is_err()
        );
    }
}
