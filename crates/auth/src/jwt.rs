use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("token could not be decoded: {0}")]
    Decode(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Credential-to-identity capability.
///
/// Implementations verify a presented token and return its claims. The
/// transport layer treats any error as "unauthenticated".
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// HMAC-SHA256 validator over a shared secret.
pub struct Hs256JwtValidator {
    decoding: DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        // Time-window checks run against our own claims model below; disable
        // the library's numeric `exp` handling.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|e| JwtError::Decode(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};
    use toplist_core::UserId;

    fn mint(secret: &str, claims: &JwtClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn test_claims() -> JwtClaims {
        let now = Utc::now();
        JwtClaims {
            sub: UserId::new(),
            username: "bob".to_string(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn round_trips_a_valid_token() {
        let claims = test_claims();
        let token = mint("secret", &claims);

        let validator = Hs256JwtValidator::new("secret");
        let decoded = validator.validate(&token, Utc::now()).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        let token = mint("other-secret", &test_claims());

        let validator = Hs256JwtValidator::new("secret");
        let err = validator.validate(&token, Utc::now()).unwrap_err();
        assert!(matches!(err, JwtError::Decode(_)));
    }

    #[test]
    fn rejects_expired_claims() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: UserId::new(),
            username: "bob".to_string(),
            issued_at: now - Duration::minutes(30),
            expires_at: now - Duration::minutes(20),
        };
        let token = mint("secret", &claims);

        let validator = Hs256JwtValidator::new("secret");
        let err = validator.validate(&token, now).unwrap_err();
        assert_eq!(err, JwtError::Claims(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_garbage_input() {
        let validator = Hs256JwtValidator::new("secret");
        assert!(validator.validate("not-a-jwt", Utc::now()).is_err());
    }
}
