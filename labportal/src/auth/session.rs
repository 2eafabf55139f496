//! Bearer token creation and verification.
//!
//! Tokens are HS256 JWTs carrying the developer id and email. They are stateless: nothing is
//! stored server side, so a token stays valid until its `exp` passes.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::{errors::Error as AppError, types::DeveloperId};

/// Default token lifetime: seven days.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// JWT session claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: DeveloperId, // Subject (developer ID)
    pub email: String,
    pub iat: i64, // Issued at
    pub exp: i64, // Expiration time
}

/// Identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub id: DeveloperId,
    pub email: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed or forged token
    #[error("invalid token: {0}")]
    Invalid(String),
    /// Signature is fine but `exp` has passed
    #[error("token expired")]
    Expired,
    /// No signing secret configured
    #[error("token signing secret is not configured")]
    MissingSecret,
    /// Key or crypto failure
    #[error("token processing failed: {0}")]
    Internal(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid(_) => AppError::Unauthenticated {
                message: Some("Invalid token".to_string()),
            },
            TokenError::Expired => AppError::Unauthenticated {
                message: Some("Token expired".to_string()),
            },
            TokenError::MissingSecret | TokenError::Internal(_) => AppError::Internal {
                operation: format!("process session token: {err}"),
            },
        }
    }
}

/// Signs and verifies session tokens with the server secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: chrono::Duration,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").field("lifetime", &self.lifetime).finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str, lifetime: Duration) -> Result<Self, TokenError> {
        if secret.trim().is_empty() {
            return Err(TokenError::MissingSecret);
        }
        let lifetime = chrono::Duration::from_std(lifetime).map_err(|e| TokenError::Internal(format!("token lifetime: {e}")))?;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        })
    }

    /// Issue a token for a developer, valid from now
    pub fn issue(&self, id: DeveloperId, email: &str) -> Result<String, TokenError> {
        self.issue_at(id, email, Utc::now())
    }

    pub fn issue_at(&self, id: DeveloperId, email: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| TokenError::Internal(format!("sign token: {e}")))
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<TokenIdentity, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenIdentity, TokenError> {
        // Expiry is checked against `now` below rather than the wall clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        let data = decode::<SessionClaims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            // Client errors (401) - malformed, forged or unparseable tokens
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Invalid(e.to_string()),

            ErrorKind::ExpiredSignature => TokenError::Expired,

            // Server errors (500) - key issues, internal failures
            ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::RsaFailedSigning
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::InvalidKeyFormat
            | ErrorKind::MissingAlgorithm
            | ErrorKind::Crypto(_) => TokenError::Internal(e.to_string()),

            _ => TokenError::Internal(format!("unknown verification error: {e}")),
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(TokenIdentity {
            id: data.claims.sub,
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret-key-for-jwt", DEFAULT_TOKEN_LIFETIME).unwrap()
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let codec = codec();
        let token = codec.issue(7, "ann@x.com").unwrap();

        let identity = codec.verify(&token).unwrap();
        assert_eq!(identity, TokenIdentity { id: 7, email: "ann@x.com".to_string() });
    }

    #[test]
    fn test_token_accepted_within_seven_days() {
        let codec = codec();
        let t = issued_at();
        let token = codec.issue_at(1, "a@b.co", t).unwrap();

        assert!(codec.verify_at(&token, t + chrono::Duration::days(6)).is_ok());
        assert_eq!(codec.verify_at(&token, t + chrono::Duration::days(8)), Err(TokenError::Expired));
    }

    #[test]
    fn test_expires_exactly_at_exp() {
        let codec = codec();
        let t = issued_at();
        let token = codec.issue_at(1, "a@b.co", t).unwrap();

        let exp = t + chrono::Duration::days(7);
        assert!(codec.verify_at(&token, exp - chrono::Duration::seconds(1)).is_ok());
        assert_eq!(codec.verify_at(&token, exp), Err(TokenError::Expired));
    }

    #[test]
    fn test_claims_layout() {
        let codec = codec();
        let t = issued_at();
        let token = codec.issue_at(3, "c@d.io", t).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<SessionClaims>(&token, &DecodingKey::from_secret(b"test-secret-key-for-jwt"), &validation).unwrap();
        assert_eq!(data.claims.sub, 3);
        assert_eq!(data.claims.iat, t.timestamp());
        assert_eq!(data.claims.exp - data.claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = codec().issue(1, "a@b.co").unwrap();
        let other = TokenCodec::new("different-secret", DEFAULT_TOKEN_LIFETIME).unwrap();

        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        let codec = codec();
        for token in ["not.a.token", "invalid", "", "too.many.parts.in.this.token"] {
            assert!(
                matches!(codec.verify(token), Err(TokenError::Invalid(_))),
                "Expected Invalid for token: {token}"
            );
        }
    }

    #[test]
    fn test_empty_secret_refused() {
        assert_eq!(TokenCodec::new("  ", DEFAULT_TOKEN_LIFETIME).unwrap_err(), TokenError::MissingSecret);
    }

    #[test]
    fn test_error_mapping() {
        let invalid: AppError = TokenError::Invalid("x".to_string()).into();
        assert_eq!(invalid.user_message(), "Invalid token");
        let expired: AppError = TokenError::Expired.into();
        assert_eq!(expired.user_message(), "Token expired");
        let internal: AppError = TokenError::Internal("x".to_string()).into();
        assert_eq!(internal.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
