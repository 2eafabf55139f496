use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, instrument, trace};

use crate::{
    AppState,
    api::models::developers::CurrentDeveloper,
    auth::session::TokenCodec,
    errors::{Error, Result},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The prefix is matched exactly (case-sensitive, one space).
fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(Error::Unauthenticated { message: None })
}

/// Verify the bearer token in `headers`. No storage lookup is made.
#[instrument(skip_all)]
pub fn authenticate(headers: &HeaderMap, tokens: &TokenCodec) -> Result<CurrentDeveloper> {
    let token = bearer_token(headers)?;
    let identity = tokens.verify(token).map_err(|e| {
        debug!("Rejected bearer token: {e}");
        e
    })?;

    trace!(developer_id = identity.id, "Bearer token verified");
    Ok(CurrentDeveloper {
        id: identity.id,
        email: identity.email,
    })
}

impl FromRequestParts<AppState> for CurrentDeveloper {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // Set by `require_bearer` when the route sits behind it
        if let Some(current) = parts.extensions.get::<CurrentDeveloper>() {
            return Ok(current.clone());
        }

        let current = authenticate(&parts.headers, &state.tokens)?;
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// The caller, if the request carried an `Authorization` header.
///
/// A missing header yields `None`. A header that is present but fails verification is still
/// rejected with 401.
#[derive(Debug, Clone)]
pub struct OptionalDeveloper(pub Option<CurrentDeveloper>);

impl FromRequestParts<AppState> for OptionalDeveloper {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(OptionalDeveloper(None));
        }
        CurrentDeveloper::from_request_parts(parts, state).await.map(|c| OptionalDeveloper(Some(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::DEFAULT_TOKEN_LIFETIME;
    use axum::http::HeaderValue;

    fn codec() -> TokenCodec {
        TokenCodec::new("unit-test-secret", DEFAULT_TOKEN_LIFETIME).unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_bearer_is_accepted() {
        let codec = codec();
        let token = codec.issue(7, "ann@x.com").unwrap();

        let current = authenticate(&headers(&format!("Bearer {token}")), &codec).unwrap();
        assert_eq!(current.id, 7);
        assert_eq!(current.email, "ann@x.com");
    }

    #[test]
    fn test_missing_or_malformed_header_requires_token() {
        let codec = codec();
        let token = codec.issue(7, "ann@x.com").unwrap();

        for headers in [
            HeaderMap::new(),
            headers(&token),
            headers(&format!("bearer {token}")),
            headers(&format!("Token {token}")),
            headers(&format!("Bearer{token}")),
        ] {
            let err = authenticate(&headers, &codec).unwrap_err();
            assert_eq!(err.user_message(), "Authorization token required");
        }
    }

    #[test]
    fn test_forged_token_is_invalid() {
        let other = TokenCodec::new("another-secret", DEFAULT_TOKEN_LIFETIME).unwrap();
        let token = other.issue(7, "ann@x.com").unwrap();

        let err = authenticate(&headers(&format!("Bearer {token}")), &codec()).unwrap_err();
        assert_eq!(err.user_message(), "Invalid token");
    }
}
