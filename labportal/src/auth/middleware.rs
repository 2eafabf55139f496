use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{AppState, auth::current_user::authenticate, errors::Error};

/// Reject requests without a valid bearer token before they reach the handler.
///
/// On success the verified [`CurrentDeveloper`](crate::api::models::developers::CurrentDeveloper)
/// is stored in the request extensions.
pub async fn require_bearer(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, Error> {
    let current = authenticate(request.headers(), &state.tokens)?;
    request.extensions_mut().insert(current);
    Ok(next.run(request).await)
}
