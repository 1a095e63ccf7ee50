//! Login and logout endpoints
//!
//! Login is the only writer that creates sessions; logout the only one
//! that removes them. Credential verification itself belongs to the
//! account-store collaborator.

use crate::auth::extract_bearer_token;
use crate::server::AppState;
use crate::utils::error::GateError;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
}

/// Login response body
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque session token for the Authorization header
    pub token: String,
}

/// Issue a session for valid credentials
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = state
        .directory
        .verify_credentials(&request.username, &request.password)?;

    let Some(user_id) = user_id else {
        warn!(username = %request.username, "login rejected");
        return Err(GateError::unauthenticated("Invalid username or password").into());
    };

    let token = state.sessions.issue(user_id);
    info!(username = %request.username, "login succeeded");
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

/// Revoke the presented session; idempotent
///
/// Always succeeds: revoking an unknown or absent token is a no-op, so a
/// double logout is not an error.
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> ActixResult<HttpResponse> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if let Some(token) = extract_bearer_token(header) {
        state.sessions.revoke(token);
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Logged out" })))
}
