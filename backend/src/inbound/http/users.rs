//! User session handlers.
//!
//! ```text
//! POST /users {"access_token":"<provider token>"}  -> {"token":"<jwt>"}
//! GET /me  (Authorization: Bearer <jwt>)          -> {"user":{...claims}}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AccessToken, CredentialValidationError, Error, SessionClaims};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, empty_field_error, missing_field_error};

const ACCESS_TOKEN: FieldName = FieldName::new("access_token");

/// Login request body for `POST /users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Access token issued by the identity provider.
    #[schema(example = "ya29.a0AfH6SM...")]
    pub access_token: Option<String>,
}

/// Session credential returned by `POST /users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token to send as `Authorization: Bearer <token>`.
    pub token: String,
}

/// Claims of the authenticated session.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[schema(format = "uuid")]
    pub sub: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "https://example.com/ada.png")]
    pub avatar_url: String,
    /// Issue time, Unix seconds.
    pub iat: i64,
    /// Expiry time, Unix seconds.
    pub exp: i64,
}

impl From<&SessionClaims> for SessionUser {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            sub: claims.sub.to_string(),
            name: claims.name.clone(),
            avatar_url: claims.avatar_url.clone(),
            iat: claims.iat,
            exp: claims.exp,
        }
    }
}

/// Response body for `GET /me`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: SessionUser,
}

fn parse_access_token(request: LoginRequest) -> Result<AccessToken, Error> {
    let raw = request
        .access_token
        .ok_or_else(|| missing_field_error(ACCESS_TOKEN))?;
    AccessToken::new(raw).map_err(|err| match err {
        CredentialValidationError::EmptyAccessToken => empty_field_error(ACCESS_TOKEN),
    })
}

/// Exchange a provider access token for a session credential.
///
/// Creates the local user on first login.
#[utoipa::path(
    post,
    path = "/users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 400, description = "Invalid request or provider profile", body = ErrorSchema),
        (status = 401, description = "Access token rejected", body = ErrorSchema),
        (status = 502, description = "Identity provider unavailable", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/users")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let access_token = parse_access_token(payload.into_inner())?;
    let token = state.login.login(&access_token).await?;
    Ok(web::Json(LoginResponse {
        token: token.into_inner(),
    }))
}

/// Return the claims of the current session.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Session claims", body = MeResponse),
        (status = 401, description = "Missing, invalid or expired session", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(session: SessionContext) -> ApiResult<HttpResponse> {
    let claims = session.require_claims()?;
    Ok(HttpResponse::Ok().json(MeResponse {
        user: SessionUser::from(claims),
    }))
}
