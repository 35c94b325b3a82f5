//! Account and session API handlers.
//!
//! ```text
//! POST   /api/auth/signin   {"email":"ada@example.com","password":"pw"}
//! POST   /api/auth/signup   {"name":"Ada","email":"ada@example.com","password":"pw"}
//! POST   /api/auth/signout
//! GET    /api/auth/me
//! PUT    /api/auth/me       {"name":"Ada","email":"ada@example.com"}
//! PUT    /api/auth/password {"currentPassword":"pw","newPassword":"pw2"}
//! DELETE /api/auth/delete
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    EmailAddress, Error, LoginCredentials, LoginValidationError, PasswordChange, SignupDetails,
    User, UserName, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::login_validation_error;

/// Where clients go after a successful sign-in or sign-up.
pub const DASHBOARD_REDIRECT: &str = "/dashboard";

/// Sign-in request body for `POST /api/auth/signin`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Account email address.
    pub email: String,
    /// Plain-text password, checked against the stored hash.
    pub password: String,
}

impl TryFrom<SignInRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: SignInRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Sign-up request body for `POST /api/auth/signup`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address; must not belong to another account.
    pub email: String,
    /// Password for the new account.
    pub password: String,
}

impl TryFrom<SignUpRequest> for SignupDetails {
    type Error = LoginValidationError;

    fn try_from(value: SignUpRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.name.as_deref(), &value.email, &value.password)
    }
}

/// Profile update body for `PUT /api/auth/me`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New display name; omitted or blank clears it.
    #[serde(default)]
    pub name: Option<String>,
    /// New email address.
    pub email: String,
}

impl TryFrom<UpdateProfileRequest> for UserProfile {
    type Error = LoginValidationError;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: UserName::parse_optional(value.name.as_deref())?,
            email: EmailAddress::parse(&value.email)?,
        })
    }
}

/// Password rotation body for `PUT /api/auth/password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Password currently on the account.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

/// Public view of the signed-in account.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Account identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    /// Display name, when set.
    pub name: Option<String>,
    /// Account email address.
    pub email: String,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_ref().map(|name| name.as_ref().to_owned()),
            email: user.email.as_ref().to_owned(),
        }
    }
}

/// Account view plus the page the client should navigate to.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// The signed-in account.
    #[serde(flatten)]
    pub account: AccountResponse,
    /// Page the client should open next.
    #[schema(example = "/dashboard")]
    pub redirect: String,
}

impl From<&User> for SessionResponse {
    fn from(user: &User) -> Self {
        Self {
            account: AccountResponse::from(user),
            redirect: DASHBOARD_REDIRECT.to_owned(),
        }
    }
}

/// Acknowledgement body for operations without a payload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    pub(crate) const fn ok() -> Self {
        Self { success: true }
    }
}

/// Authenticate with e-mail and password and start a session.
#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/signin")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(login_validation_error)?;
    let user = state.login.sign_in(&credentials).await?;
    let cookie = session.start(&user)?;
    info!(user_id = %user.id, "user signed in");
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(SessionResponse::from(&user)))
}

/// Register an account and start a session.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account created", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request or e-mail taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signUp",
    security([])
)]
#[post("/auth/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let details = SignupDetails::try_from(payload.into_inner()).map_err(login_validation_error)?;
    let user = state.login.sign_up(&details).await?;
    let cookie = session.start(&user)?;
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(SessionResponse::from(&user)))
}

/// Clear the session cookie. Succeeds without a session.
#[utoipa::path(
    post,
    path = "/api/auth/signout",
    responses(
        (status = 200, description = "Signed out", body = SuccessResponse)
    ),
    tags = ["auth"],
    operation_id = "signOut",
    security([])
)]
#[post("/auth/signout")]
pub async fn sign_out(session: SessionContext) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(session.end())
        .json(SuccessResponse::ok())
}

/// Fetch the signed-in account.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user = state.account_query.current_user(&user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(AccountResponse::from(&user)))
}

/// Update name and e-mail. The session cookie is reissued so its claims
/// follow the new address.
#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 400, description = "Invalid request or e-mail taken", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updateProfile"
)]
#[put("/auth/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = UserProfile::try_from(payload.into_inner()).map_err(login_validation_error)?;
    let user = state
        .account_command
        .update_profile(&user_id, &profile)
        .await?;
    let cookie = session.start(&user)?;
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AccountResponse::from(&user)))
}

/// Change the password after checking the current one.
#[utoipa::path(
    put,
    path = "/api/auth/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = SuccessResponse),
        (status = 400, description = "Invalid request or wrong current password", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "changePassword"
)]
#[put("/auth/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let user_id = session.require_user_id()?;
    let ChangePasswordRequest {
        current_password,
        new_password,
    } = payload.into_inner();
    let change = PasswordChange::try_from_parts(&current_password, &new_password)
        .map_err(login_validation_error)?;
    state
        .account_command
        .change_password(&user_id, &change)
        .await?;
    Ok(web::Json(SuccessResponse::ok()))
}

/// Delete the account with all forms and responses, and end the session.
#[utoipa::path(
    delete,
    path = "/api/auth/delete",
    responses(
        (status = 200, description = "Account deleted", body = SuccessResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "deleteAccount"
)]
#[delete("/auth/delete")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.account_command.delete_account(&user_id).await?;
    Ok(HttpResponse::Ok()
        .cookie(session.end())
        .json(SuccessResponse::ok()))
}
