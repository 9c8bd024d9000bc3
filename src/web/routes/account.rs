use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time::Duration},
};
use uuid::Uuid;

use crate::{
    Config,
    auth::{self, UserClaims, hash_password, verify_password},
    model::{
        CrudRepository, DatabaseError, ResourceTyped,
        entity::{UserEntity, UserEntityCreate},
    },
    web::{
        AppState, AuthenticatedUser, UserRole, WebError, WebResult,
        dto::account::{
            FormView, INVALID_CREDENTIALS_MESSAGE, LoginBody, RegisterBody, USER_EXISTS_MESSAGE,
        },
        error::ErrorResponse,
        middlewares::{AUTH_TOKEN, clear_session_cookie},
        routes::INDEX_PATH,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/register", get(register_form_handler).post(register_handler))
        .route("/login", get(login_form_handler).post(login_handler))
        .route("/logout", get(logout_handler))
        .with_state(state)
}

fn set_session_cookie(cookies: &Cookies, user_id: Uuid, config: &Config) -> WebResult<()> {
    let hours = config.app().session_hours();
    let claims = UserClaims::for_user(user_id, hours);
    let token = auth::generate_token(claims, config.app().jwt())
        .map_err(|e| WebError::server_crypt_error(e.into()))?;

    let mut cookie = Cookie::new(AUTH_TOKEN, token);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_http_only(true);
    cookie.set_path("/");
    // the browser forgets the cookie when the token expires
    cookie.set_max_age(Duration::hours(hours));
    cookies.add(cookie);
    Ok(())
}

fn is_unique_violation(e: &DatabaseError) -> bool {
    matches!(e, DatabaseError::SqlxError(sqlx::Error::Database(db)) if db.is_unique_violation())
}

#[utoipa::path(
    get,
    path = "/register",
    description = "Registration form descriptor",
    responses(
        (status = 200, description = "Empty registration form", body = FormView),
    ),
    tag = "account"
)]
pub(crate) async fn register_form_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(FormView::registration(None)))
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterBody,
    description = "Creates a new account, signs it in and redirects to the course index",
    responses(
        (status = 303, description = "Account created, session cookie set"),
        (status = 409, description = "Username taken, form returned with a message", body = FormView),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account"
)]
pub(crate) async fn register_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<RegisterBody>,
) -> WebResult<Response> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_username(state.pool(), &admin, &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let conflict = || {
        tracing::debug!("registration rejected, user {} exists", payload.username);
        (
            StatusCode::CONFLICT,
            Json(FormView::registration(Some(USER_EXISTS_MESSAGE))),
        )
            .into_response()
    };

    if found.is_some() {
        return Ok(conflict());
    }

    let hash = hash_password(&payload.password).map_err(WebError::server_crypt_error)?;
    let data = UserEntityCreate {
        username: payload.username.clone(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        password_hash: hash,
        role: UserRole::User,
    };

    let created = match UserEntity::create(state.pool(), &admin, data).await {
        Ok(user) => user,
        // lost a race against a concurrent registration of the same name
        Err(e) if is_unique_violation(&e) => return Ok(conflict()),
        Err(e) => {
            return Err(WebError::resource_fetch_error(
                UserEntity::get_resource_type(),
                e,
            ));
        }
    };

    set_session_cookie(&cookies, created.id(), state.config().await)?;
    tracing::info!("user {} registered", created.username());

    Ok(Redirect::to(INDEX_PATH).into_response())
}

#[utoipa::path(
    get,
    path = "/login",
    description = "Login form descriptor",
    responses(
        (status = 200, description = "Empty login form", body = FormView),
    ),
    tag = "account"
)]
pub(crate) async fn login_form_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(FormView::login(None)))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginBody,
    description = "Checks credentials, signs the user in and redirects to the course index",
    responses(
        (status = 303, description = "Signed in, session cookie set"),
        (status = 401, description = "Invalid credentials, form returned with a message", body = FormView),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "account"
)]
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginBody>,
) -> WebResult<Response> {
    let admin = AuthenticatedUser::admin();
    let found = UserEntity::find_by_username(state.pool(), &admin, &payload.username)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let verified = match &found {
        Some(user) => {
            verify_password(user.hash(), &payload.password).map_err(WebError::server_crypt_error)?
        }
        None => false,
    };

    let user = match found {
        Some(user) if verified => user,
        _ => {
            return Ok((
                StatusCode::UNAUTHORIZED,
                Json(FormView::login(Some(INVALID_CREDENTIALS_MESSAGE))),
            )
                .into_response());
        }
    };

    set_session_cookie(&cookies, user.id(), state.config().await)?;
    tracing::debug!("user {} signed in", user.username());

    Ok(Redirect::to(INDEX_PATH).into_response())
}

#[utoipa::path(
    get,
    path = "/logout",
    description = "Ends the session and redirects to the course index",
    responses(
        (status = 303, description = "Session cookie removed"),
    ),
    tag = "account"
)]
pub(crate) async fn logout_handler(cookies: Cookies) -> impl IntoResponse {
    clear_session_cookie(&cookies);
    Redirect::to(INDEX_PATH)
}
