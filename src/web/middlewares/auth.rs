use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::{
    auth::{self, CryptResult},
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{AppState, RequestContext, context::AuthenticatedUser, error::WebError},
};

/// Name of the session cookie holding the signed user token.
pub static AUTH_TOKEN: &str = "SID";

/// Reads the user id out of a session token.
fn session_user_id(token: &str, key: &str) -> CryptResult<Uuid> {
    let claims = auth::process_token(token, key)?;
    Ok(claims.claims.sub.parse::<Uuid>()?)
}

/// Drops the session cookie from the client.
pub fn clear_session_cookie(cookies: &Cookies) {
    let mut cookie = Cookie::from(AUTH_TOKEN);
    cookie.set_path("/");
    cookies.remove(cookie);
}

/// Resolves the `SID` cookie into a [`RequestContext`]. Requests without a usable session
/// continue anonymously: no cookie, an expired or tampered token, or a user that no longer
/// exists. A rejected cookie is removed.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(token) if !token.value().is_empty() => token,
        _ => {
            req.extensions_mut().insert(RequestContext::anonymous());
            return Ok(next.run(req).await);
        }
    };

    let key = state.config().await.app().jwt();
    let id = match session_user_id(token.value(), key) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("session cookie rejected: {e}");
            clear_session_cookie(&cookies);
            req.extensions_mut().insert(RequestContext::anonymous());
            return Ok(next.run(req).await);
        }
    };

    let user = UserEntity::find_by_id(state.pool(), &AuthenticatedUser::admin(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?;

    let ctx = match user {
        Some(user) => RequestContext::new(Some(AuthenticatedUser::new(
            user.id(),
            user.username(),
            user.role(),
        ))),
        None => {
            tracing::debug!("session token refers to unknown user {id}");
            clear_session_cookie(&cookies);
            RequestContext::anonymous()
        }
    };

    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}
