use crate::{
    Config,
    web::{AppState, doc::ApiDoc},
};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod account;
pub mod courses;
pub mod exam;

/// Where login, registration and logout send the browser afterwards.
pub const INDEX_PATH: &str = "/courses";

pub fn build_app<S: Send + Sync + Clone + 'static>(
    state: AppState,
    config: &'static Config,
) -> Router<S> {
    let mut router = Router::new()
        .merge(account::routes(state.clone()))
        .merge(courses::routes(state.clone()))
        .merge(exam::routes(state.clone()));

    if config.app().docs() {
        let openapi = ApiDoc::openapi();

        router = router.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", openapi));
    }

    router
        .layer(CookieManagerLayer::default())
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
