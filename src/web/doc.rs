use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::web::middlewares::AUTH_TOKEN;

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    AUTH_TOKEN,
                    "JWT session token of the signed-in user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::register_form_handler,
        crate::web::routes::account::register_handler,
        crate::web::routes::account::login_form_handler,
        crate::web::routes::account::login_handler,
        crate::web::routes::account::logout_handler,
        crate::web::routes::courses::courses_list_handler,
        crate::web::routes::courses::courses_get_handler,
        crate::web::routes::courses::courses_enroll_handler,
        crate::web::routes::exam::exam_submit_handler,
        crate::web::routes::exam::exam_result_handler,
    ),
    modifiers(&CookieAuthModifier),
    tags(
        (name = "account", description = "Registration and sessions"),
        (name = "courses", description = "Catalog and enrollment"),
        (name = "exam", description = "Exam submissions and grades"),
    )
)]
pub struct ApiDoc;
