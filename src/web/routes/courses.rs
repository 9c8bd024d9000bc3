use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        CrudRepository, ModelManager, ResourceTyped,
        entity::{Course, CourseListRow, Enrollment, QuestionWithChoicesRow},
    },
    web::{
        AppState, AuthenticatedUser, RequestContext, WebError, WebResult,
        dto::courses::{CourseDetailResponse, CourseSummary, QuestionWithChoices},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/courses", get(courses_list_handler))
        .route("/courses/{id}", get(courses_get_handler))
        .route("/courses/{id}/enroll", post(courses_enroll_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

/// Loads a course or fails with `404`.
pub(super) async fn require_course(mm: &ModelManager, id: Uuid) -> WebResult<Course> {
    Course::find_by_id(mm, &AuthenticatedUser::admin(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Course::get_resource_type()))
}

/// The course with its exam questions, annotated with the viewer's enrollment.
pub async fn get_course_detail(
    mm: &ModelManager,
    viewer: Option<&AuthenticatedUser>,
    id: Uuid,
) -> WebResult<CourseDetailResponse> {
    let course = require_course(mm, id).await?;

    let (rows, enrolled) = tokio::try_join!(
        QuestionWithChoicesRow::fetch_for_course(mm, id),
        Enrollment::check_if_enrolled(mm, viewer, id),
    )
    .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    let questions = QuestionWithChoices::from_rows(rows)
        .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?;

    Ok(CourseDetailResponse::new(
        course,
        viewer.map(|_| enrolled),
        questions,
    ))
}

#[utoipa::path(
    get,
    path = "/courses",
    description = "Ten most enrolled courses, most enrolled first. Authenticated viewers also get their enrollment flag",
    responses(
        (status = 200, description = "Course index", body = Vec<CourseSummary>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        (),
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub(crate) async fn courses_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let courses: Vec<CourseSummary> =
        CourseListRow::list_top_courses(state.pool(), ctx.maybe_user())
            .await
            .map_err(|e| WebError::resource_fetch_error(Course::get_resource_type(), e))?
            .into_iter()
            .map(CourseSummary::from)
            .collect();

    Ok((StatusCode::OK, Json(courses)))
}

#[utoipa::path(
    get,
    path = "/courses/{course_id}",
    description = "Course details with its exam questions and choices",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        (),
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub(crate) async fn courses_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let detail = get_course_detail(state.pool(), ctx.maybe_user(), id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

#[utoipa::path(
    post,
    path = "/courses/{course_id}/enroll",
    description = "Enrolls the current user and redirects to the course. Anonymous or already enrolled users are redirected without changes",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course to enroll in")
    ),
    responses(
        (status = 303, description = "Redirect to the course details"),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "courses"
)]
pub(crate) async fn courses_enroll_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let course = require_course(state.pool(), id).await?;

    Enrollment::enroll(state.pool(), ctx.maybe_user(), course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Enrollment::get_resource_type(), e))?;

    Ok(Redirect::to(&format!("/courses/{}", course.id())))
}
