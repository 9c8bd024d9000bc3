use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    model::{
        ResourceTyped, check_access,
        entity::Submission,
        exam::extract_answers,
    },
    web::{
        AppState, RequestContext, WebError, WebResult, dto::exam::ExamResultResponse,
        error::ErrorResponse, middlewares, routes::courses::require_course,
    },
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/courses/{id}/submit", post(exam_submit_handler))
        .route(
            "/courses/{id}/submission/{submission_id}/result",
            get(exam_result_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

pub fn result_path(course_id: Uuid, submission_id: Uuid) -> String {
    format!("/courses/{course_id}/submission/{submission_id}/result")
}

#[utoipa::path(
    post,
    path = "/courses/{course_id}/submit",
    description = "Records an exam attempt from an urlencoded form whose `choice*` fields hold selected choice ids, then redirects to its result",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course being examined")
    ),
    responses(
        (status = 303, description = "Submission recorded, redirect to the result"),
        (status = 400, description = "Malformed choice id or choice from another course", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "You're not enrolled in this course", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exam"
)]
pub(crate) async fn exam_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Form(fields): Form<Vec<(String, String)>>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let course = require_course(state.pool(), course_id).await?;

    let choices = extract_answers(fields).map_err(|e| {
        WebError::resource_bad_request(Submission::get_resource_type(), e.to_string())
    })?;

    let submission = Submission::submit(state.pool(), user, course.id(), choices)
        .await
        .map_err(|e| WebError::from_database(Submission::get_resource_type(), e))?;

    Ok(Redirect::to(&result_path(course.id(), submission.id())))
}

#[utoipa::path(
    get,
    path = "/courses/{course_id}/submission/{submission_id}/result",
    description = "Grades a submission: percentage of correct selected choices over the course's questions",
    params(
        ("course_id" = Uuid, Path, description = "ID of the course"),
        ("submission_id" = Uuid, Path, description = "ID of the submission"),
    ),
    responses(
        (status = 200, description = "Submission graded", body = ExamResultResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Submission belongs to another user", body = ErrorResponse),
        (status = 404, description = "Course or submission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    security(
        ("cookie" = [])
    ),
    tag = "exam"
)]
pub(crate) async fn exam_result_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path((course_id, submission_id)): Path<(Uuid, Uuid)>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let course = require_course(state.pool(), course_id).await?;

    let submission = Submission::find_in_course(state.pool(), submission_id, course.id())
        .await
        .map_err(|e| WebError::resource_fetch_error(Submission::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Submission::get_resource_type()))?;

    check_access(state.pool(), user, &submission)
        .await
        .map_err(|e| WebError::from_database(Submission::get_resource_type(), e))?;

    let (grade, selected) = tokio::try_join!(
        submission.grade(state.pool(), course.id()),
        submission.choice_ids(state.pool()),
    )
    .map_err(|e| WebError::resource_fetch_error(Submission::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(ExamResultResponse::new(
            course.id(),
            submission.id(),
            grade,
            selected,
        )),
    ))
}
