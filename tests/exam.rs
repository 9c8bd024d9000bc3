mod common;
use axum::http::StatusCode;
use onlinecourse::auth::hash_password;
use onlinecourse::model::CrudRepository;
use onlinecourse::model::entity::{UserEntity, UserEntityCreate};
use onlinecourse::web::dto::exam::ExamResultResponse;
use onlinecourse::web::{AuthenticatedUser, UserRole};
use uuid::Uuid;

use crate::common::{
    Action, Flow, FlowDatabase, enroll_action, login_action, register_action, seed_course,
    seed_two_question_course, setup_server, setup_test_db, submit_action,
};

fn result_step(name: &'static str, location_key: &'static str) -> Action {
    Action::new(name, "GET", "")
        .with_dyn_path(move |ctx| ctx.get_str(location_key).to_string())
}

async fn submission_rows(db: &FlowDatabase) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn route_exam_full_marks_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let course = seed_two_question_course(&db, "Trivia").await;
    let correct = [course.choice(0, 0), course.choice(1, 0)];
    let course_id = course.id;

    let ctx = Flow::new()
        .step(register_action("learner", "secret"))
        .step(enroll_action(course_id))
        .step(
            submit_action(course_id, &correct)
                .assert_header("location", move |location| {
                    assert!(location.starts_with(&format!("/courses/{course_id}/submission/")));
                    assert!(location.ends_with("/result"));
                })
                .with_save_location_as("result"),
        )
        .step(result_step("result", "result").with_save_as("graded"))
        .run(&mut server, &db)
        .await;

    let graded: ExamResultResponse = ctx.get_json("graded");
    assert_eq!(graded.course_id, course_id);
    assert_eq!(graded.grade, 100.0);
    assert_eq!(graded.correct_answers, 2);
    assert_eq!(graded.total_questions, 2);

    let mut expected = correct.to_vec();
    expected.sort();
    assert_eq!(graded.selected_choice_ids, expected);
}

#[tokio::test]
async fn route_exam_grades_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let course = seed_two_question_course(&db, "Trivia").await;
    let course_id = course.id;

    let ctx = Flow::new()
        .step(register_action("learner", "secret"))
        .step(enroll_action(course_id))
        // both wrong
        .step(
            submit_action(course_id, &[course.choice(0, 1), course.choice(1, 1)])
                .with_save_location_as("wrong"),
        )
        // one right, one question skipped
        .step(submit_action(course_id, &[course.choice(0, 0)]).with_save_location_as("half"))
        // nothing selected
        .step(submit_action(course_id, &[]).with_save_location_as("empty"))
        .step(result_step("wrong", "wrong").with_save_as("wrong_graded"))
        .step(result_step("half", "half").with_save_as("half_graded"))
        .step(result_step("empty", "empty").with_save_as("empty_graded"))
        .run(&mut server, &db)
        .await;

    let wrong: ExamResultResponse = ctx.get_json("wrong_graded");
    assert_eq!(wrong.grade, 0.0);
    assert_eq!(wrong.correct_answers, 0);
    assert_eq!(wrong.selected_choice_ids.len(), 2);

    let half: ExamResultResponse = ctx.get_json("half_graded");
    assert_eq!(half.grade, 50.0);
    assert_eq!(half.correct_answers, 1);

    let empty: ExamResultResponse = ctx.get_json("empty_graded");
    assert_eq!(empty.grade, 0.0);
    assert!(empty.selected_choice_ids.is_empty());

    // every attempt is kept
    assert_eq!(submission_rows(&db).await, 3);
}

#[tokio::test]
async fn route_exam_scores_per_choice_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let course = seed_course(
        &db,
        "Multi",
        &[
            ("Pick the primes", &[("2", true), ("3", true), ("4", false)]),
            ("Pick the even", &[("6", true), ("7", false)]),
        ],
    )
    .await;

    let ctx = Flow::new()
        .step(register_action("learner", "secret"))
        .step(enroll_action(course.id))
        .step(
            submit_action(course.id, &[course.choice(0, 0), course.choice(0, 1)])
                .with_save_location_as("result"),
        )
        .step(result_step("result", "result").with_save_as("graded"))
        .run(&mut server, &db)
        .await;

    // two correct choices over two questions, although the second one was skipped
    let graded: ExamResultResponse = ctx.get_json("graded");
    assert_eq!(graded.correct_answers, 2);
    assert_eq!(graded.total_questions, 2);
    assert_eq!(graded.grade, 100.0);
}

#[tokio::test]
async fn route_exam_without_questions_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let course = seed_course(&db, "Empty", &[]).await;

    let ctx = Flow::new()
        .step(register_action("learner", "secret"))
        .step(enroll_action(course.id))
        .step(submit_action(course.id, &[]).with_save_location_as("result"))
        .step(result_step("result", "result").with_save_as("graded"))
        .run(&mut server, &db)
        .await;

    let graded: ExamResultResponse = ctx.get_json("graded");
    assert_eq!(graded.grade, 0.0);
    assert_eq!(graded.total_questions, 0);
}

#[tokio::test]
async fn route_exam_rejected_submissions_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let course = seed_two_question_course(&db, "Trivia").await;
    let other = seed_two_question_course(&db, "Elsewhere").await;
    let course_id = course.id;

    Flow::new()
        // anonymous
        .step(
            submit_action(course_id, &[course.choice(0, 0)])
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .step(register_action("learner", "secret"))
        // signed in but not enrolled
        .step(
            submit_action(course_id, &[course.choice(0, 0)])
                .with_expect(StatusCode::FORBIDDEN)
                .assert_body(|body| assert!(body.contains("not enrolled"))),
        )
        .step(
            submit_action(Uuid::new_v4(), &[]).with_expect(StatusCode::NOT_FOUND),
        )
        .step(enroll_action(course_id))
        // choice of another course
        .step(
            submit_action(course_id, &[course.choice(0, 0), other.choice(0, 0)])
                .with_expect(StatusCode::BAD_REQUEST),
        )
        // unknown choice id
        .step(submit_action(course_id, &[Uuid::new_v4()]).with_expect(StatusCode::BAD_REQUEST))
        // not an id at all
        .step(
            Action::new("submit_malformed", "POST", format!("/courses/{course_id}/submit"))
                .with_form([("choice_1", "42")])
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .run(&mut server, &db)
        .await;

    assert_eq!(submission_rows(&db).await, 0);
}

#[tokio::test]
async fn route_exam_result_access_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let course = seed_two_question_course(&db, "Trivia").await;
    let other = seed_course(&db, "Elsewhere", &[]).await;
    let (course_id, other_id) = (course.id, other.id);

    UserEntity::create(
        db.mm(),
        &AuthenticatedUser::admin(),
        UserEntityCreate {
            username: String::from("staff"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: hash_password("staff").unwrap(),
            role: UserRole::Admin,
        },
    )
    .await
    .unwrap();

    Flow::new()
        .step(register_action("owner", "secret"))
        .step(enroll_action(course_id))
        .step(submit_action(course_id, &[course.choice(0, 0)]).with_save_location_as("result"))
        // the same submission under another course does not exist
        .step(
            result_step("result_wrong_course", "result")
                .with_dyn_path(move |ctx| {
                    ctx.get_str("result")
                        .replace(&course_id.to_string(), &other_id.to_string())
                })
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new(
                "result_unknown",
                "GET",
                format!("/courses/{course_id}/submission/{}/result", Uuid::new_v4()),
            )
            .with_expect(StatusCode::NOT_FOUND),
        )
        // someone else
        .step(register_action("intruder", "secret").with_clear_cookies(true))
        .step(result_step("result_intruder", "result").with_expect(StatusCode::FORBIDDEN))
        // anonymous
        .step(
            result_step("result_anonymous", "result")
                .with_clear_cookies(true)
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        // admins see every result
        .step(login_action("staff", "staff"))
        .step(result_step("result_admin", "result").assert_body(|body| {
            let graded: ExamResultResponse =
                serde_json::from_str(body).expect("Invalid body format");
            assert_eq!(graded.grade, 50.0);
        }))
        // and the owner too
        .step(login_action("owner", "secret").with_clear_cookies(true))
        .step(result_step("result_owner", "result"))
        .run(&mut server, &db)
        .await;
}
