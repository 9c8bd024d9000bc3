use crate::model::access::HasOwner;
use crate::model::entity::{Choice, Enrollment, Question};
use crate::model::exam::{Grade, SelectedChoices};
use crate::model::repo::ResourceTyped;
use crate::model::{DatabaseError, ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// One exam attempt. Immutable once created; every attempt is kept.
#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Submission {
    id: Uuid,
    enrollment_id: Uuid,
    created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct SubmissionCreate {
    pub enrollment_id: Uuid,
    pub choices: SelectedChoices,
}

impl ResourceTyped for Submission {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Submission
    }
}

impl Submission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Inserts the attempt and its selected choices in one transaction.
    async fn insert(mm: &ModelManager, data: SubmissionCreate) -> DatabaseResult<Self> {
        let mut tx = mm.begin().await?;

        let submission: Self = sqlx::query_as(
            r#"
            INSERT INTO submissions (id, enrollment_id, created_at)
            VALUES ($1,$2,now())
            RETURNING id, enrollment_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.enrollment_id)
        .fetch_one(&mut *tx)
        .await?;

        if !data.choices.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO submission_choices (submission_id, choice_id)
                SELECT $1, choice_id FROM UNNEST($2::uuid[]) AS t(choice_id)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(submission.id)
            .bind(data.choices.ids())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(submission)
    }

    /// Records an exam attempt of `user` for `course_id`.
    ///
    /// Fails with [`DatabaseError::NotEnrolled`] when the user has no enrollment in the
    /// course and with [`DatabaseError::ForeignChoices`] when any selected id is not a
    /// choice of one of the course's questions. Nothing is written in either case.
    #[tracing::instrument(skip(mm, choices))]
    pub async fn submit(
        mm: &ModelManager,
        user: &AuthenticatedUser,
        course_id: Uuid,
        choices: SelectedChoices,
    ) -> DatabaseResult<Self> {
        let enrollment = Enrollment::find_for(mm, user.user_id(), course_id)
            .await?
            .ok_or(DatabaseError::NotEnrolled {
                user_id: user.user_id(),
                course_id,
            })?;

        if !choices.is_empty() {
            let known = Choice::ids_in_course(mm, course_id, &choices.ids()).await?;
            let foreign = choices.foreign_to(&known);
            if !foreign.is_empty() {
                return Err(DatabaseError::ForeignChoices {
                    course_id,
                    choice_ids: foreign,
                });
            }
        }

        let selected = choices.len();
        let submission = Self::insert(
            mm,
            SubmissionCreate {
                enrollment_id: enrollment.id(),
                choices,
            },
        )
        .await?;

        tracing::info!(
            "submission {} recorded for enrollment {} with {} choices",
            submission.id(),
            enrollment.id(),
            selected
        );
        Ok(submission)
    }

    /// The submission, only if it was made through an enrollment in `course_id`.
    pub async fn find_in_course(
        mm: &ModelManager,
        id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            r#"
            SELECT s.id, s.enrollment_id, s.created_at
            FROM submissions s
            JOIN enrollments e ON e.id = s.enrollment_id
            WHERE s.id = $1
            AND e.course_id = $2
            "#,
        )
        .bind(id)
        .bind(course_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn choice_ids(&self, mm: &ModelManager) -> DatabaseResult<Vec<Uuid>> {
        let result: Vec<Uuid> = sqlx::query_scalar(
            "SELECT choice_id FROM submission_choices WHERE submission_id = $1 ORDER BY choice_id",
        )
        .bind(self.id)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    pub async fn count_correct(&self, mm: &ModelManager) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM submission_choices sc
            JOIN choices c ON c.id = sc.choice_id
            WHERE sc.submission_id = $1
            AND c.is_correct = TRUE
            "#,
        )
        .bind(self.id)
        .fetch_one(mm.executor())
        .await?;
        Ok(result)
    }

    /// Grades this attempt against the question count of `course_id`.
    pub async fn grade(&self, mm: &ModelManager, course_id: Uuid) -> DatabaseResult<Grade> {
        let (total_questions, correct_answers) = tokio::try_join!(
            Question::count_for_course(mm, course_id),
            self.count_correct(mm),
        )?;

        let grade = Grade::compute(correct_answers, total_questions);
        tracing::debug!(
            "submission {} graded {:.2} ({}/{})",
            self.id,
            grade.grade,
            grade.correct_answers,
            grade.total_questions
        );
        Ok(grade)
    }
}

#[async_trait]
impl HasOwner for Submission {
    /// The user of the enrollment the attempt was made through.
    async fn owner_id(&self, mm: &ModelManager) -> DatabaseResult<Uuid> {
        let owner: Uuid = sqlx::query_scalar("SELECT user_id FROM enrollments WHERE id = $1")
            .bind(self.enrollment_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(owner)
    }
}
