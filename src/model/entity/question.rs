use crate::model::{ModelManager, error::DatabaseResult};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Question {
    id: Uuid,
    course_id: Uuid,
    question_text: String,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct QuestionCreate {
    pub course_id: Uuid,
    pub question_text: String,
}

impl Question {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn create(mm: &ModelManager, data: QuestionCreate) -> DatabaseResult<Self> {
        let question = sqlx::query_as(
            r#"
            INSERT INTO questions (id, course_id, question_text)
            VALUES ($1,$2,$3)
            RETURNING id, course_id, question_text
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.course_id)
        .bind(&data.question_text)
        .fetch_one(mm.executor())
        .await?;

        Ok(question)
    }

    /// Number of questions of a course, the denominator of its grade.
    pub async fn count_for_course(mm: &ModelManager, course_id: Uuid) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(mm.executor())
            .await?;
        Ok(result)
    }

    /// Question texts are unique within a course.
    pub async fn find_by_text(
        mm: &ModelManager,
        course_id: Uuid,
        question_text: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result =
            sqlx::query_as("SELECT * FROM questions WHERE course_id = $1 AND question_text = $2")
                .bind(course_id)
                .bind(question_text)
                .fetch_optional(mm.executor())
                .await?;
        Ok(result)
    }
}

// Utils

/// A question with its choices aggregated into a JSON array of `{id, choice_text}`.
/// Carries no `is_correct`, this row feeds the exam form.
#[derive(sqlx::FromRow)]
pub struct QuestionWithChoicesRow {
    pub id: Uuid,
    pub question_text: String,
    pub choices: serde_json::Value,
}

impl QuestionWithChoicesRow {
    pub async fn fetch_for_course(
        mm: &ModelManager,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows: Vec<QuestionWithChoicesRow> = sqlx::query_as(
            r#"
            SELECT
            q.id,
            q.question_text,
            COALESCE(
                json_agg(
                    json_build_object(
                        'id', c.id,
                        'choice_text', c.choice_text
                    )
                    ORDER BY c.choice_text
                ) FILTER (WHERE c.id IS NOT NULL),
                '[]'
            ) AS choices
            FROM questions q
            LEFT JOIN choices c ON c.question_id = q.id
            WHERE q.course_id = $1
            GROUP BY q.id
            ORDER BY q.question_text;
            "#,
        )
        .bind(course_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
