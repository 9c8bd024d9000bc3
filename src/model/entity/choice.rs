use crate::model::{ModelManager, error::DatabaseResult};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Choice {
    id: Uuid,
    question_id: Uuid,
    choice_text: String,
    is_correct: bool,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ChoiceCreate {
    pub question_id: Uuid,
    pub choice_text: String,
    pub is_correct: Option<bool>,
}

impl Choice {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn create(mm: &ModelManager, data: ChoiceCreate) -> DatabaseResult<Self> {
        let choice = sqlx::query_as(
            r#"
            INSERT INTO choices (id, question_id, choice_text, is_correct)
            VALUES ($1,$2,$3,$4)
            RETURNING id, question_id, choice_text, is_correct
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.question_id)
        .bind(&data.choice_text)
        .bind(data.is_correct.unwrap_or(false))
        .fetch_one(mm.executor())
        .await?;

        Ok(choice)
    }

    /// The subset of `ids` that are choices of questions of `course_id`.
    pub async fn ids_in_course(
        mm: &ModelManager,
        course_id: Uuid,
        ids: &[Uuid],
    ) -> DatabaseResult<Vec<Uuid>> {
        let result: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT c.id
            FROM choices c
            JOIN questions q ON q.id = c.question_id
            WHERE q.course_id = $1
            AND c.id = ANY($2)
            "#,
        )
        .bind(course_id)
        .bind(ids)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }
}
