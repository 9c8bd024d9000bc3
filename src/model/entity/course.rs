use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// How many courses the catalog index shows.
pub const TOP_COURSES_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Course {
    id: Uuid,
    name: String,
    description: String,
    pub_date: Option<NaiveDate>,
    total_enrollment: i64,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseCreate {
    pub name: String,
    pub description: String,
    pub pub_date: Option<NaiveDate>,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pub_date(&self) -> Option<NaiveDate> {
        self.pub_date
    }

    pub fn total_enrollment(&self) -> i64 {
        self.total_enrollment
    }
}

#[async_trait]
impl CrudRepository<Course, CourseCreate, Uuid> for Course {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: CourseCreate,
    ) -> DatabaseResult<Self> {
        let course = sqlx::query_as(
            r#"
            INSERT INTO courses (id, name, description, pub_date, total_enrollment)
            VALUES ($1,$2,$3,$4,0)
            RETURNING id, name, description, pub_date, total_enrollment
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.pub_date)
        .fetch_one(mm.executor())
        .await?;

        Ok(course)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses ORDER BY name LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Course {
    pub async fn find_by_name(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        name: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM courses WHERE name = $1")
            .bind(name)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}

// Utils

/// A course of the catalog index. `is_enrolled` is only known for an authenticated viewer.
#[derive(Debug, sqlx::FromRow)]
pub struct CourseListRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub pub_date: Option<NaiveDate>,
    pub total_enrollment: i64,
    pub is_enrolled: Option<bool>,
}

impl CourseListRow {
    /// The [`TOP_COURSES_LIMIT`] most enrolled courses, most enrolled first.
    pub async fn list_top_courses(
        mm: &ModelManager,
        viewer: Option<&AuthenticatedUser>,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = match viewer {
            Some(user) => {
                sqlx::query_as(
                    r#"
                    SELECT
                    c.id,
                    c.name,
                    c.description,
                    c.pub_date,
                    c.total_enrollment,
                    (e.id IS NOT NULL) AS is_enrolled
                    FROM courses c
                    LEFT JOIN enrollments e
                    ON e.course_id = c.id
                    AND e.user_id = $1
                    ORDER BY c.total_enrollment DESC, c.name
                    LIMIT $2
                    "#,
                )
                .bind(user.user_id())
                .bind(TOP_COURSES_LIMIT)
                .fetch_all(mm.executor())
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT
                    id,
                    name,
                    description,
                    pub_date,
                    total_enrollment,
                    NULL::BOOLEAN AS is_enrolled
                    FROM courses
                    ORDER BY total_enrollment DESC, name
                    LIMIT $1
                    "#,
                )
                .bind(TOP_COURSES_LIMIT)
                .fetch_all(mm.executor())
                .await?
            }
        };

        Ok(rows)
    }
}
