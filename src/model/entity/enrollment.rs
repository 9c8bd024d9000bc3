use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentMode {
    Audit,
    Honor,
    Beta,
}

impl From<&str> for EnrollmentMode {
    fn from(value: &str) -> Self {
        match value {
            "honor" => Self::Honor,
            "beta" => Self::Beta,
            _ => Self::Audit,
        }
    }
}

impl std::fmt::Display for EnrollmentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audit => write!(f, "audit"),
            Self::Honor => write!(f, "honor"),
            Self::Beta => write!(f, "beta"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Enrollment {
    id: Uuid,
    user_id: Uuid,
    course_id: Uuid,
    mode: String,
    date_enrolled: DateTime<Utc>,
}

#[derive(Debug)]
pub struct EnrollmentCreate {
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub mode: EnrollmentMode,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Enrollment {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn mode(&self) -> EnrollmentMode {
        EnrollmentMode::from(self.mode.as_str())
    }
}

impl Enrollment {
    /// Inserts the enrollment and bumps the course counter in one transaction.
    /// `None` when the (user, course) pair already exists; the counter is left untouched then.
    async fn insert_counted(
        mm: &ModelManager,
        data: EnrollmentCreate,
    ) -> DatabaseResult<Option<Self>> {
        let mut tx = mm.begin().await?;

        let inserted: Option<Self> = sqlx::query_as(
            r#"
            INSERT INTO enrollments (id, user_id, course_id, mode, date_enrolled)
            VALUES ($1,$2,$3,$4,now())
            ON CONFLICT (user_id, course_id) DO NOTHING
            RETURNING id, user_id, course_id, mode, date_enrolled
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.course_id)
        .bind(data.mode.to_string())
        .fetch_optional(&mut *tx)
        .await?;

        if inserted.is_some() {
            sqlx::query("UPDATE courses SET total_enrollment = total_enrollment + 1 WHERE id = $1")
                .bind(data.course_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// `false` for anonymous viewers, without touching storage.
    pub async fn check_if_enrolled(
        mm: &ModelManager,
        viewer: Option<&AuthenticatedUser>,
        course_id: Uuid,
    ) -> DatabaseResult<bool> {
        let Some(user) = viewer else {
            return Ok(false);
        };

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user.user_id())
        .bind(course_id)
        .fetch_one(mm.executor())
        .await?;
        Ok(exists)
    }

    /// Enrolls `viewer` in `course_id` in `honor` mode.
    /// No-op (returns `None`) for anonymous viewers and users already enrolled.
    #[tracing::instrument(skip(mm))]
    pub async fn enroll(
        mm: &ModelManager,
        viewer: Option<&AuthenticatedUser>,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let Some(user) = viewer else {
            return Ok(None);
        };

        if Self::check_if_enrolled(mm, viewer, course_id).await? {
            tracing::debug!("user {} already enrolled", user.user_id());
            return Ok(None);
        }

        let created = Self::insert_counted(
            mm,
            EnrollmentCreate {
                user_id: user.user_id(),
                course_id,
                mode: EnrollmentMode::Honor,
            },
        )
        .await?;

        if let Some(enrollment) = &created {
            tracing::info!(
                "user {} enrolled in course {} ({})",
                enrollment.user_id(),
                enrollment.course_id(),
                enrollment.mode()
            );
        }

        Ok(created)
    }

    pub async fn find_for(
        mm: &ModelManager,
        user_id: Uuid,
        course_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(mm.executor())
        .await?;
        Ok(result)
    }
}
