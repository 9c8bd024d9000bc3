use thiserror::Error;
use uuid::Uuid;

pub type DatabaseResult<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("access to this resource is forbidden")]
    Forbidden,
    #[error("user {user_id} is not enrolled in course {course_id}")]
    NotEnrolled { user_id: Uuid, course_id: Uuid },
    #[error("choices do not belong to course {course_id}: {choice_ids:?}")]
    ForeignChoices {
        course_id: Uuid,
        choice_ids: Vec<Uuid>,
    },
}
