use crate::model::repo::ResourceTyped;
use crate::web::AuthenticatedUser;
use crate::web::UserRole;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserEntity {
    id: uuid::Uuid,
    username: String,
    first_name: String,
    last_name: String,
    #[serde(skip)]
    password_hash: String,
    role: String,
}

#[derive(Debug)]
pub struct UserEntityCreate {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: UserRole,
}

impl ResourceTyped for UserEntity {
    fn get_resource_type() -> crate::model::repo::ResourceType {
        crate::model::repo::ResourceType::User
    }
}

impl UserEntity {
    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> UserRole {
        UserRole::from(self.role.as_str())
    }
}

#[async_trait::async_trait]
impl CrudRepository<UserEntity, UserEntityCreate, uuid::Uuid> for UserEntity {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserEntityCreate,
    ) -> DatabaseResult<Self> {
        let user = sqlx::query_as(
            r#"
            INSERT INTO users (id, username, first_name, last_name, password_hash, role)
            VALUES ($1,$2,$3,$4,$5,$6)
            RETURNING id, username, first_name, last_name, password_hash, role
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.password_hash)
        .bind(data.role.to_string())
        .fetch_one(mm.executor())
        .await?;

        Ok(user)
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: uuid::Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM users ORDER BY username LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl UserEntity {
    pub async fn find_by_username(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        username: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }
}
