mod access;
pub use access::{HasOwner, check_access};

mod database;
pub use database::DbConnection;

pub mod entity;
pub mod exam;

mod error;
pub use error::{DatabaseError, DatabaseResult};

mod repo;
pub use repo::{CrudRepository, ResourceType, ResourceTyped};

use sqlx::{PgPool, Postgres, Transaction};

#[derive(Debug, Clone)]
pub struct ModelManager {
    database: DbConnection,
}

impl ModelManager {
    pub fn new(conn: DbConnection) -> Self {
        Self { database: conn }
    }

    pub fn executor(&self) -> &PgPool {
        self.database.pool()
    }

    pub async fn begin(&self) -> DatabaseResult<Transaction<'static, Postgres>> {
        Ok(self.database.pool().begin().await?)
    }
}
