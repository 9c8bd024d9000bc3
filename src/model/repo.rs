use crate::{
    model::{ModelManager, error::DatabaseResult},
    web::AuthenticatedUser,
};

#[derive(Debug, Clone)]
pub enum ResourceType {
    User,
    Course,
    Enrollment,
    Submission,
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// Storage access shared by every entity. `actor` is the identity the call is made on
/// behalf of; seeding tools pass [`AuthenticatedUser::admin`].
#[async_trait::async_trait]
pub trait CrudRepository<T, Create, V>
where
    T: ResourceTyped,
    V: Clone + Copy,
{
    async fn create(mm: &ModelManager, actor: &AuthenticatedUser, data: Create)
    -> DatabaseResult<T>;

    async fn find_by_id(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        id: V,
    ) -> DatabaseResult<Option<T>>;

    async fn list(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<T>>;

    async fn count(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64>;
}
