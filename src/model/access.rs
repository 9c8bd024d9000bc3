use uuid::Uuid;

use crate::{
    model::{
        ModelManager,
        error::{DatabaseError, DatabaseResult},
    },
    web::AuthenticatedUser,
};

/// Records that belong to a single user.
#[async_trait::async_trait]
pub trait HasOwner {
    async fn owner_id(&self, mm: &ModelManager) -> DatabaseResult<Uuid>;
}

/// Lets `actor` through when it owns `resource` or is an admin.
pub async fn check_access<T>(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    resource: &T,
) -> DatabaseResult<()>
where
    T: HasOwner + Sync,
{
    if actor.is_admin() {
        return Ok(());
    }

    let owner = resource.owner_id(mm).await?;
    if owner != actor.user_id() {
        tracing::debug!("user {} denied access to a record of {}", actor.user_id(), owner);
        return Err(DatabaseError::Forbidden);
    }

    Ok(())
}
