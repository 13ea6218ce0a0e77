use lodestone_db::{DbError, DbPool};
use lodestone_models::{User, World};

/// Lookups and writes the profile checks need from the backing store.
/// Absent records are `Ok(None)`, never an error.
#[allow(async_fn_in_trait)]
pub trait ProfileStore: Send + Sync {
    /// ID of the user holding `email` as confirmed or pending address.
    async fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>, DbError>;
    async fn get_world(&self, world_id: &str) -> Result<Option<World>, DbError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DbError>;
    async fn save_profile(&self, user: &User) -> Result<(), DbError>;
}

impl ProfileStore for DbPool {
    async fn find_user_id_by_email(&self, email: &str) -> Result<Option<String>, DbError> {
        lodestone_db::users::find_user_id_by_email(self, email).await
    }

    async fn get_world(&self, world_id: &str) -> Result<Option<World>, DbError> {
        lodestone_db::worlds::get_world(self, world_id).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, DbError> {
        lodestone_db::users::get_user_by_id(self, user_id).await
    }

    async fn save_profile(&self, user: &User) -> Result<(), DbError> {
        lodestone_db::users::update_profile(self, user).await
    }
}
