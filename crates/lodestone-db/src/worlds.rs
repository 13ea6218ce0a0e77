use crate::{DbError, DbPool};
use lodestone_models::{ReleaseStatus, World};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorldRow {
    pub id: String,
    pub name: String,
    pub author_id: String,
    pub release_status: String,
}

impl WorldRow {
    pub fn into_world(self) -> Result<World, DbError> {
        let release_status = self
            .release_status
            .parse::<ReleaseStatus>()
            .map_err(|e| DbError::Decode(e.to_string()))?;
        Ok(World {
            id: self.id,
            name: self.name,
            author_id: self.author_id,
            release_status,
        })
    }
}

pub async fn create_world(
    pool: &DbPool,
    id: &str,
    name: &str,
    author_id: &str,
    release_status: ReleaseStatus,
) -> Result<World, DbError> {
    let row = sqlx::query_as::<_, WorldRow>(
        "INSERT INTO worlds (id, name, author_id, release_status)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, name, author_id, release_status",
    )
    .bind(id)
    .bind(name)
    .bind(author_id)
    .bind(release_status.as_str())
    .fetch_one(pool)
    .await?;
    row.into_world()
}

pub async fn get_world(pool: &DbPool, id: &str) -> Result<Option<World>, DbError> {
    let row = sqlx::query_as::<_, WorldRow>(
        "SELECT id, name, author_id, release_status FROM worlds WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(WorldRow::into_world).transpose()
}
