use crate::{datetime_from_db_text, tags_from_db_text, tags_to_db_text, DbError, DbPool};
use lodestone_models::{User, UserFlags, UserStatus};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub pending_email: Option<String>,
    pub password_hash: String,
    pub bio: Option<String>,
    pub tags: String,
    pub status: String,
    pub status_description: Option<String>,
    pub user_icon: Option<String>,
    pub profile_pic_override: Option<String>,
    pub home_world_id: Option<String>,
    pub flags: i64,
    pub created_at: String,
}

impl UserRow {
    pub fn into_user(self) -> Result<User, DbError> {
        let status = self
            .status
            .parse::<UserStatus>()
            .map_err(|e| DbError::Decode(e.to_string()))?;
        Ok(User {
            tags: tags_from_db_text(&self.tags)?,
            created_at: datetime_from_db_text(&self.created_at)?,
            status,
            id: self.id,
            username: self.username,
            email: self.email,
            pending_email: self.pending_email,
            password_hash: self.password_hash,
            bio: self.bio,
            status_description: self.status_description,
            user_icon: self.user_icon,
            profile_pic_override: self.profile_pic_override,
            home_world_id: self.home_world_id,
            flags: UserFlags::from_bits_truncate(self.flags),
        })
    }
}

pub async fn create_user(
    pool: &DbPool,
    id: &str,
    username: &str,
    email: &str,
    password_hash: &str,
    flags: UserFlags,
) -> Result<User, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, username, email, password_hash, flags)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id, username, email, pending_email, password_hash, bio, tags, status, status_description, user_icon, profile_pic_override, home_world_id, flags, created_at"
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(flags.bits())
    .fetch_one(pool)
    .await?;
    row.into_user()
}

pub async fn get_user_by_id(pool: &DbPool, id: &str) -> Result<Option<User>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, pending_email, password_hash, bio, tags, status, status_description, user_icon, profile_pic_override, home_world_id, flags, created_at
         FROM users WHERE id = ?1"
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    row.map(UserRow::into_user).transpose()
}

/// Look up the user that holds `email` as either its confirmed or its
/// pending address.
pub async fn find_user_id_by_email(pool: &DbPool, email: &str) -> Result<Option<String>, DbError> {
    let id: Option<String> = sqlx::query_scalar(
        "SELECT id FROM users WHERE email = ?1 OR pending_email = ?1 LIMIT 1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(id)
}

/// Persist the profile columns a profile update may touch.
pub async fn update_profile(pool: &DbPool, user: &User) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE users SET
            pending_email = ?2,
            bio = ?3,
            tags = ?4,
            status = ?5,
            status_description = ?6,
            user_icon = ?7,
            profile_pic_override = ?8,
            home_world_id = ?9,
            updated_at = datetime('now')
         WHERE id = ?1",
    )
    .bind(user.id.as_str())
    .bind(user.pending_email.as_deref())
    .bind(user.bio.as_deref())
    .bind(tags_to_db_text(&user.tags))
    .bind(user.status.as_str())
    .bind(user.status_description.as_deref())
    .bind(user.user_icon.as_deref())
    .bind(user.profile_pic_override.as_deref())
    .bind(user.home_world_id.as_deref())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

pub async fn update_user_flags(pool: &DbPool, id: &str, flags: UserFlags) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE users SET flags = ?2, updated_at = datetime('now') WHERE id = ?1")
        .bind(id)
        .bind(flags.bits())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
