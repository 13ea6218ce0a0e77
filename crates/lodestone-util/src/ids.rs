use uuid::Uuid;

pub const USER_ID_PREFIX: &str = "usr_";
pub const WORLD_ID_PREFIX: &str = "wrld_";

/// Generate a user ID of the form `usr_<uuid v4>`.
pub fn new_user_id() -> String {
    format!("{USER_ID_PREFIX}{}", Uuid::new_v4())
}

/// Generate a world ID of the form `wrld_<uuid v4>`.
pub fn new_world_id() -> String {
    format!("{WORLD_ID_PREFIX}{}", Uuid::new_v4())
}

/// True if `id` carries `prefix` followed by a well-formed UUID.
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    id.strip_prefix(prefix)
        .map(|rest| Uuid::parse_str(rest).is_ok())
        .unwrap_or(false)
}
