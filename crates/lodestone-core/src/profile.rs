//! Per-field profile checks.
//!
//! Every check returns `Ok(false)` when its field was not sent, `Err(_)`
//! when it was sent but is not acceptable, and `Ok(true)` after writing
//! the new value into the user. A rejected check never touches the user.

use crate::auth::verify_password;
use crate::error::ProfileError;
use crate::store::ProfileStore;
use lodestone_models::{UpdateUserRequest, User, UserStatus};
use lodestone_util::validation::validate_max_chars;
use serde::Serialize;
use std::fmt;

pub const MAX_STATUS_DESCRIPTION_CHARS: usize = 32;
pub const MAX_BIO_CHARS: usize = 512;

/// Tags anyone may apply to themselves.
pub const SELF_ASSIGNABLE_TAG_PREFIX: &str = "language_";
/// Tags only the platform assigns. Kept across every tag update.
pub const PROTECTED_TAG_PREFIXES: [&str; 2] = ["system_", "admin_"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Email,
    Status,
    StatusDescription,
    Bio,
    UserIcon,
    ProfilePicOverride,
    Tags,
    HomeLocation,
}

impl ProfileField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Status => "status",
            Self::StatusDescription => "statusDescription",
            Self::Bio => "bio",
            Self::UserIcon => "userIcon",
            Self::ProfilePicOverride => "profilePicOverride",
            Self::Tags => "tags",
            Self::HomeLocation => "homeLocation",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request an email change. Needs the current password and an address no
/// other account holds, confirmed or pending.
pub async fn check_email<S: ProfileStore>(
    store: &S,
    req: &UpdateUserRequest,
    user: &mut User,
) -> Result<bool, ProfileError> {
    if req.email.is_empty() {
        return Ok(false);
    }

    if !matches!(
        verify_password(&req.current_password, &user.password_hash),
        Ok(true)
    ) {
        return Err(ProfileError::InvalidCredentials);
    }

    if store.find_user_id_by_email(&req.email).await?.is_some() {
        return Err(ProfileError::EmailTaken);
    }

    user.pending_email = Some(req.email.clone());
    // TODO: queue the verification mail for the pending address
    tracing::info!(user_id = %user.id, "email change pending verification");
    Ok(true)
}

pub fn check_status(req: &UpdateUserRequest, user: &mut User) -> Result<bool, ProfileError> {
    if req.status.is_empty() {
        return Ok(false);
    }

    let status = req
        .status
        .parse::<UserStatus>()
        .map_err(|_| ProfileError::InvalidStatus)?;

    if status == UserStatus::Offline && !user.is_staff() {
        return Err(ProfileError::InvalidStatusDescription);
    }

    user.status = status;
    Ok(true)
}

pub fn check_status_description(
    req: &UpdateUserRequest,
    user: &mut User,
) -> Result<bool, ProfileError> {
    if req.status_description.is_empty() {
        return Ok(false);
    }

    validate_max_chars(&req.status_description, MAX_STATUS_DESCRIPTION_CHARS)
        .map_err(|_| ProfileError::InvalidStatusDescription)?;

    user.status_description = Some(req.status_description.clone());
    Ok(true)
}

pub fn check_bio(req: &UpdateUserRequest, user: &mut User) -> Result<bool, ProfileError> {
    if req.bio.is_empty() {
        return Ok(false);
    }

    validate_max_chars(&req.bio, MAX_BIO_CHARS).map_err(|_| ProfileError::BioTooLong)?;

    user.bio = Some(req.bio.clone());
    Ok(true)
}

pub fn check_user_icon(req: &UpdateUserRequest, user: &mut User) -> Result<bool, ProfileError> {
    if req.user_icon.is_empty() {
        return Ok(false);
    }

    if !user.is_staff() {
        return Err(ProfileError::UserIconRequiresStaff);
    }

    user.user_icon = Some(req.user_icon.clone());
    Ok(true)
}

pub fn check_profile_pic_override(
    req: &UpdateUserRequest,
    user: &mut User,
) -> Result<bool, ProfileError> {
    if req.profile_pic_override.is_empty() {
        return Ok(false);
    }

    if !user.is_staff() {
        return Err(ProfileError::ProfilePicOverrideRequiresStaff);
    }

    user.profile_pic_override = Some(req.profile_pic_override.clone());
    Ok(true)
}

/// Replace the user's tags. Non-staff requests only keep self-assignable
/// tags; protected tags already on the user always survive.
pub fn check_tags(req: &UpdateUserRequest, user: &mut User) -> Result<bool, ProfileError> {
    if req.tags.is_empty() {
        return Ok(false);
    }

    let staff = user.is_staff();
    let requested = req
        .tags
        .iter()
        .filter(|tag| staff || tag.starts_with(SELF_ASSIGNABLE_TAG_PREFIX));
    let protected = user
        .tags
        .iter()
        .filter(|tag| PROTECTED_TAG_PREFIXES.iter().any(|p| tag.starts_with(p)));

    let mut tags: Vec<String> = Vec::new();
    for tag in requested.chain(protected) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }

    user.tags = tags;
    Ok(true)
}

/// Point the user's home at a world. Private worlds are limited to their
/// author and staff.
pub async fn check_home_location<S: ProfileStore>(
    store: &S,
    req: &UpdateUserRequest,
    user: &mut User,
) -> Result<bool, ProfileError> {
    if req.home_location.is_empty() {
        return Ok(false);
    }

    let world = store
        .get_world(&req.home_location)
        .await?
        .ok_or(ProfileError::WorldNotFound)?;

    if world.is_private() && world.author_id != user.id && !user.is_staff() {
        return Err(ProfileError::WorldPrivate);
    }

    user.home_world_id = Some(world.id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{user, world, MemoryStore, UnavailableStore, PASSWORD};
    use lodestone_models::{ReleaseStatus, UserFlags};

    fn request(json: &str) -> UpdateUserRequest {
        serde_json::from_str(json).unwrap()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_request_changes_nothing() {
        let store = MemoryStore::new();
        let req = UpdateUserRequest::default();
        let mut u = user("usr_1", UserFlags::STAFF);
        let before = serde_json::to_value(&u).unwrap();

        assert!(!check_email(&store, &req, &mut u).await.unwrap());
        assert!(!check_status(&req, &mut u).unwrap());
        assert!(!check_status_description(&req, &mut u).unwrap());
        assert!(!check_bio(&req, &mut u).unwrap());
        assert!(!check_user_icon(&req, &mut u).unwrap());
        assert!(!check_profile_pic_override(&req, &mut u).unwrap());
        assert!(!check_tags(&req, &mut u).unwrap());
        assert!(!check_home_location(&store, &req, &mut u).await.unwrap());

        assert_eq!(serde_json::to_value(&u).unwrap(), before);
    }

    #[tokio::test]
    async fn email_change_sets_pending_address() {
        let store = MemoryStore::new();
        let mut u = user("usr_1", UserFlags::empty());
        store.insert_user(u.clone()).await;

        let req = UpdateUserRequest {
            email: "fresh@example.com".into(),
            current_password: PASSWORD.into(),
            ..Default::default()
        };
        assert!(check_email(&store, &req, &mut u).await.unwrap());
        assert_eq!(u.pending_email.as_deref(), Some("fresh@example.com"));
        assert_eq!(u.email, "usr_1@example.com");
    }

    #[tokio::test]
    async fn email_change_requires_current_password() {
        let store = MemoryStore::new();
        let mut u = user("usr_1", UserFlags::empty());

        for password in ["wrong password", ""] {
            let req = UpdateUserRequest {
                email: "fresh@example.com".into(),
                current_password: password.into(),
                ..Default::default()
            };
            assert!(matches!(
                check_email(&store, &req, &mut u).await,
                Err(ProfileError::InvalidCredentials)
            ));
        }
        assert!(u.pending_email.is_none());
    }

    #[tokio::test]
    async fn email_change_rejects_taken_addresses() {
        let store = MemoryStore::new();
        let mut other = user("usr_2", UserFlags::empty());
        other.pending_email = Some("pending@example.com".into());
        store.insert_user(other).await;
        let mut u = user("usr_1", UserFlags::empty());

        for email in ["usr_2@example.com", "pending@example.com"] {
            let req = UpdateUserRequest {
                email: email.into(),
                current_password: PASSWORD.into(),
                ..Default::default()
            };
            assert!(matches!(
                check_email(&store, &req, &mut u).await,
                Err(ProfileError::EmailTaken)
            ));
        }
        assert!(u.pending_email.is_none());
    }

    #[tokio::test]
    async fn email_lookup_failure_is_surfaced() {
        let mut u = user("usr_1", UserFlags::empty());
        let req = UpdateUserRequest {
            email: "fresh@example.com".into(),
            current_password: PASSWORD.into(),
            ..Default::default()
        };
        assert!(matches!(
            check_email(&UnavailableStore, &req, &mut u).await,
            Err(ProfileError::Storage(_))
        ));
        assert!(u.pending_email.is_none());
    }

    #[test]
    fn status_accepts_known_values_case_insensitively() {
        let cases = [
            ("join me", UserStatus::JoinMe),
            ("Active", UserStatus::Active),
            ("ASK ME", UserStatus::AskMe),
            ("bUsY", UserStatus::Busy),
        ];
        for (input, expected) in cases {
            let mut u = user("usr_1", UserFlags::empty());
            let req = UpdateUserRequest {
                status: input.into(),
                ..Default::default()
            };
            assert!(check_status(&req, &mut u).unwrap(), "{input}");
            assert_eq!(u.status, expected);
        }
    }

    #[test]
    fn busy_status_for_regular_user() {
        let mut u = user("usr_1", UserFlags::empty());
        assert!(check_status(&request(r#"{"status":"Busy"}"#), &mut u).unwrap());
        assert_eq!(u.status, UserStatus::Busy);
        assert_eq!(u.status.as_str(), "busy");
    }

    #[test]
    fn offline_status_is_staff_only() {
        let req = request(r#"{"status":"offline"}"#);

        let mut u = user("usr_1", UserFlags::empty());
        assert!(matches!(
            check_status(&req, &mut u),
            Err(ProfileError::InvalidStatusDescription)
        ));
        assert_eq!(u.status, UserStatus::Active);

        let mut staff = user("usr_2", UserFlags::STAFF);
        assert!(check_status(&req, &mut staff).unwrap());
        assert_eq!(staff.status, UserStatus::Offline);
    }

    #[test]
    fn unknown_status_is_rejected() {
        for input in ["away", "joinme", "online", " busy"] {
            let mut u = user("usr_1", UserFlags::STAFF);
            let req = UpdateUserRequest {
                status: input.into(),
                ..Default::default()
            };
            assert!(matches!(
                check_status(&req, &mut u),
                Err(ProfileError::InvalidStatus)
            ));
            assert_eq!(u.status, UserStatus::Active);
        }
    }

    #[test]
    fn status_description_length_limit() {
        let mut u = user("usr_1", UserFlags::empty());
        let at_limit = UpdateUserRequest {
            status_description: "d".repeat(MAX_STATUS_DESCRIPTION_CHARS),
            ..Default::default()
        };
        assert!(check_status_description(&at_limit, &mut u).unwrap());
        assert_eq!(
            u.status_description.as_deref().map(str::len),
            Some(MAX_STATUS_DESCRIPTION_CHARS)
        );

        let over = UpdateUserRequest {
            status_description: "d".repeat(MAX_STATUS_DESCRIPTION_CHARS + 1),
            ..Default::default()
        };
        let mut fresh = user("usr_2", UserFlags::empty());
        assert!(matches!(
            check_status_description(&over, &mut fresh),
            Err(ProfileError::InvalidStatusDescription)
        ));
        assert!(fresh.status_description.is_none());
    }

    #[test]
    fn bio_length_limit() {
        let mut u = user("usr_1", UserFlags::empty());
        let at_limit = UpdateUserRequest {
            bio: "b".repeat(MAX_BIO_CHARS),
            ..Default::default()
        };
        assert!(check_bio(&at_limit, &mut u).unwrap());

        let over = UpdateUserRequest {
            bio: "b".repeat(MAX_BIO_CHARS + 1),
            ..Default::default()
        };
        assert!(matches!(check_bio(&over, &mut u), Err(ProfileError::BioTooLong)));
        assert_eq!(u.bio.as_deref().map(str::len), Some(MAX_BIO_CHARS));
    }

    #[test]
    fn icon_and_picture_overrides_are_staff_only() {
        let req = UpdateUserRequest {
            user_icon: "https://cdn.example.com/icon.png".into(),
            profile_pic_override: "https://cdn.example.com/pic.png".into(),
            ..Default::default()
        };

        let mut u = user("usr_1", UserFlags::empty());
        assert!(matches!(
            check_user_icon(&req, &mut u),
            Err(ProfileError::UserIconRequiresStaff)
        ));
        assert!(matches!(
            check_profile_pic_override(&req, &mut u),
            Err(ProfileError::ProfilePicOverrideRequiresStaff)
        ));
        assert!(u.user_icon.is_none());
        assert!(u.profile_pic_override.is_none());

        let mut staff = user("usr_2", UserFlags::STAFF);
        assert!(check_user_icon(&req, &mut staff).unwrap());
        assert!(check_profile_pic_override(&req, &mut staff).unwrap());
        assert_eq!(staff.user_icon.as_deref(), Some("https://cdn.example.com/icon.png"));
        assert_eq!(
            staff.profile_pic_override.as_deref(),
            Some("https://cdn.example.com/pic.png")
        );
    }

    #[test]
    fn regular_user_keeps_only_language_tags() {
        let mut u = user("usr_1", UserFlags::empty());
        u.tags = strings(&["system_trust_basic", "language_deu", "show_social_rank"]);
        let req = UpdateUserRequest {
            tags: strings(&["language_eng", "admin_moderator", "system_avatar_access", "language_jpn"]),
            ..Default::default()
        };

        assert!(check_tags(&req, &mut u).unwrap());
        assert_eq!(u.tags, strings(&["language_eng", "language_jpn", "system_trust_basic"]));
    }

    #[test]
    fn staff_may_apply_any_tag() {
        let mut u = user("usr_1", UserFlags::STAFF);
        u.tags = strings(&["admin_moderator"]);
        let req = UpdateUserRequest {
            tags: strings(&["system_world_access", "admin_moderator", "language_eng"]),
            ..Default::default()
        };

        assert!(check_tags(&req, &mut u).unwrap());
        assert_eq!(
            u.tags,
            strings(&["system_world_access", "admin_moderator", "language_eng"])
        );
    }

    #[test]
    fn protected_tags_survive_when_nothing_applies() {
        let mut u = user("usr_1", UserFlags::empty());
        u.tags = strings(&["admin_scripting_access", "language_eng"]);
        let req = UpdateUserRequest {
            tags: strings(&["show_status"]),
            ..Default::default()
        };

        assert!(check_tags(&req, &mut u).unwrap());
        assert_eq!(u.tags, strings(&["admin_scripting_access"]));
    }

    #[test]
    fn repeated_tags_are_stored_once() {
        let mut u = user("usr_1", UserFlags::STAFF);
        u.tags = strings(&["system_trust_basic"]);
        let req = UpdateUserRequest {
            tags: strings(&["language_eng", "language_eng", "system_trust_basic"]),
            ..Default::default()
        };

        assert!(check_tags(&req, &mut u).unwrap());
        assert_eq!(u.tags, strings(&["language_eng", "system_trust_basic"]));
    }

    #[tokio::test]
    async fn home_location_public_world() {
        let store = MemoryStore::new();
        store
            .insert_world(world("wrld_pub", "usr_9", ReleaseStatus::Public))
            .await;
        let mut u = user("usr_1", UserFlags::empty());
        let req = request(r#"{"homeLocation":"wrld_pub"}"#);

        assert!(check_home_location(&store, &req, &mut u).await.unwrap());
        assert_eq!(u.home_world_id.as_deref(), Some("wrld_pub"));
    }

    #[tokio::test]
    async fn home_location_unknown_world() {
        let store = MemoryStore::new();
        let mut u = user("usr_1", UserFlags::STAFF);
        let req = request(r#"{"homeLocation":"wrld_missing"}"#);

        assert!(matches!(
            check_home_location(&store, &req, &mut u).await,
            Err(ProfileError::WorldNotFound)
        ));
        assert!(u.home_world_id.is_none());
    }

    #[tokio::test]
    async fn home_location_private_world_access() {
        let store = MemoryStore::new();
        store
            .insert_world(world("wrld_priv", "usr_author", ReleaseStatus::Private))
            .await;
        let req = request(r#"{"homeLocation":"wrld_priv"}"#);

        let mut stranger = user("usr_1", UserFlags::empty());
        assert!(matches!(
            check_home_location(&store, &req, &mut stranger).await,
            Err(ProfileError::WorldPrivate)
        ));
        assert!(stranger.home_world_id.is_none());

        let mut author = user("usr_author", UserFlags::empty());
        assert!(check_home_location(&store, &req, &mut author).await.unwrap());
        assert_eq!(author.home_world_id.as_deref(), Some("wrld_priv"));

        let mut staff = user("usr_staff", UserFlags::STAFF);
        assert!(check_home_location(&store, &req, &mut staff).await.unwrap());
    }

    #[tokio::test]
    async fn home_location_store_failure_is_surfaced() {
        let mut u = user("usr_1", UserFlags::empty());
        let req = request(r#"{"homeLocation":"wrld_any"}"#);
        assert!(matches!(
            check_home_location(&UnavailableStore, &req, &mut u).await,
            Err(ProfileError::Storage(_))
        ));
    }

    #[test]
    fn field_names_match_request_keys() {
        assert_eq!(ProfileField::ProfilePicOverride.as_str(), "profilePicOverride");
        assert_eq!(
            serde_json::to_value(ProfileField::HomeLocation).unwrap(),
            "homeLocation"
        );
    }
}
