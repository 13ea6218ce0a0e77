use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of a registration request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "null_as_default", rename = "acceptedTOSVersion")]
    pub accepted_tos_version: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub day: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub month: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "recaptchaCode")]
    pub recaptcha_code: String,
}

impl RegisterRequest {
    /// Combine the separate day/month/year parts into a date.
    /// Returns `None` when any part is missing or the date does not exist.
    pub fn birthdate(&self) -> Option<NaiveDate> {
        let year = self.year.trim().parse::<i32>().ok()?;
        let month = self.month.trim().parse::<u32>().ok()?;
        let day = self.day.trim().parse::<u32>().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Partial profile update. An empty string or empty list means the field
/// was not sent and is left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "null_as_default", rename = "acceptedTOSVersion")]
    pub accepted_tos_version: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bio: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "bioLinks")]
    pub bio_links: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub birthday: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "currentPassword")]
    pub current_password: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "displayName")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "profilePicOverride")]
    pub profile_pic_override: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "statusDescription")]
    pub status_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unsubscribe: bool,
    #[serde(default, deserialize_with = "null_as_default", rename = "userIcon")]
    pub user_icon: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "homeLocation")]
    pub home_location: String,
}

/// Clients send `null` for fields they leave untouched. Treat it the same as
/// a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
