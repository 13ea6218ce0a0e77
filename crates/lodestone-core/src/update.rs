use crate::error::{CoreError, ProfileError};
use crate::profile::{self, ProfileField};
use crate::store::ProfileStore;
use lodestone_models::{UpdateUserRequest, User};

#[derive(Debug)]
pub struct Rejection {
    pub field: ProfileField,
    pub error: ProfileError,
}

/// Outcome of running every profile check over one request.
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub applied: Vec<ProfileField>,
    pub rejected: Vec<Rejection>,
}

impl UpdateReport {
    fn record(&mut self, field: ProfileField, outcome: Result<bool, ProfileError>) {
        match outcome {
            Ok(true) => self.applied.push(field),
            Ok(false) => {}
            Err(error) => {
                tracing::debug!(field = %field, error = %error, "profile field rejected");
                self.rejected.push(Rejection { field, error });
            }
        }
    }

    /// True if at least one field was written to the user.
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn error_for(&self, field: ProfileField) -> Option<&ProfileError> {
        self.rejected
            .iter()
            .find(|r| r.field == field)
            .map(|r| &r.error)
    }
}

/// Run every check against `user`. A rejected field does not stop the
/// fields after it.
pub async fn apply_update<S: ProfileStore>(
    store: &S,
    user: &mut User,
    req: &UpdateUserRequest,
) -> UpdateReport {
    let mut report = UpdateReport::default();
    report.record(
        ProfileField::Email,
        profile::check_email(store, req, user).await,
    );
    report.record(ProfileField::Status, profile::check_status(req, user));
    report.record(
        ProfileField::StatusDescription,
        profile::check_status_description(req, user),
    );
    report.record(ProfileField::Bio, profile::check_bio(req, user));
    report.record(ProfileField::UserIcon, profile::check_user_icon(req, user));
    report.record(
        ProfileField::ProfilePicOverride,
        profile::check_profile_pic_override(req, user),
    );
    report.record(ProfileField::Tags, profile::check_tags(req, user));
    report.record(
        ProfileField::HomeLocation,
        profile::check_home_location(store, req, user).await,
    );
    report
}

/// Load a user, apply `req` and persist the result if anything changed.
pub async fn update_profile<S: ProfileStore>(
    store: &S,
    user_id: &str,
    req: &UpdateUserRequest,
) -> Result<(User, UpdateReport), CoreError> {
    let mut user = store.get_user(user_id).await?.ok_or(CoreError::NotFound)?;

    let report = apply_update(store, &mut user, req).await;
    if report.changed() {
        store.save_profile(&user).await?;
        tracing::info!(
            user_id = %user.id,
            applied = report.applied.len(),
            rejected = report.rejected.len(),
            "profile updated"
        );
    }

    Ok((user, report))
}
