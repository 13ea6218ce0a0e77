use lodestone_models::RegisterRequest;
use lodestone_util::validation::{validate_email, validate_password, validate_username};

use crate::error::RegistrationError;

/// Field-format checks applied to a registration before an account is
/// created. Account uniqueness and captcha verification happen elsewhere.
pub fn check_registration(req: &RegisterRequest) -> Result<(), RegistrationError> {
    validate_username(&req.username).map_err(RegistrationError::Username)?;
    validate_email(&req.email).map_err(RegistrationError::Email)?;
    validate_password(&req.password).map_err(RegistrationError::Password)?;
    if req.birthdate().is_none() {
        return Err(RegistrationError::Birthdate);
    }
    Ok(())
}
