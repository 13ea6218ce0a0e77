use thiserror::Error;

pub const USERNAME_MIN_CHARS: usize = 2;
pub const USERNAME_MAX_CHARS: usize = 32;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Lengths are reported in characters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("must be at least {min} characters (got {got})")]
    TooShort { min: usize, got: usize },
    #[error("must be at most {max} characters (got {got})")]
    TooLong { max: usize, got: usize },
    #[error("contains characters that are not allowed")]
    InvalidCharacters,
    #[error("is not a valid address")]
    InvalidFormat,
}

/// Length is counted in characters, not bytes.
pub fn validate_max_chars(value: &str, max: usize) -> Result<(), ValidationError> {
    let got = value.chars().count();
    if got > max {
        return Err(ValidationError::TooLong { max, got });
    }
    Ok(())
}

fn validate_min_chars(value: &str, min: usize) -> Result<(), ValidationError> {
    let got = value.chars().count();
    if got < min {
        return Err(ValidationError::TooShort { min, got });
    }
    Ok(())
}

/// Account names: letters, digits and underscores.
pub fn validate_username(name: &str) -> Result<(), ValidationError> {
    validate_min_chars(name, USERNAME_MIN_CHARS)?;
    validate_max_chars(name, USERNAME_MAX_CHARS)?;
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(())
}

/// Shape check only: `local@domain.tld`, no whitespace. Deliverability is
/// settled by the verification mail.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    validate_max_chars(email, EMAIL_MAX_CHARS)?;
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat);
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return Err(ValidationError::InvalidFormat);
    };
    let domain_ok = domain.contains('.') && domain.split('.').all(|label| !label.is_empty());
    if local.is_empty() || local.contains('@') || !domain_ok {
        return Err(ValidationError::InvalidFormat);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_min_chars(password, PASSWORD_MIN_CHARS)
}
