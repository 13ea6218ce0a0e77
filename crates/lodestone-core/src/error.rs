use lodestone_util::validation::ValidationError;
use thiserror::Error;

/// Why a single profile field was rejected.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("a user with that email already exists")]
    EmailTaken,
    #[error("invalid user status")]
    InvalidStatus,
    #[error("invalid or too long status description")]
    InvalidStatusDescription,
    #[error("bio is too long")]
    BioTooLong,
    #[error("only staff may set a user icon")]
    UserIconRequiresStaff,
    #[error("only staff may set a profile picture override")]
    ProfilePicOverrideRequiresStaff,
    #[error("world not found")]
    WorldNotFound,
    #[error("world is private and not owned by the user")]
    WorldPrivate,
    #[error("storage error: {0}")]
    Storage(#[from] lodestone_db::DbError),
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("invalid username: {0}")]
    Username(ValidationError),
    #[error("invalid email: {0}")]
    Email(ValidationError),
    #[error("invalid password: {0}")]
    Password(ValidationError),
    #[error("invalid birthdate")]
    Birthdate,
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] lodestone_db::DbError),
}
