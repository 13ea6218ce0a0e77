pub mod auth;
pub mod error;
pub mod profile;
pub mod register;
pub mod store;
pub mod update;

pub use error::{CoreError, ProfileError, RegistrationError};
pub use profile::ProfileField;
pub use register::check_registration;
pub use store::ProfileStore;
pub use update::{apply_update, update_profile, Rejection, UpdateReport};
