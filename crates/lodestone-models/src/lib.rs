pub mod request;
pub mod user;
pub mod world;

pub use request::{RegisterRequest, UpdateUserRequest};
pub use user::{ParseStatusError, User, UserFlags, UserStatus};
pub use world::{ParseReleaseStatusError, ReleaseStatus, World};
