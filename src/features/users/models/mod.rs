mod user;

pub use user::{CreateUser, User, UserProfile, PROFILE_COLUMNS, USER_COLUMNS};
