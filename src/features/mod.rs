pub mod admin;
pub mod auth;
pub mod map;
pub mod moderation;
pub mod news;
pub mod plumbers;
pub mod reports;
pub mod users;
