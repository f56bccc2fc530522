//! City map feed: configuration, approved report markers and the
//! location picker check.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::MapService;
