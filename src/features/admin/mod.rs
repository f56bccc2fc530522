//! Admin review of reports, news and plumber registrations.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
