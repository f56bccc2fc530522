//! Plumber directory.
//!
//! Plumbers register through `/api/auth/register/plumber`; the registration
//! stays pending until an admin approves it, after which the plumber is
//! listed publicly.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PlumberService;
