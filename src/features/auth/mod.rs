//! Accounts, sessions and access control.
//!
//! Sessions are server-side rows referenced by an HS256 bearer token; every
//! request re-reads the session and its user, so revocation, deactivation
//! and role changes take effect immediately.

pub mod access;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod password;
pub mod routes;
pub mod services;

pub use services::{AuthService, SessionService};
