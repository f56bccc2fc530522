//! Community news.
//!
//! Users (but not plumbers) publish news with up to five images. A news item
//! is published when an admin approves it; published news is readable
//! without an account.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::NewsService;
