//! Water problem reports.
//!
//! Any signed-in user submits a report with a location inside the city and
//! up to five images. Reports stay pending until an admin approves them;
//! approved reports are public and appear on the map.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ReportService;
