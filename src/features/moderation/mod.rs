//! Admin review lifecycle shared by reports, news and plumber registrations.
//!
//! Records start `pending` and move once to `approved` or `rejected`.
//! `status` and `is_approved` are always written together.

pub mod dtos;
pub mod repository;
pub mod state;
pub mod submission;

pub use repository::{Moderated, ModerationRepository};
pub use state::ModerationStatus;
