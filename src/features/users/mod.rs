//! Account profile management.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users/me` | Account + extended profile |
//! | PATCH | `/api/users/me` | Update display name and phone number |
//! | PUT | `/api/users/me/profile` | Create or update the extended profile |
//! | POST | `/api/users/me/avatar` | Upload a profile picture |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
