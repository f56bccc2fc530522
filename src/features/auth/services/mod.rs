mod auth_service;
mod session_service;
mod token_service;

pub use auth_service::AuthService;
pub use session_service::{IssuedSession, SessionService};
pub use token_service::{generate_reset_token, hash_reset_token, TokenService};
