use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::auth::model::UserRole;

/// Database model for an account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database model for the extended profile (one row per user)
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub social_links: serde_json::Value,
    pub preferences: serde_json::Value,
    pub notification_settings: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating an account
#[derive(Debug)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
}

pub const USER_COLUMNS: &str = "id, email, password_hash, display_name, phone_number, role, \
     is_active, profile_image_url, created_at, updated_at";

pub const PROFILE_COLUMNS: &str = "bio, location, website, social_links, preferences, \
     notification_settings, updated_at";
