use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::moderation::{Moderated, ModerationStatus};
use crate::shared::constants::{PLUMBER_SPECIALTIES, PLUMBER_WORKING_AREAS};

/// A plumber registration joined with the account and profile it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct Plumber {
    pub id: Uuid,
    pub experience: i32,
    pub specialties: Vec<String>,
    pub working_areas: Vec<String>,
    pub certifications: Vec<String>,
    pub is_available: bool,
    pub rating: f64,
    pub completed_jobs: i32,
    pub license_number: Option<String>,
    pub license_image_url: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
    pub status: ModerationStatus,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // users
    pub display_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
    // user_profiles
    pub bio: Option<String>,
    pub location: Option<String>,
}

impl Moderated for Plumber {
    const KIND: &'static str = "plumber registration";
    const TABLE: &'static str = "plumbers";
    const SELECT: &'static str = r#"
        SELECT t.id, t.experience, t.specialties, t.working_areas, t.certifications,
               t.is_available, t.rating, t.completed_jobs, t.license_number,
               t.license_image_url, t.description, t.hourly_rate, t.status, t.is_approved,
               t.approved_at, t.approved_by, t.rejected_at, t.rejected_by,
               t.rejection_reason, t.created_at, t.updated_at,
               u.display_name, u.email, u.phone_number, u.profile_image_url,
               up.bio, up.location
        FROM plumbers t
        JOIN users u ON u.id = t.id
        LEFT JOIN user_profiles up ON up.id = t.id"#;

    fn status(&self) -> ModerationStatus {
        self.status
    }
}

/// Validated plumber registration details, stored next to a new plumber account
#[derive(Debug, Clone)]
pub struct CreatePlumber {
    pub experience: i32,
    pub specialties: Vec<String>,
    pub working_areas: Vec<String>,
    pub certifications: Vec<String>,
    pub license_number: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
}

pub fn is_known_specialty(value: &str) -> bool {
    PLUMBER_SPECIALTIES.contains(&value)
}

pub fn is_known_working_area(value: &str) -> bool {
    PLUMBER_WORKING_AREAS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_options() {
        assert!(is_known_specialty("تسليك المجاري"));
        assert!(!is_known_specialty("نجارة"));
        assert!(is_known_working_area("محلة البرج"));
        assert!(!is_known_working_area("القاهرة"));
    }
}
