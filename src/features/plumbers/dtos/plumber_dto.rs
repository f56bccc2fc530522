use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::moderation::dtos::ModerationInfoDto;
use crate::features::plumbers::models::Plumber;
use crate::shared::constants::{PLUMBER_SPECIALTIES, PLUMBER_WORKING_AREAS};

/// Plumber directory entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlumberResponseDto {
    pub id: Uuid,
    pub display_name: String,
    pub phone_number: Option<String>,
    pub profile_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub experience: i32,
    pub specialties: Vec<String>,
    pub working_areas: Vec<String>,
    pub certifications: Vec<String>,
    pub is_available: bool,
    pub rating: f64,
    pub completed_jobs: i32,
    pub license_number: Option<String>,
    pub description: Option<String>,
    pub hourly_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<&Plumber> for PlumberResponseDto {
    fn from(p: &Plumber) -> Self {
        Self {
            id: p.id,
            display_name: p.display_name.clone(),
            phone_number: p.phone_number.clone(),
            profile_image_url: p.profile_image_url.clone(),
            bio: p.bio.clone(),
            location: p.location.clone(),
            experience: p.experience,
            specialties: p.specialties.clone(),
            working_areas: p.working_areas.clone(),
            certifications: p.certifications.clone(),
            is_available: p.is_available,
            rating: p.rating,
            completed_jobs: p.completed_jobs,
            license_number: p.license_number.clone(),
            description: p.description.clone(),
            hourly_rate: p.hourly_rate,
            created_at: p.created_at,
        }
    }
}

impl From<Plumber> for PlumberResponseDto {
    fn from(p: Plumber) -> Self {
        Self::from(&p)
    }
}

/// Plumber registration as seen by admins during review
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlumberRegistrationDto {
    #[serde(flatten)]
    pub plumber: PlumberResponseDto,
    pub email: String,
    pub license_image_url: Option<String>,
    #[serde(flatten)]
    pub moderation: ModerationInfoDto,
    pub updated_at: DateTime<Utc>,
}

impl From<Plumber> for PlumberRegistrationDto {
    fn from(p: Plumber) -> Self {
        Self {
            plumber: PlumberResponseDto::from(&p),
            email: p.email,
            license_image_url: p.license_image_url,
            moderation: ModerationInfoDto {
                status: p.status,
                is_approved: p.is_approved,
                approved_at: p.approved_at,
                approved_by: p.approved_by,
                rejected_at: p.rejected_at,
                rejected_by: p.rejected_by,
                rejection_reason: p.rejection_reason,
            },
            updated_at: p.updated_at,
        }
    }
}

/// Choices offered by the plumber sign-up form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlumberOptionsDto {
    pub specialties: Vec<String>,
    pub working_areas: Vec<String>,
}

impl Default for PlumberOptionsDto {
    fn default() -> Self {
        Self {
            specialties: PLUMBER_SPECIALTIES.iter().map(|s| s.to_string()).collect(),
            working_areas: PLUMBER_WORKING_AREAS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_list_every_choice() {
        let options = PlumberOptionsDto::default();
        assert_eq!(options.specialties.len(), PLUMBER_SPECIALTIES.len());
        assert_eq!(options.working_areas.len(), PLUMBER_WORKING_AREAS.len());
        assert!(options.specialties.contains(&"إصلاح التسريبات".to_string()));
    }
}
