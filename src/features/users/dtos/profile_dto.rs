use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::model::UserRole;
use crate::features::users::models::{User, UserProfile};
use crate::shared::validation::not_blank;

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            phone_number: u.phone_number,
            role: u.role,
            is_active: u.is_active,
            profile_image_url: u.profile_image_url,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Extended profile
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtendedProfileDto {
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    #[schema(value_type = Object)]
    pub social_links: serde_json::Value,
    #[schema(value_type = Object)]
    pub preferences: serde_json::Value,
    #[schema(value_type = Object)]
    pub notification_settings: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ExtendedProfileDto {
    fn from(p: UserProfile) -> Self {
        Self {
            bio: p.bio,
            location: p.location,
            website: p.website,
            social_links: p.social_links,
            preferences: p.preferences,
            notification_settings: p.notification_settings,
            updated_at: p.updated_at,
        }
    }
}

/// Complete user profile response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponseDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub profile: Option<ExtendedProfileDto>,
}

/// Request DTO for updating the account row
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateBasicProfileDto {
    #[validate(
        length(max = 128, message = "Name must not exceed 128 characters"),
        custom(function = "not_blank", message = "Name must not be empty")
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone number must be an 11 digit Egyptian mobile number"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Request DTO for creating or replacing the extended profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateExtendedProfileDto {
    #[validate(length(max = 1000, message = "Bio must not exceed 1000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    #[validate(length(max = 255, message = "Location must not exceed 255 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[validate(url(message = "Website must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_links: Option<serde_json::Value>,

    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<serde_json::Value>,

    #[schema(value_type = Option<Object>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_settings: Option<serde_json::Value>,
}

/// Response for an avatar upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AvatarResponseDto {
    pub profile_image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_profile_validation() {
        let ok = UpdateBasicProfileDto {
            display_name: Some("أحمد".to_string()),
            phone_number: Some("01112345678".to_string()),
        };
        assert!(ok.validate().is_ok());

        let empty_patch = UpdateBasicProfileDto {
            display_name: None,
            phone_number: None,
        };
        assert!(empty_patch.validate().is_ok());

        let bad_phone = UpdateBasicProfileDto {
            display_name: None,
            phone_number: Some("12345".to_string()),
        };
        assert!(bad_phone.validate().is_err());

        let blank_name = UpdateBasicProfileDto {
            display_name: Some("   ".to_string()),
            phone_number: None,
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_extended_profile_rejects_bad_website() {
        let dto: UpdateExtendedProfileDto =
            serde_json::from_value(serde_json::json!({ "website": "not a url" })).unwrap();
        assert!(dto.validate().is_err());
    }
}
