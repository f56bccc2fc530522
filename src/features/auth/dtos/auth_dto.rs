use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::auth::model::UserRole;
use crate::features::plumbers::models::{is_known_specialty, is_known_working_area};
use crate::features::users::models::User;
use crate::shared::validation::not_blank;

/// Request DTO for user registration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(
        length(max = 255, message = "Display name must not exceed 255 characters"),
        custom(function = "not_blank", message = "Display name is required")
    )]
    pub display_name: String,

    #[validate(regex(
        path = "*crate::shared::validation::PHONE_REGEX",
        message = "Phone number must be a valid Egyptian mobile number"
    ))]
    #[schema(example = "01012345678")]
    pub phone_number: String,
}

/// Request DTO for plumber registration: account fields plus the directory entry
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterPlumberRequestDto {
    #[serde(flatten)]
    #[validate(nested)]
    pub account: RegisterRequestDto,

    /// Years of experience
    #[validate(range(min = 0, max = 60, message = "Experience must be between 0 and 60 years"))]
    pub experience: i32,

    /// At least one entry from `GET /api/plumbers/options`
    #[validate(
        length(min = 1, message = "Choose at least one specialty"),
        custom(function = "known_specialties", message = "Unknown specialty")
    )]
    pub specialties: Vec<String>,

    /// At least one entry from `GET /api/plumbers/options`
    #[validate(
        length(min = 1, message = "Choose at least one working area"),
        custom(function = "known_working_areas", message = "Unknown working area")
    )]
    pub working_areas: Vec<String>,

    #[serde(default)]
    pub certifications: Vec<String>,

    #[validate(length(max = 100, message = "License number must not exceed 100 characters"))]
    pub license_number: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Hourly rate cannot be negative"))]
    pub hourly_rate: Option<f64>,
}

fn known_specialties(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| is_known_specialty(v)) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_specialty"))
    }
}

fn known_working_areas(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| is_known_working_area(v)) {
        Ok(())
    } else {
        Err(ValidationError::new("unknown_working_area"))
    }
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for starting a password reset
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request DTO for completing a password reset
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordResetConfirmDto {
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Session bearer token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUserDto,
}

/// User info included in auth responses and `/api/auth/me`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub phone_number: Option<String>,
    pub role: UserRole,
    pub profile_image_url: Option<String>,
}

impl From<User> for AuthUserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            phone_number: user.phone_number,
            role: user.role,
            profile_image_url: user.profile_image_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn register_json() -> serde_json::Value {
        json!({
            "email": "ahmed@example.com",
            "password": "secret1",
            "display_name": "أحمد",
            "phone_number": "01012345678"
        })
    }

    #[test]
    fn test_register_valid() {
        let dto: RegisterRequestDto = serde_json::from_value(register_json()).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_short_password_and_bad_phone() {
        let mut body = register_json();
        body["password"] = json!("12345");
        body["phone_number"] = json!("0123");
        let dto: RegisterRequestDto = serde_json::from_value(body).unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("phone_number"));
    }

    #[test]
    fn test_register_rejects_blank_name() {
        let mut body = register_json();
        body["display_name"] = json!("   ");
        let dto: RegisterRequestDto = serde_json::from_value(body).unwrap();
        assert!(dto.validate().is_err());
    }

    fn plumber_json() -> serde_json::Value {
        let mut body = register_json();
        body["experience"] = json!(7);
        body["specialties"] = json!(["إصلاح الأنابيب"]);
        body["working_areas"] = json!(["محلة البرج", "الدلتا"]);
        body["hourly_rate"] = json!(150.0);
        body
    }

    #[test]
    fn test_plumber_register_valid() {
        let dto: RegisterPlumberRequestDto = serde_json::from_value(plumber_json()).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.account.email, "ahmed@example.com");
        assert!(dto.certifications.is_empty());
    }

    #[test]
    fn test_plumber_register_requires_known_options() {
        let mut body = plumber_json();
        body["specialties"] = json!([]);
        body["working_areas"] = json!(["القاهرة"]);
        let dto: RegisterPlumberRequestDto = serde_json::from_value(body).unwrap();

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("specialties"));
        assert!(fields.contains_key("working_areas"));
    }

    #[test]
    fn test_plumber_register_validates_account() {
        let mut body = plumber_json();
        body["email"] = json!("not-an-email");
        body["experience"] = json!(-1);
        let dto: RegisterPlumberRequestDto = serde_json::from_value(body).unwrap();
        assert!(dto.validate().is_err());
    }
}
