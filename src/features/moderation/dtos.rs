use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::moderation::state::ModerationStatus;
use crate::shared::validation::not_blank;

/// Request DTO for rejecting a submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RejectDto {
    #[validate(
        length(max = 1000, message = "Reason must not exceed 1000 characters"),
        custom(function = "not_blank", message = "Rejection reason is required")
    )]
    pub reason: String,
}

/// Review metadata shared by every moderated record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModerationInfoDto {
    pub status: ModerationStatus,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_requires_reason() {
        assert!(RejectDto {
            reason: "صور غير واضحة".to_string()
        }
        .validate()
        .is_ok());
        assert!(RejectDto {
            reason: "  ".to_string()
        }
        .validate()
        .is_err());
    }
}
