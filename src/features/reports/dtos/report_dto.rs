use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::moderation::dtos::ModerationInfoDto;
use crate::features::reports::models::{Report, ReportPriority};
use crate::shared::geo::GeoPoint;

/// Report submission form for OpenAPI documentation.
/// The handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportFormDto {
    #[schema(example = "تسرب مياه")]
    pub title: String,
    pub description: String,
    /// Defaults to the account display name
    pub reporter_name: Option<String>,
    #[schema(example = "01012345678")]
    pub reporter_phone: String,
    pub reporter_email: Option<String>,
    #[schema(example = 30.97)]
    pub lat: f64,
    #[schema(example = 31.1667)]
    pub lng: f64,
    /// Defaults to "<city> - lat, lng"
    pub address: Option<String>,
    pub area: Option<String>,
    pub priority: Option<ReportPriority>,
    /// Up to 5 images, 5MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub images: Vec<String>,
}

/// Public view of a report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub reporter_name: String,
    pub location: GeoPoint,
    pub location_address: Option<String>,
    pub area: Option<String>,
    pub priority: ReportPriority,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Report> for ReportResponseDto {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id,
            title: r.title.clone(),
            description: r.description.clone(),
            reporter_name: r.reporter_name.clone(),
            location: r.location(),
            location_address: r.location_address.clone(),
            area: r.area.clone(),
            priority: r.priority,
            images: r.images.clone(),
            created_at: r.created_at,
        }
    }
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self::from(&r)
    }
}

/// Full report including contact details and review state,
/// shown to the reporter and to admins
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    pub reporter_id: Uuid,
    pub reporter_phone: Option<String>,
    pub reporter_email: Option<String>,
    #[serde(flatten)]
    pub moderation: ModerationInfoDto,
    pub updated_at: DateTime<Utc>,
}

impl ReportDetailResponseDto {
    /// Contact fields are left out unless `include_contact` is set
    pub fn from_report(r: Report, include_contact: bool) -> Self {
        Self {
            report: ReportResponseDto::from(&r),
            reporter_id: r.reporter_id,
            reporter_phone: include_contact.then_some(r.reporter_phone),
            reporter_email: if include_contact { r.reporter_email } else { None },
            moderation: ModerationInfoDto {
                status: r.status,
                is_approved: r.is_approved,
                approved_at: r.approved_at,
                approved_by: r.approved_by,
                rejected_at: r.rejected_at,
                rejected_by: r.rejected_by,
                rejection_reason: r.rejection_reason,
            },
            updated_at: r.updated_at,
        }
    }
}

impl From<Report> for ReportDetailResponseDto {
    fn from(r: Report) -> Self {
        Self::from_report(r, true)
    }
}
