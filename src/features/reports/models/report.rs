use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::moderation::{Moderated, ModerationStatus};
use crate::shared::geo::GeoPoint;

/// Report priority enum matching database enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "report_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl ReportPriority {
    pub const ALL: [ReportPriority; 4] = [
        ReportPriority::Low,
        ReportPriority::Medium,
        ReportPriority::High,
        ReportPriority::Urgent,
    ];

    /// Marker colour on the map
    pub fn color(self) -> &'static str {
        match self {
            ReportPriority::Low => "#10B981",
            ReportPriority::Medium => "#F59E0B",
            ReportPriority::High => "#EF4444",
            ReportPriority::Urgent => "#DC2626",
        }
    }
}

impl std::fmt::Display for ReportPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportPriority::Low => write!(f, "low"),
            ReportPriority::Medium => write!(f, "medium"),
            ReportPriority::High => write!(f, "high"),
            ReportPriority::Urgent => write!(f, "urgent"),
        }
    }
}

impl std::str::FromStr for ReportPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ReportPriority::Low),
            "medium" => Ok(ReportPriority::Medium),
            "high" => Ok(ReportPriority::High),
            "urgent" => Ok(ReportPriority::Urgent),
            other => Err(format!("Unknown priority '{}'", other)),
        }
    }
}

/// Database model for report
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub reporter_id: Uuid,
    pub reporter_name: String,
    pub reporter_phone: String,
    pub reporter_email: Option<String>,
    pub location_lat: f64,
    pub location_lng: f64,
    pub location_address: Option<String>,
    pub area: Option<String>,
    pub priority: ReportPriority,
    pub status: ModerationStatus,
    pub is_approved: bool,
    pub images: Vec<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.location_lat, self.location_lng)
    }
}

impl Moderated for Report {
    const KIND: &'static str = "report";
    const TABLE: &'static str = "reports";
    const SELECT: &'static str = r#"
        SELECT t.id, t.title, t.description, t.reporter_id, t.reporter_name, t.reporter_phone,
               t.reporter_email, t.location_lat, t.location_lng, t.location_address, t.area,
               t.priority, t.status, t.is_approved, t.images, t.approved_at, t.approved_by,
               t.rejected_at, t.rejected_by, t.rejection_reason, t.created_at, t.updated_at
        FROM reports t"#;

    fn status(&self) -> ModerationStatus {
        self.status
    }
}

/// Validated data for a new report
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub title: String,
    pub description: String,
    pub reporter_id: Uuid,
    pub reporter_name: String,
    pub reporter_phone: String,
    pub reporter_email: Option<String>,
    pub location: GeoPoint,
    pub location_address: String,
    pub area: Option<String>,
    pub priority: ReportPriority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_colors() {
        assert_eq!(ReportPriority::Low.color(), "#10B981");
        assert_eq!(ReportPriority::Medium.color(), "#F59E0B");
        assert_eq!(ReportPriority::High.color(), "#EF4444");
        assert_eq!(ReportPriority::Urgent.color(), "#DC2626");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("HIGH".parse::<ReportPriority>().unwrap(), ReportPriority::High);
        assert_eq!(" urgent ".parse::<ReportPriority>().unwrap(), ReportPriority::Urgent);
        assert!("critical".parse::<ReportPriority>().is_err());
        assert_eq!(ReportPriority::default(), ReportPriority::Medium);
    }
}
