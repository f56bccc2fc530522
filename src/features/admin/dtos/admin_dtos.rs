use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Review queue sizes shown on the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardDto {
    pub pending_reports: i64,
    pub pending_news: i64,
    pub pending_plumbers: i64,
    pub total_users: i64,
}
