use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::auth;
use crate::features::map::{dtos as map_dtos, handlers as map_handlers};
use crate::features::moderation::{dtos as moderation_dtos, ModerationStatus};
use crate::features::news::{dtos as news_dtos, handlers as news_handlers, models as news_models};
use crate::features::plumbers::{dtos as plumbers_dtos, handlers as plumbers_handlers};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::geo::{CityBounds, GeoPoint};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::register_plumber,
        auth::handlers::login,
        auth::handlers::logout,
        auth::handlers::get_me,
        auth::handlers::request_password_reset,
        auth::handlers::confirm_password_reset,
        // Users
        users_handlers::get_profile,
        users_handlers::update_basic_profile,
        users_handlers::update_extended_profile,
        users_handlers::upload_avatar,
        // Reports
        reports_handlers::submit_report,
        reports_handlers::list_approved_reports,
        reports_handlers::list_my_reports,
        reports_handlers::get_report,
        // News
        news_handlers::submit_news,
        news_handlers::list_published_news,
        news_handlers::list_my_news,
        news_handlers::get_news,
        // Plumbers (public)
        plumbers_handlers::list_plumbers,
        plumbers_handlers::get_plumber_options,
        plumbers_handlers::get_plumber,
        // Map (public)
        map_handlers::get_map_config,
        map_handlers::list_markers,
        map_handlers::validate_point,
        // Admin
        admin_handlers::get_dashboard,
        admin_handlers::list_pending_reports,
        admin_handlers::approve_report,
        admin_handlers::reject_report,
        admin_handlers::list_pending_news,
        admin_handlers::approve_news,
        admin_handlers::reject_news,
        admin_handlers::list_pending_plumbers,
        admin_handlers::approve_plumber,
        admin_handlers::reject_plumber,
    ),
    components(
        schemas(
            // Shared
            Meta,
            GeoPoint,
            CityBounds,
            ModerationStatus,
            moderation_dtos::RejectDto,
            moderation_dtos::ModerationInfoDto,
            // Auth
            auth::model::UserRole,
            auth::dtos::RegisterRequestDto,
            auth::dtos::RegisterPlumberRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::PasswordResetRequestDto,
            auth::dtos::PasswordResetConfirmDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::AuthUserDto>,
            // Users
            users_dtos::UserDto,
            users_dtos::UserProfileResponseDto,
            users_dtos::ExtendedProfileDto,
            users_dtos::UpdateBasicProfileDto,
            users_dtos::UpdateExtendedProfileDto,
            users_dtos::AvatarResponseDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            ApiResponse<users_dtos::AvatarResponseDto>,
            // Reports
            reports_models::ReportPriority,
            reports_dtos::SubmitReportFormDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportDetailResponseDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<Vec<reports_dtos::ReportDetailResponseDto>>,
            ApiResponse<reports_dtos::ReportDetailResponseDto>,
            // News
            news_models::NewsCategory,
            news_dtos::SubmitNewsFormDto,
            news_dtos::NewsResponseDto,
            news_dtos::NewsDetailResponseDto,
            ApiResponse<Vec<news_dtos::NewsResponseDto>>,
            ApiResponse<Vec<news_dtos::NewsDetailResponseDto>>,
            ApiResponse<news_dtos::NewsDetailResponseDto>,
            // Plumbers
            plumbers_dtos::PlumberResponseDto,
            plumbers_dtos::PlumberRegistrationDto,
            plumbers_dtos::PlumberOptionsDto,
            ApiResponse<Vec<plumbers_dtos::PlumberResponseDto>>,
            ApiResponse<plumbers_dtos::PlumberResponseDto>,
            ApiResponse<plumbers_dtos::PlumberOptionsDto>,
            // Map
            map_dtos::MapCenterDto,
            map_dtos::LegendEntryDto,
            map_dtos::MapConfigDto,
            map_dtos::MarkerDto,
            map_dtos::PointCheckDto,
            ApiResponse<map_dtos::MapConfigDto>,
            ApiResponse<Vec<map_dtos::MarkerDto>>,
            ApiResponse<map_dtos::PointCheckDto>,
            // Admin
            admin_dtos::DashboardDto,
            ApiResponse<admin_dtos::DashboardDto>,
            ApiResponse<Vec<plumbers_dtos::PlumberRegistrationDto>>,
            ApiResponse<plumbers_dtos::PlumberRegistrationDto>,
        )
    ),
    tags(
        (name = "auth", description = "Sign-up, sign-in, sessions and password reset"),
        (name = "users", description = "User profile management"),
        (name = "reports", description = "Water problem reports"),
        (name = "news", description = "Community news"),
        (name = "plumbers", description = "Approved plumber directory (public)"),
        (name = "map", description = "City map feed (public)"),
        (name = "admin", description = "Review of reports, news and plumber registrations (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Water Guard API",
        version = "0.1.0",
        description = "API documentation for Water Guard",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_feature() {
        let doc = ApiDoc::openapi();

        for path in [
            "/api/auth/register/plumber",
            "/api/users/me/avatar",
            "/api/reports/approved",
            "/api/news/{id}",
            "/api/plumbers/options",
            "/api/map/validate-point",
            "/api/admin/plumbers/{id}/reject",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
