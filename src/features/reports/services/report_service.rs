use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::core::config::MapConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::moderation::submission::finish_submission;
use crate::features::moderation::{Moderated, ModerationRepository};
use crate::features::reports::models::{CreateReport, Report, ReportPriority};
use crate::modules::storage::MinIOClient;
use crate::shared::constants::{MAX_SHORT_TEXT_LENGTH, REPORTS_FOLDER};
use crate::shared::geo::{default_address, GeoPoint};
use crate::shared::types::PaginationQuery;
use crate::shared::uploads::{validate_images, ImageUpload, SubmissionForm};
use crate::shared::validation::{
    normalize_phone, optional_text, optional_text_max, required_text, required_text_max,
    PHONE_REGEX,
};

const APPROVED_FILTER: &str = "t.status = 'approved' AND t.is_approved";

/// Service for report operations
pub struct ReportService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
    records: ModerationRepository<Report>,
    map: MapConfig,
}

impl ReportService {
    pub fn new(pool: PgPool, storage: Arc<MinIOClient>, map: MapConfig) -> Self {
        Self {
            records: ModerationRepository::new(pool.clone()),
            pool,
            storage,
            map,
        }
    }

    /// Turn a multipart submission into validated report data.
    /// Nothing here touches the database or storage.
    pub fn parse_submission(
        &self,
        reporter: &AuthenticatedUser,
        form: &mut SubmissionForm,
    ) -> Result<CreateReport> {
        let title = required_text_max("title", form.take("title"), MAX_SHORT_TEXT_LENGTH)?;
        let description = required_text("description", form.take("description"))?;

        let reporter_name = optional_text_max(
            "reporter_name",
            form.take("reporter_name"),
            MAX_SHORT_TEXT_LENGTH,
        )?
            .unwrap_or_else(|| reporter.display_name.clone());

        let reporter_phone = normalize_phone(&required_text(
            "reporter_phone",
            form.take("reporter_phone"),
        )?);
        if !PHONE_REGEX.is_match(&reporter_phone) {
            return Err(AppError::Validation(
                "Phone number must be an 11 digit Egyptian mobile number".to_string(),
            ));
        }

        let reporter_email = optional_text_max(
            "reporter_email",
            form.take("reporter_email"),
            MAX_SHORT_TEXT_LENGTH,
        )?;
        if let Some(email) = &reporter_email {
            if !email.validate_email() {
                return Err(AppError::Validation("Invalid email format".to_string()));
            }
        }

        let location = GeoPoint::new(
            parse_coordinate("lat", form.take("lat"))?,
            parse_coordinate("lng", form.take("lng"))?,
        );
        self.map.ensure_in_city(location)?;

        let location_address = optional_text(form.take("address"))
            .unwrap_or_else(|| default_address(&self.map.city_name, location));

        let priority = match optional_text(form.take("priority")) {
            Some(raw) => raw.parse::<ReportPriority>().map_err(AppError::Validation)?,
            None => ReportPriority::default(),
        };

        let area = optional_text_max("area", form.take("area"), MAX_SHORT_TEXT_LENGTH)?;

        validate_images(&form.images)?;

        Ok(CreateReport {
            title,
            description,
            reporter_id: reporter.id,
            reporter_name,
            reporter_phone,
            reporter_email,
            location,
            location_address,
            area,
            priority,
        })
    }

    /// Store a new pending report with its images as one unit
    pub async fn submit(&self, data: CreateReport, images: Vec<ImageUpload>) -> Result<Report> {
        validate_images(&images)?;
        self.map.ensure_in_city(data.location)?;

        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin report transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO reports (
                title, description, reporter_id, reporter_name, reporter_phone, reporter_email,
                location_lat, location_lng, location_address, area, priority,
                status, is_approved
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'pending', FALSE)
            RETURNING id
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.reporter_id)
        .bind(&data.reporter_name)
        .bind(&data.reporter_phone)
        .bind(&data.reporter_email)
        .bind(data.location.lat)
        .bind(data.location.lng)
        .bind(&data.location_address)
        .bind(&data.area)
        .bind(data.priority)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create report: {:?}", e);
            AppError::Database(e)
        })?;

        let image_count = images.len();
        finish_submission(tx, &self.storage, Report::TABLE, REPORTS_FOLDER, id, images).await?;

        tracing::info!(
            "Created report {} with {} image(s) for user {}",
            id,
            image_count,
            data.reporter_id
        );

        self.records
            .find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("report {} not found", id)))
    }

    /// Approved reports, newest first
    pub async fn list_approved(&self, page: &PaginationQuery) -> Result<(Vec<Report>, i64)> {
        let sql = format!(
            "{} WHERE {} ORDER BY t.created_at DESC LIMIT $1 OFFSET $2",
            Report::SELECT,
            APPROVED_FILTER
        );

        let reports = sqlx::query_as::<_, Report>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list approved reports: {:?}", e);
                AppError::Database(e)
            })?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reports WHERE status = 'approved' AND is_approved",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count approved reports: {:?}", e);
            AppError::Database(e)
        })?;

        Ok((reports, total))
    }

    /// Approved reports located inside the configured city bounds
    pub async fn list_approved_in_bounds(&self) -> Result<Vec<Report>> {
        let sql = format!(
            "{} WHERE {} \
             AND t.location_lat BETWEEN $1 AND $2 \
             AND t.location_lng BETWEEN $3 AND $4 \
             ORDER BY t.created_at DESC",
            Report::SELECT,
            APPROVED_FILTER
        );

        let bounds = &self.map.bounds;
        sqlx::query_as::<_, Report>(&sql)
            .bind(bounds.south_west.lat)
            .bind(bounds.north_east.lat)
            .bind(bounds.south_west.lng)
            .bind(bounds.north_east.lng)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list report markers: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Reports submitted by one user in any state, newest first
    pub async fn list_by_reporter(&self, reporter_id: Uuid) -> Result<Vec<Report>> {
        let sql = format!(
            "{} WHERE t.reporter_id = $1 ORDER BY t.created_at DESC",
            Report::SELECT
        );

        sqlx::query_as::<_, Report>(&sql)
            .bind(reporter_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports of user {}: {:?}", reporter_id, e);
                AppError::Database(e)
            })
    }

    /// A report visible to the viewer: approved, own, or any for admins.
    /// Hidden reports are reported as missing.
    pub async fn get_visible(&self, id: Uuid, viewer: &AuthenticatedUser) -> Result<Report> {
        self.records
            .find(id)
            .await?
            .filter(|r| r.is_approved || viewer.can_view_owned_by(r.reporter_id))
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }
}

fn parse_coordinate(field: &str, value: Option<String>) -> Result<f64> {
    let raw = required_text(field, value)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_map_config;
    use crate::features::auth::model::UserRole;
    use crate::modules::storage::test_client;
    use crate::shared::uploads::fake_image;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    fn service() -> ReportService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        ReportService::new(pool, Arc::new(test_client()), test_map_config())
    }

    fn reporter() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            email: SafeEmail().fake(),
            display_name: "محمد علي".to_string(),
            role: UserRole::User,
        }
    }

    fn leak_form(lat: &str, lng: &str, images: Vec<ImageUpload>) -> SubmissionForm {
        SubmissionForm::with_fields(
            &[
                ("title", "تسرب مياه"),
                ("description", "تسرب في الماسورة الرئيسية"),
                ("reporter_phone", "01012345678"),
                ("lat", lat),
                ("lng", lng),
                ("priority", "high"),
            ],
            images,
        )
    }

    #[tokio::test]
    async fn test_parse_valid_submission() {
        let service = service();
        let user = reporter();
        let mut form = leak_form("30.97", "31.1667", vec![fake_image("a.png", 100)]);

        let data = service.parse_submission(&user, &mut form).unwrap();

        assert_eq!(data.title, "تسرب مياه");
        assert_eq!(data.reporter_name, "محمد علي");
        assert_eq!(data.reporter_phone, "01012345678");
        assert_eq!(data.priority, ReportPriority::High);
        assert_eq!(data.location_address, "المحلة الكبرى - 30.9700, 31.1667");
        assert_eq!(data.reporter_id, user.id);
    }

    #[tokio::test]
    async fn test_outside_point_rejected() {
        let service = service();
        let mut form = leak_form("30.0444", "31.2357", vec![]);

        assert!(matches!(
            service.parse_submission(&reporter(), &mut form),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_phone_rejected() {
        let service = service();
        let mut form = SubmissionForm::with_fields(
            &[
                ("title", "تسرب"),
                ("description", "x"),
                ("reporter_phone", "0123"),
                ("lat", "30.97"),
                ("lng", "31.16"),
            ],
            vec![],
        );

        assert!(service.parse_submission(&reporter(), &mut form).is_err());
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let service = service();
        let mut form = SubmissionForm::with_fields(
            &[
                ("title", "   "),
                ("description", "x"),
                ("reporter_phone", "01012345678"),
                ("lat", "30.97"),
                ("lng", "31.16"),
            ],
            vec![],
        );

        assert!(service.parse_submission(&reporter(), &mut form).is_err());
    }

    #[tokio::test]
    async fn test_overlong_fields_rejected() {
        let service = service();
        let long_title = "تسرب ".repeat(60);
        let long_area = "x".repeat(MAX_SHORT_TEXT_LENGTH + 1);

        let mut form = SubmissionForm::with_fields(
            &[
                ("title", long_title.as_str()),
                ("description", "x"),
                ("reporter_phone", "01012345678"),
                ("lat", "30.97"),
                ("lng", "31.16"),
            ],
            vec![],
        );
        assert!(matches!(
            service.parse_submission(&reporter(), &mut form),
            Err(AppError::Validation(_))
        ));

        let mut form = SubmissionForm::with_fields(
            &[
                ("title", "تسرب مياه"),
                ("description", "x"),
                ("reporter_phone", "01012345678"),
                ("lat", "30.97"),
                ("lng", "31.16"),
                ("area", long_area.as_str()),
            ],
            vec![],
        );
        assert!(matches!(
            service.parse_submission(&reporter(), &mut form),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_six_images_before_database() {
        let service = service();
        let mut form = leak_form("30.97", "31.16", vec![]);
        let data = service.parse_submission(&reporter(), &mut form).unwrap();
        let images: Vec<_> = (0..6).map(|i| fake_image(&format!("{}.png", i), 10)).collect();

        // The lazy pool points nowhere, so reaching the database would fail differently
        assert!(matches!(
            service.submit(data, images).await,
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("lat", Some(" 30.97 ".to_string())).unwrap(), 30.97);
        assert!(parse_coordinate("lat", Some("north".to_string())).is_err());
        assert!(parse_coordinate("lat", Some("NaN".to_string())).is_err());
        assert!(parse_coordinate("lat", None).is_err());
    }
}
