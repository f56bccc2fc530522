use std::sync::Arc;

use crate::core::config::MapConfig;
use crate::core::error::Result;
use crate::features::map::dtos::{MapConfigDto, MarkerDto, PointCheckDto};
use crate::features::reports::ReportService;
use crate::shared::geo::{default_address, GeoPoint};

/// Service behind the city map
pub struct MapService {
    config: MapConfig,
    reports: Arc<ReportService>,
}

impl MapService {
    pub fn new(config: MapConfig, reports: Arc<ReportService>) -> Self {
        Self { config, reports }
    }

    pub fn config(&self) -> MapConfigDto {
        MapConfigDto::from(&self.config)
    }

    /// One marker per approved report inside the city
    pub async fn markers(&self) -> Result<Vec<MarkerDto>> {
        let reports = self.reports.list_approved_in_bounds().await?;
        tracing::debug!("Serving {} map markers", reports.len());

        Ok(reports.into_iter().map(MarkerDto::from).collect())
    }

    /// Accepts a point inside the city bounds (edges included)
    pub fn validate_point(&self, point: GeoPoint) -> Result<PointCheckDto> {
        self.config.ensure_in_city(point)?;

        Ok(PointCheckDto {
            point,
            default_address: default_address(&self.config.city_name, point),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_map_config;
    use crate::core::error::AppError;
    use crate::modules::storage::test_client;

    fn service() -> MapService {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let reports = ReportService::new(pool, Arc::new(test_client()), test_map_config());
        MapService::new(test_map_config(), Arc::new(reports))
    }

    #[tokio::test]
    async fn test_point_inside_city() {
        let check = service()
            .validate_point(GeoPoint::new(30.9706, 31.1667))
            .unwrap();
        assert_eq!(check.default_address, "المحلة الكبرى - 30.9706, 31.1667");
    }

    #[tokio::test]
    async fn test_point_outside_city() {
        let result = service().validate_point(GeoPoint::new(31.2001, 29.9187));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_coordinate_rejected() {
        let result = service().validate_point(GeoPoint::new(f64::NAN, 31.15));
        assert!(result.is_err());
    }
}
