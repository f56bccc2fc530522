use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::config::MapConfig;
use crate::features::reports::models::{Report, ReportPriority};
use crate::shared::geo::{CityBounds, GeoPoint};

/// Initial map view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapCenterDto {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

/// Marker colour for one priority
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegendEntryDto {
    pub priority: ReportPriority,
    pub color: String,
}

/// Everything the client needs to draw the city map
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapConfigDto {
    pub city_name: String,
    pub center: MapCenterDto,
    pub bounds: CityBounds,
    /// Tile URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    pub tile_url: String,
    /// Attribution required by the tile provider
    pub attribution: String,
    pub legend: Vec<LegendEntryDto>,
}

impl From<&MapConfig> for MapConfigDto {
    fn from(config: &MapConfig) -> Self {
        Self {
            city_name: config.city_name.clone(),
            center: MapCenterDto {
                lat: config.center.lat,
                lng: config.center.lng,
                zoom: config.zoom,
            },
            bounds: config.bounds,
            tile_url: config.tile_url.clone(),
            attribution: config.attribution.clone(),
            legend: ReportPriority::ALL
                .iter()
                .map(|&priority| LegendEntryDto {
                    priority,
                    color: priority.color().to_string(),
                })
                .collect(),
        }
    }
}

/// One approved report on the map, with its popup content
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MarkerDto {
    pub id: Uuid,
    pub lat: f64,
    pub lng: f64,
    pub priority: ReportPriority,
    pub color: String,
    pub title: String,
    pub description: String,
    pub reporter_name: String,
    pub location_address: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for MarkerDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            lat: r.location_lat,
            lng: r.location_lng,
            priority: r.priority,
            color: r.priority.color().to_string(),
            title: r.title,
            description: r.description,
            reporter_name: r.reporter_name,
            location_address: r.location_address,
            images: r.images,
            created_at: r.created_at,
        }
    }
}

/// Result of checking a picked coordinate
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointCheckDto {
    pub point: GeoPoint,
    /// Address used for a report at this point when none is given
    pub default_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::test_map_config;

    #[test]
    fn test_config_carries_legend_in_priority_order() {
        let dto = MapConfigDto::from(&test_map_config());

        assert_eq!(dto.center.zoom, 13);
        assert!(dto.tile_url.contains("{z}/{x}/{y}"));
        assert!(dto.attribution.contains("OpenStreetMap"));

        let colors: Vec<&str> = dto.legend.iter().map(|e| e.color.as_str()).collect();
        assert_eq!(colors, vec!["#10B981", "#F59E0B", "#EF4444", "#DC2626"]);
    }
}
