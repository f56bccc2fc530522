use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::moderation::{Moderated, ModerationStatus};

/// News category enum matching database enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type, ToSchema,
)]
#[sqlx(type_name = "news_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    #[default]
    General,
    WaterIssues,
    Maintenance,
    Announcements,
    Community,
    Emergency,
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NewsCategory::General => write!(f, "general"),
            NewsCategory::WaterIssues => write!(f, "water_issues"),
            NewsCategory::Maintenance => write!(f, "maintenance"),
            NewsCategory::Announcements => write!(f, "announcements"),
            NewsCategory::Community => write!(f, "community"),
            NewsCategory::Emergency => write!(f, "emergency"),
        }
    }
}

impl std::str::FromStr for NewsCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(NewsCategory::General),
            "water_issues" => Ok(NewsCategory::WaterIssues),
            "maintenance" => Ok(NewsCategory::Maintenance),
            "announcements" => Ok(NewsCategory::Announcements),
            "community" => Ok(NewsCategory::Community),
            "emergency" => Ok(NewsCategory::Emergency),
            other => Err(format!("Unknown news category '{}'", other)),
        }
    }
}

/// Database model for a news item
#[derive(Debug, Clone, FromRow)]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub status: ModerationStatus,
    pub is_approved: bool,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Moderated for News {
    const KIND: &'static str = "news item";
    const TABLE: &'static str = "news";
    const SELECT: &'static str = r#"
        SELECT t.id, t.title, t.content, t.category, t.tags, t.images, t.author_id,
               t.author_name, t.status, t.is_approved, t.is_published, t.published_at,
               t.approved_at, t.approved_by, t.rejected_at, t.rejected_by,
               t.rejection_reason, t.created_at, t.updated_at
        FROM news t"#;
    const ON_APPROVE: &'static str = ", is_published = TRUE, published_at = NOW()";

    fn status(&self) -> ModerationStatus {
        self.status
    }
}

/// Validated data for a new news item
#[derive(Debug, Clone)]
pub struct CreateNews {
    pub title: String,
    pub content: String,
    pub category: NewsCategory,
    pub tags: Vec<String>,
    pub author_id: Uuid,
    pub author_name: String,
}

/// Splits a comma separated tag list, trimming entries and dropping empty ones
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" مياه, صيانة ,, ,طوارئ"),
            vec!["مياه".to_string(), "صيانة".to_string(), "طوارئ".to_string()]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_category_round_trip() {
        assert_eq!(
            "water_issues".parse::<NewsCategory>().unwrap(),
            NewsCategory::WaterIssues
        );
        assert_eq!(NewsCategory::WaterIssues.to_string(), "water_issues");
        assert_eq!(
            serde_json::to_string(&NewsCategory::Announcements).unwrap(),
            "\"announcements\""
        );
        assert!("sports".parse::<NewsCategory>().is_err());
        assert_eq!(NewsCategory::default(), NewsCategory::General);
    }
}
