//! Agent configuration.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveTime, Weekday};
use ytagent_models::{CategoryId, PrivacyStatus};
use ytagent_queue::{JobDefaults, DEFAULT_MAX_QUEUE_SIZE};

use crate::error::{AgentError, AgentResult};
use crate::schedule::{parse_list, parse_time, parse_weekday};

/// Every two hours from 08:00, wrapping past midnight.
const DEFAULT_SHORTS_SCHEDULE: &str =
    "08:00,10:00,12:00,14:00,16:00,18:00,20:00,22:00,00:00,02:00";

/// Agent configuration.
#[derive(Clone)]
pub struct AgentConfig {
    /// Days a regular video is published
    pub weekly_video_days: Vec<Weekday>,
    /// Local time of the regular video upload
    pub weekly_video_time: NaiveTime,
    /// Local times of the daily shorts uploads
    pub shorts_schedule: Vec<NaiveTime>,
    /// Category applied when a job does not name one
    pub default_category: CategoryId,
    pub default_privacy: PrivacyStatus,
    /// Region for trending queries
    pub default_region: String,
    /// Folder seeded into the video queue at startup
    pub video_folder: PathBuf,
    /// Folder seeded into the shorts queue at startup
    pub shorts_folder: PathBuf,
    /// Capacity of each queue
    pub max_queue_size: usize,
    /// How often due triggers are checked
    pub poll_interval: Duration,
    /// How often the trending chart is checked
    pub trending_check_interval: Duration,
    /// Views a trending video needs to be reported
    pub min_views_threshold: u64,
    /// Developer key for read-only analysis
    pub api_key: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            weekly_video_days: vec![Weekday::Mon, Weekday::Thu],
            weekly_video_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap_or_default(),
            shorts_schedule: (0..10)
                .filter_map(|i| NaiveTime::from_hms_opt((8 + 2 * i) % 24, 0, 0))
                .collect(),
            default_category: CategoryId::default(),
            default_privacy: PrivacyStatus::default(),
            default_region: "US".to_string(),
            video_folder: PathBuf::from("./videos/"),
            shorts_folder: PathBuf::from("./shorts/"),
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
            poll_interval: Duration::from_secs(60),
            trending_check_interval: Duration::from_secs(3600),
            min_views_threshold: 100_000,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentConfig")
            .field("weekly_video_days", &self.weekly_video_days)
            .field("weekly_video_time", &self.weekly_video_time)
            .field("shorts_schedule", &self.shorts_schedule)
            .field("default_category", &self.default_category)
            .field("default_privacy", &self.default_privacy)
            .field("default_region", &self.default_region)
            .field("video_folder", &self.video_folder)
            .field("shorts_folder", &self.shorts_folder)
            .field("max_queue_size", &self.max_queue_size)
            .field("poll_interval", &self.poll_interval)
            .field("trending_check_interval", &self.trending_check_interval)
            .field("min_views_threshold", &self.min_views_threshold)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

impl AgentConfig {
    /// Create config from environment variables.
    ///
    /// Malformed schedule values are errors; malformed numbers fall back to
    /// their defaults.
    pub fn from_env() -> AgentResult<Self> {
        let weekly_video_days = parse_list(
            &std::env::var("WEEKLY_VIDEO_DAYS").unwrap_or_else(|_| "monday,thursday".to_string()),
            parse_weekday,
        )?;
        let weekly_video_time =
            parse_time(&std::env::var("WEEKLY_VIDEO_TIME").unwrap_or_else(|_| "15:00".to_string()))?;
        let shorts_schedule = parse_list(
            &std::env::var("SHORTS_SCHEDULE").unwrap_or_else(|_| DEFAULT_SHORTS_SCHEDULE.to_string()),
            parse_time,
        )?;
        let default_privacy = match std::env::var("DEFAULT_PRIVACY") {
            Ok(v) => v.parse().map_err(AgentError::Config)?,
            Err(_) => PrivacyStatus::default(),
        };

        Ok(Self {
            weekly_video_days,
            weekly_video_time,
            shorts_schedule,
            default_category: std::env::var("DEFAULT_CATEGORY")
                .map(CategoryId::new)
                .unwrap_or_default(),
            default_privacy,
            default_region: std::env::var("DEFAULT_REGION").unwrap_or_else(|_| "US".to_string()),
            video_folder: std::env::var("VIDEO_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./videos/")),
            shorts_folder: std::env::var("SHORTS_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./shorts/")),
            max_queue_size: std::env::var("MAX_QUEUE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_QUEUE_SIZE),
            poll_interval: Duration::from_secs(
                std::env::var("POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            trending_check_interval: Duration::from_secs(
                std::env::var("TRENDING_CHECK_INTERVAL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            min_views_threshold: std::env::var("MIN_VIEWS_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100_000),
            api_key: std::env::var("YOUTUBE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
        })
    }

    /// Metadata for jobs seeded from the media folders.
    pub fn job_defaults(&self) -> JobDefaults {
        JobDefaults {
            category_id: self.default_category.clone(),
            privacy_status: self.default_privacy,
            ..JobDefaults::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "WEEKLY_VIDEO_DAYS",
        "WEEKLY_VIDEO_TIME",
        "SHORTS_SCHEDULE",
        "DEFAULT_CATEGORY",
        "DEFAULT_PRIVACY",
        "DEFAULT_REGION",
        "MAX_QUEUE_SIZE",
        "POLL_INTERVAL_SECS",
        "YOUTUBE_API_KEY",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_from_env() {
        clear_env();
        let config = AgentConfig::from_env().unwrap();
        let defaults = AgentConfig::default();

        assert_eq!(config.weekly_video_days, vec![Weekday::Mon, Weekday::Thu]);
        assert_eq!(config.weekly_video_time, defaults.weekly_video_time);
        assert_eq!(config.shorts_schedule, defaults.shorts_schedule);
        assert_eq!(config.shorts_schedule.len(), 10);
        assert_eq!(config.default_category.as_str(), "22");
        assert_eq!(config.default_privacy, PrivacyStatus::Public);
        assert_eq!(config.default_region, "US");
        assert_eq!(config.max_queue_size, 100);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert!(config.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_overrides_from_env() {
        clear_env();
        std::env::set_var("WEEKLY_VIDEO_DAYS", "fri");
        std::env::set_var("WEEKLY_VIDEO_TIME", "18:30");
        std::env::set_var("SHORTS_SCHEDULE", "09:00, 21:00");
        std::env::set_var("DEFAULT_PRIVACY", "unlisted");
        std::env::set_var("MAX_QUEUE_SIZE", "not-a-number");

        let config = AgentConfig::from_env().unwrap();
        clear_env();

        assert_eq!(config.weekly_video_days, vec![Weekday::Fri]);
        assert_eq!(config.weekly_video_time.format("%H:%M").to_string(), "18:30");
        assert_eq!(config.shorts_schedule.len(), 2);
        assert_eq!(config.default_privacy, PrivacyStatus::Unlisted);
        assert_eq!(config.max_queue_size, 100);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = AgentConfig {
            api_key: Some("AIzaSECRET123".to_string()),
            ..AgentConfig::default()
        };
        let debug = format!("{:?}", config);

        assert!(!debug.contains("AIzaSECRET123"));
        assert!(debug.contains("has_api_key: true"));
        assert!(debug.contains("default_region: \"US\""));
    }

    #[test]
    #[serial]
    fn test_invalid_schedule_is_config_error() {
        clear_env();
        std::env::set_var("WEEKLY_VIDEO_TIME", "25:00");
        let result = AgentConfig::from_env();
        clear_env();

        assert!(matches!(result, Err(AgentError::Config(_))));
    }
}
