//! Application configuration.
//!
//! Values are resolved with priority: config.toml > .env / environment > default.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::LeitnerBox;
use crate::paths;
use crate::srs::LeitnerPolicy;

/// Config file read from the working directory
pub const CONFIG_FILE: &str = "config.toml";

// ==================== Scheduling Defaults ====================

/// Review interval in days for boxes 1..=5
pub const DEFAULT_BOX_INTERVALS_DAYS: [i64; LeitnerBox::COUNT] = [1, 2, 4, 7, 14];

/// Cards at or above this box count as mastered
pub const DEFAULT_MASTERY_BOX: u8 = 4;

/// Maximum cards presented in one review session
pub const DEFAULT_SESSION_SIZE: usize = 20;

/// XP awarded per correctly answered card in a completed session
pub const DEFAULT_XP_PER_CORRECT: i64 = 10;

// ==================== Report Limits ====================

/// Minimum Again/Hard ratings before a card is listed as struggled
pub const STRUGGLE_THRESHOLD: usize = 2;

/// Limit for struggled cards display
pub const STRUGGLED_CARDS_LIMIT: usize = 5;

// ==================== config.toml ====================

#[derive(Debug, Default, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    leitner: Option<LeitnerConfig>,
    review: Option<ReviewConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeitnerConfig {
    intervals_days: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
struct ReviewConfig {
    session_size: Option<usize>,
    mastery_box: Option<u8>,
    xp_per_correct: Option<i64>,
}

/// Resolved scheduling and session settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSettings {
    pub intervals_days: [i64; LeitnerBox::COUNT],
    pub session_size: usize,
    pub mastery_box: LeitnerBox,
    pub xp_per_correct: i64,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            intervals_days: DEFAULT_BOX_INTERVALS_DAYS,
            session_size: DEFAULT_SESSION_SIZE,
            mastery_box: LeitnerBox::clamped(DEFAULT_MASTERY_BOX as i64),
            xp_per_correct: DEFAULT_XP_PER_CORRECT,
        }
    }
}

impl ReviewSettings {
    pub fn policy(&self) -> LeitnerPolicy {
        LeitnerPolicy::new(self.intervals_days)
    }
}

fn read_config_file() -> Option<AppConfig> {
    let contents = std::fs::read_to_string(CONFIG_FILE).ok()?;
    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", CONFIG_FILE, e);
            None
        }
    }
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Some(path) = read_config_file()
        .and_then(|c| c.database)
        .and_then(|db| db.path)
    {
        tracing::info!("Using database from {}: {}", CONFIG_FILE, path);
        return PathBuf::from(path);
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

/// Load review settings with priority: config.toml > env > default
pub fn load_review_settings() -> ReviewSettings {
    let _ = dotenvy::dotenv();

    let config = read_config_file().unwrap_or_default();
    let env_session_size = std::env::var("REVIEW_SESSION_SIZE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok());

    resolve_review_settings(config, env_session_size)
}

fn resolve_review_settings(config: AppConfig, env_session_size: Option<usize>) -> ReviewSettings {
    let mut settings = ReviewSettings::default();

    if let Some(intervals) = config.leitner.and_then(|l| l.intervals_days) {
        match validate_intervals(&intervals) {
            Some(valid) => settings.intervals_days = valid,
            None => tracing::warn!(
                "leitner.intervals_days must hold {} positive values, using defaults",
                LeitnerBox::COUNT
            ),
        }
    }

    let review = config.review;
    if let Some(size) = review.as_ref().and_then(|r| r.session_size).or(env_session_size) {
        settings.session_size = size;
    }
    if let Some(b) = review.as_ref().and_then(|r| r.mastery_box) {
        match LeitnerBox::new(b as i64) {
            Some(mastery_box) => settings.mastery_box = mastery_box,
            None => tracing::warn!("review.mastery_box {} outside 1..=5, using default", b),
        }
    }
    if let Some(xp) = review.as_ref().and_then(|r| r.xp_per_correct) {
        settings.xp_per_correct = xp.max(0);
    }

    settings
}

fn validate_intervals(intervals: &[i64]) -> Option<[i64; LeitnerBox::COUNT]> {
    if intervals.iter().any(|d| *d <= 0) {
        return None;
    }
    intervals.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(contents: &str) -> ReviewSettings {
        let config: AppConfig = toml::from_str(contents).unwrap();
        resolve_review_settings(config, None)
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(parse(""), ReviewSettings::default());
    }

    #[test]
    fn test_full_config() {
        let settings = parse(
            r#"
            [database]
            path = "data/school.db"

            [leitner]
            intervals_days = [1, 3, 7, 21, 60]

            [review]
            session_size = 15
            mastery_box = 5
            xp_per_correct = 5
            "#,
        );
        assert_eq!(settings.intervals_days, [1, 3, 7, 21, 60]);
        assert_eq!(settings.session_size, 15);
        assert_eq!(settings.mastery_box, LeitnerBox::LAST);
        assert_eq!(settings.xp_per_correct, 5);
    }

    #[test]
    fn test_wrong_interval_count_falls_back() {
        let settings = parse("[leitner]\nintervals_days = [1, 2, 3]\n");
        assert_eq!(settings.intervals_days, DEFAULT_BOX_INTERVALS_DAYS);
    }

    #[test]
    fn test_non_positive_interval_falls_back() {
        let settings = parse("[leitner]\nintervals_days = [0, 2, 3, 4, 5]\n");
        assert_eq!(settings.intervals_days, DEFAULT_BOX_INTERVALS_DAYS);
    }

    #[test]
    fn test_invalid_mastery_box_falls_back() {
        let settings = parse("[review]\nmastery_box = 9\n");
        assert_eq!(settings.mastery_box.get(), DEFAULT_MASTERY_BOX);
    }

    #[test]
    fn test_env_session_size_below_config() {
        let config: AppConfig = toml::from_str("[review]\nsession_size = 12\n").unwrap();
        assert_eq!(resolve_review_settings(config, Some(30)).session_size, 12);

        let empty = AppConfig::default();
        assert_eq!(resolve_review_settings(empty, Some(30)).session_size, 30);
    }

    #[test]
    fn test_policy_uses_intervals() {
        let settings = parse("[leitner]\nintervals_days = [2, 4, 6, 8, 10]\n");
        assert_eq!(settings.policy().interval_days(LeitnerBox::LAST), 10);
    }
}
