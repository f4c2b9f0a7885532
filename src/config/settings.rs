//! User settings for TallyCLI
//!
//! Manages preferences such as the currency symbol, the first day of the week
//! used by weekly summaries, and the active user profile.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;
use crate::models::{AccountType, UserId};

/// User settings for TallyCLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    /// Account type used when a transaction does not specify one
    #[serde(default)]
    pub default_account_type: AccountType,

    /// The profile commands act on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<UserId>,

    /// Number of recent searches to remember
    #[serde(default = "default_recent_search_limit")]
    pub recent_search_limit: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_first_day_of_week() -> u8 {
    0 // Sunday
}

fn default_recent_search_limit() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            first_day_of_week: default_first_day_of_week(),
            default_account_type: AccountType::default(),
            current_user: None,
            recent_search_limit: default_recent_search_limit(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TallyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The active user, or [`TallyError::NotSignedIn`]
    pub fn require_user(&self) -> Result<UserId, TallyError> {
        self.current_user.ok_or(TallyError::NotSignedIn)
    }

    /// First day of the week as a chrono weekday
    pub fn week_start(&self) -> chrono::Weekday {
        if self.first_day_of_week == 1 {
            chrono::Weekday::Mon
        } else {
            chrono::Weekday::Sun
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.first_day_of_week, 0);
        assert_eq!(settings.default_account_type, AccountType::Personal);
        assert_eq!(settings.recent_search_limit, 5);
        assert!(settings.current_user.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        let user = UserId::new();
        let mut settings = Settings::default();
        settings.current_user = Some(user);
        settings.default_account_type = AccountType::Business;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.current_user, Some(user));
        assert_eq!(loaded.default_account_type, AccountType::Business);
    }

    #[test]
    fn test_require_user() {
        let settings = Settings::default();
        assert!(matches!(
            settings.require_user(),
            Err(TallyError::NotSignedIn)
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.week_start(), chrono::Weekday::Sun);
    }
}
