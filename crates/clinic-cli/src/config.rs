//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use clinic_core::DEFAULT_LOOKAHEAD_DAYS;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Timezone the clinic operates in unless configured otherwise.
pub const DEFAULT_TIMEZONE: &str = "Asia/Bangkok";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,
    /// IANA timezone name the opening hours are expressed in.
    pub timezone: String,
    /// How many days ahead "next change" queries scan.
    pub lookahead_days: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("timezone", &self.timezone)
            .field("lookahead_days", &self.lookahead_days)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("clinic.db"),
            timezone: DEFAULT_TIMEZONE.to_string(),
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // CLINIC_DATABASE_PATH, CLINIC_TIMEZONE, CLINIC_LOOKAHEAD_DAYS
        figment = figment.merge(Env::prefixed("CLINIC_"));

        figment.extract()
    }

    /// Parses the configured timezone.
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone '{}': {e}", self.timezone))
    }
}

/// Returns the platform-specific config directory for clinic.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clinic"))
}

/// Returns the platform-specific data directory for clinic.
///
/// On Linux: `~/.local/share/clinic`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("clinic"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_data_path_ends_with_clinic() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "clinic");
    }

    #[test]
    fn test_default_config_uses_data_dir_for_db() {
        let config = Config::default();
        let data_dir = dirs_data_path().unwrap();
        assert_eq!(config.database_path, data_dir.join("clinic.db"));
        assert_eq!(config.lookahead_days, 366);
    }

    #[test]
    fn test_default_timezone_parses() {
        let tz = Config::default().tz().unwrap();
        assert_eq!(tz, chrono_tz::Asia::Bangkok);
    }

    #[test]
    fn test_invalid_timezone_is_reported() {
        let config = Config {
            timezone: "Mars/Olympus".to_string(),
            ..Config::default()
        };
        let err = config.tz().unwrap_err();
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("clinic.toml");
        std::fs::write(
            &path,
            "timezone = \"Europe/Berlin\"\nlookahead_days = 30\ndatabase_path = \"/tmp/x.db\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.timezone, "Europe/Berlin");
        assert_eq!(config.lookahead_days, 30);
        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
    }
}
