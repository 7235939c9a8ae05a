use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Filter directive used when `MODELCHECK_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub pretty: bool,
    /// Decimal places for derived monetary values.
    pub money_scale: u32,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            money_scale: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub log: LogSettings,
    pub output: OutputSettings,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let settings: Settings = toml::from_str(content)?;
        if settings.output.money_scale > 28 {
            return Err(CliError::InvalidConfig(format!(
                "output.money_scale must be at most 28, got {}",
                settings.output.money_scale
            )));
        }
        Ok(settings)
    }
}

/// Read settings from `path`, falling back to defaults when it does not exist.
pub fn load_settings(path: &Path) -> Result<Settings, CliError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path)?;
    Settings::from_toml(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::from_toml("").expect("empty settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log.level, "info");
        assert!(settings.output.pretty);
        assert_eq!(settings.output.money_scale, 2);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = Settings::from_toml(
            r#"
            [log]
            format = "json"

            [output]
            money_scale = 4
            "#,
        )
        .expect("partial settings");

        assert_eq!(settings.log.format, LogFormat::Json);
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.output.money_scale, 4);
        assert!(settings.output.pretty);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Settings::from_toml("[output]\ncolour = true\n").unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn oversized_money_scale_is_rejected() {
        let err = Settings::from_toml("[output]\nmoney_scale = 40\n").unwrap_err();
        assert!(matches!(err, CliError::InvalidConfig(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("definitely-not-here/modelcheck.toml");
        let settings = load_settings(path).expect("defaults");
        assert_eq!(settings, Settings::default());
    }
}
