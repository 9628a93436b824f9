use std::borrow::Cow;
use std::path::PathBuf;

use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    CALENDAR_BEGIN, CALENDAR_HEADER, CALENDAR_VERSION, LINE_ENDING, PRODUCT_ID,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Calendar snapshot that is normalized and written out.
    pub origin: PathBuf,
    /// Optional second snapshot compared against the origin.
    pub destination: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Where the normalized calendar goes; stdout when unset.
    pub path: Option<PathBuf>,
    pub product_id: String,
    pub report: ReportFormat,
}

impl OutputConfig {
    /// ## Summary
    /// Returns the document header carrying the configured `PRODID`.
    #[must_use]
    pub fn header(&self) -> Cow<'static, str> {
        if self.product_id == PRODUCT_ID {
            Cow::Borrowed(CALENDAR_HEADER)
        } else {
            Cow::Owned(format!(
                "{CALENDAR_BEGIN}PRODID:{}{LINE_ENDING}{CALENDAR_VERSION}",
                self.product_id
            ))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from defaults, `GWICS_*` environment variables and an
    /// optional `gwics.toml`. Environment variables take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder()?
            .add_source(
                config::Environment::with_prefix("GWICS")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Rejects settings that would make the output overwrite an input.
    ///
    /// ## Errors
    /// Returns `ConfigError` when `output.path` names the origin or destination file.
    pub fn validate(&self) -> CoreResult<()> {
        let Some(output) = &self.output.path else {
            return Ok(());
        };
        if *output == self.input.origin || self.input.destination.as_ref() == Some(output) {
            return Err(CoreError::ConfigError(format!(
                "output path {} would overwrite an input",
                output.display()
            )));
        }
        Ok(())
    }

    /// ## Summary
    /// Builder pre-populated with defaults and the optional TOML file, without the
    /// environment source.
    ///
    /// ## Errors
    /// Returns an error if a default value cannot be set.
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            .set_default("output.product_id", PRODUCT_ID)?
            .set_default("output.report", "text")?
            .set_default("logging.level", "info")?
            .add_source(config::File::with_name("gwics.toml").required(false)))
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    settings.validate()?;
    tracing::debug!(origin = %settings.input.origin.display(), "Settings loaded");

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Settings::builder()
            .unwrap()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test_log::test]
    fn defaults_fill_output_and_logging() {
        let settings = from_toml(
            r#"
            [input]
            origin = "calendar.ics"
            "#,
        );

        assert_eq!(settings.input.origin, PathBuf::from("calendar.ics"));
        assert!(settings.input.destination.is_none());
        assert!(settings.output.path.is_none());
        assert_eq!(settings.output.product_id, PRODUCT_ID);
        assert_eq!(settings.output.header(), CALENDAR_HEADER);
        assert_eq!(settings.output.report, ReportFormat::Text);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let settings = from_toml(
            r#"
            [input]
            origin = "a.ics"
            destination = "b.ics"

            [output]
            path = "out/merged.ics"
            product_id = "-//Example//Test//EN"
            report = "json"

            [logging]
            level = "trace"
            "#,
        );

        assert_eq!(settings.input.destination, Some(PathBuf::from("b.ics")));
        assert_eq!(settings.output.path, Some(PathBuf::from("out/merged.ics")));
        assert_eq!(settings.output.report, ReportFormat::Json);
        assert_eq!(
            settings.output.header(),
            "BEGIN:VCALENDAR\r\nPRODID:-//Example//Test//EN\r\nVERSION:2.0\r\n"
        );
        assert_eq!(settings.logging.level, "trace");
    }

    #[test]
    fn output_must_not_overwrite_inputs() {
        let mut settings = from_toml(
            r#"
            [input]
            origin = "a.ics"
            destination = "b.ics"
            "#,
        );
        assert!(settings.validate().is_ok());

        settings.output.path = Some(PathBuf::from("b.ics"));
        assert!(matches!(settings.validate(), Err(CoreError::ConfigError(_))));

        settings.output.path = Some(PathBuf::from("a.ics"));
        assert!(settings.validate().is_err());
    }

    #[test]
    fn missing_origin_is_an_error() {
        let result = Settings::builder()
            .unwrap()
            .add_source(config::File::from_str("", config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize::<Settings>();

        assert!(result.is_err());
    }
}
