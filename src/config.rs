//! Application-level configuration loading: explorer options, report format and JSON policies.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};
use utoipa::openapi::Info;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::DocsError,
    services::{
        json_options::{JsonOptionsSet, JsonOptionsSource},
        report_formatter::HealthCheckReportFormatOptions,
    },
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "HEALTH_OPENAPI_CONFIG_PATH";
/// Name used when the configuration does not provide one.
const DEFAULT_APPLICATION_NAME: &str = "health-openapi";

/// Title and version of a generated document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct DocumentInfo {
    /// Document title.
    #[validate(length(min = 1))]
    pub title: String,
    /// Document version.
    #[validate(length(min = 1))]
    pub version: String,
}

impl DocumentInfo {
    /// Title and version of a document.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
        }
    }

    /// The OpenAPI `info` object of the document.
    pub fn to_info(&self) -> Info {
        Info::new(self.title.clone(), self.version.clone())
    }
}

/// Controls how health endpoints are split out of the default document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HealthCheckApiExplorerOptions {
    /// Publish health endpoints in a document of their own.
    pub create_dedicated_document: bool,
    /// Ignored unless [`Self::create_dedicated_document`] is set.
    pub dedicated_document_name: String,
    /// Ignored unless [`Self::create_dedicated_document`] is set.
    pub dedicated_document_info: DocumentInfo,
}

impl Default for HealthCheckApiExplorerOptions {
    fn default() -> Self {
        Self {
            create_dedicated_document: false,
            dedicated_document_name: "health-checks".into(),
            dedicated_document_info: DocumentInfo::new("Health Checks", "1.0"),
        }
    }
}

impl Validate for HealthCheckApiExplorerOptions {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !self.create_dedicated_document {
            return Ok(());
        }

        if self.dedicated_document_name.trim().is_empty() {
            let mut err = ValidationError::new("dedicated_document_name");
            err.message = Some(
                "a dedicated document name must be provided when a dedicated document is requested"
                    .into(),
            );
            errors.add("dedicated_document_name", err);
        }
        errors.merge_self(
            "dedicated_document_info",
            self.dedicated_document_info.validate(),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl HealthCheckApiExplorerOptions {
    /// Validate and convert failures to [`DocsError::InvalidConfiguration`].
    pub fn ensure_valid(&self) -> Result<(), DocsError> {
        self.validate().map_err(DocsError::from)
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Name of the application, used for the default document title and UI entry.
    pub application_name: String,
    /// Health endpoint documentation options.
    pub api_explorer: HealthCheckApiExplorerOptions,
    /// Report formatter options.
    pub report_format: HealthCheckReportFormatOptions,
    /// Host JSON option sets.
    pub json: JsonOptionsSet,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.into(),
            api_explorer: HealthCheckApiExplorerOptions::default(),
            report_format: HealthCheckReportFormatOptions::default(),
            json: JsonOptionsSet::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from disk, falling back to defaults when the file is missing or
    /// unreadable. Values that parse but make no sense are reported as errors.
    pub fn load() -> Result<Self, DocsError> {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config = Self::try_from(raw)?;
                    info!(
                        path = %path.display(),
                        dedicated_document = app_config.api_explorer.create_dedicated_document,
                        json_options_source = ?app_config.report_format.json_options_source,
                        "loaded configuration"
                    );
                    Ok(app_config)
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Ok(Self::default())
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Ok(Self::default())
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    application_name: Option<String>,
    api_explorer: HealthCheckApiExplorerOptions,
    report_format: RawReportFormat,
    json: JsonOptionsSet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawReportFormat {
    json_options_source: Option<String>,
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = DocsError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        let json_options_source = value
            .report_format
            .json_options_source
            .as_deref()
            .map(str::parse::<JsonOptionsSource>)
            .transpose()?
            .unwrap_or_default();
        value.api_explorer.ensure_valid()?;

        Ok(Self {
            application_name: value
                .application_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.into()),
            api_explorer: value.api_explorer,
            report_format: HealthCheckReportFormatOptions {
                json_options_source,
            },
            json: value.json,
        })
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
