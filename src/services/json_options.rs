//! JSON formatting policies applied when writing health reports.

use std::str::FromStr;

use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use serde::Deserialize;
use serde_json::Value;

use crate::{error::DocsError, health::HealthStatus};

/// Naming convention applied to report property names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// `totalDuration`
    #[default]
    CamelCase,
    /// `TotalDuration`
    PascalCase,
    /// `total_duration`
    SnakeCase,
}

impl NamingPolicy {
    /// Convert a property name to this convention.
    pub fn convert(self, name: &str) -> String {
        match self {
            NamingPolicy::CamelCase => name.to_lower_camel_case(),
            NamingPolicy::PascalCase => name.to_pascal_case(),
            NamingPolicy::SnakeCase => name.to_snake_case(),
        }
    }
}

/// Representation of enumerated values such as [`HealthStatus`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumFormat {
    /// `"healthy"`
    #[default]
    CamelCase,
    /// `"Healthy"`
    PascalCase,
    /// `2`
    Number,
}

/// A complete JSON formatting policy.
///
/// Only the written report follows these settings. The `HealthCheckReport` schema published in
/// the OpenAPI documents always describes camelCase properties and camelCase status strings, so
/// any other naming or enum format makes the documented schema differ from the wire output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JsonSerializerOptions {
    /// Convention for property names; keys inside `data` are never renamed.
    pub property_naming: NamingPolicy,
    /// Omit properties whose value is absent instead of writing `null`.
    pub ignore_null_values: bool,
    /// Representation of [`HealthStatus`] values.
    pub enum_format: EnumFormat,
    /// Pretty-print the output.
    pub write_indented: bool,
}

impl Default for JsonSerializerOptions {
    fn default() -> Self {
        Self {
            property_naming: NamingPolicy::CamelCase,
            ignore_null_values: true,
            enum_format: EnumFormat::CamelCase,
            write_indented: false,
        }
    }
}

impl JsonSerializerOptions {
    /// Name a property according to [`Self::property_naming`].
    pub fn property_name(&self, name: &str) -> String {
        self.property_naming.convert(name)
    }

    /// Write a status according to [`Self::enum_format`].
    pub fn status_value(&self, status: HealthStatus) -> Value {
        match self.enum_format {
            EnumFormat::CamelCase => Value::String(status.name().to_lower_camel_case()),
            EnumFormat::PascalCase => Value::String(status.name().to_pascal_case()),
            EnumFormat::Number => Value::from(status.code()),
        }
    }

    /// Serialize `value` compactly or indented.
    pub fn to_vec(&self, value: &Value) -> serde_json::Result<Vec<u8>> {
        if self.write_indented {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        }
    }
}

/// Which of the two host JSON option sets governs report output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonOptionsSource {
    /// Options of the lightweight endpoint JSON layer.
    Http,
    /// Options of the full controller layer.
    #[default]
    Controller,
}

impl FromStr for JsonOptionsSource {
    type Err = DocsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(JsonOptionsSource::Http),
            "controller" => Ok(JsonOptionsSource::Controller),
            _ => Err(DocsError::UnsupportedJsonOptionsSource(value.to_string())),
        }
    }
}

/// The two independently configured JSON option sets of the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JsonOptionsSet {
    /// Lightweight endpoint JSON layer.
    pub http: JsonSerializerOptions,
    /// Full controller layer.
    pub controller: JsonSerializerOptions,
}

impl JsonOptionsSet {
    /// Pick one set verbatim; the two are never merged.
    pub fn select(&self, source: JsonOptionsSource) -> &JsonSerializerOptions {
        match source {
            JsonOptionsSource::Http => &self.http,
            JsonOptionsSource::Controller => &self.controller,
        }
    }
}
