use std::{convert::TryFrom, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WeatherError;

/// Level of detail requested from the API, sent as `extensions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherType {
    /// Live observation.
    #[default]
    Base,
    /// Forecast for the coming days.
    All,
}

impl WeatherType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherType::Base => "base",
            WeatherType::All => "all",
        }
    }
}

impl fmt::Display for WeatherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WeatherType {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "base" => Ok(WeatherType::Base),
            "all" => Ok(WeatherType::All),
            _ => Err(WeatherError::InvalidArgument(format!("Invalid type value(base/all):{value}"))),
        }
    }
}

/// Response encoding requested from the API, sent as `output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ResponseFormat {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            _ => Err(WeatherError::InvalidArgument(format!("Invalid response format:{value}"))),
        }
    }
}

/// A single weather lookup, already validated.
///
/// `kind` and `format` keep the caller's spelling: they go on the wire as
/// given, and only an exact `json` format is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    kind: String,
    format: String,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, kind: WeatherType, format: ResponseFormat) -> Self {
        Self { city: city.into(), kind: kind.as_str().to_owned(), format: format.as_str().to_owned() }
    }

    /// Validate `kind` and `format` case-insensitively. The format is checked first.
    pub fn parse(city: impl Into<String>, kind: &str, format: &str) -> Result<Self, WeatherError> {
        ResponseFormat::try_from(format)?;
        WeatherType::try_from(kind)?;

        Ok(Self { city: city.into(), kind: kind.to_owned(), format: format.to_owned() })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Whether the body should be decoded as JSON. Any other accepted
    /// spelling, `JSON` included, yields the raw body.
    pub fn decodes_json(&self) -> bool {
        self.format == "json"
    }

    /// Query string pairs for the request. Empty and `"0"` values are left
    /// out, so an empty city is omitted rather than sent as `city=`.
    pub fn to_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        [
            ("key", api_key),
            ("city", self.city.as_str()),
            ("output", self.format.as_str()),
            ("extensions", self.kind.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty() && *value != "0")
        .map(|(name, value)| (name, value.to_owned()))
        .collect()
    }
}

/// What a lookup returns: decoded JSON, or the raw body for XML.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Json(Value),
    Raw(String),
}

impl WeatherResult {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            WeatherResult::Json(value) => Some(value),
            WeatherResult::Raw(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            WeatherResult::Raw(body) => Some(body),
            WeatherResult::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            WeatherResult::Json(value) => Some(value),
            WeatherResult::Raw(_) => None,
        }
    }
}
