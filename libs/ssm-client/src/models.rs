//! Parameter Store data model and lookup outcome

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input of the `GetParameter` operation, sent as query parameters
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetParameterInput {
    /// Name of the parameter to fetch
    pub name: String,
    /// Decrypt `SecureString` values; ignored for other types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_decryption: Option<bool>,
}

impl GetParameterInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            with_decryption: None,
        }
    }

    pub fn with_decryption(mut self, decrypt: bool) -> Self {
        self.with_decryption = Some(decrypt);
        self
    }
}

/// Kind of a stored parameter
///
/// Unknown kinds are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParameterType {
    String,
    StringList,
    SecureString,
    Other(String),
}

impl ParameterType {
    pub fn as_str(&self) -> &str {
        match self {
            ParameterType::String => "String",
            ParameterType::StringList => "StringList",
            ParameterType::SecureString => "SecureString",
            ParameterType::Other(other) => other,
        }
    }
}

impl From<String> for ParameterType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "String" => ParameterType::String,
            "StringList" => ParameterType::StringList,
            "SecureString" => ParameterType::SecureString,
            _ => ParameterType::Other(value),
        }
    }
}

impl From<ParameterType> for String {
    fn from(value: ParameterType) -> Self {
        match value {
            ParameterType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter as returned by the service.
///
/// Every field is optional: the service omits fields depending on the
/// parameter kind and how it was fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "Type")]
    pub parameter_type: Option<ParameterType>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    /// `name:version` or `name:label` used to select the value
    #[serde(default)]
    pub selector: Option<String>,
    /// Raw result for parameters that reference other services
    #[serde(default)]
    pub source_result: Option<String>,
    #[serde(default, with = "epoch_seconds")]
    pub last_modified_date: Option<DateTime<Utc>>,
    #[serde(default, rename = "ARN")]
    pub arn: Option<String>,
    /// e.g. `text` or `aws:ec2:image`
    #[serde(default)]
    pub data_type: Option<String>,
}

impl Parameter {
    /// Values of a `StringList` parameter; a single value for other kinds
    pub fn values(&self) -> Vec<&str> {
        match (&self.parameter_type, &self.value) {
            (Some(ParameterType::StringList), Some(value)) => value.split(',').collect(),
            (_, Some(value)) => vec![value.as_str()],
            (_, None) => Vec::new(),
        }
    }
}

/// Success payload of `GetParameter`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetParameterResult {
    #[serde(default)]
    pub parameter: Option<Parameter>,
}

/// Outcome of a parameter lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterLookup {
    Found(Parameter),
    /// The service answered 404 for this name
    NotFound,
}

impl ParameterLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, ParameterLookup::Found(_))
    }

    pub fn as_found(&self) -> Option<&Parameter> {
        match self {
            ParameterLookup::Found(parameter) => Some(parameter),
            ParameterLookup::NotFound => None,
        }
    }

    pub fn into_found(self) -> Option<Parameter> {
        match self {
            ParameterLookup::Found(parameter) => Some(parameter),
            ParameterLookup::NotFound => None,
        }
    }
}

/// `LastModifiedDate` travels as epoch seconds (with fraction); RFC 3339 text is accepted too
mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Timestamp {
        Seconds(f64),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_f64(time.timestamp_millis() as f64 / 1000.0),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Timestamp>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Timestamp::Seconds(secs)) => {
                DateTime::<Utc>::from_timestamp_millis((secs * 1000.0).round() as i64)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {secs}")))
            }
            Some(Timestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
                .map(|time| Some(time.with_timezone(&Utc)))
                .map_err(de::Error::custom),
        }
    }
}
