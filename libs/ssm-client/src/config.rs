//! Configuration for the SSM client

use secrecy::Secret;
use serde::Deserialize;
use url::Url;

use crate::SsmError;

/// Credentials used to sign requests
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_key: Secret<String>,
    /// Session token that accompanies temporary credentials
    #[serde(default)]
    pub session_token: Option<Secret<String>>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_key: Secret::new(secret_key.into()),
            session_token: None,
        }
    }

    /// Attach a session token (temporary credentials)
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(Secret::new(session_token.into()));
        self
    }
}

/// Configuration for the SSM client
///
/// Read once when the client is built and never mutated afterwards.
#[derive(Debug, Deserialize)]
pub struct SsmConfig {
    /// Region, e.g. `eu-west-1`
    pub region: String,
    /// Signing credentials
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Endpoint override (e.g. a local emulator); defaults to the regional endpoint
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl SsmConfig {
    pub fn new(region: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            region: region.into(),
            credentials,
            endpoint_url: None,
        }
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Resolve the service root URL.
    ///
    /// Uses `endpoint_url` when set, otherwise `https://ssm.<region>.amazonaws.com/`.
    /// The path is always reset to `/`.
    pub fn endpoint(&self) -> Result<Url, SsmError> {
        let raw = match &self.endpoint_url {
            Some(url) => url.clone(),
            None if self.region.trim().is_empty() => {
                return Err(SsmError::InvalidConfig(
                    "region is required when no endpoint_url is given".to_string(),
                ))
            }
            None => format!("https://ssm.{}.amazonaws.com/", self.region),
        };

        let base = Url::parse(&raw)
            .map_err(|e| SsmError::InvalidConfig(format!("invalid endpoint url '{raw}': {e}")))?;

        if !matches!(base.scheme(), "http" | "https") || base.host_str().is_none() {
            return Err(SsmError::InvalidConfig(format!(
                "endpoint url '{raw}' must be an http(s) url with a host"
            )));
        }

        base.join("/")
            .map_err(|e| SsmError::InvalidConfig(format!("invalid endpoint url '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn credentials() -> Credentials {
        Credentials::new("AKIDEXAMPLE", "secret")
    }

    #[test]
    fn test_default_endpoint_from_region() {
        let config = SsmConfig::new("eu-west-1", credentials());
        let endpoint = config.endpoint().unwrap();

        assert_eq!(endpoint.as_str(), "https://ssm.eu-west-1.amazonaws.com/");
    }

    #[test]
    fn test_endpoint_override_is_reset_to_root() {
        let config = SsmConfig::new("us-east-1", credentials())
            .with_endpoint_url("http://localhost:4566/some/path?x=1");
        let endpoint = config.endpoint().unwrap();

        assert_eq!(endpoint.as_str(), "http://localhost:4566/");
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let config = SsmConfig::new("us-east-1", credentials()).with_endpoint_url("not a url");
        assert!(matches!(config.endpoint(), Err(SsmError::InvalidConfig(_))));

        let config = SsmConfig::new("us-east-1", credentials()).with_endpoint_url("ftp://host/");
        assert!(matches!(config.endpoint(), Err(SsmError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_region_without_override_is_rejected() {
        let config = SsmConfig::new("", credentials());
        assert!(matches!(config.endpoint(), Err(SsmError::InvalidConfig(_))));
    }

    #[test]
    fn test_deserialize_config() {
        let config: SsmConfig = serde_json::from_str(
            r#"{
                "region": "ap-southeast-2",
                "access_key_id": "AKID",
                "secret_key": "shh",
                "session_token": "token"
            }"#,
        )
        .unwrap();

        assert_eq!(config.region, "ap-southeast-2");
        assert_eq!(config.credentials.access_key_id, "AKID");
        assert_eq!(config.credentials.secret_key.expose_secret(), "shh");
        assert_eq!(
            config
                .credentials
                .session_token
                .as_ref()
                .map(|t| t.expose_secret().as_str()),
            Some("token")
        );
        assert!(config.endpoint_url.is_none());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = SsmConfig::new(
            "us-east-1",
            Credentials::new("AKID", "very-secret").with_session_token("session-secret"),
        );
        let debug = format!("{config:?}");

        assert!(debug.contains("AKID"));
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("session-secret"));
    }
}
