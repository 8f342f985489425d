//! Parameter Store client and its builder

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use reqwest::{Client, Request, Response};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::models::{GetParameterInput, ParameterLookup};
use crate::request::{build_request, GET_PARAMETER_ACTION, SERVICE_ID};
use crate::response::interpret_get_parameter;
use crate::signer::{body_bytes, sha256_hex, X_AMZ_CONTENT_SHA256};
use crate::signers::SigV4Signer;
use crate::{RequestSigner, SsmConfig, SsmError};

/// Client for the Parameter Store API
///
/// Holds only values derived once from [`SsmConfig`], so a single instance can
/// serve any number of concurrent calls.
pub struct SsmClient {
    http: Client,
    signer: Arc<dyn RequestSigner>,
    endpoint: Url,
    region: String,
}

impl fmt::Debug for SsmClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SsmClient")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint.as_str())
            .field("signer", &self.signer.name())
            .finish()
    }
}

impl SsmClient {
    /// Create a client that signs with SigV4 using the configured credentials
    pub fn new(config: SsmConfig) -> Result<Self, SsmError> {
        Self::builder(config).build()
    }

    pub fn builder(config: SsmConfig) -> SsmClientBuilder {
        SsmClientBuilder {
            config,
            signer: None,
            http: None,
        }
    }

    /// Service root URL, resolved at construction
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Fetch a parameter by name.
    ///
    /// Returns [`ParameterLookup::NotFound`] when the service answers 404; every
    /// other non-200 status is an [`SsmError::Service`].
    pub async fn get_parameter(
        &self,
        input: &GetParameterInput,
    ) -> Result<ParameterLookup, SsmError> {
        debug!(
            name = %input.name,
            with_decryption = ?input.with_decryption,
            "getting parameter"
        );

        let response = self.send(GET_PARAMETER_ACTION, input, None).await?;
        let lookup = interpret_get_parameter(response).await?;

        debug!(name = %input.name, found = lookup.is_found(), "parameter lookup finished");
        Ok(lookup)
    }

    /// Build, sign and finalize the request for `action` without sending it
    pub(crate) async fn prepare<P>(
        &self,
        action: &str,
        params: &P,
        body: Option<Vec<u8>>,
    ) -> Result<Request, SsmError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let request = build_request(&self.endpoint, action, params, body)?;
        let mut request = self.signer.sign(SERVICE_ID, request).await?;

        let content_hash = sha256_hex(body_bytes(&request)?);
        let content_length = request
            .body()
            .and_then(|body| body.as_bytes())
            .map(|bytes| bytes.len());

        let headers = request.headers_mut();
        headers.insert(
            HeaderName::from_static(X_AMZ_CONTENT_SHA256),
            HeaderValue::from_str(&content_hash)
                .map_err(|e| SsmError::InvalidRequest(e.to_string()))?,
        );
        if let Some(length) = content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        }

        Ok(request)
    }

    /// Send one signed request; transport errors are returned as they are
    async fn send<P>(
        &self,
        action: &str,
        params: &P,
        body: Option<Vec<u8>>,
    ) -> Result<Response, SsmError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let request = self.prepare(action, params, body).await?;
        debug!(action, url = %request.url(), "sending request");
        Ok(self.http.execute(request).await?)
    }
}

/// Builder for [`SsmClient`] with a custom signer or HTTP client
pub struct SsmClientBuilder {
    config: SsmConfig,
    signer: Option<Arc<dyn RequestSigner>>,
    http: Option<Client>,
}

impl SsmClientBuilder {
    /// Use `signer` instead of the default SigV4 signer
    pub fn signer(mut self, signer: Arc<dyn RequestSigner>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS)
    pub fn http_client(mut self, http: Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<SsmClient, SsmError> {
        let endpoint = self.config.endpoint()?;

        let signer: Arc<dyn RequestSigner> = match self.signer {
            Some(signer) => signer,
            None => Arc::new(SigV4Signer::new(
                &self.config.region,
                &self.config.credentials,
            )?),
        };

        let http = match self.http {
            Some(http) => http,
            None => Client::builder().build().map_err(|e| {
                SsmError::InvalidConfig(format!("failed to create HTTP client: {e}"))
            })?,
        };

        debug!(
            region = %self.config.region,
            endpoint = %endpoint,
            signer = signer.name(),
            "ssm client initialized"
        );

        Ok(SsmClient {
            http,
            signer,
            endpoint,
            region: self.config.region,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Credentials, SigningError};
    use async_trait::async_trait;
    use mockall::mock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    mock! {
        pub Signer {}

        #[async_trait]
        impl RequestSigner for Signer {
            async fn sign(&self, service: &str, request: Request) -> Result<Request, SigningError>;
            fn name(&self) -> &'static str;
        }
    }

    /// Stamps each request with the call number
    struct CountingSigner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RequestSigner for CountingSigner {
        async fn sign(&self, _service: &str, mut request: Request) -> Result<Request, SigningError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            request
                .headers_mut()
                .insert("x-call", HeaderValue::from(call));
            Ok(request)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn config() -> SsmConfig {
        SsmConfig::new("us-east-1", Credentials::new("AKIDEXAMPLE", "secret"))
    }

    #[tokio::test]
    async fn test_prepare_without_body() {
        let client = SsmClient::new(config()).unwrap();
        let request = client
            .prepare(GET_PARAMETER_ACTION, &GetParameterInput::new("/x"), None)
            .await
            .unwrap();

        assert_eq!(
            request.headers().get(X_AMZ_CONTENT_SHA256).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert!(request.headers().get(CONTENT_LENGTH).is_none());
        assert!(request.headers().get("authorization").is_some());
        assert!(request.headers().get("x-amz-date").is_some());
    }

    #[tokio::test]
    async fn test_prepare_with_body_sets_length_and_hash() {
        let client = SsmClient::new(config()).unwrap();
        let request = client
            .prepare(
                GET_PARAMETER_ACTION,
                &GetParameterInput::new("/x"),
                Some(b"abc".to_vec()),
            )
            .await
            .unwrap();

        assert_eq!(
            request.headers().get(X_AMZ_CONTENT_SHA256).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(request.headers().get(CONTENT_LENGTH).unwrap(), "3");
    }

    #[tokio::test]
    async fn test_signer_receives_service_id() {
        let mut signer = MockSigner::new();
        signer
            .expect_sign()
            .times(1)
            .returning(|service, request| {
                assert_eq!(service, "ssm");
                Ok(request)
            });
        signer.expect_name().return_const("mock");

        let client = SsmClient::builder(config())
            .signer(Arc::new(signer))
            .build()
            .unwrap();
        client
            .prepare(GET_PARAMETER_ACTION, &GetParameterInput::new("/x"), None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_signing_error_propagates() {
        let mut signer = MockSigner::new();
        signer
            .expect_sign()
            .returning(|_, _| Err(SigningError::Failed("clock skew".to_string())));
        signer.expect_name().return_const("mock");

        let client = SsmClient::builder(config())
            .signer(Arc::new(signer))
            .build()
            .unwrap();
        let err = client
            .get_parameter(&GetParameterInput::new("/x"))
            .await
            .unwrap_err();

        assert!(matches!(err, SsmError::Signing(SigningError::Failed(_))));
    }

    #[tokio::test]
    async fn test_sequential_requests_do_not_share_headers() {
        let client = SsmClient::builder(config())
            .signer(Arc::new(CountingSigner {
                calls: AtomicUsize::new(0),
            }))
            .build()
            .unwrap();

        let first = client
            .prepare(GET_PARAMETER_ACTION, &GetParameterInput::new("/a"), Some(b"{}".to_vec()))
            .await
            .unwrap();
        let second = client
            .prepare(GET_PARAMETER_ACTION, &GetParameterInput::new("/b"), None)
            .await
            .unwrap();

        assert_eq!(first.headers().get("x-call").unwrap(), "1");
        let calls: Vec<_> = second.headers().get_all("x-call").iter().collect();
        assert_eq!(calls, vec!["2"]);
        assert!(second.headers().get(CONTENT_LENGTH).is_none());
        assert!(second.url().as_str().contains("Name=%2Fb"));
        assert!(!second.url().as_str().contains("%2Fa"));
    }

    #[test]
    fn test_malformed_credentials_fail_construction() {
        let config = SsmConfig::new("us-east-1", Credentials::new("", "secret"));
        let err = SsmClient::new(config).unwrap_err();

        assert!(matches!(
            err,
            SsmError::Signing(SigningError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_endpoint_is_resolved_once() {
        let client = SsmClient::new(config().with_endpoint_url("http://localhost:4566")).unwrap();

        assert_eq!(client.endpoint().as_str(), "http://localhost:4566/");
        assert_eq!(client.region(), "us-east-1");
        assert!(format!("{client:?}").contains("sigv4"));
        assert!(!format!("{client:?}").contains("secret"));
    }
}
