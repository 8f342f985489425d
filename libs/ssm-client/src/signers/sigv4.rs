//! AWS Signature Version 4 signer
//!
//! Adapts `reqsign`'s AWS v4 signer to [`RequestSigner`]: the method, URL and
//! headers of the request are handed over as `http::request::Parts`, and the
//! headers that come back (`x-amz-date`, `x-amz-security-token`,
//! `authorization`) replace the request's own.

use async_trait::async_trait;
use reqsign::aws::{RequestSigner as AwsV4RequestSigner, StaticCredentialProvider};
use reqsign::{Context, Signer};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Request;
use secrecy::{ExposeSecret, Secret};
use tracing::debug;

use crate::signer::{body_bytes, sha256_hex, X_AMZ_CONTENT_SHA256};
use crate::{Credentials, RequestSigner, SigningError};

/// Static-credential SigV4 signer bound to one region
pub struct SigV4Signer {
    region: String,
    access_key_id: String,
    secret_key: Secret<String>,
    session_token: Option<Secret<String>>,
    context: Context,
}

impl SigV4Signer {
    /// Create a signer for `region` from static credentials.
    ///
    /// Fails when the region, access key id or secret key is empty.
    pub fn new(region: &str, credentials: &Credentials) -> Result<Self, SigningError> {
        if region.trim().is_empty() {
            return Err(SigningError::InvalidCredentials(
                "region must not be empty".to_string(),
            ));
        }
        if credentials.access_key_id.trim().is_empty() {
            return Err(SigningError::InvalidCredentials(
                "access key id must not be empty".to_string(),
            ));
        }
        if credentials.secret_key.expose_secret().is_empty() {
            return Err(SigningError::InvalidCredentials(
                "secret key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            region: region.to_string(),
            access_key_id: credentials.access_key_id.clone(),
            secret_key: Secret::new(credentials.secret_key.expose_secret().clone()),
            session_token: credentials
                .session_token
                .as_ref()
                .map(|token| Secret::new(token.expose_secret().clone())),
            context: reqsign::default_context(),
        })
    }

    fn credential_provider(&self) -> StaticCredentialProvider {
        let provider =
            StaticCredentialProvider::new(&self.access_key_id, self.secret_key.expose_secret());
        match &self.session_token {
            Some(token) => provider.with_session_token(token.expose_secret()),
            None => provider,
        }
    }
}

#[async_trait]
impl RequestSigner for SigV4Signer {
    async fn sign(&self, service: &str, mut request: Request) -> Result<Request, SigningError> {
        // Commit to the real payload instead of letting the signer pick a placeholder
        let payload_hash = HeaderValue::from_str(&sha256_hex(body_bytes(&request)?))
            .map_err(|e| SigningError::Failed(e.to_string()))?;

        let (mut parts, ()) = http::Request::builder()
            .method(request.method().clone())
            .uri(request.url().as_str())
            .body(())
            .map_err(|e| SigningError::Failed(format!("cannot convert request: {e}")))?
            .into_parts();
        parts.headers = request.headers().clone();
        parts
            .headers
            .insert(HeaderName::from_static(X_AMZ_CONTENT_SHA256), payload_hash);

        let signer = Signer::new(
            self.context.clone(),
            self.credential_provider(),
            AwsV4RequestSigner::new(service, &self.region),
        );
        signer
            .sign(&mut parts, None)
            .await
            .map_err(|e| SigningError::Failed(e.to_string()))?;

        debug!(service, region = %self.region, "request signed");
        *request.headers_mut() = parts.headers;
        Ok(request)
    }

    fn name(&self) -> &'static str {
        "sigv4"
    }
}
