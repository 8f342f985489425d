//! Trait definition for request signers

use async_trait::async_trait;
use reqwest::Request;
use sha2::{Digest, Sha256};

use crate::SigningError;

/// Header carrying the hex SHA-256 of the request body
pub(crate) const X_AMZ_CONTENT_SHA256: &str = "x-amz-content-sha256";

/// Trait for request signers
///
/// Implement this trait to plug in another signing scheme or a vetted
/// third-party signer. The returned request must keep the method, URL and body
/// of the one passed in and only add headers.
#[async_trait]
pub trait RequestSigner: Send + Sync {
    /// Sign `request` for the service identified by `service` (e.g. `"ssm"`)
    async fn sign(&self, service: &str, request: Request) -> Result<Request, SigningError>;

    /// Get the signer name (for logging)
    fn name(&self) -> &'static str;
}

/// Lowercase hex SHA-256 digest of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Bytes of a buffered request body, empty when there is no body.
///
/// Streaming bodies cannot be hashed up front and are rejected.
pub(crate) fn body_bytes(request: &Request) -> Result<&[u8], SigningError> {
    match request.body() {
        None => Ok(&[]),
        Some(body) => body
            .as_bytes()
            .ok_or_else(|| SigningError::Failed("streaming bodies cannot be signed".to_string())),
    }
}
