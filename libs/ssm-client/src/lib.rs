//! # SSM Parameter Store Client
//!
//! A small async client for one Parameter Store operation, `GetParameter`,
//! signed with a pluggable request signer (SigV4 by default).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        SsmClient                            │
//! │  ┌─────────────────────────────────────────────────────┐   │
//! │  │  1. Build POST /?Action=..&Name=.. + target headers │   │
//! │  │  2. Sign (RequestSigner) + x-amz-content-sha256     │   │
//! │  │  3. Send over reqwest                               │   │
//! │  │  4. 200 → Found, 404 → NotFound, other → error      │   │
//! │  └─────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ssm_client::{Credentials, GetParameterInput, ParameterLookup, SsmClient, SsmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ssm_client::SsmError> {
//!     let config = SsmConfig::new("eu-west-1", Credentials::new("AKID...", "secret"));
//!     let client = SsmClient::new(config)?;
//!
//!     let input = GetParameterInput::new("/app/db/password").with_decryption(true);
//!     match client.get_parameter(&input).await? {
//!         ParameterLookup::Found(parameter) => println!("{:?}", parameter.value),
//!         ParameterLookup::NotFound => println!("no such parameter"),
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod models;
mod request;
mod response;
mod signer;

pub mod signers;

pub use client::{SsmClient, SsmClientBuilder};
pub use config::{Credentials, SsmConfig};
pub use error::{SigningError, SsmError};
pub use models::{GetParameterInput, GetParameterResult, Parameter, ParameterLookup, ParameterType};
pub use request::{build_request, GET_PARAMETER_ACTION, SERVICE_ID};
pub use signer::{sha256_hex, RequestSigner};
pub use signers::SigV4Signer;
