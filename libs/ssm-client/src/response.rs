//! Mapping of HTTP responses to lookup outcomes

use reqwest::{Response, StatusCode};
use tracing::{debug, warn};

use crate::models::{GetParameterResult, ParameterLookup};
use crate::SsmError;

/// Classify a response by status.
///
/// - 200: the body text, `Some`
/// - 404: body drained and discarded, `None`; a failed drain is a transport error
/// - anything else: [`SsmError::Service`] with the status and raw body
pub async fn success_body(response: Response) -> Result<Option<String>, SsmError> {
    match response.status() {
        StatusCode::OK => Ok(Some(response.text().await?)),
        StatusCode::NOT_FOUND => {
            // Read the body to the end so the connection goes back to the pool
            let drained = response.bytes().await?;
            debug!(bytes = drained.len(), "not found, body drained");
            Ok(None)
        }
        status => {
            let body = response.text().await?;
            warn!(status = status.as_u16(), "parameter store request failed");
            Err(SsmError::Service {
                status: status.as_u16(),
                response: body,
            })
        }
    }
}

/// Interpret a `GetParameter` response.
///
/// The 200 body is the flat JSON result, `{"Parameter": {...}}`.
pub async fn interpret_get_parameter(response: Response) -> Result<ParameterLookup, SsmError> {
    let Some(body) = success_body(response).await? else {
        return Ok(ParameterLookup::NotFound);
    };
    parse_get_parameter(body)
}

fn parse_get_parameter(body: String) -> Result<ParameterLookup, SsmError> {
    let result: GetParameterResult = match serde_json::from_str(&body) {
        Ok(result) => result,
        Err(source) => {
            return Err(SsmError::Parse {
                source,
                response: body,
            })
        }
    };

    match result.parameter {
        Some(parameter) => Ok(ParameterLookup::Found(parameter)),
        None => Err(SsmError::InvalidResponse {
            message: "response carries no Parameter".to_string(),
            response: body,
        }),
    }
}
