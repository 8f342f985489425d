//! Request construction for Parameter Store actions

use std::collections::BTreeMap;

use reqwest::header::{HeaderName, HeaderValue, ACCEPT};
use reqwest::{Method, Request};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::SsmError;

/// Service identifier handed to the signer
pub const SERVICE_ID: &str = "ssm";

/// Action name of the `GetParameter` operation
pub const GET_PARAMETER_ACTION: &str = "GetParameter";

const TARGET_PREFIX: &str = "AmazonSSM";
const X_AMZ_TARGET: &str = "x-amz-target";

/// Build the unsigned request for `action`.
///
/// The query carries `Action=<action>` plus one pair per entry of `params`,
/// sorted by key and RFC 3986 encoded. A key in `params` replaces an earlier
/// pair with the same key, `Action` included.
pub fn build_request<P>(
    endpoint: &Url,
    action: &str,
    params: &P,
    body: Option<Vec<u8>>,
) -> Result<Request, SsmError>
where
    P: Serialize + ?Sized,
{
    let mut query = BTreeMap::new();
    query.insert("Action".to_string(), action.to_string());
    query.extend(query_params(params)?);

    let mut url = endpoint.clone();
    url.set_path("/");
    url.set_query(Some(&encode_query(&query)));

    let target = HeaderValue::from_str(&format!("{TARGET_PREFIX}.{action}"))
        .map_err(|e| SsmError::InvalidRequest(format!("invalid action '{action}': {e}")))?;

    let mut request = Request::new(Method::POST, url);
    let headers = request.headers_mut();
    headers.insert(HeaderName::from_static(X_AMZ_TARGET), target);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    if let Some(body) = body {
        *request.body_mut() = Some(body.into());
    }

    Ok(request)
}

/// Flatten operation parameters into string pairs
fn query_params<P>(params: &P) -> Result<BTreeMap<String, String>, SsmError>
where
    P: Serialize + ?Sized,
{
    let value = serde_json::to_value(params)
        .map_err(|e| SsmError::InvalidRequest(format!("cannot serialize parameters: {e}")))?;

    match value {
        Value::Object(map) => Ok(map
            .into_iter()
            .filter_map(|(key, value)| coerce(value).map(|value| (key, value)))
            .collect()),
        Value::Null => Ok(BTreeMap::new()),
        other => Err(SsmError::InvalidRequest(format!(
            "operation parameters must be a map, got {other}"
        ))),
    }
}

fn coerce(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn encode_query(query: &BTreeMap<String, String>) -> String {
    query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
