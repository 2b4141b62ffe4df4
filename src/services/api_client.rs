//! JSON fetch helper for the statistics backend.

use std::sync::Arc;

use reqwest::{
    Client, Method, Response,
    header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult, DEFAULT_ERROR_MESSAGE};

/// Base URL used when the configuration does not provide one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Per-request settings forwarded to the HTTP client.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Defaults to `GET`.
    pub method: Method,
    /// Applied after the default `Content-Type`, replacing it on collision.
    pub headers: HeaderMap,
    /// Raw request body, sent as-is.
    pub body: Option<String>,
}

impl RequestOptions {
    /// Options for a bodyless `GET`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `method` instead of `GET`.
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a header, replacing any earlier value for the same name.
    pub fn header(mut self, name: &str, value: &str) -> ApiResult<Self> {
        let invalid = || ApiError::InvalidHeader {
            name: name.to_owned(),
        };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Use `body` verbatim as the request payload.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `payload` as the JSON request payload.
    pub fn json<T>(mut self, payload: &T) -> ApiResult<Self>
    where
        T: ?Sized + Serialize,
    {
        let encoded =
            serde_json::to_string(payload).map_err(|source| ApiError::Encode { source })?;
        self.body = Some(encoded);
        Ok(self)
    }
}

/// Thin JSON client bound to one backend base URL.
///
/// Every call issues exactly one request: no retry, timeout or caching.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Build a client for `base_url`; endpoints are appended to it verbatim.
    pub fn new(base_url: impl AsRef<str>) -> ApiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ApiError::ClientBuilder { source })?;
        Ok(Self::with_client(client, base_url))
    }

    /// Reuse an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            base_url: Arc::from(base_url.as_ref()),
        }
    }

    /// Base URL every endpoint is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request to `base_url + endpoint` and return the parsed JSON body.
    ///
    /// `Content-Type: application/json` is always sent unless the caller's
    /// headers override it. A non-success status fails with
    /// [`ApiError::Status`] carrying the body's `message` field when present.
    pub async fn fetch_with_auth(&self, endpoint: &str, options: RequestOptions) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        let RequestOptions {
            method,
            headers: caller_headers,
            body,
        } = options;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.extend(caller_headers);

        debug!(%method, %url, "sending API request");
        let mut request = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        handle_response(&url, response).await
    }

    /// Same as [`fetch_with_auth`](Self::fetch_with_auth), decoded into `T`.
    pub async fn fetch_json<T>(&self, endpoint: &str, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let value = self.fetch_with_auth(endpoint, options).await?;
        serde_json::from_value(value).map_err(|source| ApiError::Decode {
            url: format!("{}{}", self.base_url, endpoint),
            source,
        })
    }
}

async fn handle_response(url: &str, response: Response) -> ApiResult<Value> {
    let status = response.status();

    if !status.is_success() {
        let payload = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<Value>(&body).unwrap_or_default(),
            Err(_) => Value::Object(Map::new()),
        };
        let message = error_message(&payload).unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_owned());
        warn!(%url, %status, %message, "API request rejected");
        return Err(ApiError::Status { status, message });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
        url: url.to_owned(),
        source,
    })
}

/// Extract a usable `message` from an error body. Empty, `false`, zero and
/// structured values do not count.
///
/// Arrays and objects fall back to [`DEFAULT_ERROR_MESSAGE`] even when
/// non-empty, unlike a browser client that would stringify them into
/// `[object Object]` or a comma-joined list.
fn error_message(payload: &Value) -> Option<String> {
    match payload.get("message")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number.to_string()),
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_prefers_non_empty_strings() {
        assert_eq!(
            error_message(&json!({ "message": "not found" })).as_deref(),
            Some("not found")
        );
        assert_eq!(error_message(&json!({ "message": "" })), None);
        assert_eq!(error_message(&json!({ "detail": "x" })), None);
        assert_eq!(error_message(&json!(null)), None);
        assert_eq!(error_message(&json!(["message"])), None);
    }

    #[test]
    fn message_stringifies_scalars() {
        assert_eq!(error_message(&json!({ "message": 42 })).as_deref(), Some("42"));
        assert_eq!(error_message(&json!({ "message": 0 })), None);
        assert_eq!(error_message(&json!({ "message": { "a": 1 } })), None);
    }

    #[test]
    fn structured_messages_are_not_stringified() {
        assert_eq!(error_message(&json!({ "message": ["bad", "input"] })), None);
        assert_eq!(error_message(&json!({ "message": { "field": "name" } })), None);
        assert_eq!(error_message(&json!({ "message": [] })), None);
    }

    #[test]
    fn options_header_rejects_invalid_names() {
        let err = RequestOptions::new().header("bad header", "x").unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { name } if name == "bad header"));
    }

    #[test]
    fn options_json_sets_body() {
        let options = RequestOptions::new()
            .method(Method::POST)
            .json(&json!({ "name": "Flyers" }))
            .unwrap();
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.body.as_deref(), Some(r#"{"name":"Flyers"}"#));
    }
}
