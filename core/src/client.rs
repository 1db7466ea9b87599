//! Synchronous request dispatcher.
//!
//! # Design
//! `ApiClient` holds the target host, scheme, and default headers/cookies,
//! all immutable after construction. `dispatch` takes `&self` and returns an
//! owned `ApiResponse`, so the client carries no per-call state and can be
//! shared between tests freely. One dispatch is one blocking HTTP round-trip:
//! build, send, verify status, deserialize. No retries.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::logging;
use crate::request::{ApiRequest, Method};

/// Merged header key used for the descriptor's content type. Matches the
/// casing the original test suites assert on.
const CONTENT_TYPE: &str = "Content-type";

/// Synchronous client for a single API host.
///
/// Default headers and cookies apply to every dispatch; descriptor-level
/// values override them on key collision.
pub struct ApiClient {
    scheme: String,
    host: String,
    default_headers: BTreeMap<String, String>,
    default_cookies: BTreeMap<String, String>,
    agent: ureq::Agent,
}

/// Result of one dispatch: the raw response plus its parsed and typed forms.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub text: String,
    pub json: Value,
    pub typed: T,
}

impl ApiClient {
    /// Client for `https://{host}`.
    pub fn new(host: &str) -> Self {
        Self::with_scheme(host, "https")
    }

    pub fn with_scheme(host: &str, scheme: &str) -> Self {
        // 4xx/5xx must arrive as data so status interpretation stays with
        // the expected-status check, not the transport.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            default_headers: BTreeMap::new(),
            default_cookies: BTreeMap::new(),
            agent,
        }
    }

    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn default_cookie(mut self, name: &str, value: &str) -> Self {
        self.default_cookies
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Send one request and process its response.
    ///
    /// Logs the outbound request, performs a single blocking HTTP call,
    /// logs the response, checks the status code against the descriptor's
    /// expected set, and deserializes the JSON body into `T`. Any failure
    /// along the way propagates; there is no partial success.
    pub fn dispatch<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = self.build_url(&request.endpoint);
        let headers = self.merged_headers(request);
        let cookies = self.merged_cookies(request);

        logging::log_request(request.method, &url, &headers, &cookies, request.body.as_ref());

        let mut response = self.send(request, &url, &headers, &cookies)?;
        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(ApiError::Transport)?;

        logging::log_response(status, &text);

        verify_status(status, &request.expected_status, &text)?;

        let json: Value = serde_json::from_str(&text).map_err(ApiError::InvalidJson)?;
        let typed: T = serde_json::from_value(json.clone()).map_err(ApiError::Deserialization)?;

        Ok(ApiResponse {
            status,
            text,
            json,
            typed,
        })
    }

    /// `{scheme}://{host}{endpoint}`, verbatim. No slash normalization.
    fn build_url(&self, endpoint: &str) -> String {
        format!("{}://{}{}", self.scheme, self.host, endpoint)
    }

    /// Union of default and descriptor headers; descriptor wins, then an
    /// explicit content type wins over both. A JSON body with no resulting
    /// `Content-type` entry gets `application/json`.
    fn merged_headers(&self, request: &ApiRequest) -> BTreeMap<String, String> {
        let mut headers = self.default_headers.clone();
        headers.extend(
            request
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        if let Some(content_type) = &request.content_type {
            headers.insert(CONTENT_TYPE.to_string(), content_type.clone());
        }
        if request.body.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
        }
        headers
    }

    /// Union of default and descriptor cookies; descriptor wins.
    fn merged_cookies(&self, request: &ApiRequest) -> BTreeMap<String, String> {
        let mut cookies = self.default_cookies.clone();
        cookies.extend(
            request
                .cookies
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        cookies
    }

    fn send(
        &self,
        request: &ApiRequest,
        url: &str,
        headers: &BTreeMap<String, String>,
        cookies: &BTreeMap<String, String>,
    ) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let body = request.body.as_ref().map(Value::to_string);

        // ureq's typed builder separates with-body and without-body verbs,
        // so each arm applies the shared decoration separately. GET, HEAD
        // and DELETE never carry a body.
        match (request.method, body) {
            (Method::Get, _) => {
                decorate(self.agent.get(url), headers, cookies, &request.params).call()
            }
            (Method::Head, _) => {
                decorate(self.agent.head(url), headers, cookies, &request.params).call()
            }
            (Method::Delete, _) => {
                decorate(self.agent.delete(url), headers, cookies, &request.params).call()
            }
            (Method::Post, Some(body)) => {
                decorate(self.agent.post(url), headers, cookies, &request.params)
                    .send(body.as_bytes())
            }
            (Method::Post, None) => {
                decorate(self.agent.post(url), headers, cookies, &request.params).send_empty()
            }
            (Method::Put, Some(body)) => {
                decorate(self.agent.put(url), headers, cookies, &request.params)
                    .send(body.as_bytes())
            }
            (Method::Put, None) => {
                decorate(self.agent.put(url), headers, cookies, &request.params).send_empty()
            }
            (Method::Patch, Some(body)) => {
                decorate(self.agent.patch(url), headers, cookies, &request.params)
                    .send(body.as_bytes())
            }
            (Method::Patch, None) => {
                decorate(self.agent.patch(url), headers, cookies, &request.params).send_empty()
            }
        }
    }
}

/// Apply merged headers, the cookie header, and query params to a builder
/// in either typestate.
fn decorate<S>(
    mut builder: ureq::RequestBuilder<S>,
    headers: &BTreeMap<String, String>,
    cookies: &BTreeMap<String, String>,
    params: &BTreeMap<String, String>,
) -> ureq::RequestBuilder<S> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if !cookies.is_empty() {
        builder = builder.header("Cookie", cookie_header(cookies).as_str());
    }
    for (name, value) in params {
        builder = builder.query(name.as_str(), value.as_str());
    }
    builder
}

/// `k=v; k2=v2` per RFC 6265 request syntax.
fn cookie_header(cookies: &BTreeMap<String, String>) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn verify_status(status: u16, expected: &[u16], body: &str) -> Result<(), ApiError> {
    if expected.contains(&status) {
        return Ok(());
    }
    Err(ApiError::UnexpectedStatus {
        status,
        expected: expected.to_vec(),
        body: body.to_string(),
    })
}
