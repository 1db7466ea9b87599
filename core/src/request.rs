//! Declarative request descriptors.
//!
//! # Design
//! An `ApiRequest` describes one HTTP call as plain data: verb, endpoint
//! path, headers, cookies, query params, JSON body, and the set of status
//! codes the caller considers a pass. The dispatcher consumes it read-only,
//! so one descriptor can be reused across calls. Maps are `BTreeMap` so
//! header and cookie order is deterministic in logs and on the wire.

use std::collections::BTreeMap;

use serde_json::Value;

/// HTTP verb for a request. Closed set; verbs outside this list are not
/// supported by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

/// Declarative specification of one HTTP request.
///
/// Built with `ApiRequest::new` plus the chainable setters. The expected
/// status set defaults to `[200]` and must stay non-empty; an empty set
/// would make every dispatch fail its status check.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub headers: BTreeMap<String, String>,
    pub content_type: Option<String>,
    pub cookies: BTreeMap<String, String>,
    pub params: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub expected_status: Vec<u16>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: &str) -> Self {
        Self {
            method,
            endpoint: endpoint.to_string(),
            headers: BTreeMap::new(),
            content_type: None,
            cookies: BTreeMap::new(),
            params: BTreeMap::new(),
            body: None,
            expected_status: vec![200],
        }
    }

    pub fn get(endpoint: &str) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: &str) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn content_type(mut self, value: &str) -> Self {
        self.content_type = Some(value.to_string());
        self
    }

    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.to_string(), value.to_string());
        self
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the expected status set. Panics in debug builds if `codes`
    /// is empty — a descriptor that can never pass is a caller bug.
    pub fn expect_status(mut self, codes: &[u16]) -> Self {
        debug_assert!(!codes.is_empty(), "expected status set must be non-empty");
        self.expected_status = codes.to_vec();
        self
    }
}
