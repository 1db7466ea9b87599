//! Declarative HTTP API test client.
//!
//! # Overview
//! A thin synchronous wrapper around one HTTP call, meant for integration
//! tests. The caller describes a request declaratively (`ApiRequest`), the
//! client merges it with its defaults, sends it once, asserts the status
//! code against the descriptor's expected set, and deserializes the JSON
//! body into a caller-chosen type.
//!
//! # Design
//! - `ApiClient` is immutable after construction and dispatches via `&self`;
//!   every call returns an owned `ApiResponse`, so there is no shared
//!   last-result state to race on.
//! - Descriptor-level headers and cookies override client defaults on key
//!   collision; an explicit content type overrides both.
//! - Failures are never recovered internally: transport errors, unexpected
//!   status codes, and deserialization mismatches all propagate as
//!   `ApiError` for the test to report.

pub mod client;
pub mod error;
pub mod logging;
pub mod request;

pub use client::{ApiClient, ApiResponse};
pub use error::ApiError;
pub use request::{ApiRequest, Method};
