//! Console logging for dispatch summaries.
//!
//! # Design
//! The dispatcher emits request/response summaries through the `log` facade;
//! everything cosmetic (colors, pretty-printed JSON) lives here. Callers that
//! want different presentation can install their own `log` backend instead of
//! calling `init_console_logger`.

use std::collections::BTreeMap;
use std::io::Write;

use colored::Colorize;
use log::info;
use serde_json::Value;

use crate::request::Method;

/// Install a colored `env_logger` backend at info level.
///
/// Respects `RUST_LOG` for per-module overrides. Safe to call more than once
/// (tests often race on this); only the first call wins.
pub fn init_console_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    builder.format(|buf, record| {
        let level = record.level();
        let colored_level = match level {
            log::Level::Error => level.to_string().red(),
            log::Level::Warn => level.to_string().yellow(),
            log::Level::Info => level.to_string().green(),
            log::Level::Debug => level.to_string().blue(),
            log::Level::Trace => level.to_string().purple(),
        };
        writeln!(
            buf,
            "{} [{}] {}",
            record.target().cyan(),
            colored_level,
            record.args()
        )
    });
    let _ = builder.try_init();
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub(crate) fn log_request(
    method: Method,
    url: &str,
    headers: &BTreeMap<String, String>,
    cookies: &BTreeMap<String, String>,
    body: Option<&Value>,
) {
    info!("{}", "request ──────────────────────────────".red());
    info!("sending {} {}", method.as_str().bold(), url.bold());
    info!("sending headers: {headers:?}");
    info!("sending cookies: {cookies:?}");
    match body {
        Some(body) => info!("sending body:\n{}", pretty(body).bold()),
        None => info!("sending body: (none)"),
    }
}

pub(crate) fn log_response(status: u16, body: &str) {
    info!("{}", "response ─────────────────────────────".red());
    info!("response code {}", status.to_string().bold());
    // Pretty-print when the body is JSON, fall back to the raw text.
    match serde_json::from_str::<Value>(body) {
        Ok(value) => info!("response body:\n{}", pretty(&value).bold()),
        Err(_) => info!("response body:\n{body}"),
    }
}
