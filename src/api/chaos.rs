//! Fault Injection
//!
//! Optional latency and error injection driven by query parameters, used to
//! exercise client resilience. `?latency=<ms|random>` delays the handler;
//! `?error=<code|random>` fails the request before it touches the cache or
//! store. `random` fails roughly one request in ten.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

/// Fault-injection query parameters accepted by the document endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaultParams {
    /// Milliseconds to sleep, or "random" for 0..1000
    pub latency: Option<String>,
    /// HTTP status to fail with, or "random"
    pub error: Option<String>,
}

/// Status codes eligible for injection.
const INJECTABLE: &[(u16, &str)] = &[
    (400, "400 Bad Request"),
    (401, "401 Unauthorized"),
    (403, "403 Forbidden"),
    (404, "404 Not Found"),
    (500, "500 Internal Server Error"),
    (501, "501 Not Implemented"),
    (502, "502 Bad Gateway"),
    (503, "503 Service Unavailable"),
    (504, "504 Gateway Timeout"),
    (505, "505 HTTP Version Not Supported"),
    (506, "506 Variant Also Negotiates"),
    (507, "507 Insufficient Storage"),
    (510, "510 Not Extended"),
];

// == Latency Injection ==
/// Sleeps per the `latency` parameter; unparseable values are ignored.
pub async fn apply_latency(params: &FaultParams) {
    let Some(raw) = params.latency.as_deref() else {
        return;
    };
    let ms: u64 = if raw == "random" {
        // Process-wide source, seeded once; never reseeded per request
        rand::thread_rng().gen_range(0..1000)
    } else {
        match raw.parse() {
            Ok(ms) => ms,
            Err(_) => return,
        }
    };
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// == Error Injection ==
/// Returns a failure response when the `error` parameter asks for one.
///
/// `error=random` fails one request in ten with a random status from the
/// table; `error=<code>` fails deterministically when the code is in the
/// table. Anything else passes the request through.
pub fn injected_failure(params: &FaultParams) -> Option<Response> {
    let raw = params.error.as_deref()?;

    let (code, message) = if raw == "random" {
        let mut rng = rand::thread_rng();
        if rng.gen_range(0..10) != 0 {
            return None;
        }
        INJECTABLE[rng.gen_range(0..INJECTABLE.len())]
    } else {
        let code: u16 = raw.parse().ok()?;
        *INJECTABLE.iter().find(|(c, _)| *c == code)?
    };

    warn!(code, "injected error");
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    Some((status, Json(json!({ "error": message }))).into_response())
}
