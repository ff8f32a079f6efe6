//! HTTP helper functions for Crux Core
//!
//! These turn `crux_http` results into the `Result<T, String>` values carried by
//! the response events, keeping the request macros small.

use crux_http::{HttpError, Response};

/// Base URL for device endpoints.
///
/// `crux_http` only accepts absolute URLs, so requests are built against this
/// marker. The shell strips it and sends the remaining path to the device (or
/// to the proxy in front of it).
pub const BASE_URL: &str = "https://relative";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use light_panel_core::http_helpers::build_url;
/// let url = build_url("/toggle");
/// assert_eq!(url, "https://relative/toggle");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Returns `true` if the response status is 2xx.
pub fn is_response_success(response: &Response<Vec<u8>>) -> bool {
    response.status().is_success()
}

/// Extracts error message from HTTP response.
pub fn extract_error_message(action: &str, response: &mut Response<Vec<u8>>) -> String {
    let status = response.status().to_string();

    match response.take_body() {
        Some(body) if body.is_empty() => format!("{action} failed: HTTP {status} (Empty body)"),
        Some(body) => match String::from_utf8(body) {
            Ok(msg) => format!("{action} failed: HTTP {status}: {msg}"),
            Err(e) => format!("{action} failed: HTTP {status} (Invalid UTF-8: {e})"),
        },
        None => format!("{action} failed: HTTP {status} (No body)"),
    }
}

/// Parse JSON from response body.
///
/// Returns error if response is not successful or JSON parsing fails.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    response: &mut Response<Vec<u8>>,
) -> Result<T, String> {
    if !is_response_success(response) {
        return Err(extract_error_message(action, response));
    }

    match response.take_body() {
        Some(body) => {
            serde_json::from_slice(&body).map_err(|e| format!("{action}: JSON parse error: {e}"))
        }
        None => Err(format!("{action}: Empty response body")),
    }
}

/// Describe a transport level failure (device unreachable, timeout, ...)
pub fn map_http_error(action: &str, error: HttpError) -> String {
    format!("{action} failed: {error}")
}

/// Process HTTP response result and parse JSON
pub fn process_json_response<T: serde::de::DeserializeOwned>(
    action: &str,
    result: crux_http::Result<Response<Vec<u8>>>,
) -> Result<T, String> {
    match result {
        Ok(mut response) => parse_json_response(action, &mut response),
        Err(e) => Err(map_http_error(action, e)),
    }
}

/// Handle request creation error - sets error message and returns render command
///
/// This is used when building an HTTP request fails (e.g., JSON serialization error).
pub fn handle_request_error<M, E>(
    model: &mut M,
    action: &str,
    error: impl std::fmt::Display,
) -> crux_core::Command<crate::Effect, E>
where
    M: crate::model::ModelErrorHandler,
    E: Send + 'static,
{
    log::error!("failed to create {action} request: {error}");
    model.set_error(format!("Failed to create {action} request: {error}"));
    crux_core::render::render()
}

// crux_http::Response has no public constructor, so these helpers are covered
// through the update tests that resolve HTTP effects.
