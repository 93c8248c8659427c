//! Response Module - Checked JSON parsing
//!
//! Defensive collaborator for response handling: validates a response's
//! declared content type before handing the body to the JSON parser.
//! Endpoints that answer HTML error pages (captive portals, proxies,
//! misconfigured servers) otherwise surface as opaque parse errors; this
//! wrapper logs a diagnostic preview of the body and fails loudly with a
//! descriptive error instead, so calling code never proceeds silently on
//! malformed data.
//!
//! This is an explicit wrapping function the response-handling layer
//! calls, not a patch over a shared parser.
//!
//! # Example
//!
//! ```ignore
//! use dpad_adapter::response::{parse_json, RawResponse};
//!
//! let response = RawResponse {
//!     url: "https://example.com/levels.json".to_string(),
//!     status: 200,
//!     content_type: Some("application/json".to_string()),
//!     body: r#"{"level": 1}"#.to_string(),
//! };
//!
//! let value = parse_json(&response)?;
//! ```

use thiserror::Error;

// =============================================================================
// TYPES
// =============================================================================

/// Characters of the body included in the diagnostic preview.
const PREVIEW_LIMIT: usize = 200;

/// A received response, reduced to the fields the wrapper needs.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    /// Declared content type, unparsed (may carry parameters).
    pub content_type: Option<String>,
    /// Body, already read as text.
    pub body: String,
}

/// Errors from checked JSON parsing.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// The declared content type is not JSON-like; the body was never
    /// handed to the JSON parser. A diagnostic preview was logged.
    #[error("non-JSON response for {url} (status {status}, content type {content_type:?})")]
    NonJsonContent {
        url: String,
        status: u16,
        content_type: Option<String>,
    },

    /// The content type was JSON-like but the body failed to parse.
    #[error("malformed JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a response body as JSON after validating its declared content type.
///
/// Non-JSON content types log an error-level diagnostic (url, status,
/// declared type, first 200 characters of the body) and fail with
/// [`ResponseError::NonJsonContent`]. JSON-like content types defer to
/// `serde_json` unchanged.
pub fn parse_json(response: &RawResponse) -> Result<serde_json::Value, ResponseError> {
    let content_type = response.content_type.as_deref().unwrap_or("");

    if !is_json_like(content_type) {
        let preview: String = response.body.chars().take(PREVIEW_LIMIT).collect();
        tracing::error!(
            url = %response.url,
            status = response.status,
            content_type,
            preview = %preview,
            "non-JSON response when JSON was expected"
        );
        return Err(ResponseError::NonJsonContent {
            url: response.url.clone(),
            status: response.status,
            content_type: response.content_type.clone(),
        });
    }

    Ok(serde_json::from_str(&response.body)?)
}

/// Whether a declared content type is JSON-like: `application/json` or
/// `application/*+json`, case-insensitive, parameters ignored.
fn is_json_like(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
