//! Response rendering and parsing.

use atrium_types::{Outcome, Status};

use crate::error::{Result, WireError};

/// Protocol version emitted on every response line.
pub const PROTOCOL_VERSION: &str = "HTTP/1.0";

/// A response as seen by the calling side: status plus body fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    /// Parsed status of the response line.
    pub status: Status,
    /// HTML fragment following the blank line, trailing whitespace
    /// stripped.
    pub body: String,
}

impl WireResponse {
    /// Whether the response carries a 200 status.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Render an outcome as wire bytes: status line, blank line, body.
pub fn render(outcome: &Outcome) -> String {
    format!(
        "{PROTOCOL_VERSION} {}\r\n\r\n{}\n",
        outcome.status, outcome.message
    )
}

/// Render a bare status line with no body (favicon short-circuit).
pub fn render_empty(status: Status) -> String {
    format!("{PROTOCOL_VERSION} {status}\r\n\r\n")
}

/// Parse a raw response buffer into status and body.
pub fn parse_response(raw: &str) -> Result<WireResponse> {
    let line = raw
        .lines()
        .next()
        .ok_or_else(|| WireError::MalformedResponse("empty response".to_string()))?;

    let mut tokens = line.split_whitespace();
    let _version = tokens.next();
    let code = tokens
        .next()
        .and_then(|t| t.parse::<u16>().ok())
        .ok_or_else(|| {
            WireError::MalformedResponse(format!("response line '{line}' has no status code"))
        })?;
    let status = Status::from_code(code)
        .ok_or_else(|| WireError::MalformedResponse(format!("unexpected status code {code}")))?;

    let body = raw
        .split_once("\r\n\r\n")
        .or_else(|| raw.split_once("\n\n"))
        .map(|(_, body)| body.trim_end().to_string())
        .unwrap_or_default();

    Ok(WireResponse { status, body })
}
