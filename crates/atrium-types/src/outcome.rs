//! Operation outcomes and their wire status codes.
//!
//! Every service operation returns an [`Outcome`], a status plus a
//! short human-readable message, instead of raising an error across
//! the dispatch boundary. The status set is the exact subset of
//! HTTP/1.0 codes the wire protocol uses, with reasons reproduced
//! verbatim for compatibility.

use std::fmt;

/// Wire status of an operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200: the operation succeeded.
    Ok,
    /// 400: malformed or out-of-range arguments, or a routing error.
    BadRequest,
    /// 403: duplicate create, slot conflict, or absence on remove
    /// (the observed behavior keeps 403 there, not 404).
    Forbidden,
    /// 404: a referenced room or activity does not exist.
    NotFound,
    /// 500: unexpected downstream failure or aggregate failure.
    InternalError,
}

impl Status {
    /// Numeric status code.
    pub const fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::BadRequest => 400,
            Status::Forbidden => 403,
            Status::NotFound => 404,
            Status::InternalError => 500,
        }
    }

    /// Reason phrase, reproduced verbatim.
    pub const fn reason(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::Forbidden => "Forbidden",
            Status::NotFound => "Not Found",
            Status::InternalError => "Internal Server Error",
        }
    }

    /// Map a numeric code back to a status, for response parsing.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Status::Ok),
            400 => Some(Status::BadRequest),
            403 => Some(Status::Forbidden),
            404 => Some(Status::NotFound),
            500 => Some(Status::InternalError),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// Status-plus-message result of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Wire status for the response line.
    pub status: Status,
    /// HTML fragment sent as the response body.
    pub message: String,
}

impl Outcome {
    /// Build an outcome from a status and message.
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 200 outcome.
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Status::Ok, message)
    }

    /// 400 outcome (invalid input or routing error).
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(Status::BadRequest, message)
    }

    /// 403 outcome (duplicate, conflict, or observed-behavior absence).
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(Status::Forbidden, message)
    }

    /// 404 outcome.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Status::NotFound, message)
    }

    /// 500 outcome.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Status::InternalError, message)
    }

    /// Whether the outcome carries a 200 status.
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
