//! Client side of the wire protocol.
//!
//! The orchestrator uses [`WireClient`] for its cross-service calls.
//! Calls are synchronous request/response over a fresh connection:
//! connect, write the request line, read to EOF, parse. Connect and
//! read are both bounded by timeouts; expiry surfaces as
//! [`WireError::Timeout`], which callers map to an internal-error
//! outcome rather than hanging.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::error::{Result, WireError};
use crate::response::{WireResponse, parse_response};

/// Default deadline for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for reading the full response.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Inter-service request client.
#[derive(Debug, Clone)]
pub struct WireClient {
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for WireClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WireClient {
    /// Client with the default timeouts.
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Client with explicit connect and read deadlines.
    pub fn with_timeouts(connect_timeout: Duration, read_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            read_timeout,
        }
    }

    /// Format a request line for a method and its named arguments.
    pub fn format_request(method: &str, args: &[(&str, &str)]) -> String {
        if args.is_empty() {
            return format!("GET /{method} HTTP/1.0\r\n\r\n");
        }
        let query = args
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("GET /{method}?{query} HTTP/1.0\r\n\r\n")
    }

    /// Send one request to `addr` and wait for the full response.
    pub async fn call(
        &self,
        addr: &str,
        method: &str,
        args: &[(&str, &str)],
    ) -> Result<WireResponse> {
        let request = Self::format_request(method, args);
        debug!(addr, method, "outbound wire call");

        let mut stream = timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| WireError::Timeout { action: "connect" })??;

        stream.write_all(request.as_bytes()).await?;

        let mut buf = Vec::new();
        timeout(self.read_timeout, stream.read_to_end(&mut buf))
            .await
            .map_err(|_| WireError::Timeout { action: "read" })??;

        parse_response(&String::from_utf8_lossy(&buf))
    }
}
