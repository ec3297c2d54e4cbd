//! The service trait and the shared accept loop.
//!
//! A [`Service`] is one routable endpoint collection: it names itself
//! for the status page, declares its closed route table, and executes
//! already-validated calls. [`serve`] runs the accept loop, handling
//! each connection in its own task: read the request, dispatch, write
//! the response, close.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use atrium_types::{Outcome, Status};
use atrium_wire::{parse_request, render, render_empty, resolve, RouteSpec};

/// Upper bound on a request buffer; everything past it is ignored.
const MAX_REQUEST_BYTES: usize = 4096;

/// Deadline for receiving a complete request head. A peer that
/// connects and stalls fails the connection instead of pinning its
/// task forever.
const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// One of the three atrium services, as seen by the dispatch loop.
#[async_trait]
pub trait Service: Send + Sync {
    /// Service name shown on the status page and in logs.
    fn name(&self) -> &'static str;

    /// The closed table of declared operations.
    fn routes(&self) -> &'static [RouteSpec];

    /// Execute an operation. `method` and the argument count have
    /// already been validated against [`Self::routes`].
    async fn call(&self, method: &str, args: &[String]) -> Outcome;
}

/// Turn one raw request buffer into the full response text.
///
/// Routing failures (malformed request line, unknown method, wrong
/// arity) answer 400 without reaching the service. Successfully
/// routed calls are logged with the resolved method and arguments
/// before execution.
pub async fn handle_request(service: &dyn Service, raw: &str) -> String {
    let request = match parse_request(raw) {
        Ok(request) => request,
        Err(e) => return render(&Outcome::invalid(format!("<h2>{e}</h2>"))),
    };

    if request.is_favicon() {
        return render_empty(Status::Ok);
    }
    if request.is_root() {
        return render(&Outcome::ok(format!("<h1>{}</h1>", service.name())));
    }

    if let Err(e) = resolve(service.routes(), &request.method, request.args.len()) {
        debug!(service = service.name(), error = %e, "rejected request");
        return render(&Outcome::invalid(format!("<h2>{e}</h2>")));
    }

    info!(
        service = service.name(),
        method = %request.method,
        args = ?request.args,
        "dispatch"
    );
    let outcome = service.call(&request.method, &request.args).await;
    render(&outcome)
}

/// Accept loop: one spawned task per connection.
pub async fn serve(listener: TcpListener, service: Arc<dyn Service>) -> std::io::Result<()> {
    info!(
        service = service.name(),
        addr = %listener.local_addr()?,
        "listening"
    );
    loop {
        let (stream, peer) = listener.accept().await?;
        let service = Arc::clone(&service);
        tokio::spawn(async move {
            debug!(service = service.name(), %peer, "connection accepted");
            if let Err(e) = handle_connection(stream, service.as_ref()).await {
                warn!(service = service.name(), %peer, error = %e, "connection failed");
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, service: &dyn Service) -> std::io::Result<()> {
    let raw = read_request(&mut stream, REQUEST_READ_TIMEOUT).await?;
    let response = handle_request(service, &raw).await;
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

/// Read until the end of the request head, EOF, the size cap, or the
/// deadline.
async fn read_request(stream: &mut TcpStream, deadline: Duration) -> std::io::Result<String> {
    let head = async {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if buf.len() >= MAX_REQUEST_BYTES || buf.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    };
    timeout(deadline, head).await.map_err(|_| {
        std::io::Error::new(std::io::ErrorKind::TimedOut, "request read timed out")
    })?
}

/// Parse a positional numeric argument. Out-of-range and non-numeric
/// values both fail validation in the operations, so `u32` is enough.
pub(crate) fn numeric(value: &str) -> Option<u32> {
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoService;

    #[async_trait]
    impl Service for EchoService {
        fn name(&self) -> &'static str {
            "EchoService"
        }

        fn routes(&self) -> &'static [RouteSpec] {
            const ROUTES: &[RouteSpec] =
                &[RouteSpec::exact("echo", 1), RouteSpec::ranged("maybe", 0, 1)];
            ROUTES
        }

        async fn call(&self, method: &str, args: &[String]) -> Outcome {
            Outcome::ok(format!("{method}:{}", args.join(",")))
        }
    }

    #[tokio::test]
    async fn root_request_answers_the_status_page() {
        let response = handle_request(&EchoService, "GET / HTTP/1.0\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(response.contains("<h1>EchoService</h1>"));
    }

    #[tokio::test]
    async fn favicon_gets_a_bare_ok() {
        let response = handle_request(&EchoService, "GET /favicon.ico HTTP/1.1\r\n\r\n").await;
        assert_eq!(response, "HTTP/1.0 200 OK\r\n\r\n");
    }

    #[tokio::test]
    async fn declared_method_is_dispatched_with_positional_args() {
        let response = handle_request(&EchoService, "GET /echo?name=hi HTTP/1.0\r\n\r\n").await;
        assert!(response.contains("echo:hi"));
    }

    #[tokio::test]
    async fn unknown_method_is_a_bad_request() {
        let response = handle_request(&EchoService, "GET /shutdown HTTP/1.0\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
        assert!(response.contains("unknown method 'shutdown'"));
    }

    #[tokio::test]
    async fn wrong_arity_is_a_bad_request() {
        let response =
            handle_request(&EchoService, "GET /echo?a=1&b=2 HTTP/1.0\r\n\r\n").await;
        assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn optional_argument_routes_both_arities() {
        let with = handle_request(&EchoService, "GET /maybe?day=1 HTTP/1.0\r\n\r\n").await;
        let without = handle_request(&EchoService, "GET /maybe HTTP/1.0\r\n\r\n").await;
        assert!(with.contains("maybe:1"));
        assert!(without.contains("maybe:"));
    }

    #[tokio::test]
    async fn malformed_request_line_is_a_bad_request() {
        let response = handle_request(&EchoService, "garbage").await;
        assert!(response.starts_with("HTTP/1.0 400 Bad Request\r\n"));
    }

    #[tokio::test]
    async fn silent_peer_times_out_instead_of_pinning_the_task() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Connect and send nothing.
        let _client = TcpStream::connect(addr).await.unwrap();
        let (mut stream, _) = listener.accept().await.unwrap();

        let err = read_request(&mut stream, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::TimedOut);
    }
}
