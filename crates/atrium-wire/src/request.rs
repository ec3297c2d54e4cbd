//! Request-line parsing.

use crate::error::{Result, WireError};

/// A parsed request: the target method and its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method name: the target path with the leading `/` stripped.
    /// Empty for a root request.
    pub method: String,
    /// Query values in order of appearance. Key names are dropped:
    /// callers supply arguments in the declared order of the target
    /// operation.
    pub args: Vec<String>,
}

impl Request {
    /// Whether this is a root request (empty method), answered with
    /// the service's status page.
    pub fn is_root(&self) -> bool {
        self.method.is_empty()
    }

    /// Whether this is browser favicon noise, short-circuited with a
    /// bare 200.
    pub fn is_favicon(&self) -> bool {
        self.method == "favicon.ico"
    }
}

/// Parse a raw request buffer.
///
/// Only the first line is interpreted: `<VERB> /<method>?<query>`,
/// with an optional trailing protocol version which is ignored (peers
/// send both `HTTP/1.0` and `HTTP/1.1` in the wild). Query pairs must
/// be `key=value`; a pair without `=` is malformed.
pub fn parse_request(raw: &str) -> Result<Request> {
    let line = raw
        .lines()
        .next()
        .ok_or_else(|| WireError::MalformedRequest("empty request".to_string()))?;

    let mut tokens = line.split_whitespace();
    let _verb = tokens
        .next()
        .ok_or_else(|| WireError::MalformedRequest("empty request line".to_string()))?;
    let target = tokens.next().ok_or_else(|| {
        WireError::MalformedRequest(format!("request line '{line}' has no target"))
    })?;

    let target = target.strip_prefix('/').ok_or_else(|| {
        WireError::MalformedRequest(format!("target '{target}' does not start with '/'"))
    })?;

    let (method, query) = match target.split_once('?') {
        Some((method, query)) => (method, query),
        None => (target, ""),
    };

    let mut args = Vec::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (_key, value) = pair.split_once('=').ok_or_else(|| {
            WireError::MalformedRequest(format!("query pair '{pair}' is not key=value"))
        })?;
        args.push(value.to_string());
    }

    Ok(Request {
        method: method.to_string(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_method_and_positional_args() {
        let request =
            parse_request("GET /reserve?name=A1&day=1&hour=9&duration=2 HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.method, "reserve");
        assert_eq!(request.args, vec!["A1", "1", "9", "2"]);
    }

    #[test]
    fn key_names_are_ignored_only_order_matters() {
        let request = parse_request("GET /reserve?x=A1&y=1 HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.args, vec!["A1", "1"]);
    }

    #[test]
    fn root_request_has_empty_method() {
        let request = parse_request("GET / HTTP/1.0\r\n\r\n").unwrap();
        assert!(request.is_root());
        assert!(request.args.is_empty());
    }

    #[test]
    fn favicon_is_recognised() {
        let request = parse_request("GET /favicon.ico HTTP/1.1\r\n\r\n").unwrap();
        assert!(request.is_favicon());
    }

    #[test]
    fn missing_protocol_version_is_tolerated() {
        let request = parse_request("GET /check?name=yoga").unwrap();
        assert_eq!(request.method, "check");
        assert_eq!(request.args, vec!["yoga"]);
    }

    #[test]
    fn query_pair_without_equals_is_malformed() {
        let err = parse_request("GET /add?name HTTP/1.0\r\n\r\n").unwrap_err();
        assert!(matches!(err, WireError::MalformedRequest(_)));
    }

    #[test]
    fn target_must_start_with_slash() {
        let err = parse_request("GET add?name=A1 HTTP/1.0\r\n\r\n").unwrap_err();
        assert!(matches!(err, WireError::MalformedRequest(_)));
    }

    #[test]
    fn empty_buffer_is_malformed() {
        assert!(parse_request("").is_err());
    }

    #[test]
    fn empty_query_yields_no_args() {
        let request = parse_request("GET /checkavailability? HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(request.method, "checkavailability");
        assert!(request.args.is_empty());
    }
}
