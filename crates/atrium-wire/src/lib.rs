//! Wire protocol for the atrium service cluster.
//!
//! The services speak a deliberately small HTTP/1.0-shaped text
//! protocol over plain TCP: one request line
//! (`GET /<method>?<k>=<v>&... HTTP/1.0`), no body, and a response of
//! a status line, a blank line, and an HTML fragment. Query values
//! are positional: their order of appearance maps onto the declared
//! operation's parameters and key names are ignored.
//!
//! Dispatch is closed: a [`RouteSpec`] table declares every reachable
//! method together with its accepted argument count, and anything
//! outside the table is rejected before execution.

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod routes;

pub use client::WireClient;
pub use error::{Result, WireError};
pub use request::{Request, parse_request};
pub use response::{WireResponse, parse_response, render, render_empty};
pub use routes::{RouteError, RouteSpec, resolve};
