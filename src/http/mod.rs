//! HTTP protocol implementation.
//!
//! This module implements a deliberately small HTTP/1.1 server: one request
//! per connection, GET only, no length framing (the connection closing marks
//! the end of the body).
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: Drives one client through read, decide, write, close
//! - **`reader`**: Accumulates bytes until the request head is complete
//! - **`parser`**: Extracts method and target from the request line
//! - **`request`**: HTTP request representation
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for "\r\n\r\n"
//!        └──────┬──────┘
//!               │ Request head received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, resolve, pick 200 / 404 / 405
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! Any failure along the way (malformed request line, early EOF, oversized
//! head, read timeout, I/O error) ends the connection without a response.
//!
//! # Example
//!
//! ```ignore
//! use webroot::http::connection::Connection;
//! use webroot::http::reader::ReadLimits;
//! use webroot::resource::{Containment, Resolver, ScriptRunner};
//! use tokio::net::TcpListener;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let resolver = Resolver::new("./webroot", Containment::Canonical, "py", ScriptRunner::new("python3"));
//!     let listener = TcpListener::bind("127.0.0.1:10000").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, &resolver, ReadLimits::default());
//!         if let Err(e) = conn.run().await {
//!             eprintln!("Connection error: {:#}", e);
//!         }
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
