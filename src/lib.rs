//! Webroot - a minimal static file server
//!
//! Serves files and plain-text directory listings from a single document
//! root over HTTP/1.1, one connection at a time.

pub mod config;
pub mod http;
pub mod resource;
pub mod server;
