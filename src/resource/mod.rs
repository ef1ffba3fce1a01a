//! Resource resolution
//!
//! This module turns a request path into something servable: the bytes of a
//! file under the document root, the output of a generator script, or a
//! plain-text listing of a directory.

pub mod generator;
pub mod resolver;

pub use generator::{ContentGenerator, ScriptRunner};
pub use resolver::{Containment, ResolveError, Resolver, Resource, ResourceKind};
