use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::parser::{ParseError, parse_request};
use crate::http::reader::{ReadLimits, RequestReader};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::resource::{ContentGenerator, ResolveError, Resolver, Resource};

/// Serves exactly one request on a client stream, then closes it.
pub struct Connection<'r, S, G> {
    stream: S,
    reader: RequestReader,
    resolver: &'r Resolver<G>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(String), // raw request head
    Writing(ResponseWriter),
    Closed,
}

/// What the server decided to do with a request.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Serve(Resource),
    MethodNotAllowed,
    NotFound,
}

impl Outcome {
    pub fn into_response(self) -> Response {
        match self {
            Outcome::Serve(resource) => Response::ok(resource.content, resource.media_type),
            Outcome::MethodNotAllowed => Response::method_not_allowed(),
            Outcome::NotFound => Response::not_found(),
        }
    }
}

impl<'r, S, G> Connection<'r, S, G>
where
    S: AsyncRead + AsyncWrite + Unpin,
    G: ContentGenerator,
{
    pub fn new(stream: S, resolver: &'r Resolver<G>, limits: ReadLimits) -> Self {
        Self {
            stream,
            reader: RequestReader::new(limits),
            resolver,
            state: ConnectionState::Reading,
        }
    }

    /// Read, decide, write, close.
    ///
    /// An error means the connection was dropped without a response. The
    /// stream is released when `self` goes out of scope either way.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    let head = self
                        .reader
                        .read_head(&mut self.stream)
                        .await
                        .context("failed to read request head")?;

                    tracing::debug!(request = %head, "Request received");
                    self.state = ConnectionState::Processing(head);
                }

                ConnectionState::Processing(head) => {
                    let response = decide(head, self.resolver).await?.into_response();

                    tracing::info!(
                        status = response.status.as_u16(),
                        content_type = response.header("Content-Type").unwrap_or("-"),
                        body_bytes = response.body.len(),
                        "Responding"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Parses a request head and resolves its target.
///
/// Method and lookup failures become outcomes with their own status;
/// malformed requests and filesystem or generator failures are errors.
pub async fn decide<G: ContentGenerator>(
    head: &str,
    resolver: &Resolver<G>,
) -> anyhow::Result<Outcome> {
    let request = match parse_request(head) {
        Ok(request) => request,
        Err(ParseError::UnsupportedMethod(method)) => {
            tracing::warn!(method = %method, "Method not allowed");
            return Ok(Outcome::MethodNotAllowed);
        }
        Err(e) => return Err(e).context("rejected request line"),
    };

    match resolver.resolve(&request.target).await {
        Ok(resource) => {
            tracing::info!(
                method = %request.method,
                path = %request.target,
                kind = ?resource.kind,
                "Resolved"
            );
            Ok(Outcome::Serve(resource))
        }
        Err(e @ (ResolveError::NotFound(_) | ResolveError::UnsupportedMediaType(_))) => {
            tracing::warn!(path = %request.target, reason = %e, "Not found");
            Ok(Outcome::NotFound)
        }
        Err(e) => Err(e).with_context(|| format!("failed to resolve {}", request.target)),
    }
}
