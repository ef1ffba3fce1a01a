use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::{TcpListener, TcpSocket};
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::reader::ReadLimits;
use crate::resource::{Resolver, ScriptRunner};

/// Pending connections the kernel may queue while one is being served.
const BACKLOG: u32 = 1;

/// Accepts and serves connections one at a time.
pub struct Server {
    listener: TcpListener,
    resolver: Resolver<ScriptRunner>,
    limits: ReadLimits,
}

impl Server {
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        cfg.validate()?;

        let addr: SocketAddr = cfg
            .listen_addr
            .parse()
            .with_context(|| format!("invalid listen address {}", cfg.listen_addr))?;
        let listener = listen(addr).with_context(|| format!("failed to bind {}", addr))?;

        info!(
            addr = %listener.local_addr()?,
            root = %cfg.document_root.display(),
            containment = ?cfg.containment,
            "Listening"
        );

        let resolver = Resolver::new(
            cfg.document_root.clone(),
            cfg.containment,
            cfg.generator.extension.clone(),
            ScriptRunner::new(cfg.generator.interpreter.clone()),
        );

        Ok(Self {
            listener,
            resolver,
            limits: cfg.read_limits(),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs until the task is dropped. Failures are confined to the
    /// connection they happen on.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            info!("Waiting for a connection");
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                    continue;
                }
            };
            info!(peer = %peer, "Accepted connection");

            // Serve inline: the next accept waits for this client to finish
            let mut conn = Connection::new(socket, &self.resolver, self.limits);
            if let Err(e) = conn.run().await {
                tracing::error!(peer = %peer, "Connection error: {:#}", e);
            }
        }
    }
}

fn listen(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(BACKLOG)
}
