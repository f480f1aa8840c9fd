//! Check Server Adapter
//!
//! Answers "may this address connect?" over TCP using the application
//! service layer.
//!
//! Each request is one line, `<remote_addr> [<remote_iface>]`; each reply
//! is one JSON line, `{"allowed":true,"message":""}`. Blank lines are
//! skipped.

use crate::application::GeoFilter;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Reply to a single check, in the shape of the host's IP filter hook.
///
/// `message` is empty when the connection is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub allowed: bool,
    pub message: String,
}

impl CheckResponse {
    /// Run one check against the filter.
    pub fn check(filter: &GeoFilter, remote_addr: &str, remote_iface: &str) -> Self {
        match filter.check_ip(remote_addr, remote_iface) {
            Ok(()) => Self {
                allowed: true,
                message: String::new(),
            },
            Err(denial) => Self {
                allowed: false,
                message: denial.to_string(),
            },
        }
    }
}

/// Check Server - inbound adapter for filter requests.
///
/// This adapter:
/// 1. Accepts incoming TCP connections
/// 2. Reads one request per line
/// 3. Uses GeoFilter to decide and writes back one JSON reply per line
pub struct CheckServer {
    filter: Arc<GeoFilter>,
    listen_addr: String,
}

impl CheckServer {
    /// Create a new check server.
    pub fn new(filter: Arc<GeoFilter>, listen_addr: String) -> Self {
        Self {
            filter,
            listen_addr,
        }
    }

    /// Bind the configured address and serve until the task is dropped.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("geoip-filter listening on {}", self.listen_addr);
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, addr) = listener.accept().await?;
            let filter = self.filter.clone();

            tokio::spawn(async move {
                if let Err(e) = Self::handle_connection(filter, stream, addr).await {
                    tracing::error!("connection error from {}: {:?}", addr, e);
                }
            });
        }
    }

    /// Handle a single client connection until it closes.
    async fn handle_connection(
        filter: Arc<GeoFilter>,
        stream: TcpStream,
        peer: SocketAddr,
    ) -> anyhow::Result<()> {
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        tracing::debug!("check client connected: {}", peer);

        while let Some(line) = lines.next_line().await? {
            let Some(response) = Self::handle_request(&filter, &line) else {
                continue;
            };

            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            write_half.write_all(&payload).await?;
        }

        tracing::debug!("check client disconnected: {}", peer);
        Ok(())
    }

    /// Parse one request line and run the check. Blank lines yield None.
    fn handle_request(filter: &GeoFilter, line: &str) -> Option<CheckResponse> {
        let mut parts = line.split_whitespace();
        let remote_addr = parts.next()?;
        let remote_iface = parts.next().unwrap_or_default();

        Some(CheckResponse::check(filter, remote_addr, remote_iface))
    }
}
