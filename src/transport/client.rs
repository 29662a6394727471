//! Transport Client
//!
//! The `Transport` trait is the seam the collector is written against; `HttpTransport`
//! is the production implementation speaking the protocol in `protocol.rs` over HTTP.

use super::protocol::{
    ENDPOINT_FIND, ENDPOINT_HELLO, ENDPOINT_PING, FindRequest, FindResponse, HelloRequest,
    HelloResponse,
};
use crate::document::types::Document;

use anyhow::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

/// Application name sent with every handshake.
pub const APPLICATION_NAME: &str = "SplitCollector";

/// Connection-oriented access to one peer.
///
/// `open` only builds a handle; nothing touches the network until `connect`.
pub trait Transport: Send + Sync + 'static {
    type Connection: Send + Sync + 'static;

    fn open(&self, endpoint: SocketAddr) -> Self::Connection;

    /// Full handshake.
    fn connect(&self, conn: &Self::Connection) -> impl Future<Output = Result<()>> + Send;

    /// Cheap reachability re-check of an opened connection.
    fn check_connection(&self, conn: &Self::Connection) -> impl Future<Output = Result<()>> + Send;

    /// Runs a point query and returns the first batch of records.
    fn find(
        &self,
        conn: &Self::Connection,
        request: &FindRequest,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send;
}

/// Handle to a peer reachable over HTTP.
#[derive(Debug, Clone)]
pub struct PeerConnection {
    pub endpoint: SocketAddr,
    base_url: String,
}

impl PeerConnection {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub struct HttpTransport {
    http_client: reqwest::Client,
    request_timeout: Duration,
    base_path: String,
}

impl HttpTransport {
    pub fn new(request_timeout: Duration) -> Self {
        Self::new_with_base(request_timeout, "")
    }

    /// Like `new`, for peers serving the protocol under a path prefix.
    pub fn new_with_base(request_timeout: Duration, base_path: &str) -> Self {
        let cleaned = base_path.trim_end_matches('/');
        let base_path = if cleaned.is_empty() {
            String::new()
        } else if cleaned.starts_with('/') {
            cleaned.to_string()
        } else {
            format!("/{}", cleaned)
        };

        Self {
            http_client: reqwest::Client::new(),
            request_timeout,
            base_path,
        }
    }
}

impl Transport for HttpTransport {
    type Connection = PeerConnection;

    fn open(&self, endpoint: SocketAddr) -> PeerConnection {
        PeerConnection {
            endpoint,
            base_url: format!("http://{}{}", endpoint, self.base_path),
        }
    }

    async fn connect(&self, conn: &PeerConnection) -> Result<()> {
        let response = self
            .http_client
            .post(conn.url(ENDPOINT_HELLO))
            .json(&HelloRequest {
                application: APPLICATION_NAME.to_string(),
            })
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Handshake failed {}", response.status()));
        }

        let hello: HelloResponse = response.json().await?;
        if !hello.ok {
            return Err(anyhow::anyhow!("Handshake rejected by {}", conn.endpoint));
        }

        Ok(())
    }

    async fn check_connection(&self, conn: &PeerConnection) -> Result<()> {
        let response = self
            .http_client
            .get(conn.url(ENDPOINT_PING))
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Ping failed {}", response.status()));
        }

        Ok(())
    }

    async fn find(&self, conn: &PeerConnection, request: &FindRequest) -> Result<Vec<Document>> {
        let response = self
            .http_client
            .post(conn.url(ENDPOINT_FIND))
            .json(request)
            .timeout(self.request_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Find request failed {}", response.status()));
        }

        let find: FindResponse = response.json().await?;
        Ok(find.batch)
    }
}
