//! Peer Connector
//!
//! Opens a connection to one peer and keeps trying until it is usable. The
//! first attempt is a full handshake; later attempts only re-check the same
//! connection, with exponential backoff and jitter in between.

use crate::config::CollectorConfig;
use crate::transport::client::Transport;

use std::net::SocketAddr;
use std::time::Duration;

/// Returns a verified connection, or `None` once `max_connect_attempts` is spent.
///
/// Without an attempt limit this only returns on success; callers bound it
/// with a deadline or cancellation.
pub async fn connect_with_retry<T: Transport>(
    transport: &T,
    endpoint: SocketAddr,
    config: &CollectorConfig,
) -> Option<T::Connection> {
    let conn = transport.open(endpoint);
    let mut delay_ms = (config.initial_backoff.as_millis() as u64).max(1);
    let max_delay_ms = (config.max_backoff.as_millis() as u64).max(delay_ms);
    let mut attempt: u32 = 0;

    loop {
        let status = if attempt == 0 {
            tracing::info!("Connecting to {}", endpoint);
            transport.connect(&conn).await
        } else {
            tracing::info!("Reconnecting to {} (attempt {})", endpoint, attempt + 1);
            transport.check_connection(&conn).await
        };
        attempt += 1;

        match status {
            Ok(()) => {
                tracing::info!("Connected to {} after {} attempt(s)", endpoint, attempt);
                return Some(conn);
            }
            Err(e) => {
                if config
                    .max_connect_attempts
                    .is_some_and(|limit| attempt >= limit)
                {
                    tracing::warn!(
                        "Giving up on {} after {} attempt(s): {}",
                        endpoint,
                        attempt,
                        e
                    );
                    return None;
                }

                tracing::debug!("Connection to {} failed: {}", endpoint, e);
                let jitter = rand::random::<u64>() % (delay_ms / 4 + 1);
                tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                delay_ms = (delay_ms * 2).min(max_delay_ms);
            }
        }
    }
}
