//! Shared HTTP client for the upstream API clients.
//!
//! One client serves both the vulnerability database and the hosting
//! platform. Sharing it enables:
//!
//! - Connection reuse across the two services
//! - HTTP/2 multiplexing where supported
//! - Reduced TLS handshake overhead
//! - Shared DNS cache
//! - Lower memory footprint

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::Result;

const USER_AGENT: &str = concat!(
    "cvetrace/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/cvetrace/cvetrace)"
);

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn create_shared_client() -> Result<Arc<Client>> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Duration::from_secs(60))
        .build()?;

    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_shared_client() {
        let client = create_shared_client().expect("Failed to create client");
        assert!(Arc::strong_count(&client) == 1);
    }

    #[test]
    fn test_client_can_be_cloned() {
        let client = create_shared_client().expect("Failed to create client");
        let client2 = Arc::clone(&client);
        assert!(Arc::strong_count(&client) == 2);
        drop(client2);
        assert!(Arc::strong_count(&client) == 1);
    }
}
