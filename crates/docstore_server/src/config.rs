//! Server configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Configuration for the resource server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7272".parse().expect("valid literal address"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(
            config.bind_addr,
            "127.0.0.1:7272".parse::<SocketAddr>().unwrap()
        );
    }
}
