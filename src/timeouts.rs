//! Timeout configuration for client operations.

use std::time::Duration;

/// Timeouts applied to every HTTP request the client makes.
#[derive(Debug, Clone)]
pub struct TallyLinkTimeouts {
    /// Timeout for establishing connections (TCP + TLS handshake).
    /// Default: 10 seconds.
    pub connection_timeout: Duration,

    /// Timeout for receiving the response after a request is sent.
    /// Default: 30 seconds.
    pub receive_timeout: Duration,
}

impl Default for TallyLinkTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            receive_timeout: Duration::from_secs(30),
        }
    }
}

impl TallyLinkTimeouts {
    /// Aggressive timeouts for local development.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            receive_timeout: Duration::from_secs(5),
        }
    }

    pub fn builder() -> TallyLinkTimeoutsBuilder {
        TallyLinkTimeoutsBuilder::default()
    }
}

/// Builder for [`TallyLinkTimeouts`]; unset fields keep their defaults.
#[derive(Default)]
pub struct TallyLinkTimeoutsBuilder {
    connection_timeout: Option<Duration>,
    receive_timeout: Option<Duration>,
}

impl TallyLinkTimeoutsBuilder {
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> TallyLinkTimeouts {
        let defaults = TallyLinkTimeouts::default();
        TallyLinkTimeouts {
            connection_timeout: self.connection_timeout.unwrap_or(defaults.connection_timeout),
            receive_timeout: self.receive_timeout.unwrap_or(defaults.receive_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let timeouts = TallyLinkTimeouts::default();
        assert_eq!(timeouts.connection_timeout, Duration::from_secs(10));
        assert_eq!(timeouts.receive_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_overrides_only_set_fields() {
        let timeouts = TallyLinkTimeouts::builder()
            .receive_timeout(Duration::from_secs(120))
            .build();
        assert_eq!(timeouts.receive_timeout, Duration::from_secs(120));
        assert_eq!(timeouts.connection_timeout, Duration::from_secs(10));
    }
}
