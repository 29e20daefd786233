pub mod dns;
pub mod http;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hard deadline for a single probe, HTTP request or DNS lookup alike.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Status codes that count as a discovered resource. Redirects and
/// auth-gated responses are kept; 404 and 5xx are not.
pub const HIT_STATUS_CODES: [u16; 7] = [200, 204, 301, 302, 307, 401, 403];

pub fn is_hit_status(status: u16) -> bool {
    HIT_STATUS_CODES.contains(&status)
}

/// A probe result worth reporting: the identifier that was probed
/// (full URL, FQDN, or vhost name) plus the observed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub identifier: String,
    pub status: u16,
    pub size: usize,
}

impl Hit {
    pub fn http(identifier: String, status: u16, size: usize) -> Self {
        Self { identifier, status, size }
    }

    /// DNS hits have no HTTP response behind them; status and size stay
    /// zeroed and are never serialized for subdomain results.
    pub fn dns(identifier: String) -> Self {
        Self { identifier, status: 0, size: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeErrorKind {
    Timeout,
    Connect,
    Resolution,
    Other,
}

/// Outcome of a single probe. Transport failures never escape a probe;
/// they degrade to `Error` and count as misses for reporting purposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Hit(Hit),
    Miss,
    Suppressed,
    Error(ProbeErrorKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_statuses_match_policy() {
        for status in [200, 204, 301, 302, 307, 401, 403] {
            assert!(is_hit_status(status), "{status} should be a hit");
        }
    }

    #[test]
    fn non_hit_statuses_rejected() {
        for status in [100, 201, 304, 308, 400, 404, 405, 418, 429, 500, 502, 503] {
            assert!(!is_hit_status(status), "{status} should not be a hit");
        }
    }
}
