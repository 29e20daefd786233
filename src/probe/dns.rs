use std::net::Ipv4Addr;
use std::time::Duration;

use ahash::AHashSet;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;

use super::{Hit, ProbeErrorKind, ProbeOutcome};

pub fn build_resolver(timeout: Duration) -> TokioAsyncResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
}

/// Suppression rule for DNS wildcarding: a resolution is noise only when
/// every resolved address is already in the wildcard baseline. Partial
/// overlap still counts as a find.
pub fn is_wildcard_noise(
    ips: &AHashSet<Ipv4Addr>,
    baseline: Option<&AHashSet<Ipv4Addr>>,
) -> bool {
    match baseline {
        Some(baseline) => !ips.is_empty() && ips.iter().all(|ip| baseline.contains(ip)),
        None => false,
    }
}

/// Resolve one candidate FQDN for A records. NXDOMAIN, empty answers and
/// lookup timeouts are clean misses; anything else is a resolution
/// anomaly, logged and tallied but never fatal.
pub async fn probe_subdomain(
    resolver: &TokioAsyncResolver,
    fqdn: String,
    wildcard: Option<&AHashSet<Ipv4Addr>>,
) -> ProbeOutcome {
    match resolver.ipv4_lookup(fqdn.as_str()).await {
        Ok(lookup) => {
            let ips: AHashSet<Ipv4Addr> = lookup.iter().map(|a| a.0).collect();
            if ips.is_empty() {
                ProbeOutcome::Miss
            } else if is_wildcard_noise(&ips, wildcard) {
                ProbeOutcome::Suppressed
            } else {
                ProbeOutcome::Hit(Hit::dns(fqdn))
            }
        }
        Err(err) => match err.kind() {
            ResolveErrorKind::NoRecordsFound { .. } | ResolveErrorKind::Timeout => {
                ProbeOutcome::Miss
            }
            _ => {
                tracing::warn!(%fqdn, error = %err, "error resolving subdomain");
                ProbeOutcome::Error(ProbeErrorKind::Resolution)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ips(addrs: &[[u8; 4]]) -> AHashSet<Ipv4Addr> {
        addrs
            .iter()
            .map(|[a, b, c, d]| Ipv4Addr::new(*a, *b, *c, *d))
            .collect()
    }

    #[test]
    fn no_baseline_never_suppresses() {
        let resolved = ips(&[[1, 2, 3, 4]]);
        assert!(!is_wildcard_noise(&resolved, None));
    }

    #[test]
    fn full_containment_suppresses() {
        let baseline = ips(&[[1, 2, 3, 4], [5, 6, 7, 8]]);
        let resolved = ips(&[[1, 2, 3, 4]]);
        assert!(is_wildcard_noise(&resolved, Some(&baseline)));

        let both = ips(&[[1, 2, 3, 4], [5, 6, 7, 8]]);
        assert!(is_wildcard_noise(&both, Some(&baseline)));
    }

    #[test]
    fn partial_overlap_does_not_suppress() {
        let baseline = ips(&[[1, 2, 3, 4]]);
        let resolved = ips(&[[1, 2, 3, 4], [9, 9, 9, 9]]);
        assert!(!is_wildcard_noise(&resolved, Some(&baseline)));
    }

    #[test]
    fn disjoint_addresses_do_not_suppress() {
        let baseline = ips(&[[1, 2, 3, 4]]);
        let resolved = ips(&[[5, 6, 7, 8]]);
        assert!(!is_wildcard_noise(&resolved, Some(&baseline)));
    }
}
