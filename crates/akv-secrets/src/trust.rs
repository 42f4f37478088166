//! TLS trust classification for vault endpoints
//!
//! Decides, once per endpoint at client construction, whether strict
//! certificate validation or relaxed (no-verify) transport is used.

use tracing::warn;

/// Hostname prefixes treated as private-network addresses.
///
/// The `172.` prefix is deliberately coarse and also matches public
/// addresses like 172.217.x.x; kept for compatibility with the
/// original classification.
const PRIVATE_PREFIXES: [&str; 3] = ["10.", "192.168.", "172."];

/// Hostnames treated as local loopback
const LOOPBACK_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Public-cloud domain suffix that gets strict validation
const PUBLIC_CLOUD_SUFFIX: &str = ".azure.net";

/// TLS trust decision for a vault endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustMode {
    /// Full certificate and hostname validation, TLS 1.2 minimum
    Strict,
    /// No certificate verification (internal/self-signed endpoints)
    Relaxed,
}

impl TrustMode {
    /// Classify a hostname. First match wins:
    /// private prefix, loopback, non-public-cloud suffix, else strict.
    pub fn classify(hostname: &str) -> TrustMode {
        if PRIVATE_PREFIXES.iter().any(|p| hostname.starts_with(p)) {
            return TrustMode::Relaxed;
        }
        if LOOPBACK_HOSTS.contains(&hostname) {
            return TrustMode::Relaxed;
        }
        if !hostname.ends_with(PUBLIC_CLOUD_SUFFIX) {
            return TrustMode::Relaxed;
        }
        TrustMode::Strict
    }

    /// Resolve the effective trust mode for an endpoint, honoring the
    /// explicit override. Relaxed selections are logged visibly since
    /// they weaken transport security.
    pub fn resolve(hostname: &str, override_relaxed: bool) -> TrustMode {
        if override_relaxed {
            warn!("TLS verification is disabled. This should only be used for testing.");
            return TrustMode::Relaxed;
        }
        match Self::classify(hostname) {
            TrustMode::Relaxed => {
                warn!("Detected internal Key Vault ({hostname}) - TLS verification disabled");
                TrustMode::Relaxed
            }
            TrustMode::Strict => TrustMode::Strict,
        }
    }

    pub fn is_relaxed(&self) -> bool {
        matches!(self, TrustMode::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_prefixes_are_relaxed() {
        assert_eq!(TrustMode::classify("10.0.0.5"), TrustMode::Relaxed);
        assert_eq!(TrustMode::classify("10.200.1.1"), TrustMode::Relaxed);
        assert_eq!(TrustMode::classify("192.168.1.10"), TrustMode::Relaxed);
        assert_eq!(TrustMode::classify("172.16.0.1"), TrustMode::Relaxed);
    }

    #[test]
    fn coarse_172_prefix_matches_public_space() {
        // Known over-match, preserved for compatibility
        assert_eq!(TrustMode::classify("172.217.0.1"), TrustMode::Relaxed);
    }

    #[test]
    fn loopback_is_relaxed() {
        assert_eq!(TrustMode::classify("localhost"), TrustMode::Relaxed);
        assert_eq!(TrustMode::classify("127.0.0.1"), TrustMode::Relaxed);
    }

    #[test]
    fn non_cloud_domains_are_relaxed() {
        assert_eq!(TrustMode::classify("vault.internal.corp"), TrustMode::Relaxed);
        assert_eq!(TrustMode::classify("v.example.com"), TrustMode::Relaxed);
    }

    #[test]
    fn public_cloud_domain_is_strict() {
        assert_eq!(
            TrustMode::classify("myvault.vault.azure.net"),
            TrustMode::Strict
        );
        assert_eq!(TrustMode::classify("other.azure.net"), TrustMode::Strict);
    }

    #[test]
    fn override_forces_relaxed() {
        assert_eq!(
            TrustMode::resolve("myvault.vault.azure.net", true),
            TrustMode::Relaxed
        );
    }

    #[test]
    fn no_override_keeps_classification() {
        assert_eq!(
            TrustMode::resolve("myvault.vault.azure.net", false),
            TrustMode::Strict
        );
        assert_eq!(TrustMode::resolve("10.1.2.3", false), TrustMode::Relaxed);
    }
}
