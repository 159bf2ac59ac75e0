//! remote-attestation quote verification (C3). The real DCAP/SGX backend is
//! an external collaborator — this module only defines the capability it
//! must provide and the simulation bypass used in tests and dev setups.

use crate::manifest::{Infrastructure, Package};

/// Contract a real attestation backend must satisfy. Purely functional:
/// given a quote, the peer's certificate, and the expected package /
/// infrastructure properties, decide whether the quote is valid.
///
/// `Validate` must not be called while `simulation_mode` is enabled — the
/// activation service (C8) skips straight past verification in that case.
pub trait QuoteVerifier: Send + Sync {
    fn validate(&self, quote: &[u8], peer_cert: &[u8], pkg: &Package, infra: &Infrastructure) -> bool;
}

/// Always accepts. Useful for local development with simulated enclaves,
/// never wired up when real attestation is required.
pub struct AlwaysAccept;

impl QuoteVerifier for AlwaysAccept {
    fn validate(&self, _quote: &[u8], _peer_cert: &[u8], _pkg: &Package, _infra: &Infrastructure) -> bool {
        true
    }
}

/// Always rejects. Used to exercise the `Unauthenticated` path in tests.
pub struct AlwaysReject;

impl QuoteVerifier for AlwaysReject {
    fn validate(&self, _quote: &[u8], _peer_cert: &[u8], _pkg: &Package, _infra: &Infrastructure) -> bool {
        false
    }
}

/// Accepts only packages whose `security_version` is at least `min`. Models
/// a verifier that enforces a minimum patch level, used to exercise the
/// manifest-update overlay (spec §8 scenario S5).
pub struct MinSecurityVersion {
    pub min: u64,
}

impl QuoteVerifier for MinSecurityVersion {
    fn validate(&self, _quote: &[u8], _peer_cert: &[u8], pkg: &Package, _infra: &Infrastructure) -> bool {
        pkg.security_version >= self.min
    }
}
