//! Truly Verifiable Secret Sharing using Ligerito Polynomial Commitments
//!
//! This module provides ZODA-style verification where the encoding IS the proof.
//! Unlike simple Merkle proofs, this guarantees all shares lie on the SAME polynomial.
//!
//! # The Problem with Merkle-only Verification
//!
//! A malicious dealer can create shares from DIFFERENT polynomials that all
//! pass Merkle verification but fail reconstruction or reconstruct to wrong values.
//!
//! # ZODA Solution
//!
//! 1. Represent secret as polynomial P(x) where P(0) = secret
//! 2. Commit to P using Ligerito polynomial commitment → C
//! 3. Generate shares as evaluations: share_i = P(i)
//! 4. Each verifier checks their share against C using Ligerito verification
//!
//! This guarantees:
//! - All verified shares lie on the SAME polynomial
//! - Any k shares reconstruct to the CORRECT secret
//! - Malicious dealer CANNOT create inconsistent shares that pass verification
//!
//! # Integration Path
//!
//! For production use with FROST multisigs on Zcash/Penumbra:
//!
//! Option A: Share the FROST seed
//! ```text
//! seed (32 bytes) → Ligerito VSS → verified shares
//!                                        ↓
//!                              reconstruct → seed → FROST keygen
//! ```
//!
//! Option B: Native curve VSS (more efficient)
//! ```text
//! Use Feldman VSS or Pedersen VSS directly on the FROST curve
//! (Ristretto255 for Zcash, decaf377 for Penumbra)
//! ```
//!
//! Option C: Hybrid (our recommendation)
//! ```text
//! - Use FROST's native DKG for key generation
//! - Use Ligerito VSS for auxiliary secrets (nonces, backup keys)
//! - Leverage ZODA for data availability proofs
//! ```

// TODO: Implement proper Ligerito-based VSS
// This requires:
// 1. Encoding secret as polynomial coefficients
// 2. Using Ligerito prover to commit to the polynomial
// 3. Generating evaluation proofs for each share point
// 4. Verifier checks: proof validates share against commitment
//
// The key insight from ZODA:
// - Reed-Solomon encoding IS polynomial evaluation
// - Ligerito commitment IS the verification
// - Shares ARE the codeword symbols
// - Reconstruction IS Lagrange interpolation

/// Placeholder for proper Ligerito-integrated VSS
///
/// A robust implementation would:
/// 1. Take secret bytes
/// 2. Pad/encode as polynomial over the committed field
/// 3. Generate Ligerito proof/commitment
/// 4. Extract shares as evaluations with opening proofs
/// 5. Verifiers check openings against the single commitment
pub struct LigeritoVSS {
    // Commitment to the polynomial (Ligerito proof root)
    _commitment: [u8; 32],
    // Number of shares
    _n: usize,
    // Threshold
    _k: usize,
}

// The actual implementation would integrate with:
// - ligerito::prove() for commitment
// - ligerito::verify() for share verification
// - Custom evaluation proof extraction

#[cfg(test)]
mod tests {
    // TODO: Tests for proper Ligerito VSS once implemented
}
