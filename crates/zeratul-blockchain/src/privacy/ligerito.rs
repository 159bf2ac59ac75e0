//! Ligerito Privacy Layer (Tier 3)
//!
//! Full ZK proofs for maximum flexibility.
//!
//! ## When to Use
//!
//! - Arbitrary computation (anything that's provable)
//! - Offline proof generation (client can prepare in advance)
//! - Succinct verification (tiny proof size critical)
//! - Maximum privacy (hide computation entirely)
//!
//! ## Trade-offs
//!
//! ✅ Most flexible (prove anything)
//! ✅ Succinct proofs (small size)
//! ✅ Hide everything (even computation flow)
//! ❌ Slow client-side (2-10 seconds)
//! ❌ Complex (circuit constraints)

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Ligerito proof (serialized)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LigeritoProof {
    /// Serialized proof data
    pub proof_bytes: Vec<u8>,

    /// Public inputs
    pub public_inputs: Vec<u8>,

    /// Verification key hash (identifies circuit)
    pub vk_hash: [u8; 32],
}

impl LigeritoProof {
    /// Create from proof components
    pub fn new(proof_bytes: Vec<u8>, public_inputs: Vec<u8>, vk_hash: [u8; 32]) -> Self {
        Self {
            proof_bytes,
            public_inputs,
            vk_hash,
        }
    }

    /// Verify the proof
    pub fn verify(&self) -> Result<bool> {
        // TODO TODO TODO: Integrate with actual Ligerito verifier
        //
        // 1. Deserialize proof
        // 2. Load verification key for circuit
        // 3. Run Ligerito verification
        // 4. Return result
        //
        // For now, just check proof is non-empty
        Ok(!self.proof_bytes.is_empty())
    }
}

/// Ligerito prover (client-side)
pub struct LigeritoProver {
    // TODO: Add proving key, circuit definitions, etc.
}

impl LigeritoProver {
    pub fn new() -> Self {
        Self {}
    }

    /// Generate proof for computation
    pub fn prove<F>(
        &self,
        circuit_id: &str,
        witness: F,
    ) -> Result<LigeritoProof>
    where
        F: Fn() -> Vec<u8>,  // Witness generation function
    {
        // TODO TODO TODO: Integrate with actual Ligerito prover
        //
        // 1. Load circuit for circuit_id
        // 2. Generate witness
        // 3. Generate Ligerito proof
        // 4. Serialize proof
        //
        // For now, return placeholder
        Ok(LigeritoProof::new(
            Vec::new(),
            Vec::new(),
            [0u8; 32],
        ))
    }
}

impl Default for LigeritoProver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ligerito_proof_serialization() {
        let proof = LigeritoProof::new(
            vec![1, 2, 3],
            vec![4, 5, 6],
            [0; 32],
        );

        let serialized = bincode::serialize(&proof).unwrap();
        let deserialized: LigeritoProof = bincode::deserialize(&serialized).unwrap();

        assert_eq!(proof.proof_bytes, deserialized.proof_bytes);
    }
}
