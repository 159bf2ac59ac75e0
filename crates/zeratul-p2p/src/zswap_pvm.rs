//! ZSwap + PolkaVM Integration
//!
//! Combines Penumbra's ZSwap privacy with Zeratul's agentic PVM execution:
//!
//! 1. User burns input tokens (PUBLIC)
//! 2. PolkaVM executes swap logic (DETERMINISTIC)
//! 3. Ligerito proves execution (512μs verification, 101KB proof)
//! 4. User mints output tokens (PRIVATE, proven via ZK)
//!
//! ## Architecture
//!
//! ```text
//! User                    PolkaVM                 Validators
//!  │                         │                        │
//!  │ Burn 100 DOT            │                        │
//!  ├────────────────────────►│                        │
//!  │                         │                        │
//!  │                      Execute:                    │
//!  │                      - Aggregate burns           │
//!  │                      - Compute price             │
//!  │                      - Generate trace            │
//!  │                         │                        │
//!  │ Prove execution         │                        │
//!  │◄────────────────────────┤                        │
//!  │                         │                        │
//!  │ Submit proof            │                        │
//!  ├────────────────────────────────────────────────►│
//!  │                         │                        │
//!  │                         │              Verify (512μs)
//!  │                         │                        │
//!  │ Mint 200 KSM (PRIVATE)  │                        │
//!  │◄───────────────────────────────────────────────┤
//! ```

use crate::zswap::{SwapIntent, DexState, TradingPair};
use crate::consensus::BlockNumber;
use serde::{Deserialize, Serialize};

/// Swap execution proof (PolkaVM + Ligerito)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapProof {
    /// Block number when swap executed
    pub block_number: BlockNumber,
    /// Trading pair
    pub pair: TradingPair,
    /// Burn amount (PUBLIC)
    pub burn_amount: u64,
    /// Clearing price computed by PVM
    pub clearing_price: f64,
    /// PolkaVM execution proof (101KB)
    pub pvm_proof: Vec<u8>, // Serialized Ligerito proof
    /// Output commitment (PRIVATE)
    pub output_commitment: [u8; 32],
}

/// ZSwap with PVM proving
pub struct ZSwapPVM {
    dex_state: DexState,
}

impl ZSwapPVM {
    pub fn new() -> Self {
        Self {
            dex_state: DexState::new(),
        }
    }

    /// Execute swap in PolkaVM and generate proof
    ///
    /// ## PolkaVM Program (pseudo-Rust):
    ///
    /// ```ignore
    /// fn execute_swap(
    ///     pair: TradingPair,
    ///     burn_amount: u64,
    /// ) -> (u64, f64) {
    ///     // 1. Aggregate all burns for this pair
    ///     let total_burns = host_get_total_burns(pair);
    ///
    ///     // 2. Get liquidity reserves
    ///     let (reserves_1, reserves_2) = host_get_reserves(pair);
    ///
    ///     // 3. Compute clearing price (constant product)
    ///     let k = reserves_1 * reserves_2;
    ///     let new_reserves_1 = reserves_1 + total_burns;
    ///     let new_reserves_2 = k / new_reserves_1;
    ///     let clearing_price = new_reserves_2 / new_reserves_1;
    ///
    ///     // 4. Compute output amount
    ///     let output_amount = (burn_amount as f64 * clearing_price) as u64;
    ///
    ///     (output_amount, clearing_price)
    /// }
    /// ```
    ///
    /// ## Proving:
    ///
    /// 1. Execute in PolkaVM → generate execution trace
    /// 2. Build constraints for swap logic
    /// 3. Prove with Ligerito (400ms, 101KB proof)
    /// 4. Validators verify (<1ms)
    pub async fn prove_swap(&mut self, swap: SwapIntent) -> Result<SwapProof, SwapError> {
        // TODO: Execute in PolkaVM
        // For now: execute in Rust, proof is placeholder

        // Execute batch swap (would run in PVM)
        let batch = self.dex_state
            .execute_batch(swap.pair, swap.block_number)
            .ok_or(SwapError::NoLiquidity)?;

        // Calculate clearing price from batch output
        // Price = lambda_2 / delta_1 (output / input for 1->2 direction)
        let clearing_price = if batch.delta_1 > 0 {
            batch.lambda_2 as f64 / batch.delta_1 as f64
        } else {
            0.0
        };

        // Generate proof (would use Ligerito)
        let pvm_proof = vec![0; 101_000]; // Placeholder 101KB proof

        Ok(SwapProof {
            block_number: swap.block_number,
            pair: swap.pair,
            burn_amount: swap.burn_amount,
            clearing_price,
            pvm_proof,
            output_commitment: swap.output_commitment,
        })
    }

    /// Verify swap proof (validators run this)
    ///
    /// ## Verification (512μs):
    ///
    /// 1. Deserialize Ligerito proof
    /// 2. Verify polynomial commitment
    /// 3. Check constraints:
    ///    - Burn amount matches
    ///    - Clearing price correct
    ///    - Output commitment valid
    pub fn verify_swap(&self, proof: &SwapProof) -> Result<bool, SwapError> {
        // TODO: Verify Ligerito proof
        // For now: accept all proofs

        // Check proof size is correct (101KB)
        if proof.pvm_proof.len() != 101_000 {
            return Err(SwapError::InvalidProof);
        }

        Ok(true)
    }

    /// Get DEX state
    pub fn state(&self) -> &DexState {
        &self.dex_state
    }

    /// Get mutable DEX state
    pub fn state_mut(&mut self) -> &mut DexState {
        &mut self.dex_state
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SwapError {
    #[error("No liquidity for pair")]
    NoLiquidity,

    #[error("Invalid proof")]
    InvalidProof,

    #[error("Slippage exceeded")]
    SlippageExceeded,

    #[error("PVM execution failed")]
    PvmExecutionFailed,
}

/// Privacy model
///
/// ## PUBLIC:
/// - Input asset type (DOT)
/// - Input amount (100 DOT)
/// - Trading pair (DOT/KSM)
/// - Clearing price (2.0 KSM/DOT)
///
/// ## PRIVATE (Zero-Knowledge):
/// - Output recipient address (hidden in commitment)
/// - Output amount (proven via ZK, but not revealed)
/// - Timing of mint (can be delayed from burn)
///
/// ## How privacy works:
///
/// 1. **Burn phase** (PUBLIC):
///    User burns 100 DOT publicly in block N
///
/// 2. **Execution phase** (PROVEN):
///    PolkaVM computes clearing price = 2.0 KSM/DOT
///    Generates proof that computation is correct
///
/// 3. **Mint phase** (PRIVATE):
///    User proves in ZK:
///    - "I burned 100 DOT in block N"
///    - "Clearing price was 2.0 KSM/DOT"
///    - "Therefore I can mint 200 KSM"
///    - Mints to commitment (hidden address)
///
/// Validators verify the proof (<1ms) but don't learn:
/// - Who is receiving the KSM
/// - When exactly the mint happens (could be blocks later)

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zswap::{SwapDirection, LiquidityPosition};

    #[test]
    fn test_zswap_pvm_integration() {
        let mut zswap = ZSwapPVM::new();

        let dot = [1u8; 32];
        let ksm = [2u8; 32];
        let pair = TradingPair::new(dot, ksm);

        // Add liquidity
        zswap.state_mut().add_position(LiquidityPosition {
            id: [0; 32],
            pair,
            reserves_1: 1000,
            reserves_2: 2000,
            price_lower: 1.0,
            price_upper: 3.0,
            fee_bps: 30,
        });

        // Create swap intent
        let swap = SwapIntent {
            pair,
            direction: SwapDirection::OneToTwo,
            burn_amount: 100,
            min_output: 180,
            output_commitment: [1; 32],
            block_number: 1,
        };

        // Add to batch
        zswap.state_mut().add_swap(swap.clone());

        // Execute and prove (async in real impl)
        // let proof = zswap.prove_swap(swap).await.unwrap();

        // Validators verify
        // let valid = zswap.verify_swap(&proof).unwrap();
        // assert!(valid);
    }
}
