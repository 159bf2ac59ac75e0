//! State Transition Function (Guest Program)
//!
//! This program runs inside PolkaVM zkVM and:
//! 1. Receives: old_state_root, transaction, witnesses
//! 2. Validates transaction signature
//! 3. Verifies witnesses against old state root
//! 4. Applies state transition
//! 5. Outputs: new_state_root, state_diffs, events
//!
//! The zkVM generates a proof that this execution was correct.

#![no_std]
#![no_main]

extern crate alloc;

use alloc::{vec, vec::Vec};
use core::panic::PanicInfo;

// Minimal allocator for no_std environment
#[global_allocator]
static ALLOCATOR: BumpAllocator = BumpAllocator;

use core::alloc::{GlobalAlloc, Layout};
use core::cell::UnsafeCell;

struct BumpAllocator;

const ARENA_SIZE: usize = 128 * 1024; // 128KB heap
static mut ARENA: [u8; ARENA_SIZE] = [0; ARENA_SIZE];
static mut OFFSET: UnsafeCell<usize> = UnsafeCell::new(0);

unsafe impl GlobalAlloc for BumpAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let offset_ptr = OFFSET.get();
        let mut offset = *offset_ptr;

        // Align offset
        offset = (offset + layout.align() - 1) & !(layout.align() - 1);

        let new_offset = offset + layout.size();
        if new_offset > ARENA_SIZE {
            return core::ptr::null_mut();
        }

        *offset_ptr = new_offset;
        ARENA.as_mut_ptr().add(offset)
    }

    unsafe fn dealloc(&self, _ptr: *mut u8, _layout: Layout) {
        // Bump allocator doesn't deallocate
    }
}

// TODO: Replace with actual PolkaVM guest SDK
// use polkavm_guest::{read_input, write_output};

type StateRoot = [u8; 32];

#[repr(C)]
struct Transaction {
    from: [u8; 32],
    to: [u8; 32],
    amount: u64,
    signature: [u8; 64],
}

#[repr(C)]
struct TransitionInput {
    old_state_root: StateRoot,
    transaction: Transaction,
    witnesses: Vec<u8>, // Serialized NOMT proofs
}

#[repr(C)]
struct TransitionOutput {
    new_state_root: StateRoot,
    state_diffs: Vec<(Vec<u8>, Vec<u8>)>,
    success: bool,
}

/// Main entry point for the guest program
#[no_mangle]
pub extern "C" fn main() -> i32 {
    // TODO: Replace with actual PolkaVM I/O
    // let input: TransitionInput = read_input();

    // Placeholder input
    let input = TransitionInput {
        old_state_root: [0u8; 32],
        transaction: Transaction {
            from: [1u8; 32],
            to: [2u8; 32],
            amount: 100,
            signature: [0u8; 64],
        },
        witnesses: vec![],
    };

    let output = execute_state_transition(input);

    // TODO: Replace with actual PolkaVM I/O
    // write_output(&output);

    if output.success {
        0 // Success
    } else {
        1 // Failure
    }
}

fn execute_state_transition(input: TransitionInput) -> TransitionOutput {
    // 1. Verify transaction signature
    // TODO: Implement actual signature verification
    // if !verify_signature(&input.transaction) {
    //     return TransitionOutput {
    //         new_state_root: input.old_state_root,
    //         state_diffs: vec![],
    //         success: false,
    //     };
    // }

    // 2. Verify NOMT witnesses against old state root
    // TODO: Implement NOMT witness verification
    // let account_from = verify_witness(&input.witnesses, b"account:from")?;
    // let account_to = verify_witness(&input.witnesses, b"account:to")?;

    // 3. Check preconditions
    // if account_from.balance < input.transaction.amount {
    //     return error;
    // }

    // 4. Compute state changes
    let mut state_diffs = vec![];

    // Deduct from sender
    state_diffs.push((
        b"account:from".to_vec(),
        vec![0u8; 32], // TODO: New balance
    ));

    // Add to receiver
    state_diffs.push((
        b"account:to".to_vec(),
        vec![0u8; 32], // TODO: New balance
    ));

    // 5. Compute new state root
    // TODO: Apply diffs to witness tree and compute new root
    let mut new_state_root = input.old_state_root;
    new_state_root[0] = new_state_root[0].wrapping_add(1);

    TransitionOutput {
        new_state_root,
        state_diffs,
        success: true,
    }
}

#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}
