//! Shared sizing constants. Every dimension here is a power of two; index
//! arithmetic throughout the crate relies on bitmask wrap (`& (N - 1)`)
//! rather than modulo, so changing any of these requires keeping that
//! invariant.

/// Length of a pair tape: two half-tapes concatenated, the unit the
/// interpreter actually executes.
pub const TAPE_LEN: usize = 128;

/// Length of a single half-tape, as stored in the soup arena.
pub const HALF_LEN: usize = 64;

/// Hard per-execution step cap.
pub const MAX_STEPS: u32 = 16384;

/// Maximum bracket nesting depth.
pub const STACK_DEPTH: usize = 64;

/// Instruction pointer start position; cells 0 and 1 seed the head
/// positions but are otherwise ordinary cells.
pub const IP_START: usize = 2;

/// Reference population size: 2^17 half-tapes.
pub const SOUP_SIZE: usize = 1 << 17;

/// Hard cap on worker thread count.
pub const MAX_THREADS: usize = 256;

const _: () = assert!(TAPE_LEN.is_power_of_two());
const _: () = assert!(HALF_LEN.is_power_of_two());
const _: () = assert!(STACK_DEPTH.is_power_of_two());
const _: () = assert!(SOUP_SIZE.is_power_of_two());
const _: () = assert!(TAPE_LEN == HALF_LEN * 2);
