//! The mutation sampler: draws a Poisson-distributed mutation count for an
//! epoch and scatters that many fresh tokens uniformly across the arena.

use crate::arena::Arena;
use crate::consts::HALF_LEN;

/// The flat cell space spans `soup_size * HALF_LEN` cells; the reference
/// sizing (`SOUP_SIZE = 2^17`, `HALF_LEN = 64`) is exactly 2^23 cells, so a
/// fresh PRNG word's top 23 bits (shift 41) cover it directly. A caller
/// using a different `soup_size` needs both the mask *and* the shift
/// recomputed to span `log2(soup_size * HALF_LEN)` bits, or the high bits
/// of a wider population are never reachable.
fn flat_index_bits(soup_size: usize) -> u32 {
    (soup_size * HALF_LEN).trailing_zeros()
}

/// Right-shift applied to a fresh PRNG word to land its top `bits` bits at
/// the low end, for use with `flat_index_bits`'s mask.
fn flat_index_shift(bits: u32) -> u32 {
    64 - bits
}

/// Apply one epoch's mutation pass to `arena`, tagging every mutated cell
/// with epoch `epoch` and a fresh lineage id. `rate` is a per-cell
/// mutation probability; `rate <= 0.0` draws nothing.
pub fn apply_mutations(arena: &mut Arena, rate: f64, epoch: u16) {
    if rate <= 0.0 {
        return;
    }

    let soup_size = arena.soup_size();
    let total_cells = soup_size * HALF_LEN;
    let lambda = total_cells as f64 * rate;
    let k = arena.rng.poisson(lambda);

    let bits = flat_index_bits(soup_size);
    let mask = (1u64 << bits) - 1;
    let shift = flat_index_shift(bits);

    for _ in 0..k {
        let word = arena.rng.next_u64();
        let pos = ((word >> shift) & mask) as usize;
        let new_char = (word & 0xFF) as u8;
        let tape_index = pos / HALF_LEN;
        let cell_index = pos % HALF_LEN;

        let id = arena.next_token_id;
        arena.next_token_id = arena.next_token_id.wrapping_add(1);
        arena.soup[tape_index][cell_index] = crate::token::Token::make(id, epoch, new_char);
    }
}
