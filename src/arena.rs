//! The soup arena: the population of half-tapes plus the state the driver
//! owns between epochs (shuffle permutation, lineage counter, per-pair
//! step counts, the global PRNG).

use crate::consts::HALF_LEN;
use crate::rng::Xorshift64;
use crate::token::Token;

/// Owned, process-wide soup state. Allocated once at startup, mutated in
/// place by epochs until shutdown.
pub struct Arena {
    /// The population: `soup_size` half-tapes of `HALF_LEN` cells each.
    pub soup: Vec<[Token; HALF_LEN]>,
    /// Shuffle permutation used for pairing, rebuilt every epoch.
    pub perm: Vec<u32>,
    /// Per-epoch per-pair step counts from the last completed epoch.
    pub pair_steps: Vec<u32>,
    /// Monotonically increasing lineage-id counter. Wraps on overflow;
    /// the 32-bit id space can saturate on long, high-mutation-rate runs.
    /// This is accepted, not guarded against.
    pub next_token_id: u32,
    /// The driver-owned global PRNG. Never touched by workers.
    pub rng: Xorshift64,
}

impl Arena {
    /// Allocate a new arena with `soup_size` half-tapes and fill it with
    /// fresh random cells, each given a new lineage id and epoch 0.
    ///
    /// `soup_size` must be even and a power of two.
    pub fn new(soup_size: usize, seed: u64) -> Arena {
        assert!(soup_size.is_power_of_two(), "soup_size must be a power of two");
        assert!(soup_size % 2 == 0, "soup_size must be even");

        let mut rng = Xorshift64::seed_from_u64(seed);
        let mut next_token_id: u32 = 0;
        let soup = (0..soup_size)
            .map(|_| {
                let mut half = [Token::make(0, 0, 0); HALF_LEN];
                for cell in half.iter_mut() {
                    let byte = (rng.next_u64() & 0xFF) as u8;
                    *cell = Token::make(next_token_id, 0, byte);
                    next_token_id = next_token_id.wrapping_add(1);
                }
                half
            })
            .collect();

        Arena {
            soup,
            perm: (0..soup_size as u32).collect(),
            pair_steps: vec![0u32; soup_size / 2],
            next_token_id,
            rng,
        }
    }

    /// Number of half-tapes in the population.
    pub fn soup_size(&self) -> usize {
        self.soup.len()
    }

    /// Fisher-Yates shuffle of `perm`, back to front, using the arena's
    /// PRNG. Produces a uniform random permutation of `[0, soup_size)`.
    pub fn shuffle_perm(&mut self) {
        let n = self.perm.len();
        for (i, slot) in self.perm.iter_mut().enumerate() {
            *slot = i as u32;
        }
        for i in (1..n).rev() {
            let j = self.rng.gen_below((i + 1) as u32) as usize;
            self.perm.swap(i, j);
        }
    }
}
