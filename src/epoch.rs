//! One epoch: shuffle, dispatch pair execution through the worker pool,
//! then apply the mutation sampler. This is the driver's main-loop body.

use crate::arena::Arena;
use crate::mutation;
use crate::pool::Pool;

/// Run a single epoch numbered `epoch` against `arena` using `pool`.
///
/// Order matters: the permutation must be rebuilt before dispatch, and
/// mutation must run only after the pool's barriers have returned (so it
/// never races a worker still writing `soup`/`pair_steps`).
pub fn run_epoch(arena: &mut Arena, pool: &Pool, mutation_rate: f64, epoch: u16) {
    arena.shuffle_perm();
    pool.run_epoch(arena);
    mutation::apply_mutations(arena, mutation_rate, epoch);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_STEPS;

    #[test]
    fn one_epoch_populates_pair_steps_within_bounds() {
        let mut arena = Arena::new(32, 21);
        let pool = Pool::new(4, arena.pair_steps.len());
        run_epoch(&mut arena, &pool, 0.0, 0);
        for &steps in &arena.pair_steps {
            assert!(steps >= 1 && steps <= MAX_STEPS);
        }
        pool.shutdown();
    }

    #[test]
    fn zero_mutation_rate_leaves_lineage_counter_untouched_across_epochs() {
        let mut arena = Arena::new(32, 1);
        let pool = Pool::new(2, arena.pair_steps.len());
        let before = arena.next_token_id;
        for e in 0..5u16 {
            run_epoch(&mut arena, &pool, 0.0, e);
        }
        assert_eq!(arena.next_token_id, before);
        pool.shutdown();
    }

    #[test]
    fn every_tape_participates_in_exactly_one_pair() {
        let mut arena = Arena::new(64, 4);
        let pool = Pool::new(3, arena.pair_steps.len());
        run_epoch(&mut arena, &pool, 0.0, 0);
        let npairs = arena.pair_steps.len();
        let mut seen = vec![false; arena.soup_size()];
        for i in 0..npairs {
            let ai = arena.perm[i] as usize;
            let bi = arena.perm[i + npairs] as usize;
            assert!(!seen[ai], "tape {ai} paired twice");
            assert!(!seen[bi], "tape {bi} paired twice");
            seen[ai] = true;
            seen[bi] = true;
        }
        assert!(seen.iter().all(|&s| s));
        pool.shutdown();
    }
}
