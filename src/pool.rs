//! The parallel executor: a persistent worker pool synchronized by two
//! barriers per epoch.
//!
//! Workers are created once and joined at shutdown. Each worker owns a
//! fixed, contiguous slice of pair indices decided at pool construction
//! time; slice bounds never change between epochs. Because the driver
//! hands workers a shuffled permutation in which the two halves are
//! disjoint, no two workers ever touch the same soup entry during an
//! epoch — this is what lets the pool mutate the arena through raw
//! pointers with no per-cell locking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread::JoinHandle;

use crate::arena::Arena;
use crate::bff;
use crate::consts::{HALF_LEN, MAX_THREADS, TAPE_LEN};
use crate::token::Token;

/// Raw view of the arena data a worker touches during its slice. Valid
/// only for the duration of one epoch, between the start and end barrier.
struct EpochView {
    soup: *mut [Token; HALF_LEN],
    perm: *const u32,
    pair_steps: *mut u32,
    npairs: usize,
}

// SAFETY: workers only dereference these pointers for indices assigned to
// them by the permutation, and the permutation guarantees the per-worker
// index sets `{ai, bi}` are pairwise disjoint across the whole pool for
// the duration of one epoch.
unsafe impl Send for EpochView {}
unsafe impl Sync for EpochView {}

impl EpochView {
    fn dangling() -> EpochView {
        EpochView {
            soup: std::ptr::null_mut(),
            perm: std::ptr::null(),
            pair_steps: std::ptr::null_mut(),
            npairs: 0,
        }
    }
}

/// Interior-mutable slot the driver writes before each epoch and workers
/// read after the start barrier releases them. The barrier pair provides
/// the acquire/release edge between the driver's write and the workers'
/// read (and back, for `pair_steps`, across the end barrier).
struct Slot(std::cell::UnsafeCell<EpochView>);

// SAFETY: access to the cell is always gated by `start`/`end` barrier
// waits — the driver writes only before releasing `start`, workers read
// only after waiting on `start` and write only before waiting on `end`.
unsafe impl Sync for Slot {}

/// A fixed pool of worker threads, persistent for the soup loop's
/// lifetime.
pub struct Pool {
    threads: Vec<JoinHandle<()>>,
    slot: Arc<Slot>,
    start: Arc<Barrier>,
    end: Arc<Barrier>,
    shutdown: Arc<AtomicBool>,
    nthreads: usize,
}

fn slice_bounds(nthreads: usize, npairs: usize) -> Vec<(usize, usize)> {
    let chunk = npairs / nthreads;
    (0..nthreads)
        .map(|t| {
            let start = t * chunk;
            let end = if t == nthreads - 1 { npairs } else { start + chunk };
            (start, end)
        })
        .collect()
}

impl Pool {
    /// Spawn `nthreads` persistent workers (clamped to `[1, MAX_THREADS]`),
    /// each owning a fixed slice of `[0, npairs)` computed once here.
    pub fn new(nthreads: usize, npairs: usize) -> Pool {
        let nthreads = nthreads.clamp(1, MAX_THREADS);
        let slot = Arc::new(Slot(std::cell::UnsafeCell::new(EpochView::dangling())));
        let start = Arc::new(Barrier::new(nthreads + 1));
        let end = Arc::new(Barrier::new(nthreads + 1));
        let shutdown = Arc::new(AtomicBool::new(false));

        let bounds = slice_bounds(nthreads, npairs);
        let threads = bounds
            .into_iter()
            .map(|(my_start, my_end)| {
                let slot = Arc::clone(&slot);
                let start = Arc::clone(&start);
                let end = Arc::clone(&end);
                let shutdown = Arc::clone(&shutdown);
                std::thread::Builder::new()
                    .name("bff-worker".into())
                    .spawn(move || worker_loop(my_start, my_end, slot, start, end, shutdown))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Pool { threads, slot, start, end, shutdown, nthreads }
    }

    /// Number of worker threads in the pool.
    pub fn nthreads(&self) -> usize {
        self.nthreads
    }

    /// Run one epoch's worth of pair execution: release the workers on
    /// the current `arena.perm`, and block until they've all finished
    /// writing their slice of `arena.soup`/`arena.pair_steps` back.
    pub fn run_epoch(&self, arena: &mut Arena) {
        let npairs = arena.pair_steps.len();
        let view = EpochView {
            soup: arena.soup.as_mut_ptr(),
            perm: arena.perm.as_ptr(),
            pair_steps: arena.pair_steps.as_mut_ptr(),
            npairs,
        };
        // SAFETY: no worker is between its start-wait and end-wait right
        // now (the driver only calls `run_epoch` after the previous
        // epoch's `end.wait()` returned), so nothing else reads the slot
        // concurrently with this write.
        unsafe {
            *self.slot.0.get() = view;
        }
        self.start.wait();
        self.end.wait();
    }

    /// Signal shutdown, release the workers one last time so they observe
    /// the flag and exit, then join every thread.
    pub fn shutdown(mut self) {
        self.shutdown.store(true, Ordering::Release);
        self.start.wait();
        for t in self.threads.drain(..) {
            let _ = t.join();
        }
    }
}

fn worker_loop(
    my_start: usize,
    my_end: usize,
    slot: Arc<Slot>,
    start: Arc<Barrier>,
    end: Arc<Barrier>,
    shutdown: Arc<AtomicBool>,
) {
    loop {
        start.wait();
        if shutdown.load(Ordering::Acquire) {
            break;
        }

        // SAFETY: the start barrier just released us after the driver
        // wrote a fresh `EpochView` for this epoch; see `Slot`'s doc.
        let view = unsafe { &*slot.0.get() };
        let mut scratch = [Token::make(0, 0, 0); TAPE_LEN];

        for i in my_start..my_end {
            // SAFETY: `i` and `i + npairs` are this worker's assigned pair
            // slots; `perm[i]`/`perm[i + npairs]` are the disjoint soup
            // indices assigned to this pair for this epoch only.
            unsafe {
                let ai = *view.perm.add(i) as usize;
                let bi = *view.perm.add(i + view.npairs) as usize;

                scratch[..HALF_LEN].copy_from_slice(&*view.soup.add(ai));
                scratch[HALF_LEN..].copy_from_slice(&*view.soup.add(bi));

                let steps = bff::run(&mut scratch);
                *view.pair_steps.add(i) = steps;

                (*view.soup.add(ai)).copy_from_slice(&scratch[..HALF_LEN]);
                (*view.soup.add(bi)).copy_from_slice(&scratch[HALF_LEN..]);
            }
        }

        end.wait();
    }
}
