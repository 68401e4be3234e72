//! Statistics over the current arena: instruction density, lineage
//! diversity, the modal lineage, and a rendered representative tape.
//! Every function here is a pure read of the arena; nothing is mutated.

use crate::bff::{self, is_instruction};
use crate::consts::HALF_LEN;
use crate::token::Token;

/// One reporting snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    pub mean_ops: f64,
    pub median_ops: f64,
    pub unique_ids: u32,
    pub modal_id: u32,
    pub modal_count: u32,
    /// `HALF_LEN`-character rendering of the representative tape:
    /// the instruction byte where valid, a space otherwise.
    pub representative: String,
    /// Mean of the previous epoch's per-pair step counts. `None` before
    /// any epoch has run.
    pub mean_steps: Option<f64>,
    /// Max of the previous epoch's per-pair step counts. `None` before
    /// any epoch has run.
    pub max_steps: Option<u32>,
    /// Compressed/raw ratio of the representative tape's bytes, a rough
    /// proxy for how structured it is.
    pub high_order_entropy: f64,
}

/// Compute density, lineage, and representative-tape statistics from the
/// current soup. `pair_steps`, if given, supplies `mean_steps`/`max_steps`
/// from the previous epoch's executor run.
pub fn compute(soup: &[[Token; HALF_LEN]], pair_steps: Option<&[u32]>) -> Stats {
    let soup_size = soup.len();

    let mut freq = [0u32; HALF_LEN + 1];
    let mut total_ops: u64 = 0;
    for half in soup {
        let ops = bff::count_ops(half);
        freq[ops] += 1;
        total_ops += ops as u64;
    }
    let mean_ops = total_ops as f64 / soup_size as f64;
    let median_ops = median_from_freq(&freq, soup_size);

    let mut ids: Vec<u32> = soup.iter().flat_map(|h| h.iter().map(|t| t.id())).collect();
    ids.sort_unstable();
    let unique_ids = count_unique(&ids);
    let modal_id = modal_id_from_sorted(&ids);

    let (representative_tape, modal_count) = representative_tape_for_id(soup, modal_id);
    let representative = render_tape(&representative_tape);
    let high_order_entropy = entropy_of_tape(&representative_tape);

    let (mean_steps, max_steps) = match pair_steps {
        Some(steps) if !steps.is_empty() => {
            let sum: u64 = steps.iter().map(|&s| s as u64).sum();
            let max = steps.iter().copied().max().unwrap();
            (Some(sum as f64 / steps.len() as f64), Some(max))
        }
        _ => (None, None),
    };

    Stats {
        mean_ops,
        median_ops,
        unique_ids,
        modal_id,
        modal_count,
        representative,
        mean_steps,
        max_steps,
        high_order_entropy,
    }
}

/// Counting-sort median over `freq[0..=HALF_LEN]`: average the two middle
/// positions `soup_size/2 - 1` and `soup_size/2`.
fn median_from_freq(freq: &[u32; HALF_LEN + 1], soup_size: usize) -> f64 {
    let pos_lo = soup_size / 2 - 1;
    let pos_hi = soup_size / 2;
    let mut cumul: usize = 0;
    let mut lo_val: Option<usize> = None;
    let mut hi_val: Option<usize> = None;
    for (v, &count) in freq.iter().enumerate() {
        cumul += count as usize;
        if lo_val.is_none() && cumul > pos_lo {
            lo_val = Some(v);
        }
        if hi_val.is_none() && cumul > pos_hi {
            hi_val = Some(v);
        }
        if lo_val.is_some() && hi_val.is_some() {
            break;
        }
    }
    (lo_val.unwrap() + hi_val.unwrap()) as f64 / 2.0
}

fn count_unique(sorted_ids: &[u32]) -> u32 {
    let mut unique = 0u32;
    for (i, &id) in sorted_ids.iter().enumerate() {
        if i == 0 || id != sorted_ids[i - 1] {
            unique += 1;
        }
    }
    unique
}

/// Scan a sorted id array for the most frequent value. Ties keep the
/// first (lowest) id encountered, matching a sequential run-length scan.
fn modal_id_from_sorted(sorted_ids: &[u32]) -> u32 {
    let mut modal_id = sorted_ids[0];
    let mut modal_count = 0u32;
    let mut cur_id = sorted_ids[0];
    let mut cur_count = 1u32;
    for &id in &sorted_ids[1..] {
        if id == cur_id {
            cur_count += 1;
        } else {
            if cur_count > modal_count {
                modal_count = cur_count;
                modal_id = cur_id;
            }
            cur_id = id;
            cur_count = 1;
        }
    }
    if cur_count > modal_count {
        modal_id = cur_id;
    }
    modal_id
}

/// The tape carrying the most cells with lineage id `modal_id`, and that
/// count. Ties keep the lowest tape index (forward scan, strict `>`).
fn representative_tape_for_id(soup: &[[Token; HALF_LEN]], modal_id: u32) -> ([Token; HALF_LEN], u32) {
    let mut best_index = 0usize;
    let mut best_count = 0u32;
    for (i, half) in soup.iter().enumerate() {
        let count = half.iter().filter(|t| t.id() == modal_id).count() as u32;
        if count > best_count {
            best_count = count;
            best_index = i;
        }
    }
    (soup[best_index], best_count)
}

fn render_tape(tape: &[Token; HALF_LEN]) -> String {
    tape.iter()
        .map(|t| {
            let ch = t.char();
            if is_instruction(ch) {
                ch as char
            } else {
                ' '
            }
        })
        .collect()
}

fn entropy_of_tape(tape: &[Token; HALF_LEN]) -> f64 {
    let bytes: Vec<u8> = tape.iter().map(|t| t.char()).collect();
    crate::metrics::high_order_entropy(&bytes)
}
