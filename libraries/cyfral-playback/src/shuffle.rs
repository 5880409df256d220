//! Shuffle helpers
//!
//! Fisher-Yates via `SliceRandom::shuffle`, and uniform selection of a random
//! index other than the current one.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle everything after position 0, leaving the first element in place
pub fn shuffle_after_first<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    if items.len() > 2 {
        items[1..].shuffle(rng);
    }
}

/// Uniformly random index in `0..len` that differs from `current`
///
/// `None` when there is no other index to pick.
pub fn pick_other_index<R: Rng + ?Sized>(
    len: usize,
    current: Option<usize>,
    rng: &mut R,
) -> Option<usize> {
    match current {
        Some(current) if current < len => {
            if len < 2 {
                return None;
            }
            let pick = rng.gen_range(0..len - 1);
            Some(if pick >= current { pick + 1 } else { pick })
        }
        _ if len == 0 => None,
        _ => Some(rng.gen_range(0..len)),
    }
}
