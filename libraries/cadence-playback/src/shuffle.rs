//! Shuffle of the play order
//!
//! The queue never reorders its songs; shuffling produces a permutation of
//! list indices (Fisher-Yates) that the cursor walks instead.

use rand::seq::SliceRandom;
use rand::thread_rng;

/// Random play order over `len` items
///
/// When `first` is given, that index is moved to the front so the current
/// song keeps playing after shuffle is switched on.
pub fn shuffled_order(len: usize, first: Option<usize>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut thread_rng());

    if let Some(first) = first {
        if let Some(pos) = order.iter().position(|&i| i == first) {
            order.swap(0, pos);
        }
    }

    order
}

/// Identity play order over `len` items
pub fn list_order(len: usize) -> Vec<usize> {
    (0..len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut order = shuffled_order(50, None);
        order.sort_unstable();
        assert_eq!(order, list_order(50));
    }

    #[test]
    fn requested_index_goes_first() {
        for _ in 0..20 {
            assert_eq!(shuffled_order(10, Some(7))[0], 7);
        }
    }

    #[test]
    fn empty_and_out_of_range() {
        assert!(shuffled_order(0, Some(3)).is_empty());
        assert_eq!(shuffled_order(1, Some(5)), vec![0]);
    }

    #[test]
    fn shuffle_changes_order_eventually() {
        let identity = list_order(20);
        let changed = (0..10).any(|_| shuffled_order(20, None) != identity);
        assert!(changed, "20 elements should not stay sorted 10 times in a row");
    }
}
