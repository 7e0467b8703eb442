//! Round-robin pairing by combination unranking
//!
//! Match index `i` maps straight to the `i`-th unordered pair in
//! colexicographic order, so any match can be looked up in O(1) without
//! materializing the schedule.

/// Number of unordered pairs among `participant_count` entrants.
pub fn calculate_match_count(participant_count: u32) -> u32 {
    if participant_count < 2 {
        return 0;
    }
    let n = participant_count as u64;
    (n * (n - 1) / 2).min(u32::MAX as u64) as u32
}

/// Pairing for one match index, computed in O(1) without allocation.
pub fn get_pairing_for_match(participant_count: u32, match_index: u32) -> Option<(u32, u32)> {
    if match_index >= calculate_match_count(participant_count) {
        return None;
    }
    Some(unrank_pair(match_index))
}

/// Every pair once, in match-index order. Each pair is `(a, b)` with `a < b`.
pub fn generate_all_pairings(participant_count: u32) -> Vec<(u32, u32)> {
    (0..calculate_match_count(participant_count)).map(unrank_pair).collect()
}

/// Colexicographic combination unranking: rank → (a, b) with a < b.
///
/// rank = C(b,2) + a = b*(b−1)/2 + a
fn unrank_pair(rank: u32) -> (u32, u32) {
    let rank = rank as u64;
    let val = 1 + 8 * rank;
    let mut s = val;
    let mut t = (s + 1) / 2;
    while t < s {
        s = t;
        t = (s + val / s) / 2;
    }
    // s = floor(sqrt(val))
    let mut b = (1 + s) / 2;

    while b > 0 && b * (b - 1) / 2 > rank {
        b -= 1;
    }
    while (b + 1) * b / 2 <= rank {
        b += 1;
    }

    let a = rank - b * (b - 1) / 2;
    (a as u32, b as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_tournament() {
        assert!(generate_all_pairings(0).is_empty());
        assert!(generate_all_pairings(1).is_empty());
        assert_eq!(get_pairing_for_match(1, 0), None);
    }

    #[test]
    fn test_two_players() {
        assert_eq!(generate_all_pairings(2), vec![(0, 1)]);
    }

    #[test]
    fn test_colex_order() {
        assert_eq!(
            generate_all_pairings(4),
            vec![(0, 1), (0, 2), (1, 2), (0, 3), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_match_count() {
        assert_eq!(calculate_match_count(0), 0);
        assert_eq!(calculate_match_count(4), 6);
        assert_eq!(calculate_match_count(14), 91);
        assert_eq!(calculate_match_count(200), 19_900);
    }

    #[test]
    fn test_full_round_robin_all_pairs() {
        let n = 25;
        let pairings = generate_all_pairings(n);
        let unique: HashSet<_> = pairings.iter().copied().collect();
        assert_eq!(pairings.len(), unique.len());
        for a in 0..n {
            for b in (a + 1)..n {
                assert!(unique.contains(&(a, b)), "missing pair ({a}, {b})");
            }
        }
    }

    #[test]
    fn test_get_pairing_for_match() {
        let n = 30;
        let all = generate_all_pairings(n);
        for (i, pair) in all.iter().enumerate() {
            assert_eq!(get_pairing_for_match(n, i as u32), Some(*pair));
        }
        assert_eq!(get_pairing_for_match(n, all.len() as u32), None);
    }

    #[test]
    fn test_unrank_large_rank() {
        // C(65536, 2) - 1 is the last pair of a 65536-player round robin
        let rank = 65_536u64 * 65_535 / 2 - 1;
        assert_eq!(unrank_pair(rank as u32), (65_534, 65_535));
    }

    proptest! {
        #[test]
        fn prop_pairs_are_ordered_and_in_range(n in 2u32..400, seed in any::<u32>()) {
            let count = calculate_match_count(n);
            let idx = seed % count;
            let (a, b) = get_pairing_for_match(n, idx).unwrap();
            prop_assert!(a < b);
            prop_assert!(b < n);
            // rank round-trips through the colex formula
            prop_assert_eq!(b * (b - 1) / 2 + a, idx);
        }
    }
}
