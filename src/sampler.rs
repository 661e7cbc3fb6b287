//! Weighted outcome selection shared by all three games.
//!
//! Prize tables, reel symbols and wheel segments all reduce to the same
//! question: given an ordered table of weighted entries and one uniform
//! value in `[0, 1)`, which entry covers it? [`pick_weighted`] answers
//! it as a pure function; [`draw_weighted`] consumes exactly one value
//! from a random source and delegates.

use rand::Rng;

/// Select the entry covering `r` in the cumulative weight distribution.
///
/// Walks the table in order, summing weights; the first entry whose
/// cumulative weight reaches `r` wins, so earlier entries take ties at
/// cumulative boundaries. If floating-point drift leaves the sum short
/// of `r` after the whole table, the last entry is returned. Weights
/// must already be normalized to 1.0 for the frequencies to match.
pub fn pick_weighted<'a, T, W>(r: f64, entries: &'a [T], weight: W) -> Option<&'a T>
where
    W: Fn(&T) -> f64,
{
    let mut cumulative = 0.0;
    for entry in entries {
        cumulative += weight(entry);
        if r <= cumulative {
            return Some(entry);
        }
    }
    entries.last()
}

/// Draw one entry from the table, consuming a single uniform value.
pub fn draw_weighted<'a, T, W, R>(rng: &mut R, entries: &'a [T], weight: W) -> Option<&'a T>
where
    W: Fn(&T) -> f64,
    R: Rng + ?Sized,
{
    let r = rng.gen::<f64>();
    pick_weighted(r, entries, weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;

    fn table() -> Vec<(&'static str, f64)> {
        vec![("a", 0.5), ("b", 0.3), ("c", 0.2)]
    }

    #[test]
    fn test_selection_by_cumulative_range() {
        let entries = table();
        let pick = |r| pick_weighted(r, &entries, |e| e.1).map(|e| e.0);

        assert_eq!(pick(0.0), Some("a"));
        assert_eq!(pick(0.3), Some("a"));
        assert_eq!(pick(0.51), Some("b"));
        assert_eq!(pick(0.79), Some("b"));
        assert_eq!(pick(0.81), Some("c"));
        assert_eq!(pick(0.999), Some("c"));
    }

    #[test]
    fn test_earlier_entry_wins_boundary_ties() {
        let entries = table();
        // r exactly at a cumulative boundary belongs to the entry that
        // closed the boundary, not the one that opens after it.
        let picked = pick_weighted(0.5, &entries, |e| e.1);
        assert_eq!(picked.map(|e| e.0), Some("a"));
    }

    #[test]
    fn test_drift_falls_back_to_last_entry() {
        // Sum is 0.9; r beyond it must land on the final entry.
        let entries = vec![("x", 0.4), ("y", 0.5)];
        let picked = pick_weighted(0.95, &entries, |e| e.1);
        assert_eq!(picked.map(|e| e.0), Some("y"));
    }

    #[test]
    fn test_empty_table() {
        let entries: Vec<(&str, f64)> = Vec::new();
        assert!(pick_weighted(0.5, &entries, |e| e.1).is_none());
    }

    #[test]
    fn test_two_tier_table() {
        let entries = vec![(100i64, 0.5), (0i64, 0.5)];
        let pick = |r| pick_weighted(r, &entries, |e| e.1).map(|e| e.0);

        assert_eq!(pick(0.3), Some(100));
        assert_eq!(pick(0.7), Some(0));
    }

    #[test]
    fn test_draw_consumes_one_value() {
        let entries = table();
        let mut rng = GameRng::seed_from_u64(9);
        let mut probe = GameRng::seed_from_u64(9);

        let drawn = draw_weighted(&mut rng, &entries, |e| e.1).map(|e| e.0);
        let r = rand::Rng::gen::<f64>(&mut probe);
        let expected = pick_weighted(r, &entries, |e| e.1).map(|e| e.0);
        assert_eq!(drawn, expected);
    }
}
