//! Curation of the featured and best-selling selections.
//!
//! Each selection has [`CURATED_SLOTS`] slots. Slot `i` takes the source
//! list's `i`-th product when there is one; otherwise it draws the next
//! product from a pool seeded with the newest products. The pool is shared
//! and consumed left to right: featured fills first, best-selling draws from
//! whatever remains.

use std::collections::VecDeque;

use tracing::debug;

use storefront_shared::ProductEdge;

/// Slots per curated selection.
pub const CURATED_SLOTS: usize = 6;

/// The two curated selections shown on the home page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CuratedProducts {
    /// Sorted by price, most expensive first.
    pub featured: Vec<ProductEdge>,
    /// In fill order: source products, then pool draws.
    pub best_selling: Vec<ProductEdge>,
}

/// Build both selections. Never fails; the inputs are not modified.
pub fn curate(
    featured: &[ProductEdge],
    best_selling: &[ProductEdge],
    newest: &[ProductEdge],
) -> CuratedProducts {
    let mut pool: VecDeque<ProductEdge> = newest.iter().cloned().collect();

    let mut featured = fill_slots(featured, &mut pool);
    // Ascending then reversed: equal prices end up in reverse fill order.
    featured.sort_by(|a, b| a.price().total_cmp(&b.price()));
    featured.reverse();

    let best_selling = fill_slots(best_selling, &mut pool);

    debug!(
        featured = featured.len(),
        best_selling = best_selling.len(),
        pool_left = pool.len(),
        "curated home page selections"
    );

    CuratedProducts {
        featured,
        best_selling,
    }
}

/// Fill the slots in order from `source`, drawing from `pool` for every gap.
/// Slots left empty once the pool runs dry are dropped.
fn fill_slots(source: &[ProductEdge], pool: &mut VecDeque<ProductEdge>) -> Vec<ProductEdge> {
    (0..CURATED_SLOTS)
        .filter_map(|i| source.get(i).cloned().or_else(|| pool.pop_front()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::product;
    use proptest::prelude::*;

    fn ids(list: &[ProductEdge]) -> Vec<u64> {
        list.iter().map(|p| p.node.entity_id).collect()
    }

    #[test]
    fn short_featured_list_fills_from_newest_and_sorts() {
        let a = product(1, 10.0);
        let b = product(2, 20.0);
        let c = product(3, 5.0);
        let d = product(4, 30.0);
        let e = product(5, 15.0);
        let f = product(6, 1.0);

        let curated = curate(&[a, b], &[], &[c, d, e, f]);

        // D, B, E, A, C, F
        assert_eq!(ids(&curated.featured), [4, 2, 5, 1, 3, 6]);
        assert!(curated.best_selling.is_empty());
    }

    #[test]
    fn full_featured_list_leaves_pool_for_best_selling() {
        let featured: Vec<_> = (1..=6).map(|i| product(i, i as f64)).collect();
        let best_selling = vec![product(20, 50.0)];
        let newest: Vec<_> = (30..=34).map(|i| product(i, 1.0)).collect();

        let curated = curate(&featured, &best_selling, &newest);

        assert_eq!(ids(&curated.featured), [6, 5, 4, 3, 2, 1]);
        assert_eq!(ids(&curated.best_selling), [20, 30, 31, 32, 33, 34]);
    }

    #[test]
    fn pool_is_shared_between_selections() {
        let newest: Vec<_> = (1..=8).map(|i| product(i, 1.0)).collect();

        let curated = curate(&[], &[], &newest);

        assert_eq!(curated.featured.len(), 6);
        // Only the two products featured did not take are left.
        assert_eq!(ids(&curated.best_selling), [7, 8]);
    }

    #[test]
    fn best_selling_keeps_fill_order() {
        let best_selling = vec![product(1, 1.0), product(2, 99.0)];
        let newest = vec![product(3, 50.0)];

        let curated = curate(&vec![product(9, 1.0); 6], &best_selling, &newest);

        assert_eq!(ids(&curated.best_selling), [1, 2, 3]);
    }

    #[test]
    fn source_lists_longer_than_slots_are_truncated() {
        let featured: Vec<_> = (1..=9).map(|i| product(i, i as f64)).collect();

        let curated = curate(&featured, &[], &[]);

        assert_eq!(ids(&curated.featured), [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn everything_empty() {
        assert_eq!(curate(&[], &[], &[]), CuratedProducts::default());
    }

    // Property tests ---------------------------------------------------------

    fn list(start: u64, prices: Vec<u32>) -> Vec<ProductEdge> {
        prices
            .into_iter()
            .enumerate()
            .map(|(i, p)| product(start + i as u64, f64::from(p) / 4.0))
            .collect()
    }

    fn lists() -> impl Strategy<Value = (Vec<ProductEdge>, Vec<ProductEdge>, Vec<ProductEdge>)> {
        (
            prop::collection::vec(0u32..400, 0..9),
            prop::collection::vec(0u32..400, 0..9),
            prop::collection::vec(0u32..400, 0..15),
        )
            .prop_map(|(f, b, n)| (list(100, f), list(200, b), list(300, n)))
    }

    proptest! {
        #[test]
        fn selections_never_exceed_slots((f, b, n) in lists()) {
            let curated = curate(&f, &b, &n);
            prop_assert!(curated.featured.len() <= CURATED_SLOTS);
            prop_assert!(curated.best_selling.len() <= CURATED_SLOTS);
        }

        #[test]
        fn featured_is_price_descending((f, b, n) in lists()) {
            let curated = curate(&f, &b, &n);
            for pair in curated.featured.windows(2) {
                prop_assert!(pair[0].price() >= pair[1].price());
            }
        }

        #[test]
        fn pool_draws_match_empty_slots((f, b, n) in lists()) {
            let curated = curate(&f, &b, &n);

            let featured_own = f.len().min(CURATED_SLOTS);
            let featured_drawn = (CURATED_SLOTS - featured_own).min(n.len());
            prop_assert_eq!(curated.featured.len(), featured_own + featured_drawn);

            let best_own = b.len().min(CURATED_SLOTS);
            let best_drawn = (CURATED_SLOTS - best_own).min(n.len() - featured_drawn);
            prop_assert_eq!(curated.best_selling.len(), best_own + best_drawn);

            // Best-selling: own products in order, then the next pool entries.
            let mut expected: Vec<u64> = ids(&b[..best_own]);
            expected.extend(ids(&n[featured_drawn..featured_drawn + best_drawn]));
            prop_assert_eq!(ids(&curated.best_selling), expected);

            // No pool entry is drawn twice.
            let mut seen: Vec<u64> = ids(&curated.featured)
                .into_iter()
                .chain(ids(&curated.best_selling))
                .filter(|id| *id >= 300)
                .collect();
            let drawn = seen.len();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), drawn);
        }

        #[test]
        fn curation_is_idempotent((f, b, n) in lists()) {
            prop_assert_eq!(curate(&f, &b, &n), curate(&f, &b, &n));
        }
    }
}
