//! Property tests for grid coordinates and pagination
//!
//! These tests validate that slot arithmetic and page splitting hold
//! for arbitrary value lists and page sizes.

use proptest::prelude::*;
use yggdrasil_menus::{page_count_for, InventoryPosition, MenuPaginator, MAX_SIZE};

proptest! {
    /// Property: Every chest slot maps to a position and back
    #[test]
    fn slots_map_to_positions_and_back(slot in 0usize..MAX_SIZE) {
        let position = InventoryPosition::from_slot(slot).expect("slot inside the chest");
        prop_assert!(position.row() < 6);
        prop_assert!(position.column() < 9);
        prop_assert_eq!(position.effective_slot(), slot);
    }

    /// Property: Slots past the chest have no position
    #[test]
    fn slots_past_the_chest_are_rejected(slot in MAX_SIZE..500usize) {
        prop_assert!(InventoryPosition::from_slot(slot).is_none());
    }

    /// Property: Page count is the ceiling, never zero
    #[test]
    fn page_count_is_the_ceiling(len in 0usize..2000, cell_size in 1usize..60) {
        let pages = page_count_for(len, cell_size);
        prop_assert!(pages >= 1);
        prop_assert_eq!(pages, std::cmp::max(1, (len + cell_size - 1) / cell_size));
    }

    /// Property: Pages hold every value exactly once, in order
    #[test]
    fn pages_cover_values_in_order(
        values in prop::collection::vec(any::<u32>(), 0..300),
        cell_size in 1usize..60,
    ) {
        let paginator = MenuPaginator::new(cell_size, values.clone());
        prop_assert_eq!(paginator.page_count(), page_count_for(values.len(), cell_size));

        let flattened: Vec<u32> = paginator.pages().values().flatten().copied().collect();
        prop_assert_eq!(&flattened, &values);
        for (index, page) in paginator.pages() {
            prop_assert!(page.len() <= cell_size);
            if index + 1 < paginator.page_count() {
                prop_assert_eq!(page.len(), cell_size, "only the last page may be short");
            }
        }
    }

    /// Property: Offsets on any page index back into the value list
    #[test]
    fn value_index_points_at_the_shown_value(
        values in prop::collection::vec(any::<u16>(), 1..200),
        cell_size in 1usize..46,
        page_pick in any::<prop::sample::Index>(),
    ) {
        let mut paginator = MenuPaginator::new(cell_size, values.clone());
        let page = page_pick.index(paginator.page_count());
        paginator.set_current(page).expect("page in range");

        let shown = paginator.current_values().to_vec();
        for (offset, value) in shown.iter().enumerate() {
            let index = paginator.value_index(offset).expect("offset on page");
            prop_assert_eq!(values[index], *value);
        }
        prop_assert!(paginator.value_index(shown.len()).is_none());
        prop_assert!(paginator.set_current(paginator.page_count()).is_err());
    }

    /// Property: Removing values never leaves the pointer on an empty page
    #[test]
    fn removals_settle_onto_a_filled_page(
        len in 1usize..120,
        cell_size in 1usize..20,
        removed in 0usize..120,
    ) {
        let mut paginator = MenuPaginator::new(cell_size, 0..len);
        let last = paginator.page_count() - 1;
        paginator.set_current(last).expect("last page");
        for _ in 0..removed.min(len) {
            let tail = paginator.values().len() - 1;
            paginator.remove_index(tail);
        }
        paginator.recalculate();

        let current = paginator.current_page();
        prop_assert!(current < paginator.page_count());
        prop_assert!(current == 0 || !paginator.current_values().is_empty());
    }
}
