//! Shorthand builders for host events.

use yggdrasil_core::ItemStack;
use yggdrasil_menus::{ClickEvent, ClickType, DragEvent, HolderId, InventoryAction};

/// Plain left click on a menu slot.
pub fn left_click(holder: HolderId, slot: usize) -> ClickEvent {
    click(holder, slot, ClickType::Left)
}

/// Plain right click on a menu slot.
pub fn right_click(holder: HolderId, slot: usize) -> ClickEvent {
    click(holder, slot, ClickType::Right)
}

/// Pickup click of kind `click` on a menu slot.
pub fn click(holder: HolderId, slot: usize, click: ClickType) -> ClickEvent {
    ClickEvent::new(holder, raw(slot), click)
}

/// Shift click moving the slot's items to the other inventory.
pub fn shift_click(holder: HolderId, slot: usize) -> ClickEvent {
    ClickEvent::new(holder, raw(slot), ClickType::ShiftLeft).with_action(InventoryAction::MoveToOther)
}

/// Left click on `slot` of the holder's own inventory below a menu of `menu_size` cells.
pub fn player_click(holder: HolderId, menu_size: usize, slot: usize) -> ClickEvent {
    ClickEvent::new(holder, raw(menu_size + slot), ClickType::Left)
}

/// Drag spreading `item` over `raw_slots`.
pub fn drag(holder: HolderId, raw_slots: &[usize], item: &ItemStack) -> DragEvent {
    DragEvent {
        holder,
        raw_slots: raw_slots.iter().copied().collect(),
        new_items: raw_slots.iter().map(|slot| (*slot, item.clone())).collect(),
    }
}

fn raw(slot: usize) -> i32 {
    i32::try_from(slot).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yggdrasil_core::Material;
    use yggdrasil_menus::ClickLocation;

    #[test]
    fn builders_land_where_expected() {
        let holder = HolderId(4);
        assert_eq!(left_click(holder, 3).location(27), ClickLocation::Menu);
        assert_eq!(player_click(holder, 27, 0).location(27), ClickLocation::Player);
        assert_eq!(shift_click(holder, 1).action, InventoryAction::MoveToOther);

        let dragged = drag(holder, &[1, 30], &ItemStack::new(Material::STONE));
        assert_eq!(dragged.raw_slots.len(), 2);
        assert!(dragged.new_items.contains_key(&30));
    }
}
