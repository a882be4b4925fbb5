//! Host-agnostic inventory events.

use crate::session::HolderId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use yggdrasil_core::ItemStack;

/// How the holder clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickType {
    /// Plain left click.
    Left,
    /// Shift + left click.
    ShiftLeft,
    /// Plain right click.
    Right,
    /// Shift + right click.
    ShiftRight,
    /// Middle (pick block) click.
    Middle,
    /// Hotbar key 1-9 (stored 0-based).
    NumberKey(u8),
    /// Double click collecting items to the cursor.
    DoubleClick,
    /// Drop key.
    Drop,
    /// Control + drop key.
    ControlDrop,
    /// Swap with offhand key.
    SwapOffhand,
    /// Creative mode inventory action.
    Creative,
    /// Anything the host could not classify.
    Unknown,
}

impl ClickType {
    /// Left or shift-left.
    pub fn is_left(self) -> bool {
        matches!(self, Self::Left | Self::ShiftLeft)
    }

    /// Right or shift-right.
    pub fn is_right(self) -> bool {
        matches!(self, Self::Right | Self::ShiftRight)
    }

    /// Either shift click.
    pub fn is_shift(self) -> bool {
        matches!(self, Self::ShiftLeft | Self::ShiftRight)
    }
}

/// What the click would do to items if allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryAction {
    /// Pick up items into the cursor.
    Pickup,
    /// Place cursor items into the slot.
    Place,
    /// Clone a stack (creative middle click).
    Clone,
    /// Shift-move to the other inventory.
    MoveToOther,
    /// Swap with a hotbar slot.
    HotbarSwap,
    /// Drop items from the slot.
    Drop,
    /// Gather matching items onto the cursor.
    CollectToCursor,
    /// No effect.
    Nothing,
    /// Anything else.
    Other,
}

impl InventoryAction {
    /// Pickup, place and clone variants are treated alike by the listener.
    pub fn is_direct(self) -> bool {
        matches!(self, Self::Pickup | Self::Place | Self::Clone)
    }
}

/// Which kind of window the holder has open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// A chest-style inventory (menus are always this).
    #[default]
    Menu,
    /// The creative inventory screen.
    Creative,
    /// The holder's own crafting view.
    Crafting,
    /// Furnaces, anvils and the like. Only clicks in the holder's inventory
    /// part reach the open menu.
    Other,
}

/// Where a raw slot lands relative to the open menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClickLocation {
    /// Inside the menu grid.
    Menu,
    /// Inside the holder's own inventory below it.
    Player,
    /// Outside the window.
    Outside,
}

impl ClickLocation {
    /// Classify `raw_slot` against a menu of `menu_size` cells.
    pub fn of(raw_slot: i32, menu_size: usize) -> Self {
        match usize::try_from(raw_slot) {
            Ok(slot) if slot < menu_size => Self::Menu,
            Ok(_) => Self::Player,
            Err(_) => Self::Outside,
        }
    }
}

/// A click inside an open inventory window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// Who clicked.
    pub holder: HolderId,
    /// Slot index across the whole window; negative when outside.
    pub raw_slot: i32,
    /// Click kind.
    pub click: ClickType,
    /// Item effect.
    pub action: InventoryAction,
    /// Open window kind.
    #[serde(default)]
    pub view: ViewKind,
    /// Cells in the top part of a [`ViewKind::Other`] window; raw slots below
    /// this land in the holder's inventory.
    #[serde(default)]
    pub view_size: usize,
    /// Item in the clicked slot.
    #[serde(default)]
    pub current_item: Option<ItemStack>,
    /// Item on the cursor.
    #[serde(default)]
    pub cursor_item: Option<ItemStack>,
}

impl ClickEvent {
    /// A pickup click on `raw_slot` with nothing on the cursor.
    pub fn new(holder: HolderId, raw_slot: i32, click: ClickType) -> Self {
        Self {
            holder,
            raw_slot,
            click,
            action: InventoryAction::Pickup,
            view: ViewKind::Menu,
            view_size: 0,
            current_item: None,
            cursor_item: None,
        }
    }

    /// Replace the item effect.
    pub fn with_action(mut self, action: InventoryAction) -> Self {
        self.action = action;
        self
    }

    /// Replace the window kind.
    pub fn with_view(mut self, view: ViewKind) -> Self {
        self.view = view;
        self
    }

    /// A click in a non-menu window whose top part has `view_size` cells.
    pub fn in_other_view(mut self, view_size: usize) -> Self {
        self.view = ViewKind::Other;
        self.view_size = view_size;
        self
    }

    /// Set the clicked slot's item.
    pub fn with_current(mut self, item: Option<ItemStack>) -> Self {
        self.current_item = item;
        self
    }

    /// Set the cursor item.
    pub fn with_cursor(mut self, item: Option<ItemStack>) -> Self {
        self.cursor_item = item;
        self
    }

    /// Classify against a menu of `menu_size` cells.
    pub fn location(&self, menu_size: usize) -> ClickLocation {
        ClickLocation::of(self.raw_slot, menu_size)
    }
}

/// A drag spreading cursor items across several slots.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragEvent {
    /// Who dragged.
    pub holder: HolderId,
    /// Every raw slot touched.
    pub raw_slots: BTreeSet<usize>,
    /// Resulting items per raw slot.
    pub new_items: BTreeMap<usize, ItemStack>,
}

/// Whether the host should let the event's item effect happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventResult {
    /// Let the item effect proceed.
    Allow,
    /// Cancel the item effect.
    Deny,
}

impl EventResult {
    /// Whether the effect is cancelled.
    pub fn is_denied(self) -> bool {
        self == Self::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_relative_to_menu_size() {
        assert_eq!(ClickLocation::of(0, 27), ClickLocation::Menu);
        assert_eq!(ClickLocation::of(26, 27), ClickLocation::Menu);
        assert_eq!(ClickLocation::of(27, 27), ClickLocation::Player);
        assert_eq!(ClickLocation::of(-999, 27), ClickLocation::Outside);
    }

    #[test]
    fn click_type_groups() {
        assert!(ClickType::ShiftRight.is_right());
        assert!(ClickType::ShiftRight.is_shift());
        assert!(!ClickType::Middle.is_left());
        assert!(InventoryAction::Clone.is_direct());
        assert!(!InventoryAction::MoveToOther.is_direct());
    }
}
