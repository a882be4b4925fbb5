use super::{AsAny, MenuClick, MenuCore, ParentLink};
use crate::button::{Button, ButtonRegistry, ReturnStrategy};
use crate::context::ClickContext;
use crate::event::{ClickEvent, ClickLocation};
use crate::inventory::MenuInventory;
use crate::position::InventoryPosition;
use crate::session::HolderId;
use std::collections::BTreeMap;
use yggdrasil_core::ItemStack;

/// How drags over a menu are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPolicy {
    /// Let every drag through.
    #[default]
    Allow,
    /// Cancel every drag while the menu is open, even inside the holder's inventory.
    Deny,
    /// Ask [`MenuHandler::can_drag`] for drags touching the menu grid.
    Check,
}

/// What spectators see when the primary holder closes the menu.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerPolicy {
    /// Close every spectator's view with a notice.
    #[default]
    Close,
    /// Keep spectators watching.
    Maintain {
        /// Tell spectators the holder left.
        notify: bool,
        /// Custom notice; the configured one when `None`.
        message: Option<String>,
    },
}

/// Author-side hooks of a menu. Every hook has a default.
pub trait MenuHandler: AsAny + 'static {
    /// Register the menu's buttons. Runs on every form and refresh.
    fn make_buttons(&mut self, _buttons: &mut ButtonRegistry) {}

    /// Decorate the grid before buttons are painted. Cells reserved by visible
    /// buttons are already protected from [`MenuInventory::set`].
    fn draw_extra(&mut self, _inventory: &mut MenuInventory) {}

    /// A click in the grid that no button claimed.
    fn on_click(
        &mut self,
        _ctx: &mut ClickContext<'_>,
        _click: &MenuClick,
        _core: &mut MenuCore,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// A click in the holder's own inventory while this menu is open.
    fn on_player_click(&mut self, _ctx: &mut ClickContext<'_>, _event: &ClickEvent) -> anyhow::Result<()> {
        Ok(())
    }

    /// Right after the grid is shown, before the session is updated.
    fn on_open(&mut self, _holder: HolderId, _core: &mut MenuCore) {}

    /// After the session points at this menu.
    fn post_display(&mut self, _holder: HolderId, _core: &mut MenuCore) {}

    /// Closed with [`CloseReason::Default`](super::CloseReason::Default).
    fn on_close(&mut self, _holder: HolderId, _core: &mut MenuCore) {}

    /// Closed with [`CloseReason::Switch`](super::CloseReason::Switch).
    fn on_switch(&mut self, _holder: HolderId, _core: &mut MenuCore) {}

    /// Before a return button leaves this menu.
    fn before_return(&mut self, _holder: HolderId) {}

    /// Whether a click's item effect may happen. Menu actions still dispatch either way.
    fn is_allowed(
        &self,
        _location: ClickLocation,
        _raw_slot: i32,
        _clicked: Option<&ItemStack>,
        _cursor: Option<&ItemStack>,
    ) -> bool {
        false
    }

    /// Drag handling.
    fn drag_policy(&self) -> DragPolicy {
        DragPolicy::Allow
    }

    /// Drag predicate for [`DragPolicy::Check`]; keys are raw slots.
    fn can_drag(&self, _items: &BTreeMap<usize, ItemStack>) -> bool {
        false
    }

    /// Spectator handling on close.
    fn viewer_policy(&self) -> ViewerPolicy {
        ViewerPolicy::Close
    }

    /// Lore of the info button.
    fn info(&self) -> Vec<String> {
        Vec::new()
    }

    /// Add the info button.
    fn add_info(&self) -> bool {
        !self.info().is_empty()
    }

    /// Add the close button.
    fn add_close(&self) -> bool {
        false
    }

    /// Add the return button. Returning true without a parent fails the form.
    fn add_return(&self, has_parent: bool) -> bool {
        has_parent
    }

    /// How the return button goes back.
    fn return_strategy(&self) -> ReturnStrategy {
        ReturnStrategy::Reuse
    }

    /// The info button for a grid of `rows`, shown when [`add_info`](Self::add_info)
    /// holds. `None` leaves the cell free.
    fn info_button(&self, rows: usize) -> Option<Button> {
        Some(Button::info(InventoryPosition::of(rows - 1, 0), self.info()))
    }

    /// The close button, shown when [`add_close`](Self::add_close) holds.
    fn close_button(&self, rows: usize) -> Option<Button> {
        Some(Button::close(InventoryPosition::of(rows - 1, 8)))
    }

    /// The return button, shown when [`add_return`](Self::add_return) holds.
    fn return_button(&self, rows: usize, parent: &ParentLink) -> Option<Button> {
        Some(Button::back(
            InventoryPosition::of(rows - 1, 7),
            &parent.title,
            self.return_strategy(),
        ))
    }

    /// Join the ticking set while open.
    fn is_ticking(&self) -> bool {
        false
    }

    /// Runs every manager tick while open and ticking.
    fn tick(&mut self, _core: &mut MenuCore) -> anyhow::Result<()> {
        Ok(())
    }

    /// Period of [`animate`](Self::animate), if the menu animates.
    fn animation_interval(&self) -> Option<u64> {
        None
    }

    /// Menu-level animation frame.
    fn animate(&mut self, _core: &mut MenuCore) -> anyhow::Result<()> {
        Ok(())
    }

    /// A reset copy of this handler for fresh returns.
    fn fresh(&self) -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}
