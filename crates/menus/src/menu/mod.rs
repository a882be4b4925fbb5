//! The menu abstraction.
//!
//! A menu is split in two. [`MenuCore`] holds the state every menu shares
//! (title, grid, buttons, tasks, viewers, parent link) and is managed by the
//! framework. A [`MenuHandler`] holds the author's own state and overrides the
//! lifecycle hooks. The menu types in [`crate::types`] glue one of each
//! together and add their layout (pages, lists) through the [`Menu`] trait.

mod base;
pub(crate) mod form;
mod handler;

pub use base::{MenuCore, ParentLink};
pub use handler::{DragPolicy, MenuHandler, ViewerPolicy};

use crate::button::Button;
use crate::context::ClickContext;
use crate::error::MenuError;
use crate::event::ClickType;
use crate::host::Audience;
use crate::position::InventoryPosition;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use yggdrasil_core::ItemStack;

/// Handle of a live menu inside a [`MenuManager`](crate::MenuManager).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MenuId(pub u64);

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

/// Why a menu is closing. Decides which handler hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CloseReason {
    /// Ordinary close; runs [`MenuHandler::on_close`].
    #[default]
    Default,
    /// Replaced by another menu; runs [`MenuHandler::on_switch`].
    Switch,
    /// Replaced by an anvil text prompt. No hook runs.
    Anvil,
    /// Closed for a reason the host could not name. No hook runs.
    Unknown,
}

/// Upcasting helper so boxed menus and handlers can be downcast.
pub trait AsAny: Any {
    /// `self` as [`Any`].
    fn as_any(&self) -> &dyn Any;
    /// `self` as mutable [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A click that landed inside the menu grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuClick {
    /// Clicked cell.
    pub position: InventoryPosition,
    /// Clicked slot index.
    pub slot: usize,
    /// Click kind.
    pub click: ClickType,
    /// Item in the cell when clicked.
    pub item: Option<ItemStack>,
}

/// A drawable, clickable menu.
///
/// Implementors provide access to the shared core and the handler. The
/// provided methods describe the layout added on top of the handler's own
/// buttons; plain menus keep the defaults.
pub trait Menu: AsAny + 'static {
    /// Shared state.
    fn core(&self) -> &MenuCore;

    /// Shared state, mutably.
    fn core_mut(&mut self) -> &mut MenuCore;

    /// The author's hooks.
    fn handler(&self) -> &dyn MenuHandler;

    /// The author's hooks, mutably.
    fn handler_mut(&mut self) -> &mut dyn MenuHandler;

    /// Both halves at once.
    fn parts_mut(&mut self) -> (&mut MenuCore, &mut dyn MenuHandler);

    /// Buttons drawn by the layout (page values, navigation, list slots).
    ///
    /// Consulted after the handler's buttons when resolving a click.
    fn layout_buttons(&self) -> Vec<Rc<Button>> {
        Vec::new()
    }

    /// Draw the layout after the handler's buttons are in place.
    fn draw_layout(&mut self, _audience: &Audience<'_>) -> Result<(), MenuError> {
        Ok(())
    }

    /// Show page `page` (1-based).
    fn switch_page(&mut self, _page: usize, _audience: &Audience<'_>) -> Result<(), MenuError> {
        Err(MenuError::NotPaged)
    }

    /// Page being shown (1-based), for paged menus.
    fn viewed_page(&self) -> Option<usize> {
        None
    }

    /// Number of pages, for paged menus.
    fn total_pages(&self) -> Option<usize> {
        None
    }

    /// Fallback for clicks no button claimed.
    fn on_click(&mut self, ctx: &mut ClickContext<'_>, click: &MenuClick) -> anyhow::Result<()> {
        let (core, handler) = self.parts_mut();
        handler.on_click(ctx, click, core)
    }

    /// A brand new copy of this menu, used by fresh returns.
    fn new_instance(&self) -> Option<Box<dyn Menu>> {
        None
    }
}

impl dyn Menu {
    /// The concrete menu, if it is a `T`.
    pub fn downcast_ref<T: Menu>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// The concrete menu, mutably, if it is a `T`.
    pub fn downcast_mut<T: Menu>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// The handler, if it is an `H`.
    pub fn state<H: MenuHandler>(&self) -> Option<&H> {
        self.handler().as_any().downcast_ref::<H>()
    }

    /// The handler, mutably, if it is an `H`.
    pub fn state_mut<H: MenuHandler>(&mut self) -> Option<&mut H> {
        self.handler_mut().as_any_mut().downcast_mut::<H>()
    }

    /// Handler buttons, premade buttons, then layout buttons, in lookup order.
    pub fn all_buttons(&self) -> Vec<Rc<Button>> {
        let core = self.core();
        core.buttons()
            .iter()
            .chain(core.premade_buttons())
            .cloned()
            .chain(self.layout_buttons())
            .collect()
    }
}

impl fmt::Debug for dyn Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.core().id())
            .field("title", &self.core().title())
            .finish_non_exhaustive()
    }
}
