//! What a click handler can reach while it runs.

use crate::button::ReturnStrategy;
use crate::event::ClickType;
use crate::host::{Audience, CommandSender, MenuHost};
use crate::menu::{Menu, MenuId};
use crate::position::InventoryPosition;
use crate::session::HolderId;
use crate::settings::MenuSettings;
use std::fmt;

/// Navigation requested by a handler, applied by the manager after the handler returns.
pub enum MenuAction {
    /// Open a menu with no parent link; the clicked menu closes normally.
    Open(Box<dyn Menu>),
    /// Switch to a menu whose parent becomes the clicked menu.
    Switch(Box<dyn Menu>),
    /// Go back to the clicked menu's parent.
    Return(ReturnStrategy),
    /// Close the clicked menu.
    Close,
    /// Rebuild and redraw the clicked menu.
    Refresh,
    /// Re-send the holder's own inventory after the configured delay.
    Resync,
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open(menu) => f.debug_tuple("Open").field(&menu.core().title()).finish(),
            Self::Switch(menu) => f.debug_tuple("Switch").field(&menu.core().title()).finish(),
            Self::Return(strategy) => f.debug_tuple("Return").field(strategy).finish(),
            Self::Close => f.write_str("Close"),
            Self::Refresh => f.write_str("Refresh"),
            Self::Resync => f.write_str("Resync"),
        }
    }
}

/// Handle passed to click handlers.
///
/// Messages and commands go straight to the host. Navigation is queued and
/// applied once the handler has returned and the menu is back in the arena.
pub struct ClickContext<'a> {
    holder: HolderId,
    click: ClickType,
    menu: MenuId,
    position: Option<InventoryPosition>,
    host: &'a mut dyn MenuHost,
    settings: &'a MenuSettings,
    actions: Vec<MenuAction>,
}

impl<'a> ClickContext<'a> {
    pub(crate) fn new(
        holder: HolderId,
        click: ClickType,
        menu: MenuId,
        position: Option<InventoryPosition>,
        host: &'a mut dyn MenuHost,
        settings: &'a MenuSettings,
    ) -> Self {
        Self {
            holder,
            click,
            menu,
            position,
            host,
            settings,
            actions: Vec::new(),
        }
    }

    /// Who clicked.
    pub fn holder(&self) -> HolderId {
        self.holder
    }

    /// How they clicked.
    pub fn click(&self) -> ClickType {
        self.click
    }

    /// The clicked menu.
    pub fn menu_id(&self) -> MenuId {
        self.menu
    }

    /// The clicked cell, when the click landed in the menu grid.
    pub fn position(&self) -> Option<InventoryPosition> {
        self.position
    }

    /// Manager settings.
    pub fn settings(&self) -> &'a MenuSettings {
        self.settings
    }

    /// Permission view for the clicker.
    pub fn audience(&self) -> Audience<'_> {
        Audience::new(self.holder, &*self.host)
    }

    /// Ask the host whether the clicker has `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.host.has_permission(self.holder, permission)
    }

    /// Send a message to the clicker.
    pub fn tell(&mut self, message: &str) {
        self.host.send_message(self.holder, message);
    }

    /// Dispatch a command, stripping a leading `/`.
    pub fn run_command(&mut self, command: &str, console: bool) {
        let command = command.strip_prefix('/').unwrap_or(command);
        let sender = if console {
            CommandSender::Console
        } else {
            CommandSender::Holder(self.holder)
        };
        self.host.dispatch_command(sender, command);
    }

    /// Open `menu` in place of the clicked one, without a parent link.
    pub fn open(&mut self, menu: Box<dyn Menu>) {
        self.actions.push(MenuAction::Open(menu));
    }

    /// Switch to `menu`, making the clicked menu its parent.
    pub fn switch_to(&mut self, menu: Box<dyn Menu>) {
        self.actions.push(MenuAction::Switch(menu));
    }

    /// Go back to the clicked menu's parent.
    pub fn return_to_parent(&mut self, strategy: ReturnStrategy) {
        self.actions.push(MenuAction::Return(strategy));
    }

    /// Close the clicked menu.
    pub fn close(&mut self) {
        self.actions.push(MenuAction::Close);
    }

    /// Rebuild every button and redraw the clicked menu.
    pub fn refresh(&mut self) {
        self.actions.push(MenuAction::Refresh);
    }

    /// Re-send the holder's own inventory later.
    pub fn resync_later(&mut self) {
        self.actions.push(MenuAction::Resync);
    }

    /// Queued navigation, in request order.
    pub fn actions(&self) -> &[MenuAction] {
        &self.actions
    }

    pub(crate) fn into_actions(self) -> Vec<MenuAction> {
        self.actions
    }
}

impl fmt::Debug for ClickContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickContext")
            .field("holder", &self.holder)
            .field("click", &self.click)
            .field("menu", &self.menu)
            .field("position", &self.position)
            .field("actions", &self.actions)
            .finish_non_exhaustive()
    }
}
