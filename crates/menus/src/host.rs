//! The seam between the menu framework and the server that displays it.

use crate::session::HolderId;
use serde::{Deserialize, Serialize};
use yggdrasil_core::ItemStack;

/// A full copy of a menu grid, sent when an inventory is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// Window title, in markup.
    pub title: String,
    /// Row count (1..=6).
    pub rows: usize,
    /// `rows * 9` cells in slot order; `None` is an empty slot.
    pub slots: Vec<Option<ItemStack>>,
}

/// Who runs a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandSender {
    /// The server console.
    Console,
    /// The holder that clicked.
    Holder(HolderId),
}

/// Services the embedding server provides to the framework.
///
/// Outbound calls mirror state the framework already committed; the host
/// never calls back into the manager from inside them. The host reports only
/// client-initiated closes through [`MenuManager::handle_close`](crate::MenuManager::handle_close);
/// closes and re-opens the manager performs itself must not be echoed back.
pub trait MenuHost {
    /// String-keyed capability check.
    fn has_permission(&self, holder: HolderId, permission: &str) -> bool;

    /// Whether the holder is in a chat conversation that should block menus.
    fn is_conversing(&self, _holder: HolderId) -> bool {
        false
    }

    /// Show a full inventory, replacing whatever the holder has open.
    fn open_inventory(&mut self, holder: HolderId, inventory: &InventorySnapshot);

    /// Mirror one changed cell of the open inventory.
    fn update_slot(&mut self, holder: HolderId, slot: usize, item: Option<&ItemStack>);

    /// Close the holder's open inventory.
    fn close_inventory(&mut self, holder: HolderId);

    /// Send a chat message.
    fn send_message(&mut self, holder: HolderId, message: &str);

    /// Run a command. The leading `/` has already been stripped.
    fn dispatch_command(&mut self, sender: CommandSender, command: &str);

    /// Re-send the holder's own inventory contents to the client.
    fn resync_inventory(&mut self, _holder: HolderId) {}
}

/// Read-only view of the host scoped to one holder, used while drawing.
#[derive(Clone, Copy)]
pub struct Audience<'a> {
    holder: HolderId,
    host: &'a dyn MenuHost,
}

impl<'a> Audience<'a> {
    /// Scope `host` to `holder`.
    pub fn new(holder: HolderId, host: &'a dyn MenuHost) -> Self {
        Self { holder, host }
    }

    /// The holder being drawn for.
    pub fn holder(&self) -> HolderId {
        self.holder
    }

    /// `None` always passes; otherwise asks the host.
    pub fn can_see(&self, permission: Option<&str>) -> bool {
        permission.map_or(true, |permission| {
            self.host.has_permission(self.holder, permission)
        })
    }

    /// Ask the host for a permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.host.has_permission(self.holder, permission)
    }
}

impl std::fmt::Debug for Audience<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Audience")
            .field("holder", &self.holder)
            .finish_non_exhaustive()
    }
}
