//! An in-memory [`MenuHost`] that records every call.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::trace;
use yggdrasil_core::ItemStack;
use yggdrasil_menus::{CommandSender, HolderId, InventorySnapshot, MenuHost};

/// Permission that grants every other permission in a [`RecordingHost`].
pub const WILDCARD_PERMISSION: &str = "*";

/// One outbound call the framework made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    /// A full inventory was shown.
    Open {
        /// Target.
        holder: HolderId,
        /// Window title.
        title: String,
        /// Row count.
        rows: usize,
    },
    /// One cell changed.
    Update {
        /// Target.
        holder: HolderId,
        /// Slot index.
        slot: usize,
        /// New content.
        item: Option<ItemStack>,
    },
    /// The window was closed.
    Close {
        /// Target.
        holder: HolderId,
    },
    /// A chat message.
    Message {
        /// Target.
        holder: HolderId,
        /// Markup text.
        text: String,
    },
    /// A dispatched command.
    Command {
        /// Who runs it.
        sender: CommandSender,
        /// Command line without the slash.
        command: String,
    },
    /// The holder's own inventory was re-sent.
    Resync {
        /// Target.
        holder: HolderId,
    },
}

impl HostEvent {
    /// The holder the call targeted, if any.
    pub fn holder(&self) -> Option<HolderId> {
        match self {
            Self::Open { holder, .. }
            | Self::Update { holder, .. }
            | Self::Close { holder }
            | Self::Message { holder, .. }
            | Self::Resync { holder } => Some(*holder),
            Self::Command { .. } => None,
        }
    }
}

/// Scriptable host for tests and the demo runner.
///
/// Tracks what each holder currently sees, so tests can assert on the screen
/// rather than on the menu's internal grid.
#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Vec<HostEvent>,
    permissions: BTreeMap<HolderId, BTreeSet<String>>,
    conversing: BTreeSet<HolderId>,
    screens: BTreeMap<HolderId, InventorySnapshot>,
}

impl RecordingHost {
    /// Empty host where nobody has any permission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `holder` a permission. [`WILDCARD_PERMISSION`] grants everything.
    pub fn grant(&mut self, holder: HolderId, permission: &str) {
        self.permissions
            .entry(holder)
            .or_default()
            .insert(permission.to_owned());
    }

    /// Take a permission away.
    pub fn revoke(&mut self, holder: HolderId, permission: &str) {
        if let Some(granted) = self.permissions.get_mut(&holder) {
            granted.remove(permission);
        }
    }

    /// Mark `holder` as in (or out of) a chat conversation.
    pub fn set_conversing(&mut self, holder: HolderId, conversing: bool) {
        if conversing {
            self.conversing.insert(holder);
        } else {
            self.conversing.remove(&holder);
        }
    }

    /// Everything recorded so far.
    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Drain the log.
    pub fn take_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forget the log but keep the screens.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Messages sent to `holder`, oldest first.
    pub fn messages_to(&self, holder: HolderId) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Message { holder: to, text } if *to == holder => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Commands dispatched, oldest first.
    pub fn commands(&self) -> Vec<(CommandSender, &str)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Command { sender, command } => Some((*sender, command.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Slots updated for `holder`, in call order.
    pub fn updated_slots(&self, holder: HolderId) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Update { holder: to, slot, .. } if *to == holder => Some(*slot),
                _ => None,
            })
            .collect()
    }

    /// How many windows were opened for `holder`.
    pub fn open_count(&self, holder: HolderId) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::Open { holder: to, .. } if *to == holder))
            .count()
    }

    /// How many times `holder`'s window was closed by the framework.
    pub fn close_count(&self, holder: HolderId) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, HostEvent::Close { holder: to } if *to == holder))
            .count()
    }

    /// What `holder` currently sees.
    pub fn screen(&self, holder: HolderId) -> Option<&InventorySnapshot> {
        self.screens.get(&holder)
    }

    /// Title of `holder`'s open window.
    pub fn title_of(&self, holder: HolderId) -> Option<&str> {
        self.screen(holder).map(|screen| screen.title.as_str())
    }

    /// Item `holder` sees in `slot`.
    pub fn item_at(&self, holder: HolderId, slot: usize) -> Option<&ItemStack> {
        self.screen(holder)
            .and_then(|screen| screen.slots.get(slot))
            .and_then(Option::as_ref)
    }

    /// Drop `holder`'s screen without recording a framework close, as when
    /// the player presses escape. Pair with `MenuManager::handle_close`.
    pub fn client_close(&mut self, holder: HolderId) {
        self.screens.remove(&holder);
    }

    fn record(&mut self, event: HostEvent) {
        trace!(?event, "Host call");
        self.events.push(event);
    }
}

impl MenuHost for RecordingHost {
    fn has_permission(&self, holder: HolderId, permission: &str) -> bool {
        self.permissions.get(&holder).map_or(false, |granted| {
            granted.contains(WILDCARD_PERMISSION) || granted.contains(permission)
        })
    }

    fn is_conversing(&self, holder: HolderId) -> bool {
        self.conversing.contains(&holder)
    }

    fn open_inventory(&mut self, holder: HolderId, inventory: &InventorySnapshot) {
        self.screens.insert(holder, inventory.clone());
        self.record(HostEvent::Open {
            holder,
            title: inventory.title.clone(),
            rows: inventory.rows,
        });
    }

    fn update_slot(&mut self, holder: HolderId, slot: usize, item: Option<&ItemStack>) {
        if let Some(cell) = self
            .screens
            .get_mut(&holder)
            .and_then(|screen| screen.slots.get_mut(slot))
        {
            *cell = item.cloned();
        }
        self.record(HostEvent::Update {
            holder,
            slot,
            item: item.cloned(),
        });
    }

    fn close_inventory(&mut self, holder: HolderId) {
        self.screens.remove(&holder);
        self.record(HostEvent::Close { holder });
    }

    fn send_message(&mut self, holder: HolderId, message: &str) {
        self.record(HostEvent::Message {
            holder,
            text: message.to_owned(),
        });
    }

    fn dispatch_command(&mut self, sender: CommandSender, command: &str) {
        self.record(HostEvent::Command {
            sender,
            command: command.to_owned(),
        });
    }

    fn resync_inventory(&mut self, holder: HolderId) {
        self.record(HostEvent::Resync { holder });
    }
}
