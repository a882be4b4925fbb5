//! Per-holder menu bindings.

use crate::menu::MenuId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity of a player-like entity that can hold menus.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HolderId(pub u64);

impl fmt::Display for HolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "holder#{}", self.0)
    }
}

/// What a single holder has open, had open, and is watching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuSession {
    current: Option<MenuId>,
    previous: Option<MenuId>,
    viewed: Option<MenuId>,
}

impl MenuSession {
    /// The interactive menu, if any.
    pub fn current(&self) -> Option<MenuId> {
        self.current
    }

    /// The menu open before the current one (or before the last close).
    pub fn previous(&self) -> Option<MenuId> {
        self.previous
    }

    /// Another holder's menu being watched read-only.
    pub fn viewed(&self) -> Option<MenuId> {
        self.viewed
    }

    /// Make `menu` current, demoting the old current menu to previous.
    pub(crate) fn update(&mut self, menu: MenuId) {
        if let Some(current) = self.current {
            if current != menu {
                self.previous = Some(current);
            }
        }
        self.current = Some(menu);
    }

    /// Drop the current binding, remembering it as previous.
    pub(crate) fn remove_current(&mut self) -> Option<MenuId> {
        let removed = self.current.take();
        if removed.is_some() {
            self.previous = removed;
        }
        removed
    }

    pub(crate) fn set_viewed(&mut self, menu: MenuId) {
        self.viewed = Some(menu);
    }

    pub(crate) fn remove_viewed(&mut self) -> Option<MenuId> {
        self.viewed.take()
    }

    fn references(&self) -> impl Iterator<Item = MenuId> {
        [self.current, self.previous, self.viewed].into_iter().flatten()
    }
}

/// Sessions keyed by holder, created on connect and dropped on disconnect.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: BTreeMap<HolderId, MenuSession>,
}

impl SessionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a session exists for `holder`.
    pub fn connect(&mut self, holder: HolderId) -> &mut MenuSession {
        self.sessions.entry(holder).or_default()
    }

    /// Remove and return the holder's session.
    pub fn disconnect(&mut self, holder: HolderId) -> Option<MenuSession> {
        self.sessions.remove(&holder)
    }

    /// Session for `holder`, if connected.
    pub fn get(&self, holder: HolderId) -> Option<&MenuSession> {
        self.sessions.get(&holder)
    }

    /// Current menu of `holder`.
    pub fn current(&self, holder: HolderId) -> Option<MenuId> {
        self.get(holder).and_then(MenuSession::current)
    }

    pub(crate) fn session_mut(&mut self, holder: HolderId) -> &mut MenuSession {
        self.connect(holder)
    }

    /// Holders whose current menu is `menu`.
    pub fn holders_of(&self, menu: MenuId) -> impl Iterator<Item = HolderId> + '_ {
        self.sessions
            .iter()
            .filter(move |(_, session)| session.current == Some(menu))
            .map(|(holder, _)| *holder)
    }

    /// Every menu any session points at.
    pub fn referenced_menus(&self) -> BTreeSet<MenuId> {
        self.sessions
            .values()
            .flat_map(MenuSession::references)
            .collect()
    }

    /// Connected holders.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
