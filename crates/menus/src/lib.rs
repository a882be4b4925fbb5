#![warn(missing_docs)]
//! Inventory menus for block-game servers.
//!
//! A [`MenuManager`] owns every live menu, routes host click, drag and close
//! events to buttons, drives animated buttons and ticking menus, and mirrors
//! grid changes back through the [`MenuHost`] the server implements.

pub mod button;
pub mod context;
pub mod error;
pub mod event;
pub mod host;
pub mod inventory;
mod listeners;
pub mod manager;
pub mod menu;
pub mod paginator;
pub mod position;
pub mod session;
pub mod settings;
pub mod task;
pub mod types;

pub use button::{AnimationSpec, Button, ButtonAction, ButtonRegistry, DynamicSpec, ReturnStrategy};
pub use context::{ClickContext, MenuAction};
pub use error::MenuError;
pub use event::{
    ClickEvent, ClickLocation, ClickType, DragEvent, EventResult, InventoryAction, ViewKind,
};
pub use host::{Audience, CommandSender, InventorySnapshot, MenuHost};
pub use inventory::{ClaimKind, MenuInventory};
pub use manager::MenuManager;
pub use menu::{
    CloseReason, DragPolicy, Menu, MenuClick, MenuCore, MenuHandler, MenuId, ParentLink,
    ViewerPolicy,
};
pub use paginator::{page_count_for, MenuPaginator};
pub use position::{InventoryPosition, InventorySize, COLUMNS, MAX_ROWS, MAX_SIZE};
pub use session::{HolderId, MenuSession, SessionRegistry};
pub use settings::{MenuMessages, MenuSettings, SettingsError};
pub use task::{ReschedulableTask, TaskJob, TaskKind, TickingManager};
pub use types::{
    ListMenu, ListSource, MenuPage, PageMenu, PageNavigationButton, PageProvider, PageSource,
    PaginatedMenu, StandardMenu,
};
pub use yggdrasil_core::{ItemCreator, ItemStack, Material};
