use super::{CloseReason, Menu, MenuId};
use crate::button::Button;
use crate::error::MenuError;
use crate::inventory::MenuInventory;
use crate::position::{InventoryPosition, COLUMNS, MAX_ROWS};
use crate::session::HolderId;
use crate::task::{ReschedulableTask, TaskJob, TaskKind};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Back-reference to the menu that opened this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLink {
    /// Parent handle.
    pub id: MenuId,
    /// Parent title, shown on the return button.
    pub title: String,
}

/// State shared by every menu, owned by the framework.
#[derive(Debug, Default)]
pub struct MenuCore {
    id: MenuId,
    title: String,
    rows: Option<usize>,
    size: Option<usize>,
    pub(crate) inventory: Option<MenuInventory>,
    pub(crate) buttons: Vec<Rc<Button>>,
    pub(crate) premade: Vec<Rc<Button>>,
    pub(crate) tasks: Vec<ReschedulableTask>,
    pub(crate) viewers: BTreeSet<HolderId>,
    pub(crate) holder: Option<HolderId>,
    pub(crate) parent: Option<ParentLink>,
    close_reason: CloseReason,
    pub(crate) registered: bool,
}

impl MenuCore {
    /// Core with a title and no layout yet; pick one of [`with_rows`](Self::with_rows)
    /// or [`with_size`](Self::with_size).
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Lay the menu out with `rows` rows.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Lay the menu out with `size` slots.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Link a parent without going through a switch.
    pub fn with_parent(mut self, id: MenuId, title: impl Into<String>) -> Self {
        self.parent = Some(ParentLink {
            id,
            title: title.into(),
        });
        self
    }

    /// Row count after validating the configuration.
    pub fn resolve_rows(&self) -> Result<usize, MenuError> {
        if self.title.is_empty() {
            return Err(MenuError::MissingTitle);
        }
        match (self.rows, self.size) {
            (Some(rows), None) if (1..=MAX_ROWS).contains(&rows) => Ok(rows),
            (Some(rows), None) => Err(MenuError::InvalidRows(rows)),
            (None, Some(size)) if size % COLUMNS == 0 && (COLUMNS..=MAX_ROWS * COLUMNS).contains(&size) => {
                Ok(size / COLUMNS)
            }
            (None, Some(size)) => Err(MenuError::InvalidSize(size)),
            _ => Err(MenuError::InvalidLayout),
        }
    }

    /// Handle assigned by the manager.
    pub fn id(&self) -> MenuId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: MenuId) {
        self.id = id;
    }

    /// Window title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title; an open grid is retitled on the next flush.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if let Some(inventory) = self.inventory.as_mut() {
            inventory.set_title(self.title.clone());
        }
    }

    /// Slot count once formed, or the configured one.
    pub fn size(&self) -> Option<usize> {
        self.inventory
            .as_ref()
            .map(MenuInventory::size)
            .or_else(|| self.resolve_rows().ok().map(|rows| rows * COLUMNS))
    }

    /// The formed grid.
    pub fn inventory(&self) -> Option<&MenuInventory> {
        self.inventory.as_ref()
    }

    /// The formed grid, mutably.
    pub fn inventory_mut(&mut self) -> Result<&mut MenuInventory, MenuError> {
        self.inventory.as_mut().ok_or(MenuError::NotDisplayed)
    }

    /// Buttons the handler registered during the last form.
    pub fn buttons(&self) -> &[Rc<Button>] {
        &self.buttons
    }

    /// Info, close and return buttons added during the last form.
    pub fn premade_buttons(&self) -> &[Rc<Button>] {
        &self.premade
    }

    /// Whether a registered button paints `position`.
    pub fn has_button_at(&self, position: InventoryPosition) -> bool {
        self.buttons
            .iter()
            .chain(&self.premade)
            .any(|button| button.occupies(position))
    }

    /// The primary holder.
    pub fn holder(&self) -> Option<HolderId> {
        self.holder
    }

    /// Holders spectating this menu.
    pub fn viewers(&self) -> &BTreeSet<HolderId> {
        &self.viewers
    }

    /// Parent link, if opened from another menu.
    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ParentLink>) {
        self.parent = parent;
    }

    /// How the next close is treated.
    pub fn close_reason(&self) -> CloseReason {
        self.close_reason
    }

    /// Mark how the next close should be treated.
    pub fn set_close_reason(&mut self, reason: CloseReason) {
        self.close_reason = reason;
    }

    /// Run `job` against the menu every `interval` ticks while it is open.
    pub fn schedule(
        &mut self,
        interval: u64,
        job: impl Fn(&mut dyn Menu) -> anyhow::Result<()> + 'static,
    ) {
        let mut task = ReschedulableTask::new(TaskKind::Menu, TaskJob::Custom(Rc::new(job)), interval);
        if self.registered {
            task.register();
        }
        self.tasks.push(task);
    }

    /// Scheduled jobs.
    pub fn tasks(&self) -> &[ReschedulableTask] {
        &self.tasks
    }

    pub(crate) fn restart_tasks(&mut self) {
        self.tasks.iter_mut().for_each(ReschedulableTask::restart);
    }

    pub(crate) fn cancel_tasks(&mut self) {
        self.tasks.iter_mut().for_each(ReschedulableTask::cancel);
    }

    /// Unformed copy keeping the title, layout and parent link.
    pub fn fresh_copy(&self) -> Self {
        Self {
            title: self.title.clone(),
            rows: self.rows,
            size: self.size,
            parent: self.parent.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_validation() {
        assert_eq!(MenuCore::new("A").with_rows(3).resolve_rows(), Ok(3));
        assert_eq!(MenuCore::new("A").with_size(54).resolve_rows(), Ok(6));
        assert_eq!(MenuCore::new("").with_rows(3).resolve_rows(), Err(MenuError::MissingTitle));
        assert_eq!(MenuCore::new("A").resolve_rows(), Err(MenuError::InvalidLayout));
        assert_eq!(
            MenuCore::new("A").with_rows(2).with_size(18).resolve_rows(),
            Err(MenuError::InvalidLayout)
        );
        assert_eq!(MenuCore::new("A").with_size(20).resolve_rows(), Err(MenuError::InvalidSize(20)));
        assert_eq!(MenuCore::new("A").with_size(63).resolve_rows(), Err(MenuError::InvalidSize(63)));
        assert_eq!(MenuCore::new("A").with_rows(7).resolve_rows(), Err(MenuError::InvalidRows(7)));
    }

    #[test]
    fn fresh_copy_drops_runtime_state() {
        let mut core = MenuCore::new("Shop").with_rows(2).with_parent(MenuId(1), "Hub");
        core.set_id(MenuId(9));
        core.holder = Some(HolderId(3));
        core.registered = true;
        core.schedule(5, |_| Ok(()));
        assert!(!core.tasks()[0].is_cancelled());

        let copy = core.fresh_copy();
        assert_eq!(copy.id(), MenuId::default());
        assert_eq!(copy.title(), "Shop");
        assert_eq!(copy.parent().map(|p| p.id), Some(MenuId(1)));
        assert!(copy.tasks().is_empty());
        assert_eq!(copy.holder(), None);
    }
}
