//! Repeating per-menu jobs and the ticking set.
//!
//! Nothing here owns a clock. The manager polls every task once per
//! [`MenuManager::tick`](crate::MenuManager::tick) and runs the due ones.

use crate::button::Button;
use crate::error::MenuError;
use crate::menu::{Menu, MenuId};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Custom job body.
pub type TaskFn = Rc<dyn Fn(&mut dyn Menu) -> anyhow::Result<()>>;

/// Who a task belongs to. Button tasks are dropped whenever buttons are rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Lives as long as the menu.
    Menu,
    /// Lives as long as the current set of buttons.
    Button,
}

/// What a task does when it fires.
#[derive(Clone)]
pub enum TaskJob {
    /// Draw the next frame of an animated button.
    AnimateButton(Rc<Button>),
    /// Run the menu-level animation hook.
    AnimateMenu,
    /// Run arbitrary code against the menu.
    Custom(TaskFn),
}

impl fmt::Debug for TaskJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnimateButton(button) => f.debug_tuple("AnimateButton").field(button).finish(),
            Self::AnimateMenu => f.write_str("AnimateMenu"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A repeating job that can be cancelled and registered again.
///
/// A freshly registered task first fires on the next poll, then every
/// `interval` polls.
#[derive(Debug, Clone)]
pub struct ReschedulableTask {
    kind: TaskKind,
    job: TaskJob,
    interval: u64,
    countdown: u64,
    cancelled: bool,
}

impl ReschedulableTask {
    /// A cancelled task; call [`register`](Self::register) to start it.
    pub fn new(kind: TaskKind, job: TaskJob, interval: u64) -> Self {
        Self {
            kind,
            job,
            interval: interval.max(1),
            countdown: 0,
            cancelled: true,
        }
    }

    /// Start (or restart from scratch) the schedule.
    pub fn register(&mut self) {
        self.countdown = 1;
        self.cancelled = false;
    }

    /// Stop firing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Register again if cancelled. Running tasks are left alone.
    pub fn restart(&mut self) {
        if self.cancelled {
            self.register();
        }
    }

    /// Whether the task is stopped.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Ownership class.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Job body.
    pub fn job(&self) -> &TaskJob {
        &self.job
    }

    /// Ticks between runs.
    pub fn interval(&self) -> u64 {
        self.interval
    }

    /// Advance one tick; true when the job is due now.
    pub fn poll(&mut self) -> bool {
        if self.cancelled {
            return false;
        }
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown == 0 {
            self.countdown = self.interval;
            true
        } else {
            false
        }
    }
}

/// Menus whose tick hook runs every manager tick.
#[derive(Debug, Default)]
pub struct TickingManager {
    menus: BTreeSet<MenuId>,
}

impl TickingManager {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a menu that declares ticking.
    pub fn add(&mut self, menu: &dyn Menu) -> Result<(), MenuError> {
        let id = menu.core().id();
        if !menu.handler().is_ticking() {
            return Err(MenuError::NotTicking(id));
        }
        self.menus.insert(id);
        Ok(())
    }

    /// Stop ticking `id`.
    pub fn cancel(&mut self, id: MenuId) -> bool {
        self.menus.remove(&id)
    }

    /// Stop ticking everything.
    pub fn cancel_all(&mut self) {
        self.menus.clear();
    }

    /// Whether `id` ticks.
    pub fn contains(&self, id: MenuId) -> bool {
        self.menus.contains(&id)
    }

    /// Ticking menus in id order.
    pub fn ids(&self) -> Vec<MenuId> {
        self.menus.iter().copied().collect()
    }
}
