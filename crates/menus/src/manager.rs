//! The menu arena and everything that drives it: displays, closes,
//! navigation, ticking, and mirroring grid changes to the host.

use crate::button::{Button, ReturnStrategy};
use crate::context::MenuAction;
use crate::error::MenuError;
use crate::host::{Audience, MenuHost};
use crate::inventory::ClaimKind;
use crate::menu::form::form_inventory;
use crate::menu::{CloseReason, Menu, MenuId, ParentLink, ViewerPolicy};
use crate::session::{HolderId, MenuSession, SessionRegistry};
use crate::settings::MenuSettings;
use crate::task::{ReschedulableTask, TaskJob, TaskKind, TickingManager};
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, error, info, warn};
use yggdrasil_core::{ItemStack, SimTick};

/// Owns every live menu and the per-holder sessions, and talks to the host.
///
/// Single-threaded: the host calls the `handle_*` methods from its event
/// thread and [`tick`](Self::tick) once per server tick.
pub struct MenuManager<H: MenuHost> {
    pub(crate) host: H,
    pub(crate) settings: MenuSettings,
    pub(crate) menus: BTreeMap<MenuId, Box<dyn Menu>>,
    pub(crate) sessions: SessionRegistry,
    ticking: TickingManager,
    tick: SimTick,
    next_id: u64,
    pending_resyncs: Vec<(SimTick, HolderId)>,
}

impl<H: MenuHost> MenuManager<H> {
    /// Manager over `host` with `settings`.
    pub fn new(host: H, settings: MenuSettings) -> Self {
        Self {
            host,
            settings,
            menus: BTreeMap::new(),
            sessions: SessionRegistry::new(),
            ticking: TickingManager::new(),
            tick: SimTick::ZERO,
            next_id: 1,
            pending_resyncs: Vec::new(),
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably (tests use this to script permissions).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active settings.
    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    /// Per-holder bindings.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Session of `holder`, if connected.
    pub fn session(&self, holder: HolderId) -> Option<&MenuSession> {
        self.sessions.get(holder)
    }

    /// Ticks elapsed since the manager started.
    pub fn current_tick(&self) -> SimTick {
        self.tick
    }

    /// Menus in the ticking set.
    pub fn ticking(&self) -> &TickingManager {
        &self.ticking
    }

    /// Create an empty session for a holder that just joined.
    pub fn connect(&mut self, holder: HolderId) {
        self.sessions.connect(holder);
    }

    /// Move `menu` into the arena without showing it.
    pub fn insert(&mut self, mut menu: Box<dyn Menu>) -> MenuId {
        let id = MenuId(self.next_id);
        self.next_id += 1;
        menu.core_mut().set_id(id);
        self.menus.insert(id, menu);
        id
    }

    /// A live menu.
    pub fn menu(&self, id: MenuId) -> Option<&dyn Menu> {
        self.menus.get(&id).map(|menu| &**menu)
    }

    /// A live menu, mutably. Grid edits made through it reach the host on the
    /// next [`flush`](Self::flush) or tick.
    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut dyn Menu> {
        self.menus.get_mut(&id).map(|menu| &mut **menu)
    }

    /// The menu `holder` is interacting with.
    pub fn current_menu(&self, holder: HolderId) -> Option<&dyn Menu> {
        self.sessions.current(holder).and_then(|id| self.menu(id))
    }

    /// Number of live menus.
    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    /// Drop a menu that nobody holds. Returns it, or `None` if unknown or still open.
    pub fn remove(&mut self, id: MenuId) -> Option<Box<dyn Menu>> {
        if self.sessions.referenced_menus().contains(&id) {
            warn!(menu = %id, "Refusing to remove a menu a session still references");
            return None;
        }
        self.ticking.cancel(id);
        self.menus.remove(&id)
    }

    /// Insert `menu` and show it to `holder`.
    pub fn open(&mut self, holder: HolderId, menu: Box<dyn Menu>) -> Result<MenuId, MenuError> {
        let id = self.insert(menu);
        self.display_to(holder, id, false)?;
        Ok(id)
    }

    /// Show a live menu to `holder`, closing whatever they had open.
    ///
    /// A conversing holder is refused with a message unless `force` is set.
    pub fn display_to(&mut self, holder: HolderId, id: MenuId, force: bool) -> Result<(), MenuError> {
        self.display_with(holder, id, force, CloseReason::Default)
    }

    /// Show a live menu to `holder`; their current menu closes as a switch.
    pub fn switch_menu(&mut self, holder: HolderId, id: MenuId) -> Result<(), MenuError> {
        self.display_with(holder, id, false, CloseReason::Switch)
    }

    fn display_with(
        &mut self,
        holder: HolderId,
        id: MenuId,
        force: bool,
        reason: CloseReason,
    ) -> Result<(), MenuError> {
        if !self.menus.contains_key(&id) {
            return Err(MenuError::UnknownMenu(id));
        }
        self.sessions.connect(holder);
        if !force && self.host.is_conversing(holder) {
            self.host
                .send_message(holder, &self.settings.messages.exit_conversation);
            debug!(menu = %id, %holder, "Refused menu to conversing holder");
            return Ok(());
        }

        let mut menu = self.menus.remove(&id).ok_or(MenuError::UnknownMenu(id))?;
        if let Err(err) = form_inventory(&mut *menu, &Audience::new(holder, &self.host)) {
            self.menus.insert(id, menu);
            return Err(err);
        }

        let animation = menu.handler().animation_interval();
        let core = menu.core_mut();
        core.holder = Some(holder);
        if !core.registered {
            if let Some(interval) = animation {
                let mut task = ReschedulableTask::new(TaskKind::Menu, TaskJob::AnimateMenu, interval);
                task.register();
                core.tasks.push(task);
            }
            core.registered = true;
        }
        core.restart_tasks();
        if menu.handler().is_ticking() && self.ticking.add(&*menu).is_ok() {
            debug!(menu = %id, "Menu joined the ticking set");
        }

        if let Some(old) = self.sessions.current(holder).filter(|old| *old != id) {
            if reason == CloseReason::Switch {
                if let Some(old_menu) = self.menus.get_mut(&old) {
                    old_menu.core_mut().set_close_reason(CloseReason::Switch);
                }
            }
            self.retire(holder, old);
        }
        self.detach_viewer(holder);

        let core = menu.core_mut();
        if let Some(grid) = core.inventory.as_mut() {
            let snapshot = grid.snapshot();
            grid.mark_clean();
            self.host.open_inventory(holder, &snapshot);
            for viewer in core.viewers.iter().filter(|viewer| **viewer != holder) {
                self.host.open_inventory(*viewer, &snapshot);
            }
        }

        let (core, handler) = menu.parts_mut();
        handler.on_open(holder, core);
        self.sessions.session_mut(holder).update(id);
        handler.post_display(holder, core);
        sync_button_tasks(&mut *menu, self.settings.default_animation_interval);

        self.menus.insert(id, menu);
        self.flush(id);
        self.collect_garbage();
        debug!(menu = %id, %holder, ?reason, "Displayed menu");
        Ok(())
    }

    /// Rebuild every button of a displayed menu and patch the changed cells.
    pub fn refresh_menu(&mut self, id: MenuId) -> Result<(), MenuError> {
        let mut menu = self.menus.remove(&id).ok_or(MenuError::UnknownMenu(id))?;
        let Some(holder) = menu.core().holder() else {
            self.menus.insert(id, menu);
            return Err(MenuError::NotDisplayed);
        };
        let result = form_inventory(&mut *menu, &Audience::new(holder, &self.host));
        sync_button_tasks(&mut *menu, self.settings.default_animation_interval);
        self.menus.insert(id, menu);
        self.flush(id);
        result
    }

    /// Run `f` against a live menu, then push its grid changes to the host.
    ///
    /// The audience is the menu's primary holder, or the default holder for a
    /// menu that was never displayed.
    pub fn update<R>(
        &mut self,
        id: MenuId,
        f: impl FnOnce(&mut dyn Menu, &Audience<'_>) -> Result<R, MenuError>,
    ) -> Result<R, MenuError> {
        let menu = self.menus.get_mut(&id).ok_or(MenuError::UnknownMenu(id))?;
        let holder = menu.core().holder().unwrap_or_default();
        let result = f(&mut **menu, &Audience::new(holder, &self.host));
        sync_button_tasks(&mut **menu, self.settings.default_animation_interval);
        self.flush(id);
        result
    }

    /// Close `holder`'s menu from the server side.
    pub fn close(&mut self, holder: HolderId) -> Result<(), MenuError> {
        let id = self
            .sessions
            .current(holder)
            .ok_or(MenuError::NoOpenMenu(holder))?;
        self.host.close_inventory(holder);
        self.retire(holder, id);
        self.collect_garbage();
        Ok(())
    }

    /// Mirror a displayed menu to `viewer`, read-only.
    pub fn show_to(&mut self, viewer: HolderId, id: MenuId) -> Result<(), MenuError> {
        let menu = self.menus.get(&id).ok_or(MenuError::UnknownMenu(id))?;
        if menu.core().holder().is_none() || menu.core().inventory().is_none() {
            return Err(MenuError::NotDisplayed);
        }
        self.sessions.connect(viewer);
        if let Some(current) = self.sessions.current(viewer) {
            self.retire(viewer, current);
        }
        self.detach_viewer(viewer);

        let menu = self.menus.get_mut(&id).ok_or(MenuError::UnknownMenu(id))?;
        let snapshot = menu
            .core()
            .inventory()
            .map(|grid| grid.snapshot())
            .ok_or(MenuError::NotDisplayed)?;
        menu.core_mut().viewers.insert(viewer);
        self.sessions.session_mut(viewer).set_viewed(id);
        self.host.open_inventory(viewer, &snapshot);
        debug!(menu = %id, %viewer, "Viewer attached");
        Ok(())
    }

    /// Stop `viewer` spectating and close their window. Returns the menu they watched.
    pub fn remove_viewer(&mut self, viewer: HolderId) -> Option<MenuId> {
        let id = self.detach_viewer(viewer)?;
        self.host.close_inventory(viewer);
        self.collect_garbage();
        Some(id)
    }

    pub(crate) fn detach_viewer(&mut self, viewer: HolderId) -> Option<MenuId> {
        if self.sessions.get(viewer).and_then(MenuSession::viewed).is_none() {
            return None;
        }
        let id = self.sessions.session_mut(viewer).remove_viewed()?;
        if let Some(menu) = self.menus.get_mut(&id) {
            menu.core_mut().viewers.remove(&viewer);
        }
        Some(id)
    }

    /// Run the close path of `id` for `holder` without touching the host window.
    ///
    /// The menu's close reason picks the hook and is reset afterwards.
    pub(crate) fn retire(&mut self, holder: HolderId, id: MenuId) {
        self.ticking.cancel(id);
        let Some(mut menu) = self.menus.remove(&id) else {
            warn!(menu = %id, %holder, "Closing a menu that is no longer live");
            self.sessions.session_mut(holder).remove_current();
            return;
        };

        let reason = menu.core().close_reason();
        let (core, handler) = menu.parts_mut();
        match reason {
            CloseReason::Default => handler.on_close(holder, core),
            CloseReason::Switch => handler.on_switch(holder, core),
            CloseReason::Anvil | CloseReason::Unknown => {}
        }
        if reason != CloseReason::Switch && self.sessions.current(holder) == Some(id) {
            self.sessions.session_mut(holder).remove_current();
        }

        let viewers = std::mem::take(&mut menu.core_mut().viewers);
        let policy = menu.handler().viewer_policy();
        match policy {
            ViewerPolicy::Close => {
                for viewer in viewers {
                    self.host.close_inventory(viewer);
                    self.host
                        .send_message(viewer, &self.settings.messages.viewer_closed);
                    if self.sessions.get(viewer).and_then(MenuSession::viewed) == Some(id) {
                        self.sessions.session_mut(viewer).remove_viewed();
                    }
                }
            }
            ViewerPolicy::Maintain { notify, message } => {
                if notify {
                    let message = message
                        .as_deref()
                        .unwrap_or(&self.settings.messages.viewer_maintained);
                    for viewer in &viewers {
                        self.host.send_message(*viewer, message);
                    }
                }
                menu.core_mut().viewers = viewers;
            }
        }

        let core = menu.core_mut();
        core.cancel_tasks();
        core.set_close_reason(CloseReason::Default);
        self.menus.insert(id, menu);
        debug!(menu = %id, %holder, ?reason, "Closed menu");
    }

    /// Go back from `origin` to its parent.
    pub fn return_to_parent(
        &mut self,
        holder: HolderId,
        origin: MenuId,
        strategy: ReturnStrategy,
    ) -> Result<(), MenuError> {
        let parent = self
            .menus
            .get(&origin)
            .ok_or(MenuError::UnknownMenu(origin))?
            .core()
            .parent()
            .map(|parent| parent.id)
            .ok_or(MenuError::MissingParent)?;
        let target = match strategy {
            ReturnStrategy::Reuse => parent,
            ReturnStrategy::Fresh => {
                let fresh = self
                    .menus
                    .get(&parent)
                    .ok_or(MenuError::UnknownMenu(parent))?
                    .new_instance();
                match fresh {
                    Some(fresh) => self.insert(fresh),
                    None => {
                        debug!(menu = %parent, "Parent cannot rebuild itself, reusing it");
                        parent
                    }
                }
            }
        };
        self.switch_menu(holder, target)
    }

    /// Apply navigation queued by a click handler on `origin`.
    pub(crate) fn apply_actions(
        &mut self,
        holder: HolderId,
        origin: MenuId,
        actions: Vec<MenuAction>,
    ) -> Result<(), MenuError> {
        for action in actions {
            match action {
                MenuAction::Open(menu) => {
                    self.open(holder, menu)?;
                }
                MenuAction::Switch(mut menu) => {
                    let title = self
                        .menus
                        .get(&origin)
                        .map(|origin| origin.core().title().to_owned())
                        .unwrap_or_default();
                    menu.core_mut().set_parent(Some(ParentLink { id: origin, title }));
                    let id = self.insert(menu);
                    self.switch_menu(holder, id)?;
                }
                MenuAction::Return(strategy) => self.return_to_parent(holder, origin, strategy)?,
                MenuAction::Close => {
                    if self.sessions.current(holder) == Some(origin) {
                        self.close(holder)?;
                    }
                }
                MenuAction::Refresh => self.refresh_menu(origin)?,
                MenuAction::Resync => {
                    let due = self.tick.advance(self.settings.close_resync_delay);
                    self.pending_resyncs.push((due, holder));
                }
            }
        }
        Ok(())
    }

    /// Push grid changes of `id` to its holder (while it is their current
    /// menu) and its spectators. A title or size change reopens the window.
    pub fn flush(&mut self, id: MenuId) {
        let Some(menu) = self.menus.get_mut(&id) else {
            return;
        };
        let mut audience: Vec<HolderId> = menu
            .core()
            .holder()
            .filter(|holder| self.sessions.current(*holder) == Some(id))
            .into_iter()
            .collect();
        audience.extend(menu.core().viewers().iter().copied());
        let Some(grid) = menu.core_mut().inventory.as_mut() else {
            return;
        };
        if audience.is_empty() {
            return;
        }

        if grid.take_retitled() {
            let snapshot = grid.snapshot();
            grid.mark_clean();
            for holder in &audience {
                self.host.open_inventory(*holder, &snapshot);
            }
            return;
        }
        for slot in grid.take_dirty() {
            let item = grid.slot(slot);
            for holder in &audience {
                self.host.update_slot(*holder, slot, item);
            }
        }
    }

    /// Advance one server tick: ticking menus, due tasks, delayed resyncs,
    /// then push every changed grid.
    pub fn tick(&mut self) {
        self.tick = self.tick.advance(1);

        for id in self.ticking.ids() {
            let Some(menu) = self.menus.get_mut(&id) else {
                self.ticking.cancel(id);
                continue;
            };
            let (core, handler) = menu.parts_mut();
            if let Err(err) = handler.tick(core) {
                self.ticking.cancel(id);
                error!(menu = %id, "Menu tick failed, removed from ticking: {err:#}");
            }
        }

        let ids: Vec<MenuId> = self.menus.keys().copied().collect();
        for id in &ids {
            self.run_tasks(*id);
        }

        let now = self.tick;
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_resyncs)
            .into_iter()
            .partition(|(at, _)| *at <= now);
        self.pending_resyncs = pending;
        for (_, holder) in due {
            self.host.resync_inventory(holder);
        }

        for id in ids {
            self.flush(id);
        }
    }

    fn run_tasks(&mut self, id: MenuId) {
        let Some(mut menu) = self.menus.remove(&id) else {
            return;
        };
        let due: Vec<(usize, TaskJob)> = menu
            .core_mut()
            .tasks
            .iter_mut()
            .enumerate()
            .filter_map(|(index, task)| task.poll().then(|| (index, task.job().clone())))
            .collect();
        for (index, job) in due {
            if let Err(err) = self.run_job(&mut *menu, &job) {
                if let Some(task) = menu.core_mut().tasks.get_mut(index) {
                    task.cancel();
                }
                error!(menu = %id, ?job, "Menu task failed and was cancelled: {err:#}");
            }
        }
        self.menus.insert(id, menu);
    }

    fn run_job(&self, menu: &mut dyn Menu, job: &TaskJob) -> anyhow::Result<()> {
        match job {
            TaskJob::AnimateButton(button) => {
                let Some(holder) = menu.core().holder() else {
                    return Ok(());
                };
                if !Audience::new(holder, &self.host).can_see(button.permission()) {
                    return Ok(());
                }
                let stack = button.next_frame(&*menu);
                repaint_button(menu, button, stack)?;
                Ok(())
            }
            TaskJob::AnimateMenu => {
                let (core, handler) = menu.parts_mut();
                handler.animate(core)
            }
            TaskJob::Custom(job) => job(menu),
        }
    }

    /// Drop menus no session can reach, directly or through parent links.
    /// Menus that were never displayed are kept.
    pub fn collect_garbage(&mut self) {
        let mut keep = self.sessions.referenced_menus();
        let mut frontier: Vec<MenuId> = keep.iter().copied().collect();
        while let Some(id) = frontier.pop() {
            let parent = self
                .menus
                .get(&id)
                .and_then(|menu| menu.core().parent())
                .map(|parent| parent.id);
            if let Some(parent) = parent {
                if keep.insert(parent) {
                    frontier.push(parent);
                }
            }
        }

        let dropped: Vec<MenuId> = self
            .menus
            .iter()
            .filter(|(id, menu)| !keep.contains(*id) && menu.core().holder().is_some())
            .map(|(id, _)| *id)
            .collect();
        for id in &dropped {
            self.ticking.cancel(*id);
            self.menus.remove(id);
        }
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Dropped unreachable menus");
        }
    }

    /// Forget a holder that left the server.
    pub fn handle_disconnect(&mut self, holder: HolderId) {
        if let Some(id) = self.sessions.current(holder) {
            self.retire(holder, id);
        }
        self.detach_viewer(holder);
        self.sessions.disconnect(holder);
        self.pending_resyncs.retain(|(_, pending)| *pending != holder);
        self.collect_garbage();
        debug!(%holder, "Holder disconnected");
    }

    /// Close every open menu, stop all ticking, and drop every menu and session.
    pub fn shutdown(&mut self) {
        let open: Vec<(HolderId, MenuId)> = self
            .menus
            .iter()
            .filter_map(|(id, menu)| menu.core().holder().map(|holder| (holder, *id)))
            .filter(|(holder, id)| self.sessions.current(*holder) == Some(*id))
            .collect();
        for (holder, id) in &open {
            self.host.close_inventory(*holder);
            self.retire(*holder, *id);
        }
        self.ticking.cancel_all();
        self.pending_resyncs.clear();
        self.menus.clear();
        self.sessions = SessionRegistry::new();
        info!(closed = open.len(), "Menu manager shut down");
    }
}

/// Keep one BUTTON task per animated button currently drawn and drop tasks
/// whose button is gone.
pub(crate) fn sync_button_tasks(menu: &mut dyn Menu, default_interval: u64) {
    let buttons = menu.all_buttons();
    let core = menu.core_mut();
    core.tasks.retain(|task| match task.job() {
        TaskJob::AnimateButton(button) if task.kind() == TaskKind::Button => {
            buttons.iter().any(|current| Rc::ptr_eq(current, button))
        }
        _ => true,
    });
    for button in &buttons {
        let Some(spec) = button.animation() else {
            continue;
        };
        let scheduled = core.tasks.iter().any(|task| {
            matches!(task.job(), TaskJob::AnimateButton(existing) if Rc::ptr_eq(existing, button))
        });
        if scheduled {
            continue;
        }
        let interval = spec.interval.unwrap_or(default_interval);
        let mut task = ReschedulableTask::new(
            TaskKind::Button,
            TaskJob::AnimateButton(Rc::clone(button)),
            interval,
        );
        if core.registered {
            task.register();
        }
        core.tasks.push(task);
    }
}

/// Write `stack` into every cell of `button` without touching any other cell.
///
/// Layout buttons skip cells a menu button has claimed.
pub(crate) fn repaint_button(
    menu: &mut dyn Menu,
    button: &Rc<Button>,
    stack: ItemStack,
) -> Result<(), MenuError> {
    let core = menu.core();
    let fixed = core
        .buttons()
        .iter()
        .chain(core.premade_buttons())
        .any(|other| Rc::ptr_eq(other, button));
    let grid = menu.core_mut().inventory_mut()?;
    for &position in button.occupied() {
        if !fixed && grid.claim_of(position) == Some(ClaimKind::Button) {
            continue;
        }
        grid.force_set(position, stack.clone());
    }
    Ok(())
}

impl<H: MenuHost> std::fmt::Debug for MenuManager<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuManager")
            .field("menus", &self.menus.keys().collect::<Vec<_>>())
            .field("sessions", &self.sessions)
            .field("ticking", &self.ticking)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}
