//! Routing raw host events into menus.
//!
//! The host forwards every click, drag, and client-side close of a connected
//! holder. The returned [`EventResult`] tells it whether to let the item
//! effect of the event happen.

use crate::button::{find_button, Button};
use crate::context::{ClickContext, MenuAction};
use crate::event::{ClickEvent, ClickLocation, ClickType, DragEvent, EventResult, InventoryAction, ViewKind};
use crate::host::{Audience, MenuHost};
use crate::manager::{repaint_button, sync_button_tasks, MenuManager};
use crate::menu::{DragPolicy, Menu, MenuClick, MenuId};
use crate::position::InventoryPosition;
use crate::session::{HolderId, MenuSession};
use std::rc::Rc;
use tracing::{debug, error, warn};

impl<H: MenuHost> MenuManager<H> {
    /// Route a click.
    ///
    /// Clicks in the menu grid resolve to the first visible button showing
    /// the clicked item at that cell (handler buttons, then premade buttons,
    /// then layout buttons), falling back to the menu's own click hook. Clicks
    /// in the holder's inventory reach [`MenuHandler::on_player_click`](crate::MenuHandler::on_player_click).
    pub fn handle_click(&mut self, event: &ClickEvent) -> EventResult {
        let holder = event.holder;
        self.sessions.connect(holder);

        if event.view == ViewKind::Other {
            if event.location(event.view_size) == ClickLocation::Player {
                if let Some(id) = self.sessions.current(holder) {
                    self.dispatch_player_click(id, event);
                }
            }
            return EventResult::Allow;
        }

        if self.is_spectating(holder) {
            return EventResult::Deny;
        }

        let Some(id) = self.sessions.current(holder) else {
            return EventResult::Allow;
        };
        if matches!(event.view, ViewKind::Creative | ViewKind::Crafting) {
            self.sessions.session_mut(holder).remove_current();
            debug!(menu = %id, %holder, "Dropped menu binding for creative or crafting view");
            return EventResult::Allow;
        }
        let Some(menu) = self.menus.get(&id) else {
            warn!(menu = %id, %holder, "Session pointed at a dead menu");
            self.sessions.session_mut(holder).remove_current();
            return EventResult::Allow;
        };

        let size = menu.core().inventory().map_or(0, |grid| grid.size());
        let location = event.location(size);
        let allowed = menu.handler().is_allowed(
            location,
            event.raw_slot,
            event.current_item.as_ref(),
            event.cursor_item.as_ref(),
        );
        let result = if !allowed {
            EventResult::Deny
        } else if event.click == ClickType::DoubleClick {
            return EventResult::Deny;
        } else {
            EventResult::Allow
        };

        let routed = event.action.is_direct() || event.action == InventoryAction::MoveToOther;
        match (location, usize::try_from(event.raw_slot)) {
            (ClickLocation::Menu, Ok(slot)) if routed => self.dispatch_menu_click(id, event, slot),
            (ClickLocation::Player, _) => self.dispatch_player_click(id, event),
            _ => {}
        }
        result
    }

    /// Route a drag according to the open menu's [`DragPolicy`].
    pub fn handle_drag(&mut self, event: &DragEvent) -> EventResult {
        let holder = event.holder;
        if self.is_spectating(holder) {
            return EventResult::Deny;
        }
        let Some(menu) = self
            .sessions
            .current(holder)
            .and_then(|id| self.menus.get(&id))
        else {
            return EventResult::Allow;
        };

        let handler = menu.handler();
        let allowed = match handler.drag_policy() {
            DragPolicy::Allow => true,
            DragPolicy::Deny => false,
            DragPolicy::Check => {
                let size = menu.core().inventory().map_or(0, |grid| grid.size());
                event.raw_slots.iter().all(|slot| *slot >= size) || handler.can_drag(&event.new_items)
            }
        };
        if allowed {
            EventResult::Allow
        } else {
            EventResult::Deny
        }
    }

    /// The holder closed their window on the client.
    pub fn handle_close(&mut self, holder: HolderId) {
        if let Some(viewed) = self.detach_viewer(holder) {
            debug!(menu = %viewed, %holder, "Viewer closed their view");
        }
        if let Some(id) = self.sessions.current(holder) {
            self.retire(holder, id);
            if self.sessions.current(holder) == Some(id) {
                self.sessions.session_mut(holder).remove_current();
            }
        }
        self.collect_garbage();
    }

    /// Whether `holder` is watching someone else's menu. A stale watch binding
    /// is dropped on the way.
    fn is_spectating(&mut self, holder: HolderId) -> bool {
        let Some(viewed) = self.sessions.get(holder).and_then(MenuSession::viewed) else {
            return false;
        };
        let watching = self
            .menus
            .get(&viewed)
            .map_or(false, |menu| menu.core().viewers().contains(&holder));
        if !watching {
            self.sessions.session_mut(holder).remove_viewed();
        }
        watching
    }

    fn dispatch_menu_click(&mut self, id: MenuId, event: &ClickEvent, slot: usize) {
        let holder = event.holder;
        let Some(mut menu) = self.menus.remove(&id) else {
            return;
        };
        let position = InventoryPosition::from_any_slot(slot);
        let item = menu
            .core()
            .inventory()
            .and_then(|grid| grid.slot(slot))
            .cloned();
        let audience = Audience::new(holder, &self.host);
        let button = item.as_ref().and_then(|item| {
            find_button(&menu.all_buttons(), position, item, |permission| {
                audience.can_see(permission)
            })
        });

        let mut ctx = ClickContext::new(holder, event.click, id, Some(position), &mut self.host, &self.settings);
        let outcome = match &button {
            Some(button) => button.click(&mut ctx, &mut *menu),
            None => menu.on_click(
                &mut ctx,
                &MenuClick {
                    position,
                    slot,
                    click: event.click,
                    item,
                },
            ),
        };
        let actions = ctx.into_actions();
        self.finish_click(holder, id, menu, button, outcome, actions);
    }

    fn dispatch_player_click(&mut self, id: MenuId, event: &ClickEvent) {
        let holder = event.holder;
        let Some(mut menu) = self.menus.remove(&id) else {
            return;
        };
        let mut ctx = ClickContext::new(holder, event.click, id, None, &mut self.host, &self.settings);
        let outcome = menu.handler_mut().on_player_click(&mut ctx, event);
        let actions = ctx.into_actions();
        self.finish_click(holder, id, menu, None, outcome, actions);
    }

    fn finish_click(
        &mut self,
        holder: HolderId,
        id: MenuId,
        mut menu: Box<dyn Menu>,
        button: Option<Rc<Button>>,
        outcome: anyhow::Result<()>,
        actions: Vec<MenuAction>,
    ) {
        if let Err(err) = outcome {
            self.menus.insert(id, menu);
            self.contain_failure(holder, id, &err);
            return;
        }

        let leaving = actions.iter().any(|action| {
            matches!(
                action,
                MenuAction::Open(_) | MenuAction::Switch(_) | MenuAction::Return(_) | MenuAction::Close
            )
        });
        if let Some(button) = button.filter(|button| button.is_dynamic() && !leaving) {
            let stack = button.updated_item(&*menu);
            if let Err(err) = repaint_button(&mut *menu, &button, stack) {
                warn!(menu = %id, "Dynamic button refresh skipped: {err}");
            }
        }
        sync_button_tasks(&mut *menu, self.settings.default_animation_interval);
        self.menus.insert(id, menu);
        self.flush(id);

        if let Err(err) = self.apply_actions(holder, id, actions) {
            self.contain_failure(holder, id, &anyhow::Error::new(err));
        }
    }

    /// Close the holder's menu after a failed click and tell them about it.
    fn contain_failure(&mut self, holder: HolderId, id: MenuId, err: &anyhow::Error) {
        if self
            .host
            .has_permission(holder, &self.settings.developer_permission)
        {
            self.host
                .send_message(holder, &self.settings.messages.developer_error_header);
            for cause in err.chain().take(self.settings.max_error_causes) {
                self.host.send_message(holder, &format!("<gray> - {cause}"));
            }
        }
        if let Some(current) = self.sessions.current(holder) {
            self.host.close_inventory(holder);
            self.retire(holder, current);
            if self.sessions.current(holder) == Some(current) {
                self.sessions.session_mut(holder).remove_current();
            }
        }
        self.host
            .send_message(holder, &self.settings.messages.click_error);
        error!(menu = %id, %holder, "Menu click failed: {err:?}");
        self.collect_garbage();
    }
}
