//! Building a menu's grid: buttons, premade buttons, decoration, layout.

use super::Menu;
use crate::button::{Button, ButtonRegistry};
use crate::error::MenuError;
use crate::host::Audience;
use crate::inventory::{ClaimKind, MenuInventory};
use std::rc::Rc;
use tracing::debug;

/// Rebuild every button and redraw the grid.
///
/// An already formed grid is patched in place so only cells that actually
/// changed reach the host.
pub(crate) fn form_inventory(menu: &mut dyn Menu, audience: &Audience<'_>) -> Result<(), MenuError> {
    let rows = menu.core().resolve_rows()?;
    let premade = premade_buttons(menu, rows)?;

    let mut registry = ButtonRegistry::new();
    menu.handler_mut().make_buttons(&mut registry);

    let mut grid = MenuInventory::new(rows, menu.core().title())?;
    let fixed: Vec<Rc<Button>> = registry.into_buttons().into_iter().chain(premade.iter().cloned()).collect();
    for button in fixed.iter().filter(|button| audience.can_see(button.permission())) {
        for &position in button.occupied() {
            grid.claim(position, ClaimKind::Button);
        }
    }

    let (core, handler) = menu.parts_mut();
    handler.draw_extra(&mut grid);
    core.buttons = fixed[..fixed.len() - premade.len()].to_vec();
    core.premade = premade;
    let previous = core.inventory.replace(grid);

    paint(menu, &fixed, audience, ClaimKind::Button);
    menu.draw_layout(audience)?;

    if let Some(mut previous) = previous {
        if let Some(fresh) = menu.core_mut().inventory.take() {
            previous.absorb(fresh);
        }
        menu.core_mut().inventory = Some(previous);
    }
    debug!(menu = %menu.core().id(), rows, buttons = fixed.len(), "Formed menu");
    Ok(())
}

fn premade_buttons(menu: &dyn Menu, rows: usize) -> Result<Vec<Rc<Button>>, MenuError> {
    let handler = menu.handler();
    let mut premade = Vec::new();
    if handler.add_info() {
        premade.extend(handler.info_button(rows));
    }
    let parent = menu.core().parent();
    if handler.add_return(parent.is_some()) {
        let parent = parent.ok_or(MenuError::MissingParent)?;
        premade.extend(handler.return_button(rows, parent));
    }
    if handler.add_close() {
        premade.extend(handler.close_button(rows));
    }
    Ok(premade.into_iter().map(Rc::new).collect())
}

/// Draw `buttons` the holder may see and reserve their cells as `kind`.
///
/// Layout buttons never paint over a cell a menu button reserved.
pub(crate) fn paint(menu: &mut dyn Menu, buttons: &[Rc<Button>], audience: &Audience<'_>, kind: ClaimKind) {
    for button in buttons {
        if !audience.can_see(button.permission()) {
            continue;
        }
        let stack = button.render(&*menu);
        let Some(grid) = menu.core_mut().inventory.as_mut() else {
            return;
        };
        for &position in button.occupied() {
            if kind == ClaimKind::Layout && grid.claim_of(position) == Some(ClaimKind::Button) {
                continue;
            }
            grid.claim(position, kind);
            grid.force_set(position, stack.clone());
        }
    }
}
