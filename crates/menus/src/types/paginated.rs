use crate::button::Button;
use crate::context::ClickContext;
use crate::error::MenuError;
use crate::event::ClickType;
use crate::host::Audience;
use crate::inventory::ClaimKind;
use crate::menu::form::{form_inventory, paint};
use crate::menu::{Menu, MenuClick, MenuCore, MenuHandler};
use crate::paginator::MenuPaginator;
use crate::position::{InventoryPosition, COLUMNS};
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::debug;
use yggdrasil_core::{ItemCreator, ItemOptions, ItemStack, Material};

/// Author side of a [`PaginatedMenu`]: how values look and what clicking them does.
pub trait PageSource: MenuHandler {
    /// Paged value type.
    type Value: Clone + 'static;

    /// Display item of a value.
    fn convert(&self, value: &Self::Value) -> ItemStack;

    /// A value cell was clicked.
    fn on_value_click(
        &mut self,
        ctx: &mut ClickContext<'_>,
        value: &Self::Value,
        click: ClickType,
    ) -> anyhow::Result<()>;

    /// Cells values go into when not centered. Empty means the first
    /// cells of the grid, leaving the bottom row free.
    fn placeable_positions(&self) -> Vec<InventoryPosition> {
        Vec::new()
    }

    /// Counter text.
    fn counter_label(&self, page: usize, total: usize) -> String {
        if total > 1 {
            format!("<dark_aqua>{page}</dark_aqua><dark_gray>/</dark_gray><gray>{total}")
        } else {
            "<yellow>No More Pages!".to_owned()
        }
    }

    /// Counter item; `None` drops the counter.
    fn counter_item(&self, page: usize, total: usize) -> Option<ItemStack> {
        let lore: Vec<&str> = if total > 1 {
            vec![
                "Click me to be sent back to the first page.",
                "Or right click to be sent to the last page!",
            ]
        } else {
            Vec::new()
        };
        Some(
            ItemCreator::of(Material::NAME_TAG)
                .display(self.counter_label(page, total))
                .lore(lore)
                .make(),
        )
    }

    /// Next-page item; `None` drops the button.
    fn next_item(&self) -> Option<ItemStack> {
        Some(
            ItemCreator::of(Material::ARROW)
                .display("<yellow>Next >")
                .options(ItemOptions::HIDE_ALL_FLAGS)
                .make(),
        )
    }

    /// Previous-page item; `None` drops the button.
    fn previous_item(&self) -> Option<ItemStack> {
        Some(
            ItemCreator::of(Material::ARROW)
                .display("<yellow>< Previous")
                .options(ItemOptions::HIDE_ALL_FLAGS)
                .make(),
        )
    }
}

/// A menu that windows a value list over pages with next/previous/counter navigation.
pub struct PaginatedMenu<S: PageSource> {
    core: MenuCore,
    source: S,
    paginator: MenuPaginator<S::Value>,
    center: bool,
    add_counter: bool,
    hide_nav: bool,
    page_buttons: Vec<Rc<Button>>,
    owned: BTreeSet<InventoryPosition>,
}

impl<S: PageSource> PaginatedMenu<S> {
    /// Page `values` linearly (or over the source's placeable positions).
    pub fn new(core: MenuCore, source: S, values: impl IntoIterator<Item = S::Value>) -> Self {
        Self {
            core,
            source,
            paginator: MenuPaginator::new(1, values),
            center: false,
            add_counter: true,
            hide_nav: false,
            page_buttons: Vec::new(),
            owned: BTreeSet::new(),
        }
    }

    /// Place values in the interior cells, one away from every edge.
    pub fn centered(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Show the page counter (default on).
    pub fn with_counter(mut self, add_counter: bool) -> Self {
        self.add_counter = add_counter;
        self
    }

    /// Only show navigation that leads somewhere.
    pub fn hide_nav(mut self, hide_nav: bool) -> Self {
        self.hide_nav = hide_nav;
        self
    }

    /// The source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The source, mutably.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Current page (1-based).
    pub fn page(&self) -> usize {
        self.paginator.current_page() + 1
    }

    /// Page count (at least 1).
    pub fn page_count(&self) -> usize {
        self.paginator.page_count()
    }

    /// Every value.
    pub fn values(&self) -> &[S::Value] {
        self.paginator.values()
    }

    /// Values on the current page.
    pub fn current_values(&self) -> &[S::Value] {
        self.paginator.current_values()
    }

    /// Values per page for this menu's size and layout.
    pub fn usable_cells(&self) -> Result<usize, MenuError> {
        let size = self.core.resolve_rows()? * COLUMNS;
        if self.center {
            return match size {
                54 => Ok(28),
                45 => Ok(21),
                36 => Ok(14),
                27 => Ok(7),
                _ => Err(MenuError::CenteredTooSmall(size)),
            };
        }
        let placeable = self.source.placeable_positions();
        if !placeable.is_empty() {
            return Ok(placeable.len());
        }
        Ok(match size {
            54 => 45,
            45 => 36,
            36 => 27,
            27 => 18,
            _ => 9,
        })
    }

    fn value_positions(&self, usable: usize) -> Vec<InventoryPosition> {
        if self.center {
            return InventoryPosition::MIDDLE_POSITIONS[..usable].to_vec();
        }
        let placeable = self.source.placeable_positions();
        if placeable.is_empty() {
            (0..usable).map(InventoryPosition::from_any_slot).collect()
        } else {
            placeable
        }
    }

    /// Replace the values, go back to page 1 and rebuild the whole menu.
    pub fn update_values(
        &mut self,
        values: impl IntoIterator<Item = S::Value>,
        audience: &Audience<'_>,
    ) -> Result<(), MenuError> {
        self.reset_values(values)?;
        form_inventory(self, audience)
    }

    /// Replace the values, go back to page 1 and redraw only the paged cells.
    pub fn clean_update_values(
        &mut self,
        values: impl IntoIterator<Item = S::Value>,
        audience: &Audience<'_>,
    ) -> Result<(), MenuError> {
        self.reset_values(values)?;
        self.refresh_page(audience)
    }

    fn reset_values(&mut self, values: impl IntoIterator<Item = S::Value>) -> Result<(), MenuError> {
        self.paginator.set_values(values);
        self.paginator.recalculate();
        self.paginator.set_current(0)
    }

    /// Append a value and redraw the paged cells.
    pub fn add_value(&mut self, value: S::Value, audience: &Audience<'_>) -> Result<(), MenuError> {
        self.paginator.add_value(value);
        self.paginator.recalculate();
        self.refresh_page(audience)
    }

    /// Remove a value and redraw the paged cells. Emptying the last page
    /// moves back to the nearest page that still has values.
    pub fn remove_value(&mut self, value: &S::Value, audience: &Audience<'_>) -> Result<bool, MenuError>
    where
        S::Value: PartialEq,
    {
        if !self.paginator.remove_value(value) {
            return Ok(false);
        }
        self.paginator.recalculate();
        self.refresh_page(audience)?;
        Ok(true)
    }

    /// Redraw the paged cells and navigation for the current page.
    pub fn refresh_page(&mut self, audience: &Audience<'_>) -> Result<(), MenuError> {
        if self.core.inventory().is_none() {
            return Ok(());
        }
        self.draw_page(audience, true)
    }

    /// Draw the current page. With `clear`, the cells the previous page used
    /// are emptied and the handler's decoration is reapplied first.
    fn draw_page(&mut self, audience: &Audience<'_>, clear: bool) -> Result<(), MenuError> {
        let usable = self.usable_cells()?;
        self.paginator.set_cell_size(usable);
        let positions = self.value_positions(usable);
        let mut buttons = Vec::new();
        for (offset, value) in self.paginator.current_values().iter().enumerate() {
            let (Some(&position), Some(index)) = (positions.get(offset), self.paginator.value_index(offset)) else {
                break;
            };
            let button = Button::new(position, self.source.convert(value))
                .on_click(move |ctx, menu| click_value::<S>(ctx, menu, index));
            buttons.push(Rc::new(button));
        }
        buttons.extend(self.navigation_buttons()?);

        if clear {
            let stale: BTreeSet<InventoryPosition> = self
                .owned
                .iter()
                .copied()
                .chain(positions.iter().copied())
                .collect();
            let grid = self.core.inventory.as_mut().ok_or(MenuError::NotDisplayed)?;
            for position in &stale {
                grid.release_layout(*position);
                if !grid.is_slot_taken_by_button(*position) {
                    grid.clear_slot(*position);
                }
            }
            self.source.draw_extra(grid);
        }

        self.owned = buttons
            .iter()
            .flat_map(|button| button.occupied().iter().copied())
            .collect();
        self.page_buttons = buttons.clone();
        paint(self, &buttons, audience, ClaimKind::Layout);
        debug!(menu = %self.core.id(), page = self.page(), total = self.page_count(), "Drew page");
        Ok(())
    }

    fn navigation_buttons(&self) -> Result<Vec<Rc<Button>>, MenuError> {
        let bottom = self.core.resolve_rows()? - 1;
        let page = self.page();
        let total = self.page_count();
        let mut buttons = Vec::new();

        if self.add_counter && (!self.hide_nav || total > 1) {
            if let Some(item) = self.source.counter_item(page, total) {
                let counter = Button::new(InventoryPosition::of(bottom, 4), item).on_click(|ctx, menu| {
                    let click = ctx.click();
                    let this = paged::<S>(menu)?;
                    let target = if click == ClickType::Right { this.page_count() } else { 1 };
                    let audience = ctx.audience();
                    this.switch_to_page(target, &audience)?;
                    Ok(())
                });
                buttons.push(Rc::new(counter));
            }
        }

        let show_next = !self.hide_nav || page < total;
        if let Some(item) = self.source.next_item().filter(|_| show_next) {
            let next = Button::new(InventoryPosition::of(bottom, 5), item).on_click(|ctx, menu| {
                let this = paged::<S>(menu)?;
                if this.page() < this.page_count() {
                    let target = this.page() + 1;
                    let audience = ctx.audience();
                    this.switch_to_page(target, &audience)?;
                } else {
                    ctx.tell(&ctx.settings().messages.cannot_go_forward);
                }
                Ok(())
            });
            buttons.push(Rc::new(next));
        }

        let show_previous = !self.hide_nav || page > 1;
        if let Some(item) = self.source.previous_item().filter(|_| show_previous) {
            let previous = Button::new(InventoryPosition::of(bottom, 3), item).on_click(|ctx, menu| {
                let this = paged::<S>(menu)?;
                if this.page() > 1 {
                    let target = this.page() - 1;
                    let audience = ctx.audience();
                    this.switch_to_page(target, &audience)?;
                } else {
                    ctx.tell(&ctx.settings().messages.cannot_go_backward);
                }
                Ok(())
            });
            buttons.push(Rc::new(previous));
        }
        Ok(buttons)
    }

    fn switch_to_page(&mut self, page: usize, audience: &Audience<'_>) -> Result<(), MenuError> {
        let total = self.page_count();
        if page == 0 || page > total {
            return Err(MenuError::InvalidPage { page, total });
        }
        self.paginator.set_current(page - 1)?;
        self.draw_page(audience, true)
    }
}

fn paged<S: PageSource>(menu: &mut dyn Menu) -> anyhow::Result<&mut PaginatedMenu<S>> {
    menu.downcast_mut::<PaginatedMenu<S>>()
        .ok_or_else(|| anyhow::anyhow!("page button clicked outside its paginated menu"))
}

fn click_value<S: PageSource>(
    ctx: &mut ClickContext<'_>,
    menu: &mut dyn Menu,
    index: usize,
) -> anyhow::Result<()> {
    let click = ctx.click();
    let this = paged::<S>(menu)?;
    let Some(value) = this.paginator.values().get(index).cloned() else {
        return Ok(());
    };
    this.source.on_value_click(ctx, &value, click)
}

impl<S: PageSource> Menu for PaginatedMenu<S> {
    fn core(&self) -> &MenuCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MenuCore {
        &mut self.core
    }

    fn handler(&self) -> &dyn MenuHandler {
        &self.source
    }

    fn handler_mut(&mut self) -> &mut dyn MenuHandler {
        &mut self.source
    }

    fn parts_mut(&mut self) -> (&mut MenuCore, &mut dyn MenuHandler) {
        (&mut self.core, &mut self.source)
    }

    fn layout_buttons(&self) -> Vec<Rc<Button>> {
        self.page_buttons.clone()
    }

    fn draw_layout(&mut self, audience: &Audience<'_>) -> Result<(), MenuError> {
        // A rebuilt grid starts empty, so nothing drawn earlier needs clearing.
        self.owned.clear();
        self.draw_page(audience, false)
    }

    fn switch_page(&mut self, page: usize, audience: &Audience<'_>) -> Result<(), MenuError> {
        self.switch_to_page(page, audience)
    }

    fn viewed_page(&self) -> Option<usize> {
        Some(self.page())
    }

    fn total_pages(&self) -> Option<usize> {
        Some(self.page_count())
    }

    fn on_click(&mut self, ctx: &mut ClickContext<'_>, click: &MenuClick) -> anyhow::Result<()> {
        let usable = self.usable_cells()?;
        let offset = self
            .value_positions(usable)
            .iter()
            .position(|position| *position == click.position);
        let value = offset
            .and_then(|offset| self.paginator.value_index(offset))
            .and_then(|index| self.paginator.values().get(index).cloned());
        match value {
            Some(value) => self.source.on_value_click(ctx, &value, click.click),
            None => self.source.on_click(ctx, click, &mut self.core),
        }
    }

    fn new_instance(&self) -> Option<Box<dyn Menu>> {
        let source = self.source.fresh()?;
        let menu = PaginatedMenu {
            core: self.core.fresh_copy(),
            source,
            paginator: MenuPaginator::new(1, self.paginator.values().to_vec()),
            center: self.center,
            add_counter: self.add_counter,
            hide_nav: self.hide_nav,
            page_buttons: Vec::new(),
            owned: BTreeSet::new(),
        };
        Some(Box::new(menu))
    }
}
