use crate::button::Button;
use crate::context::ClickContext;
use crate::error::MenuError;
use crate::event::ClickType;
use crate::host::Audience;
use crate::inventory::ClaimKind;
use crate::menu::form::paint;
use crate::menu::{Menu, MenuClick, MenuCore, MenuHandler};
use crate::position::InventoryPosition;
use std::rc::Rc;
use yggdrasil_core::ItemStack;

/// Author side of a [`ListMenu`].
pub trait ListSource: MenuHandler {
    /// Listed value type.
    type Value: Clone + 'static;

    /// Cells the list occupies, in list order.
    fn placeable_positions(&self) -> Vec<InventoryPosition>;

    /// Item of a cell holding a value.
    fn filled_item(&self, value: &Self::Value) -> ItemStack;

    /// Item of a cell past the end of the list.
    fn empty_item(&self) -> ItemStack;

    /// A cell holding `value` (the `index`th list entry) was clicked.
    fn on_used_click(
        &mut self,
        ctx: &mut ClickContext<'_>,
        index: usize,
        value: &Self::Value,
        click: ClickType,
    ) -> anyhow::Result<()>;

    /// A cell past the end of the list was clicked.
    fn on_unused_click(
        &mut self,
        _ctx: &mut ClickContext<'_>,
        _index: usize,
        _click: ClickType,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// A menu that shows a list over a fixed set of cells, one value per cell,
/// with a placeholder in cells past the end of the list.
pub struct ListMenu<L: ListSource> {
    core: MenuCore,
    source: L,
    list: Vec<L::Value>,
    slot_buttons: Vec<Rc<Button>>,
}

impl<L: ListSource> ListMenu<L> {
    /// List `values`.
    pub fn new(core: MenuCore, source: L, values: impl IntoIterator<Item = L::Value>) -> Self {
        Self {
            core,
            source,
            list: values.into_iter().collect(),
            slot_buttons: Vec::new(),
        }
    }

    /// The source.
    pub fn source(&self) -> &L {
        &self.source
    }

    /// The source, mutably.
    pub fn source_mut(&mut self) -> &mut L {
        &mut self.source
    }

    /// Listed values.
    pub fn values(&self) -> &[L::Value] {
        &self.list
    }

    /// Replace the list and redraw its cells.
    pub fn update_list(
        &mut self,
        values: impl IntoIterator<Item = L::Value>,
        audience: &Audience<'_>,
    ) -> Result<(), MenuError> {
        self.list = values.into_iter().collect();
        if self.core.inventory().is_none() {
            return Ok(());
        }
        self.draw_slots(audience);
        Ok(())
    }

    fn draw_slots(&mut self, audience: &Audience<'_>) {
        let buttons: Vec<Rc<Button>> = self
            .source
            .placeable_positions()
            .into_iter()
            .enumerate()
            .map(|(index, position)| Rc::new(self.slot_button(index, self.list.get(index), position)))
            .collect();
        self.slot_buttons = buttons.clone();
        paint(self, &buttons, audience, ClaimKind::Layout);
    }

    fn slot_button(&self, index: usize, value: Option<&L::Value>, position: InventoryPosition) -> Button {
        let item = match value {
            Some(value) => self.source.filled_item(value),
            None => self.source.empty_item(),
        };
        Button::new(position, item).on_click(move |ctx, menu| {
            let click = ctx.click();
            let this = menu
                .downcast_mut::<ListMenu<L>>()
                .ok_or_else(|| anyhow::anyhow!("list slot clicked outside its list menu"))?;
            this.click_index(ctx, index, click)
        })
    }

    fn click_index(
        &mut self,
        ctx: &mut ClickContext<'_>,
        index: usize,
        click: ClickType,
    ) -> anyhow::Result<()> {
        match self.list.get(index).cloned() {
            Some(value) => self.source.on_used_click(ctx, index, &value, click),
            None => self.source.on_unused_click(ctx, index, click),
        }
    }
}

impl<L: ListSource> Menu for ListMenu<L> {
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
        self.slot_buttons.clone()
    }

    fn draw_layout(&mut self, audience: &Audience<'_>) -> Result<(), MenuError> {
        self.draw_slots(audience);
        Ok(())
    }

    fn on_click(&mut self, ctx: &mut ClickContext<'_>, click: &MenuClick) -> anyhow::Result<()> {
        let index = self
            .source
            .placeable_positions()
            .iter()
            .position(|position| *position == click.position);
        match index {
            Some(index) => self.click_index(ctx, index, click.click),
            None => self.source.on_click(ctx, click, &mut self.core),
        }
    }

    fn new_instance(&self) -> Option<Box<dyn Menu>> {
        let source = self.source.fresh()?;
        Some(Box::new(ListMenu::new(self.core.fresh_copy(), source, self.list.clone())))
    }
}
