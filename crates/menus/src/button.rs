//! Clickable cells.
//!
//! A [`Button`] is one struct with optional capabilities rather than a type
//! hierarchy: animation and post-click refresh are [`Option`]al specs, and the
//! click behavior is a [`ButtonAction`]. Item factories receive the menu that
//! draws them so they can read its state.

use crate::context::ClickContext;
use crate::event::ClickType;
use crate::menu::Menu;
use crate::position::InventoryPosition;
use crate::session::HolderId;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::warn;
use yggdrasil_core::{ItemCreator, ItemOptions, ItemStack, Material};

/// Produces a button's display item.
pub type ItemFactory = Rc<dyn Fn(&dyn Menu) -> ItemStack>;
/// Produces animation frame `n` (starting at 1 for the first swap).
pub type FrameFactory = Rc<dyn Fn(&dyn Menu, u64) -> ItemStack>;
/// Reacts to a click.
pub type ClickHandler = Rc<dyn Fn(&mut ClickContext<'_>, &mut dyn Menu) -> anyhow::Result<()>>;
/// Builds the menu a trigger button opens.
pub type MenuFactory = Rc<dyn Fn(HolderId, ClickType) -> anyhow::Result<Box<dyn Menu>>>;
/// Decides whether a return button may leave.
pub type ReturnGuard = Rc<dyn Fn(HolderId, &dyn Menu, ClickType) -> bool>;

/// Periodic frame swapping.
#[derive(Clone)]
pub struct AnimationSpec {
    /// Ticks between frames; `None` uses the manager's default.
    pub interval: Option<u64>,
    frame: Option<FrameFactory>,
}

/// Post-click self refresh.
#[derive(Clone, Default)]
pub struct DynamicSpec {
    update: Option<ItemFactory>,
}

/// How a return button gets back to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnStrategy {
    /// Re-display the existing parent menu object.
    #[default]
    Reuse,
    /// Ask the parent for a fresh instance, reusing it when it cannot rebuild itself.
    Fresh,
}

/// What a click does.
#[derive(Clone, Default)]
pub enum ButtonAction {
    /// Purely decorative.
    #[default]
    None,
    /// Arbitrary code.
    Run(ClickHandler),
    /// Dispatch a command string.
    Command {
        /// Command text; a leading `/` is stripped.
        command: String,
        /// Run as console instead of the clicker.
        console: bool,
        /// Close the menu afterwards.
        close_after: bool,
    },
    /// Switch to a menu built on demand.
    OpenMenu {
        /// Builds the target menu.
        factory: MenuFactory,
        /// Runs before the switch.
        pre_switch: Option<ClickHandler>,
    },
    /// Jump to a page of a page menu.
    PageNavigation {
        /// Target page (1-based).
        page: usize,
        /// Runs before switching, only when the page actually changes.
        before: Option<ClickHandler>,
    },
    /// Close the menu.
    Close,
    /// Go back to the parent menu.
    Return {
        /// Reuse or rebuild the parent.
        strategy: ReturnStrategy,
        /// Optional veto.
        can_return: Option<ReturnGuard>,
    },
}

/// A clickable cell (or group of cells) in a menu.
pub struct Button {
    position: InventoryPosition,
    positions: Vec<InventoryPosition>,
    permission: Option<String>,
    item: ItemFactory,
    animation: Option<AnimationSpec>,
    dynamic: Option<DynamicSpec>,
    action: ButtonAction,
    displayed: RefCell<Option<ItemStack>>,
    frame: Cell<u64>,
}

impl Button {
    /// A button showing a fixed item.
    pub fn new(position: InventoryPosition, item: impl Into<ItemStack>) -> Self {
        let item = item.into();
        Self::from_factory(position, move |_: &dyn Menu| item.clone())
    }

    /// A button whose item is rebuilt from a creator on every draw.
    pub fn from_creator(position: InventoryPosition, creator: ItemCreator) -> Self {
        Self::from_factory(position, move |_: &dyn Menu| creator.make())
    }

    /// A button whose item is computed from the drawing menu.
    pub fn from_factory(
        position: InventoryPosition,
        item: impl Fn(&dyn Menu) -> ItemStack + 'static,
    ) -> Self {
        Self {
            position,
            positions: Vec::new(),
            permission: None,
            item: Rc::new(item),
            animation: None,
            dynamic: None,
            action: ButtonAction::None,
            displayed: RefCell::new(None),
            frame: Cell::new(0),
        }
    }

    /// Paint the same button in several cells instead of the primary one.
    pub fn with_positions(mut self, positions: impl IntoIterator<Item = InventoryPosition>) -> Self {
        self.positions = positions.into_iter().collect();
        self
    }

    /// Only holders with `permission` see or click this button.
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Run `handler` on click.
    pub fn on_click(
        mut self,
        handler: impl Fn(&mut ClickContext<'_>, &mut dyn Menu) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.action = ButtonAction::Run(Rc::new(handler));
        self
    }

    /// Dispatch `command` as the clicker.
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.action = ButtonAction::Command {
            command: command.into(),
            console: false,
            close_after: false,
        };
        self
    }

    /// Dispatch `command` as the console.
    pub fn console_command(mut self, command: impl Into<String>) -> Self {
        self.action = ButtonAction::Command {
            command: command.into(),
            console: true,
            close_after: false,
        };
        self
    }

    /// Close the menu after a command button runs. No effect on other actions.
    pub fn close_after(mut self, close: bool) -> Self {
        if let ButtonAction::Command { close_after, .. } = &mut self.action {
            *close_after = close;
        }
        self
    }

    /// Switch to the menu built by `factory`. The new menu's parent is the clicked menu.
    pub fn opens(
        mut self,
        factory: impl Fn(HolderId, ClickType) -> anyhow::Result<Box<dyn Menu>> + 'static,
    ) -> Self {
        self.action = ButtonAction::OpenMenu {
            factory: Rc::new(factory),
            pre_switch: None,
        };
        self
    }

    /// Run `handler` before an [`opens`](Self::opens) switch.
    pub fn pre_switch(
        mut self,
        handler: impl Fn(&mut ClickContext<'_>, &mut dyn Menu) -> anyhow::Result<()> + 'static,
    ) -> Self {
        if let ButtonAction::OpenMenu { pre_switch, .. } = &mut self.action {
            *pre_switch = Some(Rc::new(handler));
        }
        self
    }

    /// Replace the click behavior.
    pub fn with_action(mut self, action: ButtonAction) -> Self {
        self.action = action;
        self
    }

    /// Swap frames periodically. Without a frame factory the base item is redrawn.
    pub fn animated(mut self, interval: Option<u64>) -> Self {
        self.animation = Some(AnimationSpec {
            interval,
            frame: None,
        });
        self
    }

    /// Swap frames periodically using `frame`.
    pub fn animated_with(
        mut self,
        interval: Option<u64>,
        frame: impl Fn(&dyn Menu, u64) -> ItemStack + 'static,
    ) -> Self {
        self.animation = Some(AnimationSpec {
            interval,
            frame: Some(Rc::new(frame)),
        });
        self
    }

    /// Redraw this button (and only it) right after each click.
    pub fn dynamic(mut self) -> Self {
        self.dynamic = Some(DynamicSpec::default());
        self
    }

    /// Redraw this button from `update` right after each click.
    pub fn dynamic_with(mut self, update: impl Fn(&dyn Menu) -> ItemStack + 'static) -> Self {
        self.dynamic = Some(DynamicSpec {
            update: Some(Rc::new(update)),
        });
        self
    }

    /// Primary cell.
    pub fn position(&self) -> InventoryPosition {
        self.position
    }

    /// Cells this button paints: the extra positions when set, otherwise the primary one.
    pub fn occupied(&self) -> &[InventoryPosition] {
        if self.positions.is_empty() {
            std::slice::from_ref(&self.position)
        } else {
            &self.positions
        }
    }

    /// Whether the button paints `position`.
    pub fn occupies(&self, position: InventoryPosition) -> bool {
        self.occupied().contains(&position)
    }

    /// Required permission.
    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    /// Click behavior.
    pub fn action(&self) -> &ButtonAction {
        &self.action
    }

    /// Animation settings, if animated.
    pub fn animation(&self) -> Option<&AnimationSpec> {
        self.animation.as_ref()
    }

    /// Whether clicks refresh the button.
    pub fn is_dynamic(&self) -> bool {
        self.dynamic.is_some()
    }

    /// Build the base item without recording it.
    pub fn create_item(&self, menu: &dyn Menu) -> ItemStack {
        (self.item)(menu)
    }

    /// Build the base item and remember it as displayed. Resets the animation.
    pub fn render(&self, menu: &dyn Menu) -> ItemStack {
        let stack = self.create_item(menu);
        self.frame.set(0);
        self.remember(stack)
    }

    /// Build the next animation frame and remember it as displayed.
    pub fn next_frame(&self, menu: &dyn Menu) -> ItemStack {
        let frame = self.frame.get() + 1;
        self.frame.set(frame);
        let stack = match self.animation.as_ref().and_then(|spec| spec.frame.as_ref()) {
            Some(factory) => factory(menu, frame),
            None => self.create_item(menu),
        };
        self.remember(stack)
    }

    /// Build the post-click item and remember it as displayed.
    pub fn updated_item(&self, menu: &dyn Menu) -> ItemStack {
        let stack = match self.dynamic.as_ref().and_then(|spec| spec.update.as_ref()) {
            Some(update) => update(menu),
            None => self.create_item(menu),
        };
        self.remember(stack)
    }

    /// The last item drawn for this button.
    pub fn displayed(&self) -> Option<ItemStack> {
        self.displayed.borrow().clone()
    }

    /// Whether `item` is what this button currently shows.
    pub fn matches(&self, item: &ItemStack) -> bool {
        self.displayed
            .borrow()
            .as_ref()
            .map_or(false, |shown| shown == item || shown.is_similar(item))
    }

    /// Run the click behavior.
    pub fn click(&self, ctx: &mut ClickContext<'_>, menu: &mut dyn Menu) -> anyhow::Result<()> {
        match &self.action {
            ButtonAction::None => Ok(()),
            ButtonAction::Run(handler) => handler(ctx, menu),
            ButtonAction::Command {
                command,
                console,
                close_after,
            } => {
                ctx.run_command(command, *console);
                if *close_after {
                    ctx.close();
                }
                Ok(())
            }
            ButtonAction::OpenMenu {
                factory,
                pre_switch,
            } => {
                if let Some(pre_switch) = pre_switch {
                    pre_switch(ctx, menu)?;
                }
                let target = factory(ctx.holder(), ctx.click())?;
                ctx.switch_to(target);
                Ok(())
            }
            ButtonAction::PageNavigation { page, before } => {
                anyhow::ensure!(*page > 0, "a page number cannot be 0 or less");
                if menu.viewed_page() != Some(*page) {
                    if let Some(before) = before {
                        before(ctx, menu)?;
                    }
                }
                let audience = ctx.audience();
                menu.switch_page(*page, &audience)?;
                Ok(())
            }
            ButtonAction::Close => {
                ctx.close();
                if matches!(ctx.click(), ClickType::NumberKey(_)) {
                    ctx.resync_later();
                }
                Ok(())
            }
            ButtonAction::Return {
                strategy,
                can_return,
            } => {
                if let Some(guard) = can_return {
                    if !guard(ctx.holder(), &*menu, ctx.click()) {
                        return Ok(());
                    }
                }
                menu.handler_mut().before_return(ctx.holder());
                ctx.return_to_parent(*strategy);
                Ok(())
            }
        }
    }

    fn remember(&self, stack: ItemStack) -> ItemStack {
        *self.displayed.borrow_mut() = Some(stack.clone());
        stack
    }

    /// Info button with `lore` at `position`.
    pub fn info(position: InventoryPosition, lore: Vec<String>) -> Self {
        let creator = ItemCreator::of(Material::NETHER_STAR)
            .display("<yellow>Information")
            .lore(lore);
        Self::from_creator(position, creator)
    }

    /// Close button at `position`.
    pub fn close(position: InventoryPosition) -> Self {
        let creator = ItemCreator::of(Material::BARRIER)
            .name("<red>Close")
            .options(ItemOptions::HIDE_ALL_FLAGS);
        Self::from_creator(position, creator).with_action(ButtonAction::Close)
    }

    /// Return button leading back to a parent titled `parent_title`.
    pub fn back(position: InventoryPosition, parent_title: &str, strategy: ReturnStrategy) -> Self {
        let creator = ItemCreator::of(Material::ARROW).display(format!("<yellow>< Return to {parent_title}"));
        Self::from_creator(position, creator).with_action(ButtonAction::Return {
            strategy,
            can_return: None,
        })
    }

    /// Veto returns when `guard` is false. No effect on other actions.
    pub fn return_guard(
        mut self,
        guard: impl Fn(HolderId, &dyn Menu, ClickType) -> bool + 'static,
    ) -> Self {
        if let ButtonAction::Return { can_return, .. } = &mut self.action {
            *can_return = Some(Rc::new(guard));
        }
        self
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match &self.action {
            ButtonAction::None => "none",
            ButtonAction::Run(_) => "run",
            ButtonAction::Command { .. } => "command",
            ButtonAction::OpenMenu { .. } => "open_menu",
            ButtonAction::PageNavigation { .. } => "page_navigation",
            ButtonAction::Close => "close",
            ButtonAction::Return { .. } => "return",
        };
        f.debug_struct("Button")
            .field("position", &self.position)
            .field("positions", &self.positions)
            .field("permission", &self.permission)
            .field("action", &action)
            .field("animated", &self.animation.is_some())
            .field("dynamic", &self.dynamic.is_some())
            .finish()
    }
}

/// Buttons collected while a menu builds itself.
#[derive(Debug, Default)]
pub struct ButtonRegistry {
    buttons: Vec<Rc<Button>>,
}

impl ButtonRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a button. Registering the same shared button twice is refused.
    pub fn register(&mut self, button: impl Into<Rc<Button>>) -> bool {
        let button = button.into();
        if self.buttons.iter().any(|known| Rc::ptr_eq(known, &button)) {
            warn!(?button, "Failed to register a button: already registered");
            return false;
        }
        self.buttons.push(button);
        true
    }

    /// Register several buttons.
    pub fn register_all<I, B>(&mut self, buttons: I)
    where
        I: IntoIterator<Item = B>,
        B: Into<Rc<Button>>,
    {
        for button in buttons {
            self.register(button);
        }
    }

    /// Registered buttons in registration order.
    pub fn buttons(&self) -> &[Rc<Button>] {
        &self.buttons
    }

    /// Number of registered buttons.
    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    pub(crate) fn into_buttons(self) -> Vec<Rc<Button>> {
        self.buttons
    }
}

/// First visible button painted at `position` that currently shows `item`.
///
/// A match the holder lacks permission for ends the search with `None`,
/// so hidden buttons never fall through to buttons registered after them.
pub fn find_button<'b>(
    buttons: impl IntoIterator<Item = &'b Rc<Button>>,
    position: InventoryPosition,
    item: &ItemStack,
    can_see: impl Fn(Option<&str>) -> bool,
) -> Option<Rc<Button>> {
    let found = buttons
        .into_iter()
        .find(|button| button.occupies(position) && button.matches(item))?;
    can_see(found.permission()).then(|| Rc::clone(found))
}
