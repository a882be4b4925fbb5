use crate::button::{Button, ButtonAction, ClickHandler};
use crate::context::ClickContext;
use crate::error::MenuError;
use crate::host::Audience;
use crate::inventory::ClaimKind;
use crate::menu::form::paint;
use crate::menu::{Menu, MenuCore, MenuHandler};
use crate::position::InventoryPosition;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use tracing::debug;
use yggdrasil_core::ItemStack;

type PageItem = Rc<dyn Fn(usize) -> ItemStack>;

/// Template for the button that jumps to one page of a [`PageMenu`].
///
/// The item factories receive the page currently viewed.
#[derive(Clone)]
pub struct PageNavigationButton {
    page: usize,
    position: InventoryPosition,
    item: PageItem,
    active: Option<PageItem>,
    before: Option<ClickHandler>,
}

impl PageNavigationButton {
    /// Jump to `page` (1-based) from `position`.
    pub fn new(
        page: usize,
        position: InventoryPosition,
        item: impl Fn(usize) -> ItemStack + 'static,
    ) -> Self {
        Self {
            page,
            position,
            item: Rc::new(item),
            active: None,
            before: None,
        }
    }

    /// Item shown instead while `page` is the viewed page.
    pub fn active(mut self, item: impl Fn(usize) -> ItemStack + 'static) -> Self {
        self.active = Some(Rc::new(item));
        self
    }

    /// Run `handler` before switching, only when the page actually changes.
    pub fn before_switch(
        mut self,
        handler: impl Fn(&mut ClickContext<'_>, &mut dyn Menu) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.before = Some(Rc::new(handler));
        self
    }

    /// Target page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Cell of the button.
    pub fn position(&self) -> InventoryPosition {
        self.position
    }

    /// Concrete button for when `viewed` is on screen.
    pub fn make(&self, viewed: usize) -> Button {
        let factory = match &self.active {
            Some(active) if viewed == self.page => Rc::clone(active),
            _ => Rc::clone(&self.item),
        };
        Button::from_factory(self.position, move |_: &dyn Menu| factory(viewed)).with_action(
            ButtonAction::PageNavigation {
                page: self.page,
                before: self.before.clone(),
            },
        )
    }
}

impl fmt::Debug for PageNavigationButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageNavigationButton")
            .field("page", &self.page)
            .field("position", &self.position)
            .field("active", &self.active.is_some())
            .finish_non_exhaustive()
    }
}

/// One hand-built page: its navigation button and the buttons it shows.
#[derive(Debug, Clone)]
pub struct MenuPage {
    /// Button leading to this page.
    pub nav: PageNavigationButton,
    /// Buttons drawn while this page is viewed.
    pub buttons: Vec<Rc<Button>>,
}

impl MenuPage {
    /// A page with no buttons yet.
    pub fn new(nav: PageNavigationButton) -> Self {
        Self {
            nav,
            buttons: Vec::new(),
        }
    }

    /// Add a button.
    pub fn with_button(mut self, button: impl Into<Rc<Button>>) -> Self {
        self.buttons.push(button.into());
        self
    }

    /// Cells the page's buttons paint.
    pub fn positions(&self) -> Vec<InventoryPosition> {
        self.buttons
            .iter()
            .flat_map(|button| button.occupied().iter().copied())
            .collect()
    }
}

/// Author side of a [`PageMenu`].
pub trait PageProvider: MenuHandler {
    /// Every page, in order. Called whenever a page is drawn.
    fn make_pages(&self) -> Vec<MenuPage>;

    /// Item left in the previous page's cells after a switch; `None` empties them.
    fn default_item(&self) -> Option<ItemStack> {
        None
    }
}

/// A menu of explicit pages, each with its own buttons, switched by
/// per-page navigation buttons.
pub struct PageMenu<P: PageProvider> {
    core: MenuCore,
    provider: P,
    viewed: usize,
    page_buttons: Vec<Rc<Button>>,
    owned: BTreeSet<InventoryPosition>,
}

impl<P: PageProvider> PageMenu<P> {
    /// Start on page 1.
    pub fn new(core: MenuCore, provider: P) -> Self {
        Self {
            core,
            provider,
            viewed: 1,
            page_buttons: Vec::new(),
            owned: BTreeSet::new(),
        }
    }

    /// The provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The provider, mutably.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Viewed page (1-based).
    pub fn viewed(&self) -> usize {
        self.viewed
    }

    /// Redraw the viewed page, e.g. after the provider's state changed.
    pub fn refresh_page(&mut self, audience: &Audience<'_>) -> Result<(), MenuError> {
        if self.core.inventory().is_none() {
            return Ok(());
        }
        self.draw_page(audience, true)
    }

    fn draw_page(&mut self, audience: &Audience<'_>, clear: bool) -> Result<(), MenuError> {
        let pages = self.provider.make_pages();
        if pages.is_empty() {
            self.page_buttons.clear();
            return Ok(());
        }
        self.viewed = self.viewed.clamp(1, pages.len());

        if clear {
            let default = self.provider.default_item().filter(|item| !item.is_air());
            let grid = self.core.inventory.as_mut().ok_or(MenuError::NotDisplayed)?;
            for &position in &self.owned {
                grid.release_layout(position);
                if grid.is_slot_taken_by_button(position) {
                    continue;
                }
                match &default {
                    Some(item) => grid.force_set(position, item.clone()),
                    None => grid.clear_slot(position),
                };
            }
        }

        let current = &pages[self.viewed - 1];
        self.owned = current.positions().into_iter().collect();
        let mut buttons = current.buttons.clone();
        buttons.extend(pages.iter().map(|page| Rc::new(page.nav.make(self.viewed))));
        self.page_buttons = buttons.clone();
        paint(self, &buttons, audience, ClaimKind::Layout);
        debug!(menu = %self.core.id(), page = self.viewed, total = pages.len(), "Drew page");
        Ok(())
    }
}

impl<P: PageProvider> Menu for PageMenu<P> {
    fn core(&self) -> &MenuCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut MenuCore {
        &mut self.core
    }

    fn handler(&self) -> &dyn MenuHandler {
        &self.provider
    }

    fn handler_mut(&mut self) -> &mut dyn MenuHandler {
        &mut self.provider
    }

    fn parts_mut(&mut self) -> (&mut MenuCore, &mut dyn MenuHandler) {
        (&mut self.core, &mut self.provider)
    }

    fn layout_buttons(&self) -> Vec<Rc<Button>> {
        self.page_buttons.clone()
    }

    fn draw_layout(&mut self, audience: &Audience<'_>) -> Result<(), MenuError> {
        self.owned.clear();
        self.draw_page(audience, false)
    }

    fn switch_page(&mut self, page: usize, audience: &Audience<'_>) -> Result<(), MenuError> {
        let total = self.provider.make_pages().len();
        if page == 0 || page > total {
            return Err(MenuError::InvalidPage { page, total });
        }
        if page == self.viewed {
            return Ok(());
        }
        self.viewed = page;
        self.draw_page(audience, true)
    }

    fn viewed_page(&self) -> Option<usize> {
        Some(self.viewed)
    }

    fn total_pages(&self) -> Option<usize> {
        Some(self.provider.make_pages().len())
    }

    fn new_instance(&self) -> Option<Box<dyn Menu>> {
        let provider = self.provider.fresh()?;
        Some(Box::new(PageMenu::new(self.core.fresh_copy(), provider)))
    }
}
