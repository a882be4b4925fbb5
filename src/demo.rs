//! The sample menu tree the runner walks: a hub, a paginated catalog, and a
//! two-page guide.

use anyhow::Context;
use yggdrasil_core::{ItemCreator, ItemOptions, ItemStack, Material, WeightedRandomBag};
use yggdrasil_menus::{
    Button, ButtonRegistry, ClickContext, ClickType, InventoryPosition, Menu, MenuCore,
    MenuHandler, MenuPage, PageMenu, PageNavigationButton, PageProvider, PageSource,
    PaginatedMenu, StandardMenu,
};

/// Cell of the catalog button in the hub.
pub const CATALOG_BUTTON: InventoryPosition = InventoryPosition::of(1, 2);
/// Cell of the click counter in the hub.
pub const COUNTER_BUTTON: InventoryPosition = InventoryPosition::of(1, 4);
/// Cell of the guide button in the hub.
pub const GUIDE_BUTTON: InventoryPosition = InventoryPosition::of(1, 6);
/// Cell of the broadcast button in the hub.
pub const BROADCAST_BUTTON: InventoryPosition = InventoryPosition::of(0, 0);
/// Cell of the animated clock in the hub.
pub const CLOCK_BUTTON: InventoryPosition = InventoryPosition::of(0, 4);

/// Hub menu state.
#[derive(Debug, Clone)]
pub struct Hub {
    catalog_size: u32,
    clicks: u32,
}

impl Hub {
    /// A hub whose catalog lists `catalog_size` entries.
    pub fn new(catalog_size: u32) -> Self {
        Self {
            catalog_size,
            clicks: 0,
        }
    }
}

fn counter_item(clicks: u32) -> ItemStack {
    ItemCreator::of(Material::LIME_DYE)
        .amount(u8::try_from(clicks.clamp(1, 64)).unwrap_or(1))
        .display(format!("<green>Clicked {clicks} times"))
        .lore(["Every click redraws only this cell"])
        .make()
}

fn clock_frame(frame: u64) -> ItemStack {
    let material = if frame % 2 == 0 {
        Material::GRAY_STAINED_GLASS_PANE
    } else {
        Material::BLACK_STAINED_GLASS_PANE
    };
    ItemCreator::of(material)
        .display(format!("<gray>Tick frame {frame}"))
        .options(ItemOptions::HIDE_ALL_FLAGS)
        .make()
}

impl MenuHandler for Hub {
    fn make_buttons(&mut self, buttons: &mut ButtonRegistry) {
        let catalog_size = self.catalog_size;
        buttons.register(
            Button::from_creator(
                CATALOG_BUTTON,
                ItemCreator::of(Material::BOOK)
                    .display("<gold>Catalog")
                    .lore([format!("Browse {catalog_size} entries")]),
            )
            .opens(move |_, _| Ok(catalog_menu(catalog_size))),
        );
        buttons.register(
            Button::from_factory(COUNTER_BUTTON, |menu: &dyn Menu| {
                counter_item(menu.state::<Hub>().map_or(0, |hub| hub.clicks))
            })
            .on_click(|_, menu| {
                let hub = menu.state_mut::<Hub>().context("hub state missing")?;
                hub.clicks += 1;
                Ok(())
            })
            .dynamic(),
        );
        buttons.register(
            Button::from_creator(
                GUIDE_BUTTON,
                ItemCreator::of(Material::PAPER).display("<aqua>Guide"),
            )
            .opens(|_, _| Ok(guide_menu())),
        );
        buttons.register(
            Button::from_creator(
                BROADCAST_BUTTON,
                ItemCreator::of(Material::COMMAND_BLOCK).display("<red>Broadcast"),
            )
            .console_command("/say The hub says hello")
            .close_after(false),
        );
        buttons.register(
            Button::new(CLOCK_BUTTON, clock_frame(0))
                .animated_with(Some(10), |_: &dyn Menu, frame| clock_frame(frame)),
        );
    }

    fn info(&self) -> Vec<String> {
        vec![
            "Left click the catalog to browse.".into(),
            "The clock changes every half second.".into(),
        ]
    }

    fn add_close(&self) -> bool {
        true
    }

    fn fresh(&self) -> Option<Self> {
        Some(Self::new(self.catalog_size))
    }
}

/// Hub menu, ready to open.
pub fn hub_menu(catalog_size: u32) -> Box<dyn Menu> {
    StandardMenu::boxed(
        MenuCore::new("<dark_green>Yggdrasil Demo").with_rows(3),
        Hub::new(catalog_size),
    )
}

/// Catalog state: shows numbered entries.
#[derive(Debug, Default)]
pub struct Catalog;

impl MenuHandler for Catalog {
    fn fresh(&self) -> Option<Self> {
        Some(Self)
    }
}

impl PageSource for Catalog {
    type Value = u32;

    fn convert(&self, value: &u32) -> ItemStack {
        ItemCreator::of(Material::PAPER)
            .display(format!("<white>Entry #{value}"))
            .make()
    }

    fn on_value_click(
        &mut self,
        ctx: &mut ClickContext<'_>,
        value: &u32,
        click: ClickType,
    ) -> anyhow::Result<()> {
        let verb = if click.is_right() { "inspected" } else { "picked" };
        ctx.tell(&format!("<green>You {verb} entry #{value}"));
        Ok(())
    }
}

/// Full-size catalog listing entries `1..=size`.
pub fn catalog_menu(size: u32) -> Box<dyn Menu> {
    Box::new(PaginatedMenu::new(
        MenuCore::new("<gold>Catalog").with_size(54),
        Catalog,
        1..=size,
    ))
}

/// Guide state: a reward bag for the lucky draw on page two.
pub struct Guide {
    rewards: WeightedRandomBag<&'static str>,
}

impl Guide {
    fn new() -> Self {
        let mut rewards = WeightedRandomBag::new();
        rewards.add(70.0, "a stick").add(25.0, "an apple").add(5.0, "a diamond");
        Self { rewards }
    }
}

impl MenuHandler for Guide {}

fn guide_nav(page: usize, position: InventoryPosition) -> PageNavigationButton {
    PageNavigationButton::new(page, position, move |_| {
        ItemCreator::of(Material::BOOK)
            .display(format!("<gray>Page {page}"))
            .make()
    })
    .active(move |_| {
        ItemCreator::of(Material::BOOK)
            .display(format!("<yellow>Page {page} (viewing)"))
            .amount(u8::try_from(page).unwrap_or(1))
            .make()
    })
}

impl PageProvider for Guide {
    fn make_pages(&self) -> Vec<MenuPage> {
        let intro = MenuPage::new(guide_nav(1, InventoryPosition::of(2, 3))).with_button(Button::new(
            InventoryPosition::of(1, 4),
            ItemCreator::of(Material::PAPER)
                .display("<white>Buttons only redraw what changed")
                .make(),
        ));
        let draw = MenuPage::new(guide_nav(2, InventoryPosition::of(2, 5))).with_button(
            Button::from_creator(
                InventoryPosition::of(1, 4),
                ItemCreator::of(Material::DIAMOND).display("<aqua>Lucky draw"),
            )
            .on_click(|ctx, menu| {
                let guide = menu
                    .downcast_mut::<PageMenu<Guide>>()
                    .context("lucky draw outside the guide")?;
                let reward = guide.provider_mut().rewards.pick().copied().unwrap_or("nothing");
                ctx.tell(&format!("<gold>You won {reward}!"));
                Ok(())
            }),
        );
        vec![intro, draw]
    }

    fn default_item(&self) -> Option<ItemStack> {
        Some(
            ItemCreator::of(Material::LIGHT_GRAY_STAINED_GLASS_PANE)
                .display(" ")
                .make(),
        )
    }
}

/// The two-page guide.
pub fn guide_menu() -> Box<dyn Menu> {
    Box::new(PageMenu::new(
        MenuCore::new("<aqua>Guide").with_rows(3),
        Guide::new(),
    ))
}
