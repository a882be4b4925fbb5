//! Menu lifecycle through the manager
//!
//! Validates:
//! - Open, close and switch hooks fire for the right close reason
//! - Switching links the parent; return buttons go back (reusing or rebuilding it)
//! - Conversing holders are refused unless forced
//! - Unreachable menus are collected; never-displayed ones are kept
//! - Disconnect and shutdown release everything
//! - Refresh, update and retitle only send what changed
//! - Premade buttons can be replaced, moved, gated or dropped by the handler
//! - Anvil and unknown closes skip both hooks but still release the menu

use std::cell::RefCell;
use std::rc::Rc;
use yggdrasil_menus::{
    Button, ButtonRegistry, CloseReason, HolderId, InventoryPosition, ItemCreator, ItemStack, Material, Menu,
    MenuCore, MenuError, MenuHandler, MenuId, MenuManager, MenuSettings, ReturnStrategy,
    StandardMenu,
};
use yggdrasil_testkit::{left_click, right_click, RecordingHost};

const HOLDER: HolderId = HolderId(3);

type Log = Rc<RefCell<Vec<String>>>;

fn manager() -> MenuManager<RecordingHost> {
    MenuManager::new(RecordingHost::new(), MenuSettings::default())
}

fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}

/// Records every hook and opens a child from slot 0.
struct Tracked {
    name: &'static str,
    log: Log,
    strategy: ReturnStrategy,
}

impl Tracked {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            strategy: ReturnStrategy::Reuse,
        }
    }

    fn record(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{} {hook}", self.name));
    }
}

impl MenuHandler for Tracked {
    fn make_buttons(&mut self, buttons: &mut ButtonRegistry) {
        let log = Rc::clone(&self.log);
        let strategy = self.strategy;
        buttons.register(
            Button::new(InventoryPosition::of(0, 0), ItemStack::new(Material::BOOK)).opens(
                move |_, _| {
                    let mut child = Tracked::new("child", &log);
                    child.strategy = strategy;
                    Ok(StandardMenu::boxed(MenuCore::new("Child").with_rows(1), child))
                },
            ),
        );
    }

    fn on_open(&mut self, _holder: HolderId, _core: &mut MenuCore) {
        self.record("open");
    }

    fn post_display(&mut self, _holder: HolderId, _core: &mut MenuCore) {
        self.record("display");
    }

    fn on_close(&mut self, _holder: HolderId, _core: &mut MenuCore) {
        self.record("close");
    }

    fn on_switch(&mut self, _holder: HolderId, _core: &mut MenuCore) {
        self.record("switch");
    }

    fn before_return(&mut self, _holder: HolderId) {
        self.record("return");
    }

    fn return_strategy(&self) -> ReturnStrategy {
        self.strategy
    }

    fn fresh(&self) -> Option<Self> {
        Some(Self {
            name: self.name,
            log: Rc::clone(&self.log),
            strategy: self.strategy,
        })
    }
}

fn tracked(title: &str, name: &'static str, log: &Log) -> Box<dyn Menu> {
    StandardMenu::boxed(MenuCore::new(title).with_rows(1), Tracked::new(name, log))
}

#[test]
fn hooks_follow_close_reasons() {
    let mut manager = manager();
    let log = Log::default();
    let parent = manager.open(HOLDER, tracked("Parent", "parent", &log)).expect("open");
    assert_eq!(take(&log), vec!["parent open", "parent display"]);
    assert_eq!(manager.host().title_of(HOLDER), Some("Parent"));

    manager.handle_click(&left_click(HOLDER, 0));
    assert_eq!(take(&log), vec!["parent switch", "child open", "child display"]);
    let child = manager.sessions().current(HOLDER).expect("child is current");
    let link = manager.menu(child).and_then(|menu| menu.core().parent().cloned());
    assert_eq!(link.map(|link| (link.id, link.title)), Some((parent, "Parent".to_owned())));
    assert_eq!(manager.session(HOLDER).and_then(|s| s.previous()), Some(parent));

    manager.close(HOLDER).expect("close");
    assert_eq!(take(&log), vec!["child close"]);
    assert_eq!(manager.close(HOLDER), Err(MenuError::NoOpenMenu(HOLDER)));

    manager.open(HOLDER, tracked("Other", "first", &log)).expect("open first");
    manager.open(HOLDER, tracked("Other", "second", &log)).expect("open second");
    assert_eq!(
        take(&log),
        vec!["first open", "first display", "first close", "second open", "second display"],
        "opening over a menu closes it normally"
    );

    manager.host_mut().client_close(HOLDER);
    manager.handle_close(HOLDER);
    assert_eq!(take(&log), vec!["second close"]);
    assert_eq!(manager.sessions().current(HOLDER), None);
}

#[test]
fn return_button_reuses_the_parent() {
    let mut manager = manager();
    let log = Log::default();
    let parent = manager.open(HOLDER, tracked("Parent", "parent", &log)).expect("open");
    manager.handle_click(&left_click(HOLDER, 0));
    assert_eq!(
        manager.host().item_at(HOLDER, 7).map(|item| item.visible_name().to_owned()),
        Some("<yellow>< Return to Parent".to_owned())
    );
    take(&log);

    manager.handle_click(&left_click(HOLDER, 7));
    assert_eq!(take(&log), vec!["child return", "child switch", "parent open", "parent display"]);
    assert_eq!(manager.sessions().current(HOLDER), Some(parent));
    assert_eq!(manager.host().title_of(HOLDER), Some("Parent"));
}

#[test]
fn fresh_return_rebuilds_the_parent() {
    let mut manager = manager();
    let log = Log::default();
    let mut handler = Tracked::new("parent", &log);
    handler.strategy = ReturnStrategy::Fresh;
    let parent = manager
        .open(HOLDER, StandardMenu::boxed(MenuCore::new("Parent").with_rows(1), handler))
        .expect("open");
    manager.handle_click(&left_click(HOLDER, 0));
    manager.handle_click(&left_click(HOLDER, 7));

    let current = manager.sessions().current(HOLDER).expect("back on a parent");
    assert_ne!(current, parent);
    assert_eq!(manager.host().title_of(HOLDER), Some("Parent"));
    assert!(manager.menu(current).and_then(|menu| menu.state::<Tracked>()).is_some());
}

struct Guarded;

impl MenuHandler for Guarded {
    fn make_buttons(&mut self, buttons: &mut ButtonRegistry) {
        buttons.register(
            Button::back(InventoryPosition::of(0, 6), "Parent", ReturnStrategy::Reuse)
                .return_guard(|_, _, click| click.is_right()),
        );
    }

    fn add_return(&self, _has_parent: bool) -> bool {
        false
    }
}

#[test]
fn return_guard_can_veto() {
    let mut manager = manager();
    let log = Log::default();
    let parent = manager.open(HOLDER, tracked("Parent", "parent", &log)).expect("open");
    let guarded = MenuCore::new("Guarded").with_rows(1).with_parent(parent, "Parent");
    let child = manager
        .open(HOLDER, StandardMenu::boxed(guarded, Guarded))
        .expect("open guarded");
    assert_eq!(manager.host().item_at(HOLDER, 7), None, "no premade return button");

    manager.handle_click(&left_click(HOLDER, 6));
    assert_eq!(manager.sessions().current(HOLDER), Some(child));
    manager.handle_click(&right_click(HOLDER, 6));
    assert_eq!(manager.sessions().current(HOLDER), Some(parent));
}

struct Lost;

impl MenuHandler for Lost {
    fn add_return(&self, _has_parent: bool) -> bool {
        true
    }
}

#[test]
fn return_without_parent_fails_the_form() {
    let mut manager = manager();
    let err = manager
        .open(HOLDER, StandardMenu::boxed(MenuCore::new("Lost").with_rows(1), Lost))
        .unwrap_err();
    assert_eq!(err, MenuError::MissingParent);
    assert_eq!(manager.host().open_count(HOLDER), 0);
    assert_eq!(
        manager.return_to_parent(HOLDER, MenuId(1), ReturnStrategy::Reuse),
        Err(MenuError::MissingParent)
    );
}

#[test]
fn conversing_holders_are_refused() {
    let mut manager = manager();
    let log = Log::default();
    manager.host_mut().set_conversing(HOLDER, true);
    let id = manager.open(HOLDER, tracked("Shop", "shop", &log)).expect("refusal is not an error");

    let notice = manager.settings().messages.exit_conversation.clone();
    assert_eq!(manager.host().messages_to(HOLDER), vec![notice.as_str()]);
    assert_eq!(manager.host().open_count(HOLDER), 0);
    assert_eq!(manager.sessions().current(HOLDER), None);
    assert!(take(&log).is_empty());

    manager.display_to(HOLDER, id, true).expect("forced display");
    assert_eq!(manager.sessions().current(HOLDER), Some(id));
    assert_eq!(manager.host().open_count(HOLDER), 1);
}

#[test]
fn unreachable_menus_are_collected() {
    let mut manager = manager();
    let log = Log::default();
    let spare = manager.insert(tracked("Spare", "spare", &log));
    let first = manager.open(HOLDER, tracked("A", "a", &log)).expect("a");
    let second = manager.open(HOLDER, tracked("B", "b", &log)).expect("b");
    assert!(manager.menu(first).is_some(), "the previous menu stays reachable");

    let third = manager.open(HOLDER, tracked("C", "c", &log)).expect("c");
    assert!(manager.menu(first).is_none());
    assert!(manager.menu(second).is_some());
    assert!(manager.menu(third).is_some());
    assert!(manager.menu(spare).is_some(), "never-displayed menus are kept");
    assert_eq!(manager.menu_count(), 3);

    assert!(manager.remove(third).is_none(), "open menus cannot be removed");
    assert!(manager.remove(spare).is_some());
}

#[test]
fn parents_of_open_menus_are_kept() {
    let mut manager = manager();
    let log = Log::default();
    let root = manager.open(HOLDER, tracked("Root", "root", &log)).expect("open");
    manager.handle_click(&left_click(HOLDER, 0));
    manager.handle_click(&left_click(HOLDER, 0));
    manager.handle_click(&left_click(HOLDER, 0));
    assert!(manager.menu(root).is_some(), "parent chain keeps the root alive");
    assert_eq!(manager.menu_count(), 4);
}

#[test]
fn disconnect_and_shutdown_release_everything() {
    let mut manager = manager();
    let log = Log::default();
    let other = HolderId(4);
    manager.open(HOLDER, tracked("One", "one", &log)).expect("one");
    manager.open(other, tracked("Two", "two", &log)).expect("two");
    take(&log);

    manager.handle_disconnect(HOLDER);
    assert_eq!(take(&log), vec!["one close"]);
    assert!(manager.session(HOLDER).is_none());
    assert_eq!(manager.menu_count(), 1);

    manager.shutdown();
    assert_eq!(take(&log), vec!["two close"]);
    assert_eq!(manager.host().close_count(other), 1);
    assert_eq!(manager.menu_count(), 0);
}

struct Label {
    text: String,
}

impl MenuHandler for Label {
    fn make_buttons(&mut self, buttons: &mut ButtonRegistry) {
        let text = self.text.clone();
        buttons.register(Button::new(
            InventoryPosition::of(0, 3),
            ItemCreator::of(Material::PAPER).display(text).make(),
        ));
        buttons.register(
            Button::new(InventoryPosition::of(0, 5), ItemStack::new(Material::CLOCK)).on_click(
                |ctx, _| {
                    ctx.refresh();
                    Ok(())
                },
            ),
        );
    }

    fn draw_extra(&mut self, inventory: &mut yggdrasil_menus::MenuInventory) {
        inventory.fill(ItemStack::new(Material::GRAY_STAINED_GLASS_PANE));
    }
}

#[test]
fn refresh_and_update_send_only_changes() {
    let mut manager = manager();
    let id = manager
        .open(
            HOLDER,
            StandardMenu::boxed(
                MenuCore::new("Label").with_rows(1),
                Label {
                    text: "before".into(),
                },
            ),
        )
        .expect("open");
    assert_eq!(
        manager.host().item_at(HOLDER, 0).map(|item| &item.material),
        Some(&Material::GRAY_STAINED_GLASS_PANE),
        "decoration fills around buttons"
    );
    manager.host_mut().clear_events();

    manager
        .update(id, |menu, _| {
            menu.state_mut::<Label>().ok_or(MenuError::NotDisplayed)?.text = "after".into();
            Ok(())
        })
        .expect("update");
    assert!(manager.host().events().is_empty(), "state changes alone redraw nothing");

    manager.handle_click(&left_click(HOLDER, 5));
    assert_eq!(manager.host().updated_slots(HOLDER), vec![3]);
    assert_eq!(
        manager.host().item_at(HOLDER, 3).map(|item| item.visible_name().to_owned()),
        Some("after".to_owned())
    );

    manager.host_mut().clear_events();
    manager
        .update(id, |menu, _| {
            menu.core_mut().set_title("Renamed");
            Ok(())
        })
        .expect("retitle");
    assert_eq!(manager.host().open_count(HOLDER), 1);
    assert_eq!(manager.host().title_of(HOLDER), Some("Renamed"));

    assert_eq!(manager.refresh_menu(MenuId(99)), Err(MenuError::UnknownMenu(MenuId(99))));
}

struct Locked;

impl MenuHandler for Locked {
    fn info(&self) -> Vec<String> {
        vec!["Staff only".into()]
    }

    fn info_button(&self, _rows: usize) -> Option<Button> {
        None
    }

    fn add_close(&self) -> bool {
        true
    }

    fn close_button(&self, rows: usize) -> Option<Button> {
        Some(Button::close(InventoryPosition::of(rows - 1, 4)).with_permission("menu.close"))
    }
}

fn open_locked(manager: &mut MenuManager<RecordingHost>) {
    manager
        .open(HOLDER, StandardMenu::boxed(MenuCore::new("Locked").with_rows(2), Locked))
        .expect("open locked");
}

#[test]
fn premade_buttons_follow_handler_overrides() {
    let mut manager = manager();
    open_locked(&mut manager);
    assert_eq!(manager.host().item_at(HOLDER, 9), None, "info button dropped");
    assert_eq!(manager.host().item_at(HOLDER, 17), None, "default close cell stays free");
    assert_eq!(manager.host().item_at(HOLDER, 13), None, "gated close button is hidden");
    manager.handle_click(&left_click(HOLDER, 13));
    assert!(manager.sessions().current(HOLDER).is_some());

    let mut granted = self::manager();
    granted.host_mut().grant(HOLDER, "menu.close");
    open_locked(&mut granted);
    assert_eq!(
        granted.host().item_at(HOLDER, 13).map(|item| &item.material),
        Some(&Material::BARRIER)
    );
    granted.handle_click(&left_click(HOLDER, 13));
    assert_eq!(granted.sessions().current(HOLDER), None);
}

/// Ticking menu that records which close hook ran.
struct Smithy {
    log: Log,
}

impl MenuHandler for Smithy {
    fn is_ticking(&self) -> bool {
        true
    }

    fn on_close(&mut self, _holder: HolderId, _core: &mut MenuCore) {
        self.log.borrow_mut().push("close".into());
    }

    fn on_switch(&mut self, _holder: HolderId, _core: &mut MenuCore) {
        self.log.borrow_mut().push("switch".into());
    }
}

#[test]
fn anvil_and_unknown_closes_skip_hooks() {
    let mut manager = manager();
    let log = Log::default();
    let watcher = HolderId(9);
    let mut core = MenuCore::new("Smithy").with_rows(1);
    core.schedule(5, |_| Ok(()));
    let id = manager
        .open(HOLDER, StandardMenu::boxed(core, Smithy { log: Rc::clone(&log) }))
        .expect("open");

    for (round, reason) in [CloseReason::Anvil, CloseReason::Unknown].into_iter().enumerate() {
        if round > 0 {
            manager.display_to(HOLDER, id, false).expect("reopen");
        }
        manager.show_to(watcher, id).expect("watch");
        assert!(manager.ticking().contains(id));
        manager
            .update(id, |menu, _| {
                menu.core_mut().set_close_reason(reason);
                Ok(())
            })
            .expect("mark close reason");

        manager.host_mut().client_close(HOLDER);
        manager.handle_close(HOLDER);

        assert!(take(&log).is_empty(), "{reason:?} runs neither on_close nor on_switch");
        assert!(!manager.ticking().contains(id));
        assert_eq!(manager.sessions().current(HOLDER), None);
        let core = manager.menu(id).map(|menu| menu.core()).expect("kept as previous menu");
        assert!(!core.tasks().is_empty());
        assert!(core.tasks().iter().all(|task| task.is_cancelled()));
        assert_eq!(core.close_reason(), CloseReason::Default);
        assert_eq!(manager.host().close_count(watcher), round + 1);
        assert_eq!(manager.session(watcher).and_then(|s| s.viewed()), None);
    }
}
