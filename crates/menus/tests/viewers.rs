//! Spectators mirroring another holder's menu
//!
//! Validates:
//! - Only displayed menus can be watched
//! - Viewers see the holder's changes and cannot click
//! - The viewer policy decides what happens when the holder closes

use anyhow::Context;
use yggdrasil_menus::{
    Button, ButtonRegistry, EventResult, HolderId, InventoryPosition, ItemStack, Material, Menu,
    MenuCore, MenuError, MenuHandler, MenuId, MenuManager, MenuSettings, StandardMenu,
    ViewerPolicy,
};
use yggdrasil_testkit::{left_click, RecordingHost};

const OWNER: HolderId = HolderId(1);
const WATCHER: HolderId = HolderId(2);

struct Shared {
    policy: ViewerPolicy,
    presses: u8,
}

impl MenuHandler for Shared {
    fn make_buttons(&mut self, buttons: &mut ButtonRegistry) {
        buttons.register(
            Button::from_factory(InventoryPosition::of(0, 4), |menu: &dyn Menu| {
                let presses = menu.state::<Shared>().map_or(0, |shared| shared.presses);
                ItemStack::with_amount(Material::STONE, presses + 1)
            })
            .on_click(|_, menu| {
                menu.state_mut::<Shared>().context("shared state")?.presses += 1;
                Ok(())
            })
            .dynamic(),
        );
    }

    fn viewer_policy(&self) -> ViewerPolicy {
        self.policy.clone()
    }
}

fn watched(policy: ViewerPolicy) -> (MenuManager<RecordingHost>, MenuId) {
    let mut manager = MenuManager::new(RecordingHost::new(), MenuSettings::default());
    let id = manager
        .open(
            OWNER,
            StandardMenu::boxed(
                MenuCore::new("Shared").with_rows(1),
                Shared { policy, presses: 0 },
            ),
        )
        .expect("open");
    manager.show_to(WATCHER, id).expect("show");
    (manager, id)
}

#[test]
fn only_displayed_menus_can_be_watched() {
    let mut manager = MenuManager::new(RecordingHost::new(), MenuSettings::default());
    let id = manager.insert(StandardMenu::boxed(
        MenuCore::new("Hidden").with_rows(1),
        Shared {
            policy: ViewerPolicy::Close,
            presses: 0,
        },
    ));
    assert_eq!(manager.show_to(WATCHER, id), Err(MenuError::NotDisplayed));
    assert_eq!(manager.show_to(WATCHER, MenuId(42)), Err(MenuError::UnknownMenu(MenuId(42))));
}

#[test]
fn viewers_mirror_changes_but_cannot_click() {
    let (mut manager, id) = watched(ViewerPolicy::Close);
    assert_eq!(manager.host().title_of(WATCHER), Some("Shared"));
    assert_eq!(manager.session(WATCHER).and_then(|s| s.viewed()), Some(id));

    manager.handle_click(&left_click(OWNER, 4));
    assert_eq!(manager.host().updated_slots(WATCHER), vec![4]);
    assert_eq!(manager.host().item_at(WATCHER, 4).map(|item| item.amount), Some(2));
    manager.handle_click(&left_click(OWNER, 4));
    assert_eq!(manager.host().item_at(WATCHER, 4).map(|item| item.amount), Some(3));

    assert_eq!(manager.handle_click(&left_click(WATCHER, 4)), EventResult::Deny);
    assert_eq!(
        manager.menu(id).and_then(|menu| menu.state::<Shared>()).map(|s| s.presses),
        Some(2),
        "viewer clicks never reach the menu"
    );
}

#[test]
fn viewer_can_leave_on_their_own() {
    let (mut manager, id) = watched(ViewerPolicy::Close);
    manager.host_mut().client_close(WATCHER);
    manager.handle_close(WATCHER);
    assert!(manager.menu(id).map_or(false, |menu| menu.core().viewers().is_empty()));
    assert_eq!(manager.session(WATCHER).and_then(|s| s.viewed()), None);
    assert_eq!(manager.sessions().current(OWNER), Some(id), "the owner is unaffected");

    manager.show_to(WATCHER, id).expect("watch again");
    assert_eq!(manager.remove_viewer(WATCHER), Some(id));
    assert_eq!(manager.host().close_count(WATCHER), 1);
    assert_eq!(manager.remove_viewer(WATCHER), None);
}

#[test]
fn closing_holder_closes_viewers_by_default() {
    let (mut manager, id) = watched(ViewerPolicy::Close);
    manager.host_mut().clear_events();
    manager.host_mut().client_close(OWNER);
    manager.handle_close(OWNER);

    let notice = manager.settings().messages.viewer_closed.clone();
    assert_eq!(manager.host().close_count(WATCHER), 1);
    assert_eq!(manager.host().messages_to(WATCHER), vec![notice.as_str()]);
    assert_eq!(manager.session(WATCHER).and_then(|s| s.viewed()), None);
    assert!(manager.menu(id).map_or(true, |menu| menu.core().viewers().is_empty()));
}

#[test]
fn maintain_policy_keeps_viewers_watching() {
    let (mut manager, id) = watched(ViewerPolicy::Maintain {
        notify: true,
        message: None,
    });
    manager.host_mut().clear_events();
    manager.close(OWNER).expect("close");

    let notice = manager.settings().messages.viewer_maintained.clone();
    assert_eq!(manager.host().messages_to(WATCHER), vec![notice.as_str()]);
    assert_eq!(manager.host().close_count(WATCHER), 0);
    assert!(manager.menu(id).map_or(false, |menu| menu.core().viewers().contains(&WATCHER)));
    assert_eq!(manager.handle_click(&left_click(WATCHER, 4)), EventResult::Deny);
}

#[test]
fn maintain_policy_with_custom_notice() {
    let (mut manager, _) = watched(ViewerPolicy::Maintain {
        notify: true,
        message: Some("<gold>They stepped away".into()),
    });
    manager.close(OWNER).expect("close");
    assert_eq!(manager.host().messages_to(WATCHER), vec!["<gold>They stepped away"]);

    let (mut silent, _) = watched(ViewerPolicy::Maintain {
        notify: false,
        message: None,
    });
    silent.close(OWNER).expect("close");
    assert!(silent.host().messages_to(WATCHER).is_empty());
}
