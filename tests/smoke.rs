use yggdrasil_core::SimTick;
use yggdrasil_menus::{
    Button, ButtonRegistry, HolderId, InventoryPosition, ItemStack, Material, MenuCore,
    MenuHandler, MenuManager, MenuSettings, StandardMenu,
};
use yggdrasil_testkit::{left_click, EventRecord, HostEvent, JsonlSink, RecordingHost};

struct Ping;

impl MenuHandler for Ping {
    fn make_buttons(&mut self, buttons: &mut ButtonRegistry) {
        buttons.register(
            Button::new(InventoryPosition::of(0, 4), ItemStack::new(Material::PAPER))
                .on_click(|ctx, _| {
                    ctx.tell("pong");
                    Ok(())
                }),
        );
    }
}

#[test]
fn deterministic_event_stream_can_be_written() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut sink = JsonlSink::create(dir.path().join("eventlog.jsonl")).expect("can create log");
    let event = HostEvent::Close { holder: HolderId(1) };
    let record = EventRecord {
        tick: SimTick::ZERO.advance(1),
        event: &event,
    };
    sink.write(&record).expect("can write event");
    assert_eq!(sink.written(), 1);
}

#[test]
fn menu_traffic_lands_in_the_log() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("traffic.jsonl");
    let mut manager = MenuManager::new(RecordingHost::new(), MenuSettings::default());
    let mut sink = JsonlSink::create(&path).expect("can create log");

    manager
        .open(
            HolderId(1),
            StandardMenu::boxed(MenuCore::new("Smoke").with_rows(1), Ping),
        )
        .expect("open");
    manager.handle_click(&left_click(HolderId(1), 4));
    manager.tick();
    let events = manager.host_mut().take_events();
    sink.write_all(manager.current_tick(), &events)
        .expect("can write events");

    let contents = std::fs::read_to_string(&path).expect("log readable");
    assert_eq!(contents.lines().count(), events.len());
    assert!(contents.contains("Smoke"));
    assert!(contents.contains("pong"));
}
