//! yggdrasil - headless runner for the inventory menu framework
//!
//! Builds the demo menu tree against a recording host, replays a click
//! script, and prints (or logs) every call the framework makes to the host.

mod demo;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use script::{ClickScript, ScriptStep};
use std::path::PathBuf;
use tracing::{info, warn};
use yggdrasil_menus::{EventResult, HolderId, MenuManager, MenuSettings};
use yggdrasil_testkit::{left_click, right_click, shift_click, HostEvent, JsonlSink, RecordingHost};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless walk through the yggdrasil demo menus", long_about = None)]
struct Args {
    /// Menu settings file (TOML); defaults are used when it is missing or invalid
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Click script (JSON); the built-in walk runs when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write host traffic as newline-delimited JSON
    #[arg(long)]
    log: Option<PathBuf>,

    /// Number of entries in the demo catalog
    #[arg(long, default_value_t = 50)]
    values: u32,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    info!("Starting yggdrasil v{}", env!("CARGO_PKG_VERSION"));

    let settings = match &args.settings {
        Some(path) => MenuSettings::load_from_path(path),
        None => MenuSettings::default(),
    };
    let script = match &args.script {
        Some(path) => ClickScript::from_path(path)
            .with_context(|| format!("Failed to load click script {}", path.display()))?,
        None => ClickScript::builtin(),
    };
    let mut sink = match &args.log {
        Some(path) => Some(
            JsonlSink::create(path)
                .with_context(|| format!("Failed to create traffic log {}", path.display()))?,
        ),
        None => None,
    };

    let mut runner = Runner::new(settings, args.values);
    for step in script.steps() {
        println!("> {step:?}");
        runner.apply(step)?;
        let events = runner.manager.host_mut().take_events();
        for event in &events {
            println!("  {}", describe(event));
        }
        if let Some(sink) = sink.as_mut() {
            sink.write_all(runner.manager.current_tick(), &events)?;
        }
    }

    runner.manager.shutdown();
    if let Some(sink) = &sink {
        info!(records = sink.written(), "Traffic log written");
    }
    Ok(())
}

struct Runner {
    manager: MenuManager<RecordingHost>,
    catalog_size: u32,
}

impl Runner {
    fn new(settings: MenuSettings, catalog_size: u32) -> Self {
        Self {
            manager: MenuManager::new(RecordingHost::new(), settings),
            catalog_size,
        }
    }

    fn apply(&mut self, step: &ScriptStep) -> Result<()> {
        match *step {
            ScriptStep::Open { holder } => {
                self.manager
                    .open(HolderId(holder), demo::hub_menu(self.catalog_size))?;
            }
            ScriptStep::Click { holder, slot } => {
                self.click(&left_click(HolderId(holder), slot));
            }
            ScriptStep::RightClick { holder, slot } => {
                self.click(&right_click(HolderId(holder), slot));
            }
            ScriptStep::ShiftClick { holder, slot } => {
                self.click(&shift_click(HolderId(holder), slot));
            }
            ScriptStep::Close { holder } => {
                let holder = HolderId(holder);
                self.manager.host_mut().client_close(holder);
                self.manager.handle_close(holder);
            }
            ScriptStep::Tick { count } => {
                for _ in 0..count {
                    self.manager.tick();
                }
            }
            ScriptStep::Disconnect { holder } => self.manager.handle_disconnect(HolderId(holder)),
        }
        Ok(())
    }

    fn click(&mut self, event: &yggdrasil_menus::ClickEvent) {
        if self.manager.session(event.holder).and_then(|s| s.current()).is_none() {
            warn!(holder = %event.holder, "Click without an open menu");
        }
        if self.manager.handle_click(event) == EventResult::Deny {
            println!("  (item effect cancelled)");
        }
    }
}

fn describe(event: &HostEvent) -> String {
    match event {
        HostEvent::Open { holder, title, rows } => format!("{holder} opens \"{title}\" ({rows} rows)"),
        HostEvent::Update { holder, slot, item } => match item {
            Some(item) => format!("{holder} slot {slot} = {} x{}", item.visible_name(), item.amount),
            None => format!("{holder} slot {slot} cleared"),
        },
        HostEvent::Close { holder } => format!("{holder} window closed"),
        HostEvent::Message { holder, text } => format!("{holder} <- {text}"),
        HostEvent::Command { sender, command } => format!("{sender:?} runs /{command}"),
        HostEvent::Resync { holder } => format!("{holder} inventory resynced"),
    }
}
