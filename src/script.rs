use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
struct ClickScriptFile {
    steps: Vec<ScriptStep>,
}

fn default_holder() -> u64 {
    1
}

fn one() -> u64 {
    1
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Open the demo hub.
    Open {
        #[serde(default = "default_holder")]
        holder: u64,
    },
    /// Left click a menu slot.
    Click {
        #[serde(default = "default_holder")]
        holder: u64,
        slot: usize,
    },
    /// Right click a menu slot.
    RightClick {
        #[serde(default = "default_holder")]
        holder: u64,
        slot: usize,
    },
    /// Shift click a menu slot.
    ShiftClick {
        #[serde(default = "default_holder")]
        holder: u64,
        slot: usize,
    },
    /// Close the window from the client.
    Close {
        #[serde(default = "default_holder")]
        holder: u64,
    },
    /// Advance the manager.
    Tick {
        #[serde(default = "one")]
        count: u64,
    },
    /// The holder leaves.
    Disconnect {
        #[serde(default = "default_holder")]
        holder: u64,
    },
}

/// Ordered list of interactions replayed against the demo menus.
///
/// Scripts are JSON: `{"steps": [{"action": "click", "slot": 11}, ...]}`.
#[derive(Debug, Clone)]
pub struct ClickScript {
    steps: Vec<ScriptStep>,
}

impl ClickScript {
    /// Load a script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Load a script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: ClickScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("click script contains no steps");
        }
        if file
            .steps
            .iter()
            .any(|step| matches!(step, ScriptStep::Tick { count: 0 }))
        {
            anyhow::bail!("click script contains a tick step of zero ticks");
        }
        Ok(Self { steps: file.steps })
    }

    /// The built-in walk: open the hub, bump the counter, page through the
    /// catalog, go back, peek at the guide, let the clock run, then close.
    pub fn builtin() -> Self {
        use ScriptStep::*;
        let holder = default_holder();
        Self {
            steps: vec![
                Open { holder },
                Click { holder, slot: 13 },
                Click { holder, slot: 13 },
                Click { holder, slot: 11 },
                Click { holder, slot: 0 },
                Click { holder, slot: 50 },
                Click { holder, slot: 50 },
                RightClick { holder, slot: 49 },
                Click { holder, slot: 52 },
                Tick { count: 20 },
                Click { holder, slot: 15 },
                Click { holder, slot: 23 },
                Click { holder, slot: 13 },
                Close { holder },
                Disconnect { holder },
            ],
        }
    }

    /// Steps in order.
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}
