//! Item descriptions shown in menu slots.

use crate::material::Material;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Largest amount a single displayed stack may carry.
pub const MAX_STACK_SIZE: u8 = 99;

bitflags::bitflags! {
    /// Tooltip sections the host should hide when rendering the item.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ItemFlags: u16 {
        const HIDE_ATTRIBUTES = 0b0000_0001;
        const HIDE_ENCHANTS = 0b0000_0010;
        const HIDE_UNBREAKABLE = 0b0000_0100;
        const HIDE_ADDITIONAL_TOOLTIP = 0b0000_1000;
        const HIDE_DYE = 0b0001_0000;
        const HIDE_ARMOR_TRIM = 0b0010_0000;
        const HIDE_TOOLTIP = 0b0100_0000;
    }
}

/// Presentation options applied on top of an item's name and lore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemOptions {
    /// Hidden tooltip sections.
    pub flags: ItemFlags,
    /// Render the enchantment glint without real enchantments.
    pub glow: bool,
    /// Mark the item as unbreakable.
    pub unbreakable: bool,
    /// Resource-pack model selector.
    pub custom_model_data: Option<i32>,
}

impl ItemOptions {
    /// No options at all.
    pub const EMPTY: Self = Self {
        flags: ItemFlags::empty(),
        glow: false,
        unbreakable: false,
        custom_model_data: None,
    };

    /// Hide every tooltip section except name and lore.
    pub const HIDE_ALL_FLAGS: Self = Self {
        flags: ItemFlags::HIDE_ATTRIBUTES
            .union(ItemFlags::HIDE_ENCHANTS)
            .union(ItemFlags::HIDE_UNBREAKABLE)
            .union(ItemFlags::HIDE_ADDITIONAL_TOOLTIP)
            .union(ItemFlags::HIDE_DYE)
            .union(ItemFlags::HIDE_ARMOR_TRIM),
        glow: false,
        unbreakable: false,
        custom_model_data: None,
    };

    /// Enable the glint.
    pub fn with_glow(mut self, glow: bool) -> Self {
        self.glow = glow;
        self
    }

    /// Set the model selector.
    pub fn with_model_data(mut self, data: i32) -> Self {
        self.custom_model_data = Some(data);
        self
    }
}

/// A displayable stack of items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// What the item is.
    pub material: Material,
    /// Stack size, 1..=[`MAX_STACK_SIZE`].
    pub amount: u8,
    /// Custom (italic-by-default) display name, in markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Base item name, in markup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_name: Option<String>,
    /// Tooltip lines, in markup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lore: Vec<String>,
    /// Presentation options.
    #[serde(default)]
    pub options: ItemOptions,
}

impl ItemStack {
    /// A plain stack of one.
    pub fn new(material: Material) -> Self {
        Self::with_amount(material, 1)
    }

    /// A plain stack with `amount` items (clamped to 1..=[`MAX_STACK_SIZE`]).
    pub fn with_amount(material: Material, amount: u8) -> Self {
        Self {
            material,
            amount: amount.clamp(1, MAX_STACK_SIZE),
            display_name: None,
            item_name: None,
            lore: Vec::new(),
            options: ItemOptions::EMPTY,
        }
    }

    /// Whether this stack represents an empty slot.
    pub fn is_air(&self) -> bool {
        self.material.is_air()
    }

    /// Same item ignoring stack size.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.material == other.material
            && self.display_name == other.display_name
            && self.item_name == other.item_name
            && self.lore == other.lore
            && self.options == other.options
    }

    /// The name a viewer sees: display name, then item name, then the material path.
    pub fn visible_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.item_name.as_deref())
            .unwrap_or_else(|| self.material.path())
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.amount, self.material)?;
        if let Some(name) = &self.display_name {
            write!(f, " \"{name}\"")?;
        }
        Ok(())
    }
}

type Manipulator = Arc<dyn Fn(&mut ItemStack) + Send + Sync>;

/// Builder for [`ItemStack`]s.
///
/// Creators are reusable: [`ItemCreator::make`] can be called any number of
/// times, which makes them a natural item factory for buttons.
#[derive(Clone)]
pub struct ItemCreator {
    material: Material,
    amount: u8,
    name: Option<String>,
    display: Option<String>,
    lore: Option<Vec<String>>,
    options: Option<ItemOptions>,
    manipulators: Vec<Manipulator>,
}

impl ItemCreator {
    /// Start a creator for `material`.
    pub fn of(material: Material) -> Self {
        Self {
            material,
            amount: 1,
            name: None,
            display: None,
            lore: None,
            options: None,
            manipulators: Vec::new(),
        }
    }

    /// Start a creator that reproduces `stack`, ready for further edits.
    pub fn from_stack(stack: &ItemStack) -> Self {
        Self {
            material: stack.material.clone(),
            amount: stack.amount,
            name: stack.item_name.clone(),
            display: stack.display_name.clone(),
            lore: (!stack.lore.is_empty()).then(|| stack.lore.clone()),
            options: Some(stack.options.clone()),
            manipulators: Vec::new(),
        }
    }

    /// Replace the material.
    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Stack size (clamped to 1..=[`MAX_STACK_SIZE`] on [`make`](Self::make)).
    pub fn amount(mut self, amount: u8) -> Self {
        self.amount = amount;
        self
    }

    /// Base item name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Custom display name.
    pub fn display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Replace the lore.
    pub fn lore<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lore = Some(lines.into_iter().map(Into::into).collect());
        self
    }

    /// Append a single lore line.
    pub fn lore_line(mut self, line: impl Into<String>) -> Self {
        self.lore.get_or_insert_with(Vec::new).push(line.into());
        self
    }

    /// Presentation options.
    pub fn options(mut self, options: ItemOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Run `f` on every stack this creator makes, after the base fields are applied
    /// and before name, lore and options.
    pub fn manipulate(mut self, f: impl Fn(&mut ItemStack) + Send + Sync + 'static) -> Self {
        self.manipulators.push(Arc::new(f));
        self
    }

    /// Build a new stack.
    pub fn make(&self) -> ItemStack {
        let mut stack = ItemStack::with_amount(self.material.clone(), self.amount);
        for manipulator in &self.manipulators {
            manipulator(&mut stack);
        }
        if let Some(display) = &self.display {
            stack.display_name = Some(display.clone());
        }
        if let Some(name) = &self.name {
            stack.item_name = Some(name.clone());
        }
        if let Some(lore) = &self.lore {
            stack.lore = lore.clone();
        }
        if let Some(options) = &self.options {
            stack.options = options.clone();
        }
        stack
    }
}

impl fmt::Debug for ItemCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemCreator")
            .field("material", &self.material)
            .field("amount", &self.amount)
            .field("name", &self.name)
            .field("display", &self.display)
            .field("lore", &self.lore)
            .field("options", &self.options)
            .field("manipulators", &self.manipulators.len())
            .finish()
    }
}

impl From<ItemCreator> for ItemStack {
    fn from(creator: ItemCreator) -> Self {
        creator.make()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creator_applies_fields_in_order() {
        let stack = ItemCreator::of(Material::DIAMOND)
            .amount(3)
            .display("<aqua>Shiny")
            .lore(["line one", "line two"])
            .options(ItemOptions::HIDE_ALL_FLAGS.with_glow(true))
            .manipulate(|stack| stack.display_name = Some("overwritten".into()))
            .make();

        assert_eq!(stack.amount, 3);
        assert_eq!(stack.display_name.as_deref(), Some("<aqua>Shiny"));
        assert_eq!(stack.lore, vec!["line one", "line two"]);
        assert!(stack.options.glow);
        assert!(stack.options.flags.contains(ItemFlags::HIDE_ENCHANTS));
    }

    #[test]
    fn amount_is_clamped() {
        assert_eq!(ItemCreator::of(Material::STONE).amount(0).make().amount, 1);
        assert_eq!(
            ItemCreator::of(Material::STONE).amount(200).make().amount,
            MAX_STACK_SIZE
        );
    }

    #[test]
    fn similarity_ignores_amount_only() {
        let a = ItemCreator::of(Material::PAPER).display("Note").make();
        let mut b = a.clone();
        b.amount = 12;
        assert!(a.is_similar(&b));
        assert_ne!(a, b);

        b.lore.push("extra".into());
        assert!(!a.is_similar(&b));
    }

    #[test]
    fn from_stack_reproduces_and_extends() {
        let base = ItemCreator::of(Material::BOOK)
            .display("Guide")
            .lore_line("first")
            .make();
        let extended = ItemCreator::from_stack(&base).lore_line("second").make();
        assert_eq!(extended.display_name.as_deref(), Some("Guide"));
        assert_eq!(extended.lore, vec!["first", "second"]);
    }

    #[test]
    fn visible_name_falls_back_to_material() {
        let stack = ItemStack::new(Material::CLOCK);
        assert_eq!(stack.visible_name(), "clock");
        let named = ItemCreator::of(Material::CLOCK).name("Timer").make();
        assert_eq!(named.visible_name(), "Timer");
    }
}
