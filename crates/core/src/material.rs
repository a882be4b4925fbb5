//! Namespaced material keys.
//!
//! Materials identify what an item is (`minecraft:arrow`). The host maps them
//! onto its own item registry; this crate only validates and compares them.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Error returned when parsing an invalid [`Material`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterialError {
    /// The input was blank.
    #[error("material key cannot be empty")]
    Empty,
    /// The namespace part is empty, too long, or has characters outside `a-z0-9_.-`.
    #[error("invalid material namespace `{0}` (allowed: a-z0-9_.-, max 64)")]
    Namespace(String),
    /// The path part is empty, too long, or has characters outside `a-z0-9_./-`.
    #[error("invalid material path `{0}` (allowed: a-z0-9_./-, max 128)")]
    Path(String),
}

/// A namespaced material key of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Material {
    namespace: Cow<'static, str>,
    path: Cow<'static, str>,
}

macro_rules! vanilla {
    ($($(#[$doc:meta])* $name:ident => $path:literal,)*) => {
        $(
            $(#[$doc])*
            pub const $name: Material = Material::vanilla($path);
        )*
    };
}

impl Material {
    vanilla! {
        /// Empty slot marker.
        AIR => "air",
        /// Page navigation arrows.
        ARROW => "arrow",
        /// Close button.
        BARRIER => "barrier",
        /// Info button.
        NETHER_STAR => "nether_star",
        /// Page counter.
        NAME_TAG => "name_tag",
        /// Return button.
        SPECTRAL_ARROW => "spectral_arrow",
        /// Common filler pane.
        GRAY_STAINED_GLASS_PANE => "gray_stained_glass_pane",
        /// Common border pane.
        BLACK_STAINED_GLASS_PANE => "black_stained_glass_pane",
        /// Used by list menus for unused slots.
        LIGHT_GRAY_STAINED_GLASS_PANE => "light_gray_stained_glass_pane",
        /// Command-style buttons.
        COMMAND_BLOCK => "command_block",
        /// Written content.
        PAPER => "paper",
        /// Generic book item.
        BOOK => "book",
        /// A simple block.
        STONE => "stone",
        /// A simple block.
        DIAMOND => "diamond",
        /// Toggle display, on.
        LIME_DYE => "lime_dye",
        /// Toggle display, off.
        GRAY_DYE => "gray_dye",
        /// Clock used for timed displays.
        CLOCK => "clock",
    }

    const fn vanilla(path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(DEFAULT_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }

    /// Parse a material key.
    ///
    /// Accepts either `namespace:path` or a bare `path` (uses [`DEFAULT_NAMESPACE`]).
    pub fn parse(input: &str) -> Result<Self, MaterialError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(MaterialError::Empty);
        }

        let (namespace, path) = input.split_once(':').unwrap_or((DEFAULT_NAMESPACE, input));
        let namespace = namespace.trim();
        let path = path.trim();

        validate_namespace(namespace)?;
        validate_path(path)?;

        Ok(Self {
            namespace: Cow::Owned(namespace.to_string()),
            path: Cow::Owned(path.to_string()),
        })
    }

    /// Material namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Material path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether this is the empty-slot material.
    pub fn is_air(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE && matches!(&*self.path, "air" | "cave_air" | "void_air")
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Material {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Material {
    type Error = MaterialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Material> for String {
    fn from(value: Material) -> Self {
        value.to_string()
    }
}

fn validate_namespace(ns: &str) -> Result<(), MaterialError> {
    let valid = !ns.is_empty()
        && ns.len() <= 64
        && ns
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(MaterialError::Namespace(ns.to_string()))
    }
}

fn validate_path(path: &str) -> Result<(), MaterialError> {
    let valid = !path.is_empty()
        && path.len() <= 128
        && path
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'));
    if valid {
        Ok(())
    } else {
        Err(MaterialError::Path(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_key() {
        let key = Material::parse("mod:ruby_block").unwrap();
        assert_eq!(key.namespace(), "mod");
        assert_eq!(key.path(), "ruby_block");
        assert_eq!(key.to_string(), "mod:ruby_block");
    }

    #[test]
    fn bare_path_uses_default_namespace_and_matches_constants() {
        let key = Material::parse("barrier").unwrap();
        assert_eq!(key, Material::BARRIER);
        assert_eq!(key.to_string(), "minecraft:barrier");
    }

    #[test]
    fn air_variants_are_air() {
        assert!(Material::AIR.is_air());
        assert!(Material::parse("cave_air").unwrap().is_air());
        assert!(!Material::STONE.is_air());
        assert!(!Material::parse("stair").unwrap().is_air());
        assert!(!Material::parse("mod:air").unwrap().is_air());
    }

    #[test]
    fn rejects_invalid_keys() {
        assert_eq!(Material::parse("  "), Err(MaterialError::Empty));
        assert!(matches!(
            Material::parse("Mod:stone"),
            Err(MaterialError::Namespace(_))
        ));
        assert!(matches!(
            Material::parse("minecraft:Stone"),
            Err(MaterialError::Path(_))
        ));
        assert!(Material::parse("minecraft:").is_err());
        assert!(Material::parse(":stone").is_err());
    }
}
