//! Label categories and their display colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AnnoboxError;

/// An RGBA display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        let nibble = |idx: usize| byte(idx..idx + 1).map(|v| v * 17);

        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Some(Self::rgb(byte(0..2)?, byte(2..4)?, byte(4..6)?)),
            8 => Some(Self::rgba(byte(0..2)?, byte(2..4)?, byte(4..6)?, byte(6..8)?)),
            _ => None,
        }
    }

    fn parse_functional(raw: &str) -> Option<Self> {
        let (name, rest) = raw.split_once('(')?;
        let args = rest.strip_suffix(')')?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();

        let channel = |s: &str| s.parse::<u8>().ok();
        match (name.trim().to_ascii_lowercase().as_str(), parts.as_slice()) {
            ("rgb", &[r, g, b]) => Some(Self::rgb(channel(r)?, channel(g)?, channel(b)?)),
            ("rgba", &[r, g, b, a]) => {
                let alpha = a.parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a))?;
                Some(Self::rgba(
                    channel(r)?,
                    channel(g)?,
                    channel(b)?,
                    (alpha * 255.0).round() as u8,
                ))
            }
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0, 0, 0)
    }
}

/// Formats as `#rrggbbaa`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
/// `rgba(r, g, b, a)` with `a` in `0..=1`.
impl FromStr for Color {
    type Err = AnnoboxError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(hex) => Self::parse_hex(hex),
            None => Self::parse_functional(trimmed),
        };
        parsed.ok_or_else(|| AnnoboxError::InvalidColor(raw.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A label category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique, non-empty, already trimmed.
    pub name: String,
    pub color: Color,
}

/// The ordered set of label categories.
///
/// A category's export index is its position in insertion order. Removing a
/// category shifts every later index down by one, so indices are looked up
/// on demand and never cached.
#[derive(Clone, Debug, Default)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a category.
    ///
    /// The name is trimmed first. Fails with `InvalidName` if nothing is left,
    /// or `DuplicateCategory` if the trimmed name is already registered
    /// (case-sensitive).
    pub fn add(&mut self, name: &str, color: Color) -> Result<&Category, AnnoboxError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AnnoboxError::InvalidName);
        }
        if self.contains(name) {
            return Err(AnnoboxError::DuplicateCategory(name.to_string()));
        }

        self.categories.push(Category {
            name: name.to_string(),
            color,
        });
        Ok(&self.categories[self.categories.len() - 1])
    }

    /// Removes a category and returns it.
    ///
    /// Boxes that reference it are not touched here; the session cascades
    /// the removal into its [`AnnotationStore`](super::AnnotationStore).
    pub fn remove(&mut self, name: &str) -> Result<Category, AnnoboxError> {
        let index = self
            .index_of(name)
            .ok_or_else(|| AnnoboxError::UnknownCategory(name.to_string()))?;
        Ok(self.categories.remove(index))
    }

    /// Current 0-based position of `name`. O(n).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Snapshot of the category names in registry order.
    pub fn list(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> CategoryRegistry {
        let mut registry = CategoryRegistry::new();
        for name in names {
            registry.add(name, Color::default()).expect("add category");
        }
        registry
    }

    #[test]
    fn add_rejects_duplicates_and_blank_names() {
        let mut reg = registry(&["dog"]);

        assert!(matches!(
            reg.add("dog", Color::default()),
            Err(AnnoboxError::DuplicateCategory(name)) if name == "dog"
        ));
        assert!(matches!(
            reg.add("  dog ", Color::default()),
            Err(AnnoboxError::DuplicateCategory(_))
        ));
        assert!(matches!(
            reg.add("   ", Color::default()),
            Err(AnnoboxError::InvalidName)
        ));
        assert!(reg.add("Dog", Color::default()).is_ok());
        assert_eq!(reg.list(), vec!["dog", "Dog"]);
    }

    #[test]
    fn indices_shift_after_removal() {
        let mut reg = registry(&["A", "B", "C"]);
        assert_eq!(reg.index_of("C"), Some(2));

        reg.remove("B").expect("remove B");
        assert_eq!(reg.index_of("A"), Some(0));
        assert_eq!(reg.index_of("C"), Some(1));
        assert_eq!(reg.index_of("B"), None);
    }

    #[test]
    fn remove_unknown_fails_without_mutation() {
        let mut reg = registry(&["A"]);
        assert!(matches!(
            reg.remove("Z"),
            Err(AnnoboxError::UnknownCategory(name)) if name == "Z"
        ));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn list_is_a_snapshot() {
        let mut reg = registry(&["A", "B"]);
        let snapshot = reg.list();
        reg.remove("A").expect("remove A");
        reg.add("C", Color::default()).expect("add C");
        assert_eq!(snapshot, vec!["A", "B"]);
        assert_eq!(reg.list(), vec!["B", "C"]);
    }

    #[test]
    fn color_parses_hex_and_functional_forms() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("#f80".parse::<Color>().unwrap(), Color::rgb(255, 136, 0));
        assert_eq!(
            "#ff800080".parse::<Color>().unwrap(),
            Color::rgba(255, 128, 0, 128)
        );
        assert_eq!(
            "rgb(1, 2, 3)".parse::<Color>().unwrap(),
            Color::rgb(1, 2, 3)
        );
        assert_eq!(
            "rgba(10,20,30,0.5)".parse::<Color>().unwrap(),
            Color::rgba(10, 20, 30, 128)
        );
    }

    #[test]
    fn color_rejects_garbage() {
        for raw in ["", "#12", "#gggggg", "rgb(1,2)", "rgba(1,2,3,4)", "red", "#ééé"] {
            assert!(
                matches!(raw.parse::<Color>(), Err(AnnoboxError::InvalidColor(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn color_serializes_as_hex() {
        let json = serde_json::to_string(&Color::rgb(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#ff0010ff\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(255, 0, 16));
    }
}
