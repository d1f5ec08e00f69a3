//! Theme model and property lookup.
//!
//! A theme is a named bundle of style values: a fixed set of semantic fields
//! (color scheme, fonts, wallpaper, icon/cursor/GTK/desktop-shell themes), a
//! free-form property map for everything a config tree invents on top, and
//! theme-scoped activation commands.
//!
//! Free-form keys are normalized once at every boundary — [`normalize_key`]
//! lower-cases and strips `-`, `_`, and spaces — so `accent-color`,
//! `accent_color`, and `accentColor` all address the same property.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::ActivationCommand;

/// A selectable theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    /// Unique theme name, used for selection and theme-file matching.
    pub name: String,
    /// Color-scheme identifier, the secondary theme-file match key.
    pub color_scheme: String,
    /// Directory holding this theme's wallpapers.
    pub wallpaper_dir: String,
    /// Font family name.
    pub font_family: String,
    /// Font size (kept as text; consumers format it into their own configs).
    pub font_size: String,
    /// Icon theme identifier.
    pub icon_theme: String,
    /// Cursor theme identifier.
    pub cursor_theme: String,
    /// GTK theme identifier.
    pub gtk_theme: String,
    /// Desktop-shell (COSMIC) theme identifier.
    pub cosmic_theme: String,
    /// Free-form properties, preserved in declaration order.
    pub properties: IndexMap<String, String>,
    /// Theme-scoped activation commands, run after the global ones.
    pub commands: Vec<ActivationCommand>,
}

impl Theme {
    /// The property map handed to template rendering.
    ///
    /// Fixed semantic fields appear under their camelCase names and are
    /// always present (empty string when blank), so templates referencing
    /// them degrade to empty output instead of failing. Free-form properties
    /// are overlaid under their normalized keys; referencing any key outside
    /// this set is a render error.
    #[must_use]
    pub fn template_properties(&self) -> IndexMap<String, String> {
        let mut map = empty_template_properties();
        map.insert("name".to_string(), self.name.clone());
        map.insert("colorScheme".to_string(), self.color_scheme.clone());
        map.insert("wallpaperDir".to_string(), self.wallpaper_dir.clone());
        map.insert("fontFamily".to_string(), self.font_family.clone());
        map.insert("fontSize".to_string(), self.font_size.clone());
        map.insert("iconTheme".to_string(), self.icon_theme.clone());
        map.insert("cursorTheme".to_string(), self.cursor_theme.clone());
        map.insert("gtkTheme".to_string(), self.gtk_theme.clone());
        map.insert("cosmicTheme".to_string(), self.cosmic_theme.clone());
        for (key, value) in &self.properties {
            map.insert(normalize_key(key), value.clone());
        }
        map
    }

    /// Look up a theme value by normalized key: the fixed semantic fields
    /// first, then the free-form properties.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        let key = normalize_key(key);
        let fixed = match key.as_str() {
            "name" => Some(&self.name),
            "colorscheme" => Some(&self.color_scheme),
            "wallpaperdir" => Some(&self.wallpaper_dir),
            "fontfamily" => Some(&self.font_family),
            "fontsize" => Some(&self.font_size),
            "icontheme" => Some(&self.icon_theme),
            "cursortheme" => Some(&self.cursor_theme),
            "gtktheme" => Some(&self.gtk_theme),
            "cosmictheme" => Some(&self.cosmic_theme),
            _ => None,
        };
        if let Some(value) = fixed {
            return Some(value.clone());
        }
        self.properties
            .iter()
            .find(|(k, _)| normalize_key(k) == key)
            .map(|(_, v)| v.clone())
    }
}

/// The template property map when no theme is active: the fixed semantic
/// keys, all empty.
#[must_use]
pub fn empty_template_properties() -> IndexMap<String, String> {
    [
        "name",
        "colorScheme",
        "wallpaperDir",
        "fontFamily",
        "fontSize",
        "iconTheme",
        "cursorTheme",
        "gtkTheme",
        "cosmicTheme",
    ]
    .into_iter()
    .map(|k| (k.to_string(), String::new()))
    .collect()
}

/// Canonical form of a free-form property key: lower-case with `-`, `_`, and
/// spaces stripped. Applied at insertion and lookup time, never stored.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
