//! Declarative styling configuration consumed by the stylesheet build step.

use indexmap::IndexMap;
use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use serde_with::{DeserializeAs, SerializeAs, serde_as};

/// Root class that switches the stylesheet to its dark variant.
pub const DARK_CLASS: &str = "dark";

/// How the stylesheet decides to render its dark variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    /// Follow the system color-scheme media query.
    Media,
    /// Follow the presence of [`DARK_CLASS`] on the document root.
    Class,
}

/// Serializes an sRGB color as `#rrggbb`.
pub struct HexColor;

impl SerializeAs<Srgb<u8>> for HexColor {
    fn serialize_as<S>(source: &Srgb<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&format_args!("#{source:x}"))
    }
}

impl<'de> DeserializeAs<'de, Srgb<u8>> for HexColor {
    fn deserialize_as<D>(deserializer: D) -> Result<Srgb<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Srgb<u8>>()
            .map_err(|err| D::Error::custom(format!("invalid color `{raw}`: {err}")))
    }
}

/// Additions on top of the stylesheet's default theme.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeExtension {
    /// Named brand colors.
    #[serde_as(as = "IndexMap<_, HexColor>")]
    pub colors: IndexMap<String, Srgb<u8>>,
    /// Extra spacing tokens (token → CSS length).
    pub spacing: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSection {
    pub extend: ThemeExtension,
}

/// Full styling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylingConfig {
    /// Globs of the sources scanned for class names.
    pub content: Vec<String>,
    pub dark_mode: DarkMode,
    pub theme: ThemeSection,
    pub plugins: Vec<String>,
}

impl StylingConfig {
    /// Look up a brand color by name.
    pub fn color(&self, name: &str) -> Option<Srgb<u8>> {
        self.theme.extend.colors.get(name).copied()
    }

    /// Class the theme store must toggle, when dark mode is class driven.
    pub fn dark_class(&self) -> Option<&'static str> {
        match self.dark_mode {
            DarkMode::Class => Some(DARK_CLASS),
            DarkMode::Media => None,
        }
    }

    /// Render the configuration as the JSON document the build step reads.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for StylingConfig {
    fn default() -> Self {
        let colors = IndexMap::from([
            ("ultimate-blue".to_owned(), Srgb::new(0x1e, 0x40, 0xaf)),
            ("ultimate-green".to_owned(), Srgb::new(0x15, 0x80, 0x3d)),
            ("ultimate-red".to_owned(), Srgb::new(0xdc, 0x26, 0x26)),
        ]);
        let spacing = IndexMap::from([("128".to_owned(), "32rem".to_owned())]);

        Self {
            content: vec![
                "./index.html".to_owned(),
                "./src/**/*.{svelte,js,ts,jsx,tsx}".to_owned(),
            ],
            dark_mode: DarkMode::Class,
            theme: ThemeSection {
                extend: ThemeExtension { colors, spacing },
            },
            plugins: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config_serializes_to_build_shape() {
        let value = serde_json::to_value(StylingConfig::default()).unwrap();

        assert_eq!(
            value,
            json!({
                "content": ["./index.html", "./src/**/*.{svelte,js,ts,jsx,tsx}"],
                "darkMode": "class",
                "theme": {
                    "extend": {
                        "colors": {
                            "ultimate-blue": "#1e40af",
                            "ultimate-green": "#15803d",
                            "ultimate-red": "#dc2626",
                        },
                        "spacing": { "128": "32rem" },
                    },
                },
                "plugins": [],
            })
        );
    }

    #[test]
    fn dark_mode_is_class_driven() {
        let config = StylingConfig::default();
        assert_eq!(config.dark_class(), Some(DARK_CLASS));
        assert_eq!(config.color("ultimate-red"), Some(Srgb::new(0xdc, 0x26, 0x26)));
        assert_eq!(config.color("ultimate-pink"), None);
    }

    #[test]
    fn parses_colors_with_and_without_hash() {
        let config: StylingConfig = serde_json::from_value(json!({
            "content": [],
            "darkMode": "media",
            "theme": { "extend": {
                "colors": { "a": "#1E40AF", "b": "15803d" },
                "spacing": {},
            }},
            "plugins": [],
        }))
        .unwrap();

        assert_eq!(config.dark_class(), None);
        assert_eq!(config.color("a"), Some(Srgb::new(0x1e, 0x40, 0xaf)));
        assert_eq!(config.color("b"), Some(Srgb::new(0x15, 0x80, 0x3d)));
    }

    #[test]
    fn rejects_malformed_color() {
        let result = serde_json::from_value::<StylingConfig>(json!({
            "content": [],
            "darkMode": "class",
            "theme": { "extend": { "colors": { "a": "blue" }, "spacing": {} }},
            "plugins": [],
        }));
        assert!(result.is_err());
    }
}
