use serde::{Deserialize, Serialize};

/// Visual modes a chart can be styled for. Adding a theme is a code change:
/// extend this enum, [`Theme::ALL`] and [`ThemeColors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Emission order of the synthesized stylesheet blocks.
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub const fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Selector scope placed in front of the chart's attribute selector.
    /// The default theme applies at the root and has an empty prefix.
    pub const fn selector_prefix(self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => ".dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-theme colors for one series. A missing value means the series
/// declares nothing for that theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeColors {
    #[serde(default)]
    pub light: Option<String>,
    #[serde(default)]
    pub dark: Option<String>,
}

impl ThemeColors {
    pub fn new(light: impl Into<String>, dark: impl Into<String>) -> Self {
        Self {
            light: Some(light.into()),
            dark: Some(dark.into()),
        }
    }

    /// Color for `theme`, treating blank strings as absent.
    pub fn get(&self, theme: Theme) -> Option<&str> {
        let value = match theme {
            Theme::Light => self.light.as_deref(),
            Theme::Dark => self.dark.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn missing_themes(&self) -> impl Iterator<Item = Theme> + '_ {
        Theme::ALL
            .into_iter()
            .filter(move |theme| self.get(*theme).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_has_root_scope() {
        assert_eq!(Theme::Light.selector_prefix(), "");
        assert_eq!(Theme::Dark.selector_prefix(), ".dark");
    }

    #[test]
    fn theme_order_starts_with_default() {
        assert_eq!(Theme::ALL, [Theme::Light, Theme::Dark]);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn theme_names_round_trip_through_serde() {
        let parsed: Theme = serde_json::from_str(r#""dark""#).unwrap();
        assert_eq!(parsed, Theme::Dark);
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), r#""light""#);
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn theme_colors_lookup_skips_blank_values() {
        let colors = ThemeColors {
            light: Some("#111".into()),
            dark: Some("  ".into()),
        };
        assert_eq!(colors.get(Theme::Light), Some("#111"));
        assert_eq!(colors.get(Theme::Dark), None);
        assert_eq!(colors.missing_themes().collect::<Vec<_>>(), vec![Theme::Dark]);
    }

    #[test]
    fn theme_colors_reject_unknown_theme_names() {
        let err = serde_json::from_str::<ThemeColors>(r##"{"light":"#111","sepia":"#222"}"##);
        assert!(err.is_err());
    }
}
