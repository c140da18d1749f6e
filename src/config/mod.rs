use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::content::Content;
use crate::error::{is_css_ident, ChartError, ChartResult};
use crate::theme::{Theme, ThemeColors};
use crate::tooltip::TooltipPayloadItem;

type FormatterFn =
    dyn Fn(f64, &str, &TooltipPayloadItem, usize, &serde_json::Value) -> Content + Send + Sync;

/// Custom value rendering for one series. Receives
/// `(value, series_key, item, index, raw_record)`.
#[derive(Clone)]
pub struct ValueFormatter(Arc<FormatterFn>);

impl ValueFormatter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: Fn(f64, &str, &TooltipPayloadItem, usize, &serde_json::Value) -> Content
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(formatter))
    }

    pub fn format(
        &self,
        value: f64,
        series_key: &str,
        item: &TooltipPayloadItem,
        index: usize,
        raw_record: &serde_json::Value,
    ) -> Content {
        (self.0)(value, series_key, item, index, raw_record)
    }
}

impl fmt::Debug for ValueFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueFormatter(..)")
    }
}

/// Where a series gets its color from. An entry carries at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSpec {
    Static(String),
    PerTheme(ThemeColors),
}

impl ColorSpec {
    pub fn for_theme(&self, theme: Theme) -> Option<&str> {
        match self {
            ColorSpec::Static(color) => Some(color.trim()).filter(|c| !c.is_empty()),
            ColorSpec::PerTheme(colors) => colors.get(theme),
        }
    }

    /// Colors end up inside a declaration and a `<style>` element, so they
    /// may not close either.
    fn validate(&self, key: &str) -> ChartResult<()> {
        let escapes = Theme::ALL.into_iter().any(|theme| {
            self.for_theme(theme)
                .is_some_and(|color| color.contains(&COLOR_FORBIDDEN_CHARS[..]))
        });
        if escapes {
            return Err(ChartError::InvalidColor {
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

const COLOR_FORBIDDEN_CHARS: [char; 5] = [';', '{', '}', '<', '>'];

#[derive(Debug, Clone, Default)]
pub struct SeriesConfig {
    pub label: Option<Content>,
    pub icon: Option<Content>,
    pub color: Option<ColorSpec>,
    pub formatter: Option<ValueFormatter>,
}

impl SeriesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<Content>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_icon(mut self, icon: Content) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Blank colors leave the series uncolored.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        let color = color.into();
        let color = color.trim();
        self.color = (!color.is_empty()).then(|| ColorSpec::Static(color.to_string()));
        self
    }

    pub fn with_theme(mut self, colors: ThemeColors) -> Self {
        self.color = Some(ColorSpec::PerTheme(colors));
        self
    }

    pub fn with_formatter(mut self, formatter: ValueFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// True when at least one theme resolves to a non-blank color.
    pub fn is_colorable(&self) -> bool {
        Theme::ALL
            .into_iter()
            .any(|theme| self.color_for_theme(theme).is_some())
    }

    /// Color declared for `theme`, if any.
    pub fn color_for_theme(&self, theme: Theme) -> Option<&str> {
        self.color.as_ref().and_then(|spec| spec.for_theme(theme))
    }

    /// A color valid in every theme. Themed entries have none and are
    /// painted through their CSS variable instead.
    pub fn static_color(&self) -> Option<&str> {
        match &self.color {
            Some(spec @ ColorSpec::Static(_)) => spec.for_theme(Theme::default()),
            _ => None,
        }
    }
}

/// Mirror of the JSON shape, converted into [`SeriesConfig`] once the key is known.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawSeriesConfig {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    theme: Option<ThemeColors>,
}

impl RawSeriesConfig {
    fn into_series(self, key: &str) -> ChartResult<SeriesConfig> {
        let color = self.color.filter(|c| !c.trim().is_empty());
        let color = match (color, self.theme) {
            (Some(_), Some(_)) => {
                return Err(ChartError::ConflictingColor {
                    key: key.to_string(),
                })
            }
            (Some(color), None) => Some(ColorSpec::Static(color.trim().to_string())),
            (None, Some(colors)) => {
                for theme in colors.missing_themes() {
                    tracing::debug!(key = %key, theme = %theme, "series has no color for theme");
                }
                Some(ColorSpec::PerTheme(colors))
            }
            (None, None) => None,
        };

        Ok(SeriesConfig {
            label: self.label.map(Content::Text),
            icon: self.icon.filter(|i| !i.is_empty()).map(Content::Icon),
            color,
            formatter: None,
        })
    }
}

/// Series key to visual metadata, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ChartConfig {
    series: IndexMap<String, SeriesConfig>,
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(serialized: &str) -> ChartResult<Self> {
        let raw: IndexMap<String, RawSeriesConfig> = serde_json::from_str(serialized)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: IndexMap<String, RawSeriesConfig>) -> ChartResult<Self> {
        let mut config = Self::new();
        for (key, entry) in raw {
            let series = entry.into_series(&key)?;
            config.insert(key, series)?;
        }
        tracing::debug!(series = config.len(), "loaded chart config");
        Ok(config)
    }

    pub fn from_entries<K, I>(entries: I) -> ChartResult<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SeriesConfig)>,
    {
        let mut config = Self::new();
        for (key, series) in entries {
            config.insert(key, series)?;
        }
        Ok(config)
    }

    /// Adds or replaces a series. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, series: SeriesConfig) -> ChartResult<()> {
        let key = key.into();
        if !is_css_ident(&key) {
            return Err(ChartError::InvalidSeriesKey { key });
        }
        if let Some(color) = &series.color {
            color.validate(&key)?;
        }
        self.series.insert(key, series);
        Ok(())
    }

    pub fn resolve(&self, key: &str) -> Option<&SeriesConfig> {
        self.series.get(key)
    }

    /// Entries with a usable color in at least one theme, in declaration order.
    pub fn colorable_entries(&self) -> impl Iterator<Item = (&str, &SeriesConfig)> + '_ {
        self.iter().filter(|(_, series)| series.is_colorable())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SeriesConfig)> + '_ {
        self.series.iter().map(|(key, series)| (key.as_str(), series))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl<'de> Deserialize<'de> for ChartConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, RawSeriesConfig>::deserialize(deserializer)?;
        Self::from_raw(raw).map_err(serde::de::Error::custom)
    }
}

/// Looks up `key`; an undeclared series is a normal condition.
pub fn resolve<'a>(config: &'a ChartConfig, key: &str) -> Option<&'a SeriesConfig> {
    config.resolve(key)
}

pub fn colorable_entries(config: &ChartConfig) -> impl Iterator<Item = (&str, &SeriesConfig)> + '_ {
    config.colorable_entries()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_none_for_undeclared_series() {
        let config = ChartConfig::from_json(r##"{"sales":{"label":"Sales"}}"##).unwrap();
        assert!(resolve(&config, "sales").is_some());
        assert!(resolve(&config, "visits").is_none());
    }

    #[test]
    fn from_json_builds_static_and_themed_specs() {
        let config = ChartConfig::from_json(
            r##"{
                "sales": { "label": "Sales", "color": "#2563eb" },
                "visits": { "theme": { "light": "#111", "dark": "#eee" } },
                "other": { "label": "Other", "icon": "circle" }
            }"##,
        )
        .unwrap();

        let sales = config.resolve("sales").unwrap();
        assert_eq!(sales.color, Some(ColorSpec::Static("#2563eb".into())));
        assert_eq!(sales.label, Some(Content::text("Sales")));

        let visits = config.resolve("visits").unwrap();
        assert_eq!(visits.color_for_theme(Theme::Light), Some("#111"));
        assert_eq!(visits.color_for_theme(Theme::Dark), Some("#eee"));
        assert_eq!(visits.static_color(), None);

        let other = config.resolve("other").unwrap();
        assert!(other.color.is_none());
        assert_eq!(other.icon, Some(Content::icon("circle")));
    }

    #[test]
    fn from_json_rejects_color_and_theme_together() {
        let err = ChartConfig::from_json(
            r##"{"sales":{"color":"#000","theme":{"light":"#111","dark":"#eee"}}}"##,
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::ConflictingColor { key } if key == "sales"));
    }

    #[test]
    fn from_json_rejects_keys_unusable_as_css_names() {
        let err = ChartConfig::from_json(r##"{"page views":{"color":"#000"}}"##).unwrap_err();
        assert!(matches!(err, ChartError::InvalidSeriesKey { key } if key == "page views"));
    }

    #[test]
    fn from_json_surfaces_malformed_payload_as_parse_error() {
        let err = ChartConfig::from_json("{ invalid ").unwrap_err();
        assert!(matches!(err, ChartError::ParseConfig(_)));
    }

    #[test]
    fn blank_static_color_is_treated_as_absent() {
        let config = ChartConfig::from_json(r##"{"sales":{"color":"  "}}"##).unwrap();
        assert!(!config.resolve("sales").unwrap().is_colorable());
        assert_eq!(config.colorable_entries().count(), 0);
    }

    #[test]
    fn colorable_entries_keep_declaration_order() {
        let config = ChartConfig::from_json(
            r##"{
                "zeta": { "color": "#000" },
                "plain": { "label": "Plain" },
                "alpha": { "theme": { "light": "#111", "dark": "#eee" } }
            }"##,
        )
        .unwrap();

        let keys: Vec<&str> = colorable_entries(&config).map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn blank_builder_color_is_not_colorable() {
        let config = ChartConfig::from_entries([
            ("sales", SeriesConfig::new().with_color("")),
            ("visits", SeriesConfig::new().with_color("   ")),
            (
                "orders",
                SeriesConfig::new().with_theme(ThemeColors {
                    light: Some(" ".into()),
                    dark: None,
                }),
            ),
        ])
        .unwrap();

        assert!(config.resolve("sales").unwrap().color.is_none());
        assert!(!config.resolve("orders").unwrap().is_colorable());
        assert_eq!(config.colorable_entries().count(), 0);
    }

    #[test]
    fn colors_that_close_the_declaration_are_rejected() {
        let err = ChartConfig::from_entries([(
            "sales",
            SeriesConfig::new().with_color("red;}</style><script>alert(1)</script><style>"),
        )])
        .unwrap_err();
        assert!(matches!(err, ChartError::InvalidColor { key } if key == "sales"));

        let err = ChartConfig::from_json(
            r##"{"visits":{"theme":{"light":"#111","dark":"#eee}"}}}"##,
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::InvalidColor { key } if key == "visits"));
    }

    #[test]
    fn css_color_functions_are_accepted() {
        let config = ChartConfig::from_entries([(
            "sales",
            SeriesConfig::new().with_color("hsl(var(--chart-1) / 0.8)"),
        )])
        .unwrap();
        assert_eq!(
            config.resolve("sales").unwrap().static_color(),
            Some("hsl(var(--chart-1) / 0.8)")
        );
    }

    #[test]
    fn insert_replaces_entry_in_place() {
        let mut config = ChartConfig::from_entries([
            ("a", SeriesConfig::new().with_color("#000")),
            ("b", SeriesConfig::new().with_color("#111")),
        ])
        .unwrap();
        config
            .insert("a", SeriesConfig::new().with_color("#222"))
            .unwrap();

        let entries: Vec<(&str, Option<&str>)> = config
            .iter()
            .map(|(key, series)| (key, series.static_color()))
            .collect();
        assert_eq!(entries, vec![("a", Some("#222")), ("b", Some("#111"))]);
    }

    #[test]
    fn chart_config_deserializes_inside_larger_documents() {
        #[derive(Deserialize)]
        struct Dashboard {
            chart: ChartConfig,
        }

        let dashboard: Dashboard =
            serde_json::from_str(r##"{"chart":{"sales":{"color":"#2563eb"}}}"##).unwrap();
        assert_eq!(dashboard.chart.len(), 1);

        let err = serde_json::from_str::<Dashboard>(
            r##"{"chart":{"sales":{"color":"#000","theme":{"light":"#111"}}}}"##,
        );
        assert!(err.is_err());
    }

    #[test]
    fn formatter_is_attached_programmatically() {
        let series = SeriesConfig::new()
            .with_label("Sales")
            .with_formatter(ValueFormatter::new(|value, key, _, _, _| {
                Content::text(format!("{key}={value}"))
            }));
        let formatter = series.formatter.expect("formatter should be set");
        let item = TooltipPayloadItem::new("sales", Some(3.0));
        assert_eq!(
            formatter.format(3.0, "sales", &item, 0, &serde_json::Value::Null),
            Content::text("sales=3")
        );
    }
}
