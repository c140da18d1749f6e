use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{ChartConfig, SeriesConfig};
use crate::error::{is_css_ident, ChartError, ChartResult};
use crate::theme::Theme;

const CHART_ID_PREFIX: &str = "chart-";

/// Attribute value identifying one mounted chart (`data-chart="<id>"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartId(String);

impl ChartId {
    /// `chart-<id>` for an explicit id, otherwise a process-unique token.
    pub fn new(explicit: Option<&str>) -> ChartResult<Self> {
        match explicit.filter(|id| !id.is_empty()) {
            Some(id) => Self::explicit(id),
            None => Ok(Self::generated()),
        }
    }

    pub fn explicit(id: &str) -> ChartResult<Self> {
        if !is_css_ident(id) {
            return Err(ChartError::InvalidChartId { id: id.to_string() });
        }
        Ok(Self(format!("{CHART_ID_PREFIX}{id}")))
    }

    pub fn generated() -> Self {
        static NEXT_TOKEN: AtomicU64 = AtomicU64::new(0);
        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        Self(format!("{CHART_ID_PREFIX}r{token}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Synthesized stylesheet for one chart container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartStyle {
    css: String,
}

impl ChartStyle {
    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn to_style_element(&self) -> String {
        format!("<style>\n{}</style>", self.css)
    }
}

/// Color for one `(theme, series)` pair: the theme map entry, then the
/// static color. `None` means the declaration is omitted.
pub fn resolve_series_color(series: &SeriesConfig, theme: Theme) -> Option<&str> {
    series
        .color_for_theme(theme)
        .or_else(|| series.static_color())
        .map(str::trim)
        .filter(|color| !color.is_empty())
}

pub fn css_variable_name(series_key: &str) -> String {
    format!("--color-{series_key}")
}

/// `var(--color-<key>)`, the reference tooltips use for themed colors.
pub fn css_variable_ref(series_key: &str) -> String {
    format!("var({})", css_variable_name(series_key))
}

fn theme_selector(theme: Theme, chart_id: &ChartId) -> String {
    let prefix = theme.selector_prefix();
    if prefix.is_empty() {
        format!("[data-chart={chart_id}]")
    } else {
        format!("{prefix} [data-chart={chart_id}]")
    }
}

/// One block per theme scoping a `--color-<key>` property per colorable
/// series. Returns `None` when no series declares any color.
pub fn synthesize(chart_id: &ChartId, config: &ChartConfig) -> Option<ChartStyle> {
    let colorable: Vec<(&str, &SeriesConfig)> = config.colorable_entries().collect();
    if colorable.is_empty() {
        tracing::debug!(chart = %chart_id, "no colorable series; skipping stylesheet");
        return None;
    }

    let blocks: Vec<String> = Theme::ALL
        .into_iter()
        .map(|theme| {
            let mut block = theme_selector(theme, chart_id);
            block.push_str(" {\n");
            for (key, series) in &colorable {
                match resolve_series_color(series, theme) {
                    Some(color) => {
                        let _ = writeln!(block, "  {}: {color};", css_variable_name(key));
                    }
                    None => {
                        tracing::debug!(chart = %chart_id, key = %key, theme = %theme, "omitting declaration without color");
                    }
                }
            }
            block.push_str("}\n");
            block
        })
        .collect();

    Some(ChartStyle {
        css: blocks.join("\n"),
    })
}
