use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::config::{ChartConfig, SeriesConfig};
use crate::content::{display_value, format_number, Content};
use crate::error::ChartResult;
use crate::style::css_variable_ref;

mod markup;

/// Dot indicator edge length in pixels.
pub const INDICATOR_SIZE_PX: u16 = 10;

/// One data point under the cursor, as reported by the charting engine.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TooltipPayloadItem {
    #[serde(
        default,
        rename = "name",
        alias = "seriesKey",
        deserialize_with = "lenient_key"
    )]
    pub series_key: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default, rename = "payload", alias = "rawRecord")]
    pub raw_record: serde_json::Value,
}

impl TooltipPayloadItem {
    pub fn new(series_key: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            series_key: series_key.into(),
            value,
            raw_record: serde_json::Value::Null,
        }
    }

    pub fn with_raw_record(mut self, raw_record: serde_json::Value) -> Self {
        self.raw_record = raw_record;
        self
    }
}

/// Strings pass through, numbers are stringified; anything else leaves the
/// item keyless so the renderer skips it.
fn lenient_key<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(key)) => key,
        Some(serde_json::Value::Number(number)) => number.to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => {
            tracing::warn!(name = %other, "dropping non-scalar tooltip series name");
            String::new()
        }
    })
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Engines report numbers, numeric strings, or nothing; anything else is dropped.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => {
            let parsed = text.trim().parse::<f64>().ok();
            if parsed.is_none() {
                tracing::warn!(value = %text, "dropping non-numeric tooltip value");
            }
            parsed
        }
        Some(serde_json::Value::Null) | None => None,
        Some(other) => {
            tracing::warn!(value = %other, "dropping non-numeric tooltip value");
            None
        }
    })
}

/// Per-frame notification describing what is under the cursor.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TooltipEvent {
    #[serde(default)]
    pub active: bool,
    /// `None` when the engine sent no label; an explicit `null` is kept.
    #[serde(default, deserialize_with = "present_value")]
    pub label: Option<serde_json::Value>,
    #[serde(default)]
    pub payload: Option<Vec<Option<TooltipPayloadItem>>>,
}

impl TooltipEvent {
    pub fn from_json(serialized: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(serialized)?)
    }

    pub fn active(label: Option<serde_json::Value>, items: Vec<TooltipPayloadItem>) -> Self {
        Self {
            active: true,
            label,
            payload: Some(items.into_iter().map(Some).collect()),
        }
    }

    fn has_payload(&self) -> bool {
        self.payload.as_ref().is_some_and(|items| !items.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum IndicatorStyle {
    #[default]
    Dot,
}

#[derive(Clone)]
pub struct LabelFormatter(Arc<dyn Fn(&serde_json::Value) -> Content + Send + Sync>);

impl LabelFormatter {
    pub fn new<F>(formatter: F) -> Self
    where
        F: Fn(&serde_json::Value) -> Content + Send + Sync + 'static,
    {
        Self(Arc::new(formatter))
    }

    pub fn format(&self, label: &serde_json::Value) -> Content {
        (self.0)(label)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TooltipOptions {
    pub indicator: IndicatorStyle,
    #[serde(alias = "hideLabel")]
    pub hide_label: bool,
    #[serde(alias = "hideIndicator")]
    pub hide_indicator: bool,
    #[serde(skip)]
    pub label_formatter: Option<LabelFormatter>,
}

impl TooltipOptions {
    pub fn from_json(serialized: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(serialized)?)
    }

    pub fn with_label_formatter(mut self, formatter: LabelFormatter) -> Self {
        self.label_formatter = Some(formatter);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub style: IndicatorStyle,
    /// A literal color or a `var(--color-<key>)` reference.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowBody {
    /// Output of the series formatter, shown as the whole row.
    Custom(Content),
    Standard {
        indicator: Option<Indicator>,
        value: Content,
        label: Content,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub series_key: String,
    pub body: RowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTooltip {
    pub label: Option<Content>,
    pub rows: Vec<TooltipRow>,
}

impl RenderedTooltip {
    pub fn to_html(&self) -> String {
        markup::render_html(self)
    }
}

/// Builds tooltip content for one engine event. Returns `None` when the
/// cursor is not over plotted data.
pub fn render(
    event: &TooltipEvent,
    config: &ChartConfig,
    options: &TooltipOptions,
) -> Option<RenderedTooltip> {
    if !event.active || !event.has_payload() {
        tracing::trace!(active = event.active, "tooltip inactive or empty");
        return None;
    }

    let label = if options.hide_label {
        None
    } else {
        displayed_label(event.label.as_ref(), options.label_formatter.as_ref())
    };

    let rows = event
        .payload
        .iter()
        .flatten()
        .enumerate()
        .filter_map(|(index, item)| {
            let Some(item) = item else {
                tracing::debug!(index, "skipping empty payload slot");
                return None;
            };
            if item.series_key.is_empty() {
                tracing::warn!(index, "skipping payload item without a series key");
                return None;
            }
            Some(render_row(item, index, config.resolve(&item.series_key), options))
        })
        .collect();

    Some(RenderedTooltip { label, rows })
}

fn render_row(
    item: &TooltipPayloadItem,
    index: usize,
    series: Option<&SeriesConfig>,
    options: &TooltipOptions,
) -> TooltipRow {
    if series.is_none() {
        tracing::debug!(key = %item.series_key, "series not declared; using raw key");
    }

    let body = match custom_content(series, item, index) {
        Some(content) => RowBody::Custom(content),
        None => RowBody::Standard {
            indicator: (!options.hide_indicator).then(|| Indicator {
                style: options.indicator,
                color: indicator_color(series, &item.series_key),
            }),
            value: row_value(series, item),
            label: row_label(series, &item.series_key),
        },
    };

    TooltipRow {
        series_key: item.series_key.clone(),
        body,
    }
}

/// Formatted shared label, or the raw one when no formatter is set. An
/// explicit `null` still reaches the formatter but is not shown raw.
pub fn displayed_label(
    label: Option<&serde_json::Value>,
    formatter: Option<&LabelFormatter>,
) -> Option<Content> {
    let label = label?;
    match formatter {
        Some(formatter) => Some(formatter.format(label)),
        None if label.is_null() => None,
        None => Some(Content::Text(display_value(label))),
    }
}

/// Formatter output; needs both a formatter and a value.
pub fn custom_content(
    series: Option<&SeriesConfig>,
    item: &TooltipPayloadItem,
    index: usize,
) -> Option<Content> {
    let formatter = series?.formatter.as_ref()?;
    let value = item.value?;
    Some(formatter.format(value, &item.series_key, item, index, &item.raw_record))
}

/// Static color, then the synthesized CSS variable.
pub fn indicator_color(series: Option<&SeriesConfig>, series_key: &str) -> String {
    series
        .and_then(SeriesConfig::static_color)
        .map(str::to_string)
        .unwrap_or_else(|| css_variable_ref(series_key))
}

/// Icon, then the literal value.
pub fn row_value(series: Option<&SeriesConfig>, item: &TooltipPayloadItem) -> Content {
    if let Some(icon) = series.and_then(|s| s.icon.as_ref()) {
        return icon.clone();
    }
    Content::Text(item.value.map(format_number).unwrap_or_default())
}

/// Declared label, then the raw series key.
pub fn row_label(series: Option<&SeriesConfig>, series_key: &str) -> Content {
    series
        .and_then(|s| s.label.as_ref())
        .filter(|label| !label.is_empty())
        .cloned()
        .unwrap_or_else(|| Content::text(series_key))
}
