pub mod chart;
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod style;
pub mod theme;
pub mod tooltip;

pub use chart::{context_style, tooltip_content, use_chart, ChartContainer, ChartContext};
pub use config::{
    colorable_entries, resolve, ChartConfig, ColorSpec, SeriesConfig, ValueFormatter,
};
pub use content::Content;
pub use error::{ChartError, ChartResult};
pub use style::{synthesize, ChartId, ChartStyle};
pub use theme::{Theme, ThemeColors};
pub use tooltip::{
    render, IndicatorStyle, LabelFormatter, RenderedTooltip, RowBody, TooltipEvent,
    TooltipOptions, TooltipPayloadItem, TooltipRow,
};
