use std::sync::Arc;

use crate::config::ChartConfig;
use crate::error::ChartResult;
use crate::style::{synthesize, ChartId, ChartStyle};
use crate::tooltip::{render, RenderedTooltip, TooltipEvent, TooltipOptions};

mod context;

pub use context::{context_style, tooltip_content, use_chart, ChartContext};

/// Owner of one mounted chart: its identity, its configuration and the
/// stylesheet synthesized from it.
#[derive(Debug)]
pub struct ChartContainer {
    id: ChartId,
    config: Arc<ChartConfig>,
    style: Option<ChartStyle>,
}

impl ChartContainer {
    pub fn new(id: Option<&str>, config: ChartConfig) -> ChartResult<Self> {
        let id = ChartId::new(id)?;
        let style = synthesize(&id, &config);
        tracing::debug!(chart = %id, series = config.len(), styled = style.is_some(), "mounted chart");
        Ok(Self {
            id,
            config: Arc::new(config),
            style,
        })
    }

    pub fn id(&self) -> &ChartId {
        &self.id
    }

    /// Snapshot of the current configuration. Later replacements do not
    /// affect snapshots already handed out.
    pub fn config(&self) -> Arc<ChartConfig> {
        Arc::clone(&self.config)
    }

    pub fn style(&self) -> Option<&ChartStyle> {
        self.style.as_ref()
    }

    /// Replaces the whole configuration and re-synthesizes the stylesheet.
    pub fn set_config(&mut self, config: ChartConfig) {
        self.style = synthesize(&self.id, &config);
        self.config = Arc::new(config);
        tracing::debug!(chart = %self.id, styled = self.style.is_some(), "replaced chart config");
    }

    pub fn render_tooltip(
        &self,
        event: &TooltipEvent,
        options: &TooltipOptions,
    ) -> Option<RenderedTooltip> {
        render(event, &self.config, options)
    }

    /// Runs `f` with this chart's configuration available to [`use_chart`].
    pub fn provide<R>(&self, f: impl FnOnce() -> R) -> R {
        ChartContext::provide(self.config(), f)
    }
}
