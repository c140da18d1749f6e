use std::cell::RefCell;
use std::sync::Arc;

use crate::config::ChartConfig;
use crate::error::{ChartError, ChartResult};
use crate::style::{synthesize, ChartId, ChartStyle};
use crate::tooltip::{render, RenderedTooltip, TooltipEvent, TooltipOptions};

thread_local! {
    static PROVIDED_CONFIGS: RefCell<Vec<Arc<ChartConfig>>> = const { RefCell::new(Vec::new()) };
}

/// Ambient configuration for nested renderers on the current thread.
pub struct ChartContext;

impl ChartContext {
    /// Makes `config` the innermost provided configuration while `f` runs.
    pub fn provide<R>(config: Arc<ChartConfig>, f: impl FnOnce() -> R) -> R {
        PROVIDED_CONFIGS.with(|stack| stack.borrow_mut().push(config));
        let _guard = PopOnDrop;
        f()
    }
}

struct PopOnDrop;

impl Drop for PopOnDrop {
    fn drop(&mut self) {
        PROVIDED_CONFIGS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Innermost provided configuration. Calling this outside
/// [`ChartContext::provide`] is a wiring mistake, not missing data.
pub fn use_chart() -> ChartResult<Arc<ChartConfig>> {
    PROVIDED_CONFIGS
        .with(|stack| stack.borrow().last().cloned())
        .ok_or_else(|| {
            tracing::error!("use_chart called without a provided chart config");
            ChartError::MissingContext
        })
}

pub fn tooltip_content(
    event: &TooltipEvent,
    options: &TooltipOptions,
) -> ChartResult<Option<RenderedTooltip>> {
    let config = use_chart()?;
    Ok(render(event, &config, options))
}

pub fn context_style(chart_id: &ChartId) -> ChartResult<Option<ChartStyle>> {
    let config = use_chart()?;
    Ok(synthesize(chart_id, &config))
}
