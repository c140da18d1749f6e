use std::fmt::Write as _;

use super::{Indicator, IndicatorStyle, RenderedTooltip, RowBody, INDICATOR_SIZE_PX};
use crate::content::Content;

pub(super) fn render_html(tooltip: &RenderedTooltip) -> String {
    let mut html = String::from("<div class=\"chart-tooltip\">");
    if let Some(label) = &tooltip.label {
        html.push_str("<div class=\"chart-tooltip-label\">");
        push_content(&mut html, label);
        html.push_str("</div>");
    }

    html.push_str("<div class=\"chart-tooltip-rows\">");
    for row in &tooltip.rows {
        let _ = write!(
            html,
            "<div class=\"chart-tooltip-row\" data-series=\"{}\">",
            escape(&row.series_key)
        );
        match &row.body {
            RowBody::Custom(content) => push_content(&mut html, content),
            RowBody::Standard {
                indicator,
                value,
                label,
            } => {
                if let Some(indicator) = indicator {
                    push_indicator(&mut html, indicator);
                }
                html.push_str("<span class=\"chart-tooltip-value\">");
                push_content(&mut html, value);
                html.push_str("</span><span class=\"chart-tooltip-series\">");
                push_content(&mut html, label);
                html.push_str("</span>");
            }
        }
        html.push_str("</div>");
    }
    html.push_str("</div></div>");
    html
}

fn push_indicator(html: &mut String, indicator: &Indicator) {
    match indicator.style {
        IndicatorStyle::Dot => {
            let _ = write!(
                html,
                "<span class=\"chart-tooltip-indicator\" style=\"background-color: {color}; \
                 width: {size}px; height: {size}px; border-radius: 9999px\"></span>",
                color = escape(&indicator.color),
                size = INDICATOR_SIZE_PX,
            );
        }
    }
}

fn push_content(html: &mut String, content: &Content) {
    match content {
        Content::Text(text) => html.push_str(&escape(text)),
        Content::Icon(name) => {
            let _ = write!(
                html,
                "<i class=\"chart-tooltip-icon\" data-icon=\"{}\" aria-hidden=\"true\"></i>",
                escape(name)
            );
        }
        Content::Fragment(parts) => {
            for part in parts {
                push_content(html, part);
            }
        }
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
