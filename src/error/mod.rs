use thiserror::Error;

pub type ChartResult<T> = std::result::Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("use_chart must be used within a ChartContainer")]
    MissingContext,
    #[error("series `{key}` sets both `color` and `theme`")]
    ConflictingColor { key: String },
    #[error("invalid series key `{key}`: expected ASCII letters, digits, `-` or `_`")]
    InvalidSeriesKey { key: String },
    #[error("series `{key}` has a color containing `;`, `{{`, `}}`, `<` or `>`")]
    InvalidColor { key: String },
    #[error("invalid chart id `{id}`: expected ASCII letters, digits, `-` or `_`")]
    InvalidChartId { id: String },
    #[error("failed to parse chart input")]
    ParseConfig(#[from] serde_json::Error),
}

/// Keys and ids are spliced verbatim into CSS custom property names and
/// unquoted attribute selectors.
pub(crate) fn is_css_ident(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_ident_accepts_dashes_and_underscores() {
        assert!(is_css_ident("sales"));
        assert!(is_css_ident("page-views_2024"));
    }

    #[test]
    fn css_ident_rejects_empty_and_selector_characters() {
        assert!(!is_css_ident(""));
        assert!(!is_css_ident("a b"));
        assert!(!is_css_ident("a]{"));
        assert!(!is_css_ident("r:0:"));
    }

    #[test]
    fn missing_context_message_names_the_container() {
        assert_eq!(
            ChartError::MissingContext.to_string(),
            "use_chart must be used within a ChartContainer"
        );
    }
}
