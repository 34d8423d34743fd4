//! Structured error types for sheetfit.
//!
//! Layout itself never fails. Errors only exist at the input boundary:
//! a scenario document that doesn't parse, or one whose viewport numbers
//! can't be laid out.

use thiserror::Error;

/// The unified error type returned by the public JSON entry points.
#[derive(Debug, Error)]
pub enum SheetError {
    /// JSON input failed to parse as a valid scenario.
    #[error("Failed to parse scenario: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The scenario parsed but describes a viewport we can't lay out.
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for SheetError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but isn't a scenario. It needs `page` (with a `type` of Scrolling or NonScrolling), `width` and `availableHeight`.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        SheetError::Parse { source: e, hint }
    }
}
