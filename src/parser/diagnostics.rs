use log::Level;
use thiserror::Error;

/// A recovered problem found while interpreting display text.
///
/// None of these abort parsing; each one names the fallback that was used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseDiagnostic {
    #[error("display text has {lines} line(s), expected two; using defaults")]
    MissingLines { lines: usize },
    #[error("couldn't form marked time given '{0}', assuming capture time")]
    MarkedTimeShape(String),
    #[error("wrong marked time value from OCR '{0}', assuming capture time")]
    MarkedTimeValue(String),
    #[error("couldn't read temperature from '{0}', assuming 0")]
    Temperature(String),
}

impl ParseDiagnostic {
    pub fn level(&self) -> Level {
        match self {
            ParseDiagnostic::MarkedTimeShape(_) | ParseDiagnostic::MarkedTimeValue(_) => {
                Level::Warn
            }
            ParseDiagnostic::MissingLines { .. } | ParseDiagnostic::Temperature(_) => Level::Error,
        }
    }
}
