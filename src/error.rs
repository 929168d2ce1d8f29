//! Droptable - Load errors
//!
//! Only two failures ever reach the user: the source could not be read, or
//! its header is not the expected one. Row-level anomalies (short rows,
//! unparseable percentages) are recovered silently by the parser.

use thiserror::Error;

/// Format validation failure while parsing table text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input has no non-blank line to use as a header
    #[error("no header line found")]
    Empty,

    /// Header differs from `Name<TAB><location><TAB>Percent`
    #[error("header mismatch: expected [{expected}], found [{found}]")]
    HeaderMismatch { expected: String, found: String },
}

/// Failure to produce a [`Dataset`](crate::data::Dataset) from a source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Local file or stdin could not be read
    #[error("could not read {source_name}: {cause}")]
    Io {
        source_name: String,
        #[source]
        cause: std::io::Error,
    },

    /// Remote table could not be fetched
    #[error("could not fetch {url}: {cause}")]
    Http {
        url: String,
        #[source]
        cause: reqwest::Error,
    },

    /// Remote server answered, but not with the table
    #[error("could not fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The text was read but is not a drop table
    #[error(transparent)]
    Format(#[from] ParseError),
}

impl LoadError {
    /// True for format failures, false for failures reaching the source.
    pub fn is_format_error(&self) -> bool {
        matches!(self, LoadError::Format(_))
    }

    /// Message shown in place of the table when loading fails.
    pub fn user_message(&self, source_name: &str, location_column: &str) -> String {
        if self.is_format_error() {
            format!(
                "Load failed: malformed format (expected header Name, {}, Percent)",
                location_column
            )
        } else {
            format!("Load failed: could not read {}", source_name)
        }
    }
}
