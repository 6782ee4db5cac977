//! Export module
//!
//! Renders the reading-ordered annotations of one book as Markdown or CSV.

mod csv;
mod markdown;

pub use self::csv::render_csv;
pub use markdown::render_markdown;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::annotations::BookAnnotations;
use crate::db::Book;
use crate::error::AppError;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Csv,
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Csv => "csv",
        }
    }

    /// Default output file name
    pub fn default_filename(&self) -> String {
        format!("highlights.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Render a book's annotations in the given format
pub fn render(format: ExportFormat, book: Option<&Book>, annotations: &BookAnnotations) -> String {
    match format {
        ExportFormat::Markdown => render_markdown(book, annotations),
        ExportFormat::Csv => render_csv(annotations),
    }
}
