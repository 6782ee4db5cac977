//! Annotation types
//!
//! A [`RawAnnotationRecord`] is one row as the store hands it over; an
//! [`Annotation`] is a validated record that has something to export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds between the Unix epoch and the Core Data reference date (2001-01-01)
const REFERENCE_EPOCH_OFFSET: i64 = 978_307_200;

/// Annotation validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("Annotation at {0} has neither selected text nor a note")]
    InvalidAnnotation(String),
}

/// One annotation row as read from the reader's store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RawAnnotationRecord {
    /// Asset id of the book, if the row is attached to one
    #[serde(rename = "bookId")]
    pub book_id: Option<String>,
    /// Raw CFI location
    pub location: String,
    /// Highlighted passage
    #[serde(rename = "selectedText")]
    pub selected_text: Option<String>,
    /// User note
    pub note: Option<String>,
    /// Surrounding sentence the reader stores for context
    #[serde(rename = "representText")]
    pub represent_text: Option<String>,
    /// Chapter token the reader stores next to the location
    #[serde(rename = "chapterLabel")]
    pub chapter_label: Option<String>,
    /// Highlight style code
    pub style: Option<i64>,
    /// Seconds since 2001-01-01T00:00:00Z
    #[serde(rename = "modifiedAt", default)]
    pub modified_at: i64,
}

/// Highlight style as stored by Apple Books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightStyle {
    Underline,
    Green,
    Blue,
    Yellow,
    Pink,
    Purple,
    Other(i64),
}

impl From<i64> for HighlightStyle {
    fn from(code: i64) -> Self {
        match code {
            0 => HighlightStyle::Underline,
            1 => HighlightStyle::Green,
            2 => HighlightStyle::Blue,
            3 => HighlightStyle::Yellow,
            4 => HighlightStyle::Pink,
            5 => HighlightStyle::Purple,
            other => HighlightStyle::Other(other),
        }
    }
}

/// A validated highlight and/or note
///
/// At least one of `selected_text` and `note` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    location: String,
    #[serde(rename = "selectedText", skip_serializing_if = "Option::is_none")]
    selected_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(rename = "representText", skip_serializing_if = "Option::is_none")]
    represent_text: Option<String>,
    #[serde(rename = "chapterLabel", skip_serializing_if = "Option::is_none")]
    chapter_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<HighlightStyle>,
    #[serde(rename = "modifiedAt")]
    modified_at: i64,
}

/// Treat missing and blank text alike
fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// True when a record carries text worth exporting
pub(crate) fn has_content(selected_text: Option<&str>, note: Option<&str>) -> bool {
    let filled = |t: Option<&str>| t.is_some_and(|t| !t.trim().is_empty());
    filled(selected_text) || filled(note)
}

impl Annotation {
    /// Create an annotation, failing if it has neither text nor note
    pub fn new(
        location: impl Into<String>,
        selected_text: Option<String>,
        note: Option<String>,
        modified_at: i64,
    ) -> Result<Self, AnnotationError> {
        let location = location.into();
        let selected_text = non_blank(selected_text);
        let note = non_blank(note);

        if selected_text.is_none() && note.is_none() {
            return Err(AnnotationError::InvalidAnnotation(location));
        }

        Ok(Self {
            location,
            selected_text,
            note,
            represent_text: None,
            chapter_label: None,
            style: None,
            modified_at,
        })
    }

    /// Create an annotation from a store row
    pub fn from_record(record: &RawAnnotationRecord) -> Result<Self, AnnotationError> {
        let annotation = Self::new(
            record.location.clone(),
            record.selected_text.clone(),
            record.note.clone(),
            record.modified_at,
        )?;

        let annotation = match &record.represent_text {
            Some(text) => annotation.with_represent_text(text),
            None => annotation,
        };
        let annotation = match &record.chapter_label {
            Some(label) => annotation.with_chapter_label(label),
            None => annotation,
        };
        Ok(match record.style {
            Some(code) => annotation.with_style(HighlightStyle::from(code)),
            None => annotation,
        })
    }

    /// Set the surrounding context text
    pub fn with_represent_text(mut self, text: &str) -> Self {
        self.represent_text = non_blank(Some(text.to_string()));
        self
    }

    /// Set the chapter label the store recorded
    pub fn with_chapter_label(mut self, label: &str) -> Self {
        self.chapter_label = non_blank(Some(label.to_string()));
        self
    }

    /// Set the highlight style
    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.selected_text.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn represent_text(&self) -> Option<&str> {
        self.represent_text.as_deref()
    }

    pub fn chapter_label(&self) -> Option<&str> {
        self.chapter_label.as_deref()
    }

    pub fn style(&self) -> Option<HighlightStyle> {
        self.style
    }

    /// Raw modification timestamp (seconds since 2001-01-01)
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }

    /// Modification time as a calendar date
    pub fn modified_at_utc(&self) -> Option<DateTime<Utc>> {
        let unix = self.modified_at.checked_add(REFERENCE_EPOCH_OFFSET)?;
        DateTime::from_timestamp(unix, 0)
    }

    /// Check if this is a note without a highlighted passage
    pub fn is_note_only(&self) -> bool {
        self.selected_text.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(selected: Option<&str>, note: Option<&str>) -> RawAnnotationRecord {
        RawAnnotationRecord {
            book_id: Some("BOOK1".to_string()),
            location: "epubcfi(/6/4[chapter1]!/4/2/1:10)".to_string(),
            selected_text: selected.map(str::to_string),
            note: note.map(str::to_string),
            modified_at: 700_000_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_create_highlight() {
        let annotation = Annotation::from_record(&record(Some("Call me Ishmael."), None)).unwrap();

        assert_eq!(annotation.selected_text(), Some("Call me Ishmael."));
        assert_eq!(annotation.note(), None);
        assert!(!annotation.is_note_only());
    }

    #[test]
    fn test_create_note_only() {
        let annotation = Annotation::from_record(&record(None, Some("remember this"))).unwrap();

        assert_eq!(annotation.note(), Some("remember this"));
        assert!(annotation.is_note_only());
    }

    #[test]
    fn test_missing_content_is_invalid() {
        let err = Annotation::from_record(&record(None, None)).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidAnnotation(_)));

        let err = Annotation::from_record(&record(Some(""), Some("  \n"))).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidAnnotation(_)));
    }

    #[test]
    fn test_blank_note_is_dropped() {
        let annotation = Annotation::from_record(&record(Some("text"), Some(""))).unwrap();
        assert_eq!(annotation.note(), None);
    }

    #[test]
    fn test_optional_fields_from_record() {
        let mut raw = record(Some("text"), None);
        raw.chapter_label = Some("chapter1".to_string());
        raw.represent_text = Some("A longer sentence with text.".to_string());
        raw.style = Some(3);

        let annotation = Annotation::from_record(&raw).unwrap();
        assert_eq!(annotation.chapter_label(), Some("chapter1"));
        assert_eq!(annotation.represent_text(), Some("A longer sentence with text."));
        assert_eq!(annotation.style(), Some(HighlightStyle::Yellow));
    }

    #[test]
    fn test_style_codes() {
        assert_eq!(HighlightStyle::from(0), HighlightStyle::Underline);
        assert_eq!(HighlightStyle::from(5), HighlightStyle::Purple);
        assert_eq!(HighlightStyle::from(42), HighlightStyle::Other(42));
    }

    #[test]
    fn test_modified_at_reference_epoch() {
        let annotation = Annotation::new("epubcfi(/6/4!/4)", Some("x".into()), None, 0).unwrap();
        assert_eq!(
            annotation.modified_at_utc().unwrap().to_rfc3339(),
            "2001-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_serialization() {
        let annotation = Annotation::from_record(&record(Some("text"), None)).unwrap();
        let json = serde_json::to_string(&annotation).unwrap();

        assert!(json.contains("\"selectedText\":\"text\""));
        assert!(json.contains("\"modifiedAt\":700000000"));
        assert!(!json.contains("note"));
    }
}
