//! Grouping and reading-order sorting of annotations
//!
//! Turns a batch of raw store rows into per-book annotation lists in reading
//! order, with chapter breaks where the chapter label changes.

use std::collections::BTreeMap;

use serde::Serialize;

use super::types::{has_content, Annotation, RawAnnotationRecord};
use crate::cfi::{self, CfiParseError, PositionVector};

/// An annotation left out of the sorted output because its location is malformed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedAnnotation {
    pub annotation: Annotation,
    #[serde(serialize_with = "serialize_error")]
    pub reason: CfiParseError,
}

fn serialize_error<S: serde::Serializer>(err: &CfiParseError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// One item of the rendered sequence for a book
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// A new chapter starts here
    SectionBreak(String),
    Annotation(&'a Annotation),
}

/// Annotations of one book, in reading order
#[derive(Debug, Clone, Default)]
pub struct BookAnnotations {
    entries: Vec<(PositionVector, Annotation)>,
    skipped: Vec<SkippedAnnotation>,
}

impl BookAnnotations {
    /// Sort annotations by location
    ///
    /// Each location is parsed once. Annotations with malformed locations are
    /// set aside in [`skipped`](Self::skipped); the rest are sorted stably, so
    /// annotations on the same span keep their input order.
    pub fn sort(annotations: Vec<Annotation>) -> Self {
        let mut entries = Vec::with_capacity(annotations.len());
        let mut skipped = Vec::new();

        for annotation in annotations {
            match cfi::position_vector(annotation.location()) {
                Ok(position) => entries.push((position, annotation)),
                Err(reason) => {
                    tracing::warn!(
                        "Skipping annotation with malformed location {}: {}",
                        annotation.location(),
                        reason
                    );
                    skipped.push(SkippedAnnotation { annotation, reason });
                }
            }
        }

        entries.sort_by(|(a, _), (b, _)| cfi::compare(a.as_slice(), b.as_slice()));

        Self { entries, skipped }
    }

    /// Sorted annotations
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.iter().map(|(_, annotation)| annotation)
    }

    /// Sorted annotations with their position vectors
    pub fn positioned(&self) -> &[(PositionVector, Annotation)] {
        &self.entries
    }

    /// Annotations left out because their location could not be parsed
    pub fn skipped(&self) -> &[SkippedAnnotation] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sorted annotations with a section break before each chapter change
    ///
    /// The chapter of an annotation is the humanized label of its location,
    /// or of its stored chapter label when the location has none. Annotations
    /// without either stay in the current section.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::with_capacity(self.entries.len());
        let mut current: Option<String> = None;

        for annotation in self.annotations() {
            if let Some(title) = chapter_title(annotation) {
                if current.as_deref() != Some(title.as_str()) {
                    segments.push(Segment::SectionBreak(title.clone()));
                    current = Some(title);
                }
            }
            segments.push(Segment::Annotation(annotation));
        }

        segments
    }
}

fn chapter_title(annotation: &Annotation) -> Option<String> {
    cfi::humanize_location(annotation.location())
        .or_else(|| annotation.chapter_label().and_then(cfi::humanize_label))
}

/// Per-book annotations built from one batch of store rows
#[derive(Debug, Clone, Default)]
pub struct AnnotationGroup {
    books: BTreeMap<String, BookAnnotations>,
}

impl AnnotationGroup {
    /// Filter, validate, partition and sort a batch of records
    ///
    /// Rows without a book id or without any text are dropped silently.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a RawAnnotationRecord>,
    {
        let mut partitions: BTreeMap<String, Vec<Annotation>> = BTreeMap::new();
        let mut dropped = 0usize;

        for record in records {
            let book_id = match record.book_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => id,
                _ => {
                    dropped += 1;
                    continue;
                }
            };

            if !has_content(record.selected_text.as_deref(), record.note.as_deref()) {
                dropped += 1;
                continue;
            }

            match Annotation::from_record(record) {
                Ok(annotation) => partitions
                    .entry(book_id.to_string())
                    .or_default()
                    .push(annotation),
                Err(e) => {
                    tracing::debug!("Dropping record: {}", e);
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} records without book id or content", dropped);
        }

        let books = partitions
            .into_iter()
            .map(|(book_id, annotations)| {
                let sorted = BookAnnotations::sort(annotations);
                tracing::debug!(
                    "Sorted {} annotations for {} ({} skipped)",
                    sorted.len(),
                    book_id,
                    sorted.skipped().len()
                );
                (book_id, sorted)
            })
            .collect();

        Self { books }
    }

    /// Annotations for a book
    pub fn get(&self, book_id: &str) -> Option<&BookAnnotations> {
        self.books.get(book_id)
    }

    /// Book ids in the group, in ascending order
    pub fn book_ids(&self) -> impl Iterator<Item = &str> {
        self.books.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BookAnnotations)> {
        self.books.iter().map(|(id, book)| (id.as_str(), book))
    }

    /// Total number of annotations skipped for malformed locations
    pub fn skipped_count(&self) -> usize {
        self.books.values().map(|book| book.skipped().len()).sum()
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Sort bare CFI strings into reading order
///
/// Returns the valid locations sorted, and the malformed ones with the reason.
pub fn sort_locations<'a>(locations: &[&'a str]) -> (Vec<&'a str>, Vec<(&'a str, CfiParseError)>) {
    let mut parsed = Vec::with_capacity(locations.len());
    let mut rejected = Vec::new();

    for &location in locations {
        match cfi::position_vector(location) {
            Ok(position) => parsed.push((position, location)),
            Err(reason) => rejected.push((location, reason)),
        }
    }

    parsed.sort_by(|(a, _), (b, _)| a.cmp(b));

    (parsed.into_iter().map(|(_, location)| location).collect(), rejected)
}
