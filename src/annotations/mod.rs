//! Annotation module
//!
//! Validates raw highlight/note rows and puts them into reading order per
//! book, split into chapters.

mod group;
mod types;

pub use group::{sort_locations, AnnotationGroup, BookAnnotations, Segment, SkippedAnnotation};
pub use types::{Annotation, AnnotationError, HighlightStyle, RawAnnotationRecord};
