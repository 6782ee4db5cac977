//! Markdown rendering
//!
//! Highlights become block quotes, notes follow as plain paragraphs and each
//! chapter gets a second-level heading.

use crate::annotations::{BookAnnotations, Segment};
use crate::db::Book;

pub fn render_markdown(book: Option<&Book>, annotations: &BookAnnotations) -> String {
    let mut out = String::new();

    if let Some(book) = book {
        out.push_str(&format!("# {}\n\n", book.title));
        out.push_str(&format!("*by {}*\n\n", book.author));
    }

    for segment in annotations.segments() {
        match segment {
            Segment::SectionBreak(title) => out.push_str(&format!("## {}\n\n", title)),
            Segment::Annotation(annotation) => {
                if let Some(text) = annotation.selected_text() {
                    for line in text.lines() {
                        out.push_str(&format!("> {}\n", line));
                    }
                    out.push('\n');
                }
                if let Some(note) = annotation.note() {
                    out.push_str(&format!("{}\n\n", note));
                }
            }
        }
    }

    out
}
