//! CSV rendering
//!
//! `;`-delimited, one row per annotation in reading order.

use crate::annotations::BookAnnotations;

const DELIMITER: char = ';';
const HEADER: [&str; 3] = ["Highlight", "Notes", "Locations"];

/// Flatten newlines and quote the field if it would break the row
fn field(value: &str) -> String {
    let flat = value.replace(['\r', '\n'], " ");
    if flat.contains(DELIMITER) || flat.contains('"') {
        format!("\"{}\"", flat.replace('"', "\"\""))
    } else {
        flat
    }
}

fn row(fields: [&str; 3]) -> String {
    let fields: Vec<String> = fields.iter().copied().map(field).collect();
    let mut line = fields.join(&DELIMITER.to_string());
    line.push('\n');
    line
}

pub fn render_csv(annotations: &BookAnnotations) -> String {
    let mut out = row(HEADER);

    for annotation in annotations.annotations() {
        out.push_str(&row([
            annotation.selected_text().unwrap_or_default(),
            annotation.note().unwrap_or_default(),
            annotation.location(),
        ]));
    }

    out
}
