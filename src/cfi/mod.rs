//! CFI (Canonical Fragment Identifier) module for EPUB
//!
//! This module tokenizes the CFI strings Apple Books records for each
//! highlight, reduces them to position vectors and orders them.
//!
//! # Overview
//!
//! CFIs are not sortable as strings (`/142` sorts before `/46`), and a
//! highlight is stored as a range whose start is split across a shared
//! parent path and a start path. Ordering therefore works on the integers
//! only.
//!
//! # Example CFI
//!
//! ```text
//! epubcfi(/6/16[chapter1]!/4,/174/2/1:0,/180/1:222)
//!         │  │  │         │ │ │         └── range end (ignored)
//!         │  │  │         │ │ └──────────── range start
//!         │  │  │         │ └────────────── shared parent (body)
//!         │  │  │         └──────────────── indirection (into content doc)
//!         │  │  └────────────────────────── chapter label
//!         │  └───────────────────────────── spine item
//!         └──────────────────────────────── spine element
//!
//! position vector: [6, 16, 4, 174, 2, 1, 0]
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use bookbits::cfi::{position_vector, compare, humanize_location};
//!
//! let a = position_vector("epubcfi(/6/4!/4/2/1:10)")?;
//! let b = position_vector("epubcfi(/6/4!/4/2/1:20)")?;
//! assert!(a < b);
//!
//! assert_eq!(
//!     humanize_location("epubcfi(/6/4[chapter1]!/4)").as_deref(),
//!     Some("Chapter 1")
//! );
//! ```

mod comparator;
mod label;
mod parser;
mod types;

// Re-export main types
pub use types::{PositionVector, Token};

// Re-export parser functions
pub use parser::{position_from_tokens, position_vector, tokenize, try_position_vector, CfiParseError};

// Re-export comparator functions
pub use comparator::{compare, compare_cfi_strings, is_after, is_before, is_in_range};

// Re-export label functions
pub use label::{extract_label, humanize_label, humanize_location};
