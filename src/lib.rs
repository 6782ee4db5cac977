//! BookBits Library
//!
//! Exports Apple Books highlights and notes in reading order.
//! The command line binary is in main.rs.
//!
//! # Modules
//!
//! - `cfi`: EPUB CFI tokenizing, position vectors and ordering
//! - `annotations`: Validation, per-book grouping, sorting and chapter breaks
//! - `db`: Read-only access to the Apple Books SQLite stores
//! - `export`: Markdown and CSV rendering
//! - `config`: Store locations and defaults from the environment

pub mod annotations;
pub mod cfi;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
