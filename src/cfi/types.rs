//! CFI (Canonical Fragment Identifier) token and position types
//!
//! Apple Books stores highlight locations as EPUB CFIs such as
//! `epubcfi(/6/16[chapter1]!/4,/174/2/1:0,/180/1:222)`. For ordering we only
//! need the integers along the path, so a location is reduced to a flat
//! [`PositionVector`].
//!
//! Reference: <https://idpf.org/epub/linking/cfi/epub-cfi.html>

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single lexical unit of a CFI string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Token {
    /// Element step index (e.g., `/4`)
    PathStep(u32),
    /// Character offset within a text node (e.g., `:42`)
    Offset(u32),
    /// Bracketed assertion (e.g., `[chapter1]`), unescaped
    Label(String),
    /// One of `/`, `:` or `,`
    Separator(char),
}

impl Token {
    /// The integer carried by this token, if it takes part in ordering
    pub fn ordinal(&self) -> Option<u32> {
        match self {
            Token::PathStep(n) | Token::Offset(n) => Some(*n),
            Token::Label(_) | Token::Separator(_) => None,
        }
    }

    pub fn is_range_separator(&self) -> bool {
        matches!(self, Token::Separator(','))
    }
}

/// Reading-order coordinate of a location within a book
///
/// The integers are the path steps of the location followed by its character
/// offset, with indirections flattened and range end points dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionVector(Vec<u32>);

impl PositionVector {
    pub fn new(steps: Vec<u32>) -> Self {
        Self(steps)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for PositionVector {
    fn from(steps: Vec<u32>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::PathStep(n) | Token::Offset(n) => write!(f, "{}", n),
            Token::Label(label) => write!(f, "[{}]", label),
            Token::Separator(ch) => write!(f, "{}", ch),
        }
    }
}

impl fmt::Display for PositionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", step)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_vector_display() {
        let v = PositionVector::new(vec![6, 16, 4, 174]);
        assert_eq!(v.to_string(), "[6, 16, 4, 174]");
        assert_eq!(PositionVector::new(vec![]).to_string(), "[]");
    }

    #[test]
    fn test_token_ordinal() {
        assert_eq!(Token::PathStep(4).ordinal(), Some(4));
        assert_eq!(Token::Offset(0).ordinal(), Some(0));
        assert_eq!(Token::Label("chapter1".into()).ordinal(), None);
        assert_eq!(Token::Separator('/').ordinal(), None);
        assert!(Token::Separator(',').is_range_separator());
    }

    #[test]
    fn test_serialization_is_flat() {
        let v = PositionVector::new(vec![6, 16, 4]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[6,16,4]");
    }
}
