//! CFI Comparison and Ordering
//!
//! Depth-first comparison of position vectors, used to put highlights back
//! into reading order.

use std::cmp::Ordering;

use super::parser::position_vector;
use super::types::PositionVector;

/// Three-way comparison of two position vectors
///
/// The first differing step decides. When one vector is a prefix of the
/// other, the shorter one sorts first: a coarser address points at the
/// opening of the region a finer one refines.
pub fn compare(a: &[u32], b: &[u32]) -> Ordering {
    for (step_a, step_b) in a.iter().zip(b.iter()) {
        match step_a.cmp(step_b) {
            Ordering::Equal => continue,
            unequal => return unequal,
        }
    }

    a.len().cmp(&b.len())
}

impl Ord for PositionVector {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self.as_slice(), other.as_slice())
    }
}

impl PartialOrd for PositionVector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Determine if position `a` comes before position `b` in reading order
pub fn is_before(a: &PositionVector, b: &PositionVector) -> bool {
    a < b
}

/// Determine if position `a` comes after position `b` in reading order
pub fn is_after(a: &PositionVector, b: &PositionVector) -> bool {
    a > b
}

/// Check if a position falls within a range (inclusive)
pub fn is_in_range(position: &PositionVector, start: &PositionVector, end: &PositionVector) -> bool {
    position >= start && position <= end
}

/// Compare two CFI strings, returning their ordering
/// Returns None if either CFI is malformed
pub fn compare_cfi_strings(a: &str, b: &str) -> Option<Ordering> {
    let position_a = position_vector(a).ok()?;
    let position_b = position_vector(b).ok()?;
    Some(position_a.cmp(&position_b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pv(steps: &[u32]) -> PositionVector {
        PositionVector::new(steps.to_vec())
    }

    #[test]
    fn test_ordering_same_chapter() {
        let a = position_vector("epubcfi(/6/4!/4/2/1:10)").unwrap();
        let b = position_vector("epubcfi(/6/4!/4/2/1:20)").unwrap();

        assert!(a < b);
        assert!(is_before(&a, &b));
        assert!(is_after(&b, &a));
    }

    #[test]
    fn test_ordering_different_chapters() {
        let a = position_vector("epubcfi(/6/4!/4/2)").unwrap();
        let b = position_vector("epubcfi(/6/6!/4/2)").unwrap();

        assert!(a < b);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        // As strings "/142" < "/46"; as steps 46 < 142
        let a = position_vector("epubcfi(/6/18[chapter2]!/4,/46/1:0,/48/1:497)").unwrap();
        let b = position_vector("epubcfi(/6/18[chapter2]!/4/142/3,:554,:970)").unwrap();

        assert!(a < b);
    }

    #[test]
    fn test_first_differing_step_decides() {
        assert_eq!(
            compare_cfi_strings(
                "epubcfi(/6/18[chapter2]!/4/138/1,:0,:431)",
                "epubcfi(/6/18[chapter2]!/4/142/3,:554,:970)"
            ),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(compare(&[6, 4, 4, 2], &[6, 4, 4, 2, 1]), Ordering::Less);
        assert_eq!(compare(&[6, 4, 4, 2, 1], &[6, 4, 4, 2]), Ordering::Greater);
        // A deeper path still loses to a later sibling
        assert_eq!(compare(&[6, 4, 4, 2, 9, 9], &[6, 4, 4, 3]), Ordering::Less);
    }

    #[test]
    fn test_equality() {
        let a = position_vector("epubcfi(/6/4!/4/2/1:42)").unwrap();
        let b = position_vector("epubcfi(/6/4[chap]!/4/2/1:42)").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn test_in_range() {
        let start = pv(&[6, 4, 4, 2, 1, 0]);
        let end = pv(&[6, 4, 4, 2, 1, 100]);

        assert!(is_in_range(&pv(&[6, 4, 4, 2, 1, 50]), &start, &end));
        assert!(is_in_range(&start, &start, &end));
        assert!(!is_in_range(&pv(&[6, 4, 4, 2, 1, 150]), &start, &end));
        assert!(!is_in_range(&pv(&[6, 4, 4, 2]), &start, &end));
    }

    #[test]
    fn test_sort_reader_locations() {
        let expected = [
            "epubcfi(/6/16[chapter1]!/4,/174/2/1:0,/180/1:222)",
            "epubcfi(/6/16[chapter1]!/4/232/1,:3,:1022)",
            "epubcfi(/6/18[chapter2]!/4,/46/1:0,/48/1:497)",
            "epubcfi(/6/18[chapter2]!/4/138/1,:0,:431)",
            "epubcfi(/6/18[chapter2]!/4/142/3,:554,:970)",
            "epubcfi(/6/18[chapter2]!/4/142/3,:971,:1164)",
            "epubcfi(/6/20[chapter3]!/4/728/1,:74,:262)",
            "epubcfi(/6/20[chapter3]!/4/728/1,:263,:372)",
            "epubcfi(/6/20[chapter3]!/4,/742/3:71,/744[ch3.6]/2/1:0)",
        ];

        let mut shuffled = vec![
            expected[5], expected[0], expected[8], expected[3], expected[1], expected[7],
            expected[2], expected[6], expected[4],
        ];
        shuffled.sort_by_key(|cfi| position_vector(cfi).unwrap());

        assert_eq!(shuffled, expected);
    }

    #[test]
    fn test_compare_cfi_strings_invalid() {
        assert_eq!(compare_cfi_strings("invalid", "epubcfi(/6/4!/4/2)"), None);
        assert_eq!(compare_cfi_strings("epubcfi(/6/4!/4/2)", "epubcfi()"), None);
    }

    fn steps() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(0u32..8, 1..6)
    }

    proptest! {
        #[test]
        fn prop_reflexive(a in steps()) {
            prop_assert_eq!(compare(&a, &a), Ordering::Equal);
        }

        #[test]
        fn prop_antisymmetric(a in steps(), b in steps()) {
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        }

        #[test]
        fn prop_transitive(a in steps(), b in steps(), c in steps()) {
            if compare(&a, &b) != Ordering::Greater && compare(&b, &c) != Ordering::Greater {
                prop_assert_ne!(compare(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_prefix_is_less(a in steps(), tail in prop::collection::vec(any::<u32>(), 1..4)) {
            let mut extended = a.clone();
            extended.extend(tail);
            prop_assert_eq!(compare(&a, &extended), Ordering::Less);
        }

        #[test]
        fn prop_equal_only_when_identical(a in steps(), b in steps()) {
            prop_assert_eq!(compare(&a, &b) == Ordering::Equal, a == b);
        }
    }
}
