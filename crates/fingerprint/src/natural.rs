//! Natural ("human") ordering for path strings, compatible with PHP's `strnatcmp`.
//!
//! Digit runs without a leading zero compare by numeric value, so `file2.php` sorts before
//! `file10.php`. A run starting with `0` is read as a fraction and compared digit by digit from
//! the left, so `x_09.php` sorts before `x_1.php`. Zero-led runs therefore always sort before
//! unpadded ones, which keeps the ordering total. Everything else compares byte-wise and
//! case-sensitively. Strings whose runs all compare equal fall back to a plain byte comparison.

use std::cmp::Ordering;

#[must_use]
pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let a = left.as_bytes();
    let b = right.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let a_end = digit_run_end(a, i);
            let b_end = digit_run_end(b, j);
            match compare_digit_runs(&a[i..a_end], &b[j..b_end]) {
                Ordering::Equal => {
                    i = a_end;
                    j = b_end;
                }
                other => return other,
            }
            continue;
        }

        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            other => return other,
        }
    }

    (a.len() - i)
        .cmp(&(b.len() - j))
        .then_with(|| a.cmp(b))
}

pub fn sort_natural(paths: &mut [String]) {
    sort_natural_by_key(paths, String::as_str);
}

/// Stable natural sort of `items` by `key`.
pub fn sort_natural_by_key<T>(items: &mut [T], key: impl Fn(&T) -> &str) {
    items.sort_by(|a, b| natural_cmp(key(a), key(b)));
}

fn digit_run_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|byte| !byte.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset)
}

fn compare_digit_runs(a: &[u8], b: &[u8]) -> Ordering {
    if a.first() == Some(&b'0') || b.first() == Some(&b'0') {
        compare_fractional(a, b)
    } else {
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

/// Left-aligned comparison: first differing digit decides, a run that ends first is smaller.
fn compare_fractional(a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.cmp(y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(natural_cmp("file2.php", "file10.php"), Ordering::Less);
        assert_eq!(natural_cmp("file10.php", "file2.php"), Ordering::Greater);
        assert_eq!(natural_cmp("v1.2.10", "v1.2.9"), Ordering::Greater);
    }

    #[test]
    fn case_sensitive_like_byte_order() {
        assert_eq!(natural_cmp("B.php", "a.php"), Ordering::Less);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("/modules/cms", "/modules/cms/a"), Ordering::Less);
    }

    #[test]
    fn runs_with_leading_zeros_compare_from_the_left() {
        assert_eq!(natural_cmp("x_09.php", "x_1.php"), Ordering::Less);
        assert_eq!(natural_cmp("x_1.php", "x_09.php"), Ordering::Greater);
        assert_eq!(natural_cmp("x_010.php", "x_09.php"), Ordering::Less);
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("a0", "a00"), Ordering::Less);
    }

    #[test]
    fn zero_padded_runs_sort_before_every_unpadded_run() {
        let mut names = vec![
            "n2".to_string(),
            "n015".to_string(),
            "n10".to_string(),
            "n009".to_string(),
            "n0".to_string(),
        ];
        sort_natural(&mut names);
        assert_eq!(names, vec!["n0", "n009", "n015", "n2", "n10"]);
    }

    #[test]
    fn sorts_a_path_listing() {
        let mut paths = vec![
            "/modules/system/lang/en10.php".to_string(),
            "/modules/system/lang/en2.php".to_string(),
            "/modules/system/Classes/A.php".to_string(),
            "/modules/system/lang/en1.php".to_string(),
        ];
        sort_natural(&mut paths);
        assert_eq!(
            paths,
            vec![
                "/modules/system/Classes/A.php",
                "/modules/system/lang/en1.php",
                "/modules/system/lang/en2.php",
                "/modules/system/lang/en10.php",
            ]
        );
    }

    proptest! {
        #[test]
        fn ordering_is_antisymmetric(a in "[a-z0-9/._]{0,12}", b in "[a-z0-9/._]{0,12}") {
            prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
        }

        #[test]
        fn equal_only_for_identical_strings(a in "[a-z0-9/]{0,12}", b in "[a-z0-9/]{0,12}") {
            prop_assert_eq!(natural_cmp(&a, &b) == Ordering::Equal, a == b);
        }

        #[test]
        fn sort_is_independent_of_input_order(
            mut paths in proptest::collection::vec("[a-c0-9/]{1,8}", 0..16)
        ) {
            let mut forward = paths.clone();
            sort_natural(&mut forward);
            paths.reverse();
            sort_natural(&mut paths);
            prop_assert_eq!(forward, paths);
        }
    }
}
