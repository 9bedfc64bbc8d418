//! Natural key ordering: embedded digit runs compare by numeric value.
//!
//! Strings are split into alternating maximal runs of ASCII digits and
//! non-digits. Runs are compared pairwise: two digit runs by value (leading
//! zeros ignored, any length), anything else ordinally. A string whose run
//! sequence is a strict prefix of the other's sorts first. Strings that tie on
//! every run (`"a07"` vs `"a7"`) fall back to ordinal comparison so the order
//! stays total.

use datcat_schema::Collation;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run<'a> {
    Text(&'a str),
    Digits(&'a str),
}

impl<'a> Run<'a> {
    fn as_str(self) -> &'a str {
        match self {
            Run::Text(s) | Run::Digits(s) => s,
        }
    }
}

struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Run<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Run::Digits(run)
        } else {
            Run::Text(run)
        })
    }
}

fn runs(s: &str) -> Runs<'_> {
    Runs { rest: s }
}

/// Compare two digit runs by value without parsing into a fixed-width integer.
fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare(a: &str, b: &str, reverse_numeric: bool) -> Ordering {
    let mut left = runs(a);
    let mut right = runs(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Run::Digits(x)), Some(Run::Digits(y))) => {
                let ord = numeric_cmp(x, y);
                let ord = if reverse_numeric { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.as_str().cmp(y.as_str());
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Natural ordering: `img1 < img2 < img10`.
///
/// Digit runs of any length compare by magnitude; a run too wide for a
/// machine integer is not compared ordinally, so the order stays transitive.
/// Archive writers relying on an exact collation should take this as the
/// contract.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    compare(a, b, false)
}

/// Natural ordering with digit runs descending and text runs ascending:
/// `img10 < img2 < img1`.
pub fn natural_cmp_reverse_numeric(a: &str, b: &str) -> Ordering {
    compare(a, b, true)
}

/// Compare by the configured collation.
pub fn collate(collation: Collation, a: &str, b: &str) -> Ordering {
    match collation {
        Collation::Ordinal => a.cmp(b),
        Collation::Natural => natural_cmp(a, b),
        Collation::NaturalReverse => natural_cmp_reverse_numeric(a, b),
    }
}

/// Sort string-like values in place by the configured collation.
pub fn sort_by_collation<S: AsRef<str>>(values: &mut [S], collation: Collation) {
    values.sort_by(|a, b| collate(collation, a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(values: &[&str], collation: Collation) -> Vec<String> {
        let mut out: Vec<String> = values.iter().map(|s| (*s).to_owned()).collect();
        sort_by_collation(&mut out, collation);
        out
    }

    #[test]
    fn numeric_runs_sort_by_value() {
        assert_eq!(
            sorted(&["img2", "img10", "img1"], Collation::Natural),
            vec!["img1", "img2", "img10"]
        );
    }

    #[test]
    fn reverse_numeric_keeps_text_ascending() {
        assert_eq!(
            sorted(&["img2", "img10", "img1"], Collation::NaturalReverse),
            vec!["img10", "img2", "img1"]
        );
        assert_eq!(
            sorted(&["b1", "a1", "a2"], Collation::NaturalReverse),
            vec!["a2", "a1", "b1"]
        );
    }

    #[test]
    fn ordinal_collation_is_plain_byte_order() {
        assert_eq!(
            sorted(&["img2", "img10", "img1"], Collation::Ordinal),
            vec!["img1", "img10", "img2"]
        );
    }

    #[test]
    fn leading_zeros_are_ignored_but_order_stays_total() {
        assert_eq!(natural_cmp("a7b", "a007c"), Ordering::Less);
        assert_ne!(natural_cmp("a07", "a7"), Ordering::Equal);
        assert_eq!(natural_cmp("a07", "a7"), "a07".cmp("a7"));
    }

    #[test]
    fn shorter_run_sequence_sorts_first() {
        assert_eq!(natural_cmp("disk", "disk1"), Ordering::Less);
        assert_eq!(natural_cmp("disk1", "disk1a"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
        assert_eq!(natural_cmp("", ""), Ordering::Equal);
    }

    #[test]
    fn huge_digit_runs_compare_by_magnitude() {
        let big = "99999999999999999999999";
        let bigger = "100000000000000000000000";
        assert_eq!(natural_cmp(big, bigger), Ordering::Less);
        assert_eq!(natural_cmp("7", "60000000000000000000"), Ordering::Less);
    }

    #[test]
    fn mixed_run_kinds_compare_ordinally() {
        assert_eq!(natural_cmp("1a", "a1"), Ordering::Less);
        assert_eq!(natural_cmp("_1", "1_"), "_1".cmp("1_"));
    }

    #[test]
    fn comparator_is_antisymmetric() {
        let values = ["x", "x1", "x01", "x10", "x9y", "x9", "10", "y", "", "Z2"];
        for a in values {
            assert_eq!(natural_cmp(a, a), Ordering::Equal);
            for b in values {
                assert_eq!(natural_cmp(a, b), natural_cmp(b, a).reverse(), "{a} vs {b}");
                assert_eq!(
                    natural_cmp_reverse_numeric(a, b),
                    natural_cmp_reverse_numeric(b, a).reverse(),
                    "{a} vs {b}"
                );
            }
        }
    }
}
