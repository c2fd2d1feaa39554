use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

/// A validated set of 0-based page indices, strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    indices: Vec<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageRangeError {
    #[error("No pages given")]
    Empty,
    #[error("No valid pages specified in \"{spec}\" (document has {page_count} pages)")]
    NoValidPages { spec: String, page_count: u32 },
}

impl PageSelection {
    /// Every page of a `page_count`-page document.
    pub fn all(page_count: u32) -> Self {
        PageSelection {
            indices: (0..page_count).collect(),
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: u32) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// The selected pages as 1-based page numbers.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.indices.iter().map(|i| i + 1).collect()
    }
}

/// Re-encodes the selection as a page specification, collapsing consecutive
/// pages into ranges ("1-3,5").
impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut iter = self.indices.iter().copied().peekable();
        while let Some(start) = iter.next() {
            let mut end = start;
            while iter.peek() == Some(&(end + 1)) {
                end += 1;
                iter.next();
            }

            if !first {
                f.write_str(",")?;
            }
            first = false;

            if start == end {
                write!(f, "{}", start + 1)?;
            } else {
                write!(f, "{}-{}", start + 1, end + 1)?;
            }
        }
        Ok(())
    }
}

/// Resolve a page specification like "1-5,8,10-12" against a document with
/// `page_count` pages.
///
/// Tokens that don't parse, fall outside the document, or describe an
/// inverted range contribute nothing; they never abort the rest of the
/// specification. Ranges are clamped to the document before they are walked.
pub fn resolve(spec: &str, page_count: u32) -> PageSelection {
    let mut pages = BTreeSet::new();
    if spec.trim().is_empty() {
        return PageSelection::default();
    }

    let max = i64::from(page_count);
    for token in spec.split(',') {
        let token = token.trim();

        if let Some((start_str, end_str)) = token.split_once('-') {
            let (Some(start), Some(end)) = (parse_page_number(start_str), parse_page_number(end_str))
            else {
                continue;
            };

            let first = start.max(1);
            let last = end.min(max);
            for page in first..=last {
                // 1 <= page <= page_count, so this fits in a u32
                pages.insert((page - 1) as u32);
            }
        } else if let Some(page) = parse_page_number(token) {
            if (1..=max).contains(&page) {
                pages.insert((page - 1) as u32);
            }
        }
    }

    PageSelection {
        indices: pages.into_iter().collect(),
    }
}

/// Like [`resolve`], but an empty outcome is an error so callers never run a
/// document operation on zero pages.
pub fn select_pages(spec: &str, page_count: u32) -> Result<PageSelection, PageRangeError> {
    if spec.trim().is_empty() {
        return Err(PageRangeError::Empty);
    }

    let selection = resolve(spec, page_count);
    if selection.is_empty() {
        return Err(PageRangeError::NoValidPages {
            spec: spec.trim().to_string(),
            page_count,
        });
    }
    Ok(selection)
}

/// Reads an optional sign and the leading decimal digits, ignoring whatever
/// follows them ("3abc" is 3, "2.5" is 2). Values past `i64` saturate.
/// `None` when there are no digits at all.
fn parse_page_number(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut value: i64 = 0;
    let mut seen = false;
    for digit in digits {
        seen = true;
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen.then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_spec() {
        assert!(resolve("", 10).is_empty());
        assert!(resolve("   ", 10).is_empty());
    }

    #[test]
    fn test_single_pages() {
        assert_eq!(resolve("1,3,5", 10).indices(), &[0, 2, 4]);
    }

    #[test]
    fn test_page_range() {
        assert_eq!(resolve("1-3", 10).indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_overlapping_ranges_merge() {
        assert_eq!(resolve("1-3,2-4", 10).indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_token_order_does_not_matter() {
        assert_eq!(resolve("7,2-3,1", 10).indices(), &[0, 1, 2, 6]);
    }

    #[test]
    fn test_inverted_range_is_dropped() {
        assert!(resolve("5-2", 10).is_empty());
        assert_eq!(resolve("5-2,8", 10).indices(), &[7]);
    }

    #[test]
    fn test_out_of_bounds_pages() {
        assert!(resolve("0,11", 10).is_empty());
        assert!(resolve("-3", 10).is_empty());
    }

    #[test]
    fn test_malformed_token_skipped() {
        assert_eq!(resolve("abc,2", 10).indices(), &[1]);
        assert_eq!(resolve("1-x,4", 10).indices(), &[3]);
        assert_eq!(resolve("1-3-5,6", 10).indices(), &[0, 1, 2, 5]);
    }

    #[test]
    fn test_trailing_garbage_after_digits() {
        assert_eq!(resolve("3abc,2.5", 10).indices(), &[1, 2]);
        assert_eq!(resolve("2-4pages", 10).indices(), &[1, 2, 3]);
        assert_eq!(resolve("+2", 10).indices(), &[1]);
        assert!(resolve("- 3", 10).is_empty());
    }

    #[test]
    fn test_extra_dashes_use_first_two_numbers() {
        assert_eq!(resolve("1-3-5", 10).indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_overflowing_bounds_saturate() {
        assert_eq!(resolve("1-99999999999999999999", 3).indices(), &[0, 1, 2]);
        assert!(resolve("99999999999999999999", 3).is_empty());
        assert_eq!(parse_page_number("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_page_number("99999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(parse_page_number(" 12 "), Some(12));
        assert_eq!(parse_page_number("-7"), Some(-7));
        assert_eq!(parse_page_number("7x"), Some(7));
        assert_eq!(parse_page_number("x7"), None);
        assert_eq!(parse_page_number("-"), None);
        assert_eq!(parse_page_number(""), None);
    }

    #[test]
    fn test_range_clamped_to_document() {
        assert_eq!(
            resolve("1-100", 10).indices(),
            &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]
        );
        assert_eq!(resolve("0-2", 10).indices(), &[0, 1]);
        assert!(resolve("-5-2", 10).is_empty());
    }

    #[test]
    fn test_huge_range_is_cheap() {
        let selection = resolve("1-9223372036854775807", 3);
        assert_eq!(selection.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_whitespace_tolerance() {
        assert_eq!(resolve(" 2 , 4 - 6 ", 10).indices(), &[1, 3, 4, 5]);
    }

    #[test]
    fn test_zero_page_document() {
        assert!(resolve("1,1-5", 0).is_empty());
    }

    #[test]
    fn test_display_compacts_runs() {
        assert_eq!(resolve("5,1-3,9,10", 10).to_string(), "1-3,5,9-10");
        assert_eq!(PageSelection::default().to_string(), "");
    }

    #[test]
    fn test_page_numbers() {
        assert_eq!(resolve("2,4", 10).page_numbers(), vec![2, 4]);
    }

    #[test]
    fn test_all() {
        let all = PageSelection::all(4);
        assert_eq!(all.indices(), &[0, 1, 2, 3]);
        assert!(all.contains(3));
        assert!(!all.contains(4));
    }

    #[test]
    fn test_select_pages_errors() {
        assert_eq!(select_pages(" ", 10), Err(PageRangeError::Empty));
        assert_eq!(
            select_pages("0, 11", 10),
            Err(PageRangeError::NoValidPages {
                spec: "0, 11".to_string(),
                page_count: 10,
            })
        );
        assert_eq!(select_pages("2", 10).unwrap().indices(), &[1]);
    }

    proptest! {
        #[test]
        fn resolved_indices_are_sorted_and_in_bounds(
            spec in "[0-9 ,a-]{0,40}",
            page_count in 0u32..50,
        ) {
            let selection = resolve(&spec, page_count);
            for pair in selection.indices().windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
            for &index in selection.indices() {
                prop_assert!(index < page_count);
            }
        }

        #[test]
        fn re_encoding_resolves_to_same_selection(
            spec in "[0-9 ,-]{0,40}",
            page_count in 0u32..50,
        ) {
            let selection = resolve(&spec, page_count);
            let joined = selection
                .page_numbers()
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(",");
            prop_assert_eq!(&resolve(&joined, page_count), &selection);
            prop_assert_eq!(&resolve(&selection.to_string(), page_count), &selection);
        }
    }
}
