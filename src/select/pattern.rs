use std::collections::BTreeSet;

use thiserror::Error;

/// En-dash, commonly produced by word processors when users type `3-5`.
/// Treated as equivalent to the ASCII hyphen when splitting ranges.
const EN_DASH: char = '\u{2013}';

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Page pattern is empty")]
    EmptyPattern,
    #[error("Invalid page number: {0}")]
    InvalidPageNumber(String),
    #[error("Invalid page range: {0}")]
    InvalidRange(String),
    #[error("Page range out of order: {0}")]
    RangeOutOfOrder(String),
    #[error("Range {0} exceeds document ({1} page(s))")]
    RangeExceedsDocument(String, u32),
    #[error("Page {0} is out of range (1-{1})")]
    PageOutOfRange(u32, u32),
    #[error("No pages selected")]
    NoPagesSelected,
}

/// Parse a page pattern like "1, 3-5, 10" into a sorted, deduplicated list
/// of 1-based page numbers, validated against `max_pages`.
///
/// Duplicate pages across tokens collapse silently. Parsing is pure: the
/// same input always yields the same output.
pub fn parse(pattern: &str, max_pages: u32) -> Result<Vec<u32>, ParseError> {
    let tokens: Vec<&str> = pattern
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    let mut pages = BTreeSet::new();

    for token in tokens {
        let normalized = token.replace(EN_DASH, "-");

        if normalized.contains('-') {
            let (start, end) = split_range(&normalized, token)?;
            if start < 1 || end < start {
                return Err(ParseError::RangeOutOfOrder(token.to_string()));
            }
            if end > max_pages {
                return Err(ParseError::RangeExceedsDocument(token.to_string(), max_pages));
            }
            pages.extend(start..=end);
        } else {
            let page: u32 = normalized
                .parse()
                .map_err(|_| ParseError::InvalidPageNumber(token.to_string()))?;
            if page < 1 || page > max_pages {
                return Err(ParseError::PageOutOfRange(page, max_pages));
            }
            pages.insert(page);
        }
    }

    // Guard against pathological inputs; unreachable when any token parsed.
    if pages.is_empty() {
        return Err(ParseError::NoPagesSelected);
    }

    Ok(pages.into_iter().collect())
}

fn split_range(normalized: &str, token: &str) -> Result<(u32, u32), ParseError> {
    let parts: Vec<&str> = normalized.split('-').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(ParseError::InvalidRange(token.to_string()));
    }

    let start: u32 = parts[0]
        .parse()
        .map_err(|_| ParseError::InvalidRange(token.to_string()))?;
    let end: u32 = parts[1]
        .parse()
        .map_err(|_| ParseError::InvalidRange(token.to_string()))?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_page() {
        assert_eq!(parse("5", 10).unwrap(), vec![5]);
    }

    #[test]
    fn test_mixed_pattern() {
        assert_eq!(parse("1, 3-5, 10", 10).unwrap(), vec![1, 3, 4, 5, 10]);
    }

    #[test]
    fn test_en_dash_range() {
        assert_eq!(parse("3\u{2013}5", 10).unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(parse("1-3, 2, 3, 3-4", 10).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(parse("", 10), Err(ParseError::EmptyPattern));
        assert_eq!(parse(" , ,", 10), Err(ParseError::EmptyPattern));
    }

    #[test]
    fn test_invalid_page_number() {
        assert_eq!(
            parse("abc", 10),
            Err(ParseError::InvalidPageNumber("abc".to_string()))
        );
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            parse("1-2-3", 10),
            Err(ParseError::InvalidRange("1-2-3".to_string()))
        );
        assert_eq!(
            parse("1-x", 10),
            Err(ParseError::InvalidRange("1-x".to_string()))
        );
        assert_eq!(
            parse("-5", 10),
            Err(ParseError::InvalidRange("-5".to_string()))
        );
        assert_eq!(
            parse("3-", 10),
            Err(ParseError::InvalidRange("3-".to_string()))
        );
    }

    #[test]
    fn test_reversed_range_errors() {
        assert_eq!(
            parse("5-2", 10),
            Err(ParseError::RangeOutOfOrder("5-2".to_string()))
        );
    }

    #[test]
    fn test_zero_start_is_out_of_order() {
        assert_eq!(
            parse("0-3", 10),
            Err(ParseError::RangeOutOfOrder("0-3".to_string()))
        );
    }

    #[test]
    fn test_range_exceeds_document() {
        assert_eq!(
            parse("1-20", 10),
            Err(ParseError::RangeExceedsDocument("1-20".to_string(), 10))
        );
    }

    #[test]
    fn test_page_out_of_range() {
        assert_eq!(parse("0", 10), Err(ParseError::PageOutOfRange(0, 10)));
        assert_eq!(parse("11", 10), Err(ParseError::PageOutOfRange(11, 10)));
    }

    #[test]
    fn test_deterministic() {
        let a = parse("7, 1-3, 2", 10).unwrap();
        let b = parse("7, 1-3, 2", 10).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, vec![1, 2, 3, 7]);
    }
}
