//! Delimiter-based line classification
//!
//! Every raw line is matched against four rules in a fixed priority order and
//! the first match wins:
//!
//! 1. `::` anywhere: the payload starts right after the *first* colon of the
//!    pair, so the second colon stays in the payload. The original line is
//!    mirrored to the secondary sink.
//! 2. a single `:`: the payload is everything after it.
//! 3. `;`: the payload is everything after it, and the original line is
//!    mirrored.
//! 4. anything else is dropped.
//!
//! Only the leftmost occurrence of a delimiter is considered.

/// Which rule matched a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Line contains `::`
    DoubleColon,
    /// Line contains `:` but no `::`
    Colon,
    /// Line contains `;` and no `:`
    Semicolon,
    /// No delimiter, line is dropped
    Unmatched,
}

/// Result of classifying a single raw line
///
/// Borrows the payload from the classified line; nothing is copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    rule: Rule,
    payload: Option<&'a [u8]>,
}

impl<'a> Classification<'a> {
    /// Payload destined for the primary sink, if any
    pub fn payload(&self) -> Option<&'a [u8]> {
        self.payload
    }

    /// Whether the untouched original line goes to the secondary sink
    pub fn mirror_original(&self) -> bool {
        matches!(self.rule, Rule::DoubleColon | Rule::Semicolon)
    }

    /// The rule that produced this classification
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// True when the line is written to neither sink
    pub fn is_dropped(&self) -> bool {
        self.rule == Rule::Unmatched
    }
}

/// Classify one raw line (without its terminator)
pub fn classify(line: &[u8]) -> Classification<'_> {
    if let Some(pos) = find_pair(line, b':') {
        return Classification {
            rule: Rule::DoubleColon,
            payload: Some(&line[pos + 1..]),
        };
    }

    if let Some(pos) = find_byte(line, b':') {
        return Classification {
            rule: Rule::Colon,
            payload: Some(&line[pos + 1..]),
        };
    }

    if let Some(pos) = find_byte(line, b';') {
        return Classification {
            rule: Rule::Semicolon,
            payload: Some(&line[pos + 1..]),
        };
    }

    Classification {
        rule: Rule::Unmatched,
        payload: None,
    }
}

fn find_byte(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

fn find_pair(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.windows(2).position(|w| w[0] == needle && w[1] == needle)
}
