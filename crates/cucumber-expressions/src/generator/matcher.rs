//! Scans sample text for whole-word matches of one parameter type regexp.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::{Arc, LazyLock};

use crate::parameter::ParameterType;
use crate::tree_regexp::ascii_digits;

static BOUNDARY_CHAR: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\s\p{Z}\p{P}\p{S}]$").ok());

/// One regexp of a parameter type, positioned on its next whole-word match.
#[derive(Debug, Clone)]
pub(crate) struct ParameterTypeMatcher<'t> {
    parameter_type: Arc<ParameterType>,
    regex: Regex,
    text: &'t str,
    found: Option<(usize, usize)>,
}

impl<'t> ParameterTypeMatcher<'t> {
    /// Matchers for every regexp of `parameter_type`, not yet positioned.
    pub(crate) fn for_type(parameter_type: &Arc<ParameterType>, text: &'t str) -> Vec<Self> {
        parameter_type
            .regexps()
            .iter()
            .filter_map(|regexp| Regex::new(&ascii_digits(&format!("({regexp})"))).ok())
            .map(|regex| Self {
                parameter_type: Arc::clone(parameter_type),
                regex,
                text,
                found: None,
            })
            .collect()
    }

    /// Position on the first non-empty whole-word match starting the search
    /// at byte offset `position` or later.
    pub(crate) fn advance_to(&self, position: usize) -> Self {
        let found = self
            .text
            .char_indices()
            .map(|(offset, _)| offset)
            .filter(|offset| *offset >= position)
            .find_map(|offset| self.whole_word_match_from(offset));
        Self {
            found,
            ..self.clone()
        }
    }

    fn whole_word_match_from(&self, offset: usize) -> Option<(usize, usize)> {
        let rest = self.text.get(offset..)?;
        let found = self.regex.find(rest)?;
        let (start, end) = (offset + found.start(), offset + found.end());
        (start < end && self.is_word_boundary(start, end)).then_some((start, end))
    }

    fn is_word_boundary(&self, start: usize, end: usize) -> bool {
        let before = self
            .text
            .get(..start)
            .and_then(|head| head.chars().next_back());
        let after = self.text.get(end..).and_then(|tail| tail.chars().next());
        before.is_none_or(is_boundary_char) && after.is_none_or(is_boundary_char)
    }

    pub(crate) const fn found(&self) -> Option<(usize, usize)> {
        self.found
    }

    pub(crate) fn parameter_type(&self) -> &Arc<ParameterType> {
        &self.parameter_type
    }

    /// Earlier matches first, then longer ones.
    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        match (self.found, other.found) {
            (Some((a_start, a_end)), Some((b_start, b_end))) => a_start
                .cmp(&b_start)
                .then_with(|| (b_end - b_start).cmp(&(a_end - a_start))),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Whitespace, punctuation and symbols delimit words; letters, digits and
/// marks do not.
fn is_boundary_char(ch: char) -> bool {
    let mut buf = [0; 4];
    BOUNDARY_CHAR
        .as_ref()
        .is_some_and(|boundary| boundary.is_match(ch.encode_utf8(&mut buf)))
}
