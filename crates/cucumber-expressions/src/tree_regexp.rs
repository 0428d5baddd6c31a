//! A regular expression together with the nesting of its capture groups.
//!
//! Matching yields a [`Group`] tree whose root covers the whole match and
//! whose children are the top-level capture groups. Non-capturing groups,
//! flag groups and look-arounds do not appear in the tree; their capturing
//! descendants are attached to the nearest capturing ancestor.

use regex::{Captures, Regex};

use crate::errors::CucumberExpressionError;

/// A captured group and the capture groups nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Captured text, or `None` when the group did not participate.
    pub value: Option<String>,
    /// Byte offset where the capture starts.
    pub start: Option<usize>,
    /// Byte offset where the capture ends.
    pub end: Option<usize>,
    /// Directly nested capture groups.
    pub children: Vec<Group>,
}

impl Group {
    /// Values of the direct children, or this group's own value when it has
    /// no children.
    ///
    /// # Examples
    /// ```
    /// use cucumber_expressions::TreeRegexp;
    ///
    /// let tree = TreeRegexp::new(r"(\d+)-((a)|(b))").expect("valid regex");
    /// let root = tree.match_text("12-b").expect("text matches");
    /// let second = &root.children[1];
    /// assert_eq!(second.values(), [None, Some("b")]);
    /// assert_eq!(root.children[0].values(), [Some("12")]);
    /// ```
    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        if self.children.is_empty() {
            vec![self.value.as_deref()]
        } else {
            self.children
                .iter()
                .map(|child| child.value.as_deref())
                .collect()
        }
    }
}

/// Capture-group skeleton recovered from regex source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GroupBuilder {
    capturing: bool,
    source: String,
    children: Vec<GroupBuilder>,
}

impl GroupBuilder {
    fn capturing() -> Self {
        Self {
            capturing: true,
            ..Self::default()
        }
    }

    /// Regex source between the group's parentheses.
    pub(crate) fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn children(&self) -> &[Self] {
        &self.children
    }

    fn build(&self, captures: &Captures<'_>, index: &mut usize) -> Group {
        let found = captures.get(*index);
        *index += 1;
        let children = self
            .children
            .iter()
            .map(|child| child.build(captures, index))
            .collect();
        Group {
            value: found.map(|m| m.as_str().to_string()),
            start: found.map(|m| m.start()),
            end: found.map(|m| m.end()),
            children,
        }
    }
}

/// A compiled regex plus its capture-group tree.
#[derive(Debug, Clone)]
pub struct TreeRegexp {
    source: String,
    regex: Regex,
    group_builder: GroupBuilder,
}

impl TreeRegexp {
    /// Compile `pattern` and analyse its groups.
    ///
    /// `\d` and `\D` are compiled as ASCII digit classes, so `{int}` does not
    /// accept digits from other scripts.
    ///
    /// # Errors
    /// Returns [`CucumberExpressionError::Regex`] when `pattern` is not a
    /// valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, CucumberExpressionError> {
        let regex = Regex::new(&ascii_digits(pattern))?;
        let group_builder = create_group_builder(pattern);
        Ok(Self {
            source: pattern.to_string(),
            regex,
            group_builder,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled regex.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) const fn group_builder(&self) -> &GroupBuilder {
        &self.group_builder
    }

    /// Match `text`, returning the group tree or `None` when it does not
    /// match.
    #[must_use]
    pub fn match_text(&self, text: &str) -> Option<Group> {
        let captures = self.regex.captures(text)?;
        let mut index = 0;
        Some(self.group_builder.build(&captures, &mut index))
    }
}

/// Rewrite `\d` and `\D` as ASCII ranges; `regex` gives them Unicode
/// meaning.
pub(crate) fn ascii_digits(source: &str) -> String {
    let mut narrowed = String::with_capacity(source.len());
    let mut escaping = false;
    let mut char_class = false;
    for ch in source.chars() {
        if escaping {
            escaping = false;
            match (ch, char_class) {
                ('d', true) => narrowed.push_str("0-9"),
                ('d', false) => narrowed.push_str("[0-9]"),
                ('D', false) => narrowed.push_str("[^0-9]"),
                _ => {
                    narrowed.push('\\');
                    narrowed.push(ch);
                }
            }
            continue;
        }
        match ch {
            '\\' => {
                escaping = true;
                continue;
            }
            '[' => char_class = true,
            ']' => char_class = false,
            _ => {}
        }
        narrowed.push(ch);
    }
    if escaping {
        narrowed.push('\\');
    }
    narrowed
}

fn create_group_builder(source: &str) -> GroupBuilder {
    let mut stack = vec![GroupBuilder::capturing()];
    let mut group_starts = Vec::new();
    let mut escaping = false;
    let mut char_class = false;
    for (index, ch) in source.char_indices() {
        match ch {
            '[' if !escaping => char_class = true,
            ']' if !escaping => char_class = false,
            '(' if !escaping && !char_class => {
                group_starts.push(index);
                stack.push(GroupBuilder {
                    capturing: !is_non_capturing(source, index),
                    ..GroupBuilder::default()
                });
            }
            ')' if !escaping && !char_class => {
                let (Some(mut group), Some(start)) = (stack.pop(), group_starts.pop()) else {
                    continue;
                };
                let Some(parent) = stack.last_mut() else {
                    continue;
                };
                if group.capturing {
                    group.source = source.get(start + 1..index).unwrap_or_default().to_string();
                    parent.children.push(group);
                } else {
                    parent.children.append(&mut group.children);
                }
            }
            _ => {}
        }
        escaping = !escaping && ch == '\\';
    }
    stack.into_iter().next().unwrap_or_default()
}

/// Whether the group opening at byte `index` does not capture.
///
/// `(?P<name>` and `(?<name>` capture; every other `(?` form does not.
fn is_non_capturing(source: &str, index: usize) -> bool {
    let Some(rest) = source.get(index + 1..) else {
        return false;
    };
    let Some(after_question) = rest.strip_prefix('?') else {
        return false;
    };
    if after_question.starts_with("P<") {
        return false;
    }
    after_question
        .strip_prefix('<')
        .is_none_or(|name| name.starts_with(['=', '!']))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tree(pattern: &str) -> TreeRegexp {
        TreeRegexp::new(pattern).unwrap_or_else(|e| panic!("{pattern:?} should compile: {e}"))
    }

    fn sources(builder: &GroupBuilder) -> Vec<String> {
        builder
            .children()
            .iter()
            .map(|child| child.source().to_string())
            .collect()
    }

    #[rstest]
    #[case(r"(a)(b)", &["a", "b"])]
    #[case(r"(?:a(b))(c)", &["b", "c"])]
    #[case(r"(?i)(a)", &["a"])]
    #[case(r"(?i:(a))", &["a"])]
    #[case(r"(?P<first>a)", &["?P<first>a"])]
    #[case(r"(?<first>a)", &["?<first>a"])]
    #[case(r"\(a\)(b)", &["b"])]
    #[case(r"[(](b)", &["b"])]
    #[case(r"[\]\(](c)", &["c"])]
    #[case(r"\\(d)", &["d"])]
    fn finds_top_level_capture_groups(#[case] pattern: &str, #[case] expected: &[&str]) {
        assert_eq!(sources(tree(pattern).group_builder()), expected);
    }

    #[rstest]
    #[case(r"-?\d+", "-?[0-9]+")]
    #[case(r"[-+]?\d*\.?\d+", r"[-+]?[0-9]*\.?[0-9]+")]
    #[case(r"[^\d,]", "[^0-9,]")]
    #[case(r"\D", "[^0-9]")]
    #[case(r"\\d", r"\\d")]
    #[case(r"\w\s", r"\w\s")]
    fn narrows_digit_classes(#[case] pattern: &str, #[case] expected: &str) {
        assert_eq!(ascii_digits(pattern), expected);
    }

    #[test]
    fn other_scripts_digits_do_not_match() {
        let tree = tree(r"^(-?\d+)$");
        assert_eq!(tree.source(), r"^(-?\d+)$");
        assert!(tree.match_text("\u{663}").is_none());
        assert!(tree.match_text("3").is_some());
    }

    #[test]
    fn treats_lookarounds_as_non_capturing() {
        assert!(is_non_capturing("(?=a)", 0));
        assert!(is_non_capturing("(?!a)", 0));
        assert!(is_non_capturing("(?<=a)", 0));
        assert!(is_non_capturing("(?<!a)", 0));
        assert!(!is_non_capturing("(?<n>a)", 0));
        assert!(!is_non_capturing("(a)", 0));
    }

    #[test]
    fn nests_groups() {
        let tree = tree(r"^((a)(b))(c)$");
        let root = tree
            .match_text("abc")
            .unwrap_or_else(|| panic!("abc should match"));
        assert_eq!(root.value.as_deref(), Some("abc"));
        let outer = root
            .children
            .first()
            .unwrap_or_else(|| panic!("outer group"));
        assert_eq!(outer.value.as_deref(), Some("ab"));
        assert_eq!(outer.values(), [Some("a"), Some("b")]);
        assert_eq!((outer.start, outer.end), (Some(0), Some(2)));
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn unmatched_groups_are_absent() {
        let tree = tree(r"^a(?:(\d+))?$");
        let root = tree.match_text("a").unwrap_or_else(|| panic!("a should match"));
        let group = root.children.first().unwrap_or_else(|| panic!("one group"));
        assert_eq!(group.values(), [None::<&str>]);
        assert_eq!(group.start, None);
    }

    #[test]
    fn no_match_is_none() {
        assert!(tree("^a$").match_text("b").is_none());
    }

    #[test]
    fn rejects_invalid_patterns() {
        assert!(matches!(TreeRegexp::new("("), Err(CucumberExpressionError::Regex(_))));
    }
}
