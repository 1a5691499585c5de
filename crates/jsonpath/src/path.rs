//! Path expressions of the form `a.b[0].c`.

use std::fmt;

/// One step of a [`PathExpression`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object member access.
    Field(String),
    /// Array element access.
    Index(usize),
    /// Bracket contents that are not a plain non-negative integer.
    /// Never resolves to anything.
    InvalidIndex(String),
}

/// A parsed path. An empty path addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathExpression {
    raw: String,
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parse a path string. Parsing never fails; malformed index tokens
    /// become [`Segment::InvalidIndex`] and resolve to not-found later.
    pub fn parse(path: &str) -> Self {
        let mut segments = Vec::new();

        if !path.is_empty() {
            for part in path.split('.') {
                match split_bracket(part) {
                    Some((name, token)) => {
                        segments.push(Segment::Field(name.to_string()));
                        segments.push(parse_index(token));
                    }
                    None => segments.push(Segment::Field(part.to_string())),
                }
            }
        }

        Self {
            raw: path.to_string(),
            segments,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The dot-separated parts exactly as written, brackets included.
    /// Destination paths are written with these as literal object keys.
    pub fn literal_keys(&self) -> Vec<&str> {
        if self.raw.is_empty() {
            Vec::new()
        } else {
            self.raw.split('.').collect()
        }
    }
}

impl From<&str> for PathExpression {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split `name[token]...` into `(name, token)`. Only the first bracket pair
/// counts; anything after the first `]` is ignored.
fn split_bracket(part: &str) -> Option<(&str, &str)> {
    let open = part.find('[')?;
    let close = part.find(']')?;
    if close < open {
        return None;
    }
    Some((&part[..open], &part[open + 1..close]))
}

fn parse_index(token: &str) -> Segment {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Segment::InvalidIndex(token.to_string());
    }
    match token.parse::<usize>() {
        Ok(n) => Segment::Index(n),
        Err(_) => Segment::InvalidIndex(token.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Segment {
        Segment::Field(name.to_string())
    }

    #[test]
    fn test_empty_path_is_root() {
        let path = PathExpression::parse("");
        assert!(path.is_root());
        assert!(path.literal_keys().is_empty());
    }

    #[test]
    fn test_dotted_fields() {
        let path = PathExpression::parse("a.b.c");
        assert_eq!(path.segments(), &[field("a"), field("b"), field("c")]);
    }

    #[test]
    fn test_bracket_splits_into_field_and_index() {
        let path = PathExpression::parse("items[0].title");
        assert_eq!(
            path.segments(),
            &[field("items"), Segment::Index(0), field("title")]
        );
    }

    #[test]
    fn test_non_numeric_index_is_kept_as_invalid() {
        let path = PathExpression::parse("items[x]");
        assert_eq!(
            path.segments(),
            &[field("items"), Segment::InvalidIndex("x".to_string())]
        );

        for token in ["-1", "+1", "", " 1", "99999999999999999999999999"] {
            let path = PathExpression::parse(&format!("a[{}]", token));
            assert_eq!(path.segments()[1], Segment::InvalidIndex(token.to_string()));
        }
    }

    #[test]
    fn test_leading_bracket_has_empty_field_name() {
        let path = PathExpression::parse("[2]");
        assert_eq!(path.segments(), &[field(""), Segment::Index(2)]);
    }

    #[test]
    fn test_only_first_bracket_pair_counts() {
        let path = PathExpression::parse("grid[1][2]");
        assert_eq!(path.segments(), &[field("grid"), Segment::Index(1)]);
    }

    #[test]
    fn test_unbalanced_brackets_are_plain_fields() {
        assert_eq!(PathExpression::parse("a[0").segments(), &[field("a[0")]);
        assert_eq!(PathExpression::parse("a]0[").segments(), &[field("a]0[")]);
    }

    #[test]
    fn test_literal_keys_keep_brackets() {
        let path = PathExpression::parse("out.items[0]");
        assert_eq!(path.literal_keys(), vec!["out", "items[0]"]);
        assert_eq!(path.to_string(), "out.items[0]");
    }
}
