use std::borrow::Cow;

use crate::ParseJsonPointerError;

pub(crate) struct JsonPointerParser<'a> {
    input: &'a str,
}

impl<'a> JsonPointerParser<'a> {
    #[inline]
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input }
    }
}

impl<'a> Iterator for JsonPointerParser<'a> {
    type Item = Result<String, ParseJsonPointerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.input.is_empty() {
            return None;
        }

        let rest = match self.input.strip_prefix('/') {
            Some(rest) => rest,
            None => {
                self.input = "";
                return Some(Err(ParseJsonPointerError::MissingSlash));
            }
        };

        let (segment, rest) = match memchr::memchr(b'/', rest.as_bytes()) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        self.input = rest;
        Some(unescape_segment(segment).map(Cow::into_owned))
    }
}

/// Escapes a single reference token: `~` becomes `~0` and `/` becomes `~1`.
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if memchr::memchr2(b'~', b'/', segment.as_bytes()).is_none() {
        return Cow::Borrowed(segment);
    }

    let mut output = String::with_capacity(segment.len() + 2);
    for ch in segment.chars() {
        match ch {
            '~' => output.push_str("~0"),
            '/' => output.push_str("~1"),
            ch => output.push(ch),
        }
    }
    Cow::Owned(output)
}

/// Reverses [`escape_segment`]. A `~` that is not followed by `0` or `1` is an error.
pub fn unescape_segment(segment: &str) -> Result<Cow<'_, str>, ParseJsonPointerError> {
    let bytes = segment.as_bytes();
    let mut idx = match memchr::memchr(b'~', bytes) {
        Some(idx) => idx,
        None => return Ok(Cow::Borrowed(segment)),
    };

    let mut output = String::with_capacity(segment.len());
    let mut start = 0;
    loop {
        output.push_str(&segment[start..idx]);
        match bytes.get(idx + 1) {
            Some(b'0') => output.push('~'),
            Some(b'1') => output.push('/'),
            _ => return Err(ParseJsonPointerError::InvalidEscape),
        }
        start = idx + 2;
        match memchr::memchr(b'~', &bytes[start..]) {
            Some(next) => idx = start + next,
            None => break,
        }
    }
    output.push_str(&segment[start..]);

    Ok(Cow::Owned(output))
}

/// Parses an array index token. Leading zeros and signs are not allowed.
pub fn parse_index(segment: &str) -> Option<usize> {
    match segment.as_bytes() {
        [b'0'] => Some(0),
        [b'1'..=b'9', rest @ ..] if rest.iter().all(u8::is_ascii_digit) => segment.parse().ok(),
        _ => None,
    }
}

pub(crate) fn parse_json_pointer(input: &str) -> Result<Vec<String>, ParseJsonPointerError> {
    JsonPointerParser::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! segments {
        ($($value:literal),*) => {
            &[$($value.to_string()),*]
        }
    }

    fn check(input: &str, segments: &[String]) {
        assert_eq!(parse_json_pointer(input).unwrap(), segments);
    }

    #[test]
    fn test_parser() {
        check("", segments!());
        check("/foo", segments!("foo"));
        check("/foo/0", segments!("foo", "0"));
        check("/", segments!(""));
        check("//", segments!("", ""));
        check("/a~1b", segments!("a/b"));
        check("/c%d", segments!("c%d"));
        check("/e^f", segments!("e^f"));
        check("/g|h", segments!("g|h"));
        check("/ ", segments!(" "));
        check("/m~0n", segments!("m~n"));
        check("/~01", segments!("~1"));
        check("/~10", segments!("/0"));
    }

    #[test]
    fn test_parser_rejects() {
        assert_eq!(
            parse_json_pointer("a"),
            Err(ParseJsonPointerError::MissingSlash)
        );
        assert_eq!(
            parse_json_pointer("/a~c"),
            Err(ParseJsonPointerError::InvalidEscape)
        );
        assert_eq!(
            parse_json_pointer("/~2d"),
            Err(ParseJsonPointerError::InvalidEscape)
        );
        assert_eq!(
            parse_json_pointer("/abc~"),
            Err(ParseJsonPointerError::InvalidEscape)
        );
    }

    #[test]
    fn test_escape() {
        assert!(matches!(escape_segment("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_segment(""), "");
        assert_eq!(escape_segment("/"), "~1");
        assert_eq!(escape_segment("~"), "~0");
        assert_eq!(escape_segment("a/b~c"), "a~1b~0c");
        assert_eq!(escape_segment("~1"), "~01");
        assert_eq!(escape_segment("é/ü"), "é~1ü");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        for segment in ["", "/", "~", "~1", "~0/", "a/b~c", "é/ü~"] {
            assert_eq!(unescape_segment(&escape_segment(segment)).unwrap(), segment);
        }
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("7"), Some(7));
        assert_eq!(parse_index("120"), Some(120));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("-"), None);
        assert_eq!(parse_index("1a"), None);
    }
}
