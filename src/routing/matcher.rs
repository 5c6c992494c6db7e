//! Route matching module
//!
//! Matches a request path against a route template. Literal segments
//! compare case-insensitively, `:name` segments bind one non-empty
//! percent-decoded segment, and a single trailing slash is ignored.
//! A segment that does not decode still matches; the request is rejected
//! later, once the route is known.

/// Named path parameters bound by a template match, in template order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    params: Vec<(String, String)>,
    undecodable: Option<String>,
}

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// First raw segment that failed to percent-decode
    pub fn undecodable(&self) -> Option<&str> {
        self.undecodable.as_deref()
    }

    fn insert(&mut self, name: &str, value: String) {
        self.params.push((name.to_string(), value));
    }
}

/// Match `path` against `pattern`, returning bound parameters on success
pub fn match_pattern(pattern: &str, path: &str) -> Option<PathParams> {
    let path = strip_trailing_slash(path);
    let pattern = strip_trailing_slash(pattern);

    let mut params = PathParams::default();
    let mut path_segments = path.split('/');

    for expected in pattern.split('/') {
        let actual = path_segments.next()?;
        if let Some(name) = expected.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            if let Some(value) = decode_segment(actual) {
                params.insert(name, value);
            } else {
                params.undecodable.get_or_insert_with(|| actual.to_string());
                params.insert(name, actual.to_string());
            }
        } else if !expected.eq_ignore_ascii_case(actual) {
            return None;
        }
    }

    // Extra path segments mean the template did not cover the whole path
    if path_segments.next().is_some() {
        return None;
    }

    Some(params)
}

/// Percent-decode a path segment
///
/// `None` when a `%` is not followed by two hex digits or the decoded
/// bytes are not UTF-8.
fn decode_segment(segment: &str) -> Option<String> {
    let bytes = segment.as_bytes();
    let well_formed = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || (bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    });
    if !well_formed {
        return None;
    }
    urlencoding::decode(segment).ok().map(std::borrow::Cow::into_owned)
}

fn strip_trailing_slash(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}
