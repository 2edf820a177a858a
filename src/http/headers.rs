use std::collections::HashMap;

use crate::http::parser::{find_crlf, ParseError, CRLF};

/// Outcome of one [`HeaderMap::parse`] step.
///
/// `consumed == 0 && !done` means no complete line is buffered yet; append
/// more bytes and call again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderParse {
    pub consumed: usize,
    pub done: bool,
}

/// Header name → value container.
///
/// Names are stored lowercase. Adding a value under a name that is already
/// present joins the two with `", "`. Entries iterate in the order their name
/// was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
    // name -> position in `entries`
    index: HashMap<String, usize>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes at most one header line from the front of `data`.
    ///
    /// Returns `done` once the blank line ending the block is reached; the
    /// two bytes of that line are counted in `consumed`. Values that are not
    /// UTF-8 (obs-text) are kept with invalid bytes replaced.
    pub fn parse(&mut self, data: &[u8]) -> Result<HeaderParse, ParseError> {
        let Some(idx) = find_crlf(data) else {
            return Ok(HeaderParse { consumed: 0, done: false });
        };

        if idx == 0 {
            return Ok(HeaderParse { consumed: CRLF.len(), done: true });
        }

        let line = &data[..idx];
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(ParseError::MalformedHeader)?;

        let (raw_name, raw_value) = (&line[..colon], &line[colon + 1..]);

        if raw_name.last().is_some_and(|b| b.is_ascii_whitespace()) {
            return Err(ParseError::InvalidHeaderName);
        }

        let name = raw_name.trim_ascii_start();
        if !is_token(name) {
            return Err(ParseError::InvalidHeaderName);
        }

        // is_token guarantees ASCII
        let name = String::from_utf8_lossy(name);
        let value = String::from_utf8_lossy(raw_value.trim_ascii());
        self.append(&name, &value);

        Ok(HeaderParse {
            consumed: idx + CRLF.len(),
            done: false,
        })
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&str> {
        let &pos = self.index.get(&name.to_ascii_lowercase())?;
        Some(self.entries[pos].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds `value` under `name`, joining onto an existing value with `", "`.
    pub fn append(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.index.get(&name) {
            Some(&pos) => {
                let existing = &mut self.entries[pos].1;
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => self.push(name, value.to_string()),
        }
    }

    /// Sets `name` to `value`, replacing whatever was there.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        match self.index.get(&name) {
            Some(&pos) => self.entries[pos].1 = value,
            None => self.push(name, value),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.index.remove(&name.to_ascii_lowercase())?;
        let (_, value) = self.entries.remove(pos);
        for later in self.index.values_mut().filter(|p| **p > pos) {
            *later -= 1;
        }
        Some(value)
    }

    fn push(&mut self, name: String, value: String) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes every entry as `name: value\r\n`, followed by the blank
    /// line that ends a header or trailer block.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for (k, v) in self.iter() {
            buf.extend_from_slice(k.as_bytes());
            buf.extend_from_slice(b": ");
            buf.extend_from_slice(v.as_bytes());
            buf.extend_from_slice(CRLF);
        }
        buf.extend_from_slice(CRLF);
        buf
    }
}

fn is_token(name: &[u8]) -> bool {
    !name.is_empty() && name.iter().all(|&b| is_token_char(b))
}

fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_header() {
        let mut headers = HeaderMap::new();
        let data = b"Host: localhost:42069\r\n\r\n";

        let step = headers.parse(data).unwrap();

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(step, HeaderParse { consumed: 23, done: false });
    }

    #[test]
    fn parse_strips_surrounding_value_whitespace() {
        let mut headers = HeaderMap::new();
        let data = b"       Host:    localhost:42069     \r\n\r\n";

        let step = headers.parse(data).unwrap();

        assert_eq!(headers.get("Host"), Some("localhost:42069"));
        assert_eq!(step.consumed, data.len() - 2);
        assert!(!step.done);
    }

    #[test]
    fn parse_keeps_existing_entries() {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", "*/*");

        headers.parse(b"User-Agent: curl/8.5\r\n").unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("accept"), Some("*/*"));
        assert_eq!(headers.get("user-agent"), Some("curl/8.5"));
    }

    #[test]
    fn parse_rejects_invalid_token_characters() {
        let mut headers = HeaderMap::new();

        let result = headers.parse(b"H\xc2\xa9st: localhost\r\n\r\n");

        assert!(matches!(result, Err(ParseError::InvalidHeaderName)));
        assert!(headers.is_empty());
    }

    #[test]
    fn parse_accepts_token_punctuation() {
        let mut headers = HeaderMap::new();

        headers.parse(b"X-A!#$%&'*+.^_`|~z: ok\r\n").unwrap();

        assert_eq!(headers.get("x-a!#$%&'*+.^_`|~z"), Some("ok"));
    }

    #[test]
    fn parse_rejects_empty_name() {
        let mut headers = HeaderMap::new();

        let result = headers.parse(b": value\r\n");

        assert!(matches!(result, Err(ParseError::InvalidHeaderName)));
    }

    #[test]
    fn parse_keeps_obs_text_values() {
        let mut headers = HeaderMap::new();

        headers.parse(b"X-Name: caf\xe9\r\n").unwrap();

        assert_eq!(headers.get("x-name"), Some("caf\u{fffd}"));
    }

    #[test]
    fn remove_keeps_index_consistent() {
        let mut headers = HeaderMap::new();
        headers.insert("A", "1");
        headers.insert("B", "2");
        headers.insert("C", "3");

        headers.remove("a");
        headers.append("c", "4");
        headers.insert("D", "5");

        assert_eq!(headers.get("b"), Some("2"));
        assert_eq!(headers.get("c"), Some("3, 4"));
        let names: Vec<&str> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["b", "c", "d"]);
    }

    #[test]
    fn remove_and_insert() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Length", "10");
        headers.insert("content-length", "0");
        assert_eq!(headers.get("CONTENT-LENGTH"), Some("0"));

        assert_eq!(headers.remove("Content-Length"), Some("0".to_string()));
        assert!(!headers.contains("content-length"));
        assert_eq!(headers.remove("content-length"), None);
    }
}
