//! Plain-data descriptions of HTTP requests and responses.
//!
//! # Design
//! The client never performs I/O. `build_*` methods emit an `HttpRequest`,
//! the host runs it over whatever transport it likes, and the resulting
//! `HttpResponse` goes back into a `parse_*` method. Keeping the exchange as
//! plain owned data makes every operation reproducible in tests and leaves
//! timeouts, retries, and cancellation entirely to the host.

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request waiting to be executed by the host.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// The host-observed outcome of an executed `HttpRequest`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Percent-encode a query component per RFC 3986.
///
/// Everything outside the unreserved set (`A-Z a-z 0-9 - _ . ~`) becomes an
/// uppercase `%XX` byte escape, including `&`, `=`, and spaces, so an encoded
/// component can never split a `key=value` pair.
pub fn percent_encode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Join `key=value` pairs into a query string, percent-encoding both sides.
///
/// Pairs are emitted in iteration order. An empty iterator yields an empty
/// string; the joiner never produces a leading, trailing, or doubled `&`.
pub fn query_string<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(percent_encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(percent_encode("hello world"), "hello%20world");
        assert_eq!(percent_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(percent_encode("fr/ca"), "fr%2Fca");
    }

    #[test]
    fn multibyte_characters_escape_every_byte() {
        assert_eq!(percent_encode("é"), "%C3%A9");
    }

    #[test]
    fn query_string_joins_pairs_in_order() {
        assert_eq!(query_string([("a", "1"), ("b", "2")]), "a=1&b=2");
    }

    #[test]
    fn query_string_empty_iterator_is_empty() {
        assert_eq!(query_string([]), "");
    }

    #[test]
    fn query_string_encodes_keys_and_values() {
        assert_eq!(query_string([("a key", "a value")]), "a%20key=a%20value");
    }
}
