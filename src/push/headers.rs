//! Header sets for synthetic pushed requests.

use axum::http::header::{
    self, HeaderName, HeaderValue, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT,
};
use axum::http::{HeaderMap, Uri};

/// Marker carried by every pushed request. A request that already has it
/// was generated by a push and must not trigger further pushes.
pub const PUSH_MARKER: HeaderName = HeaderName::from_static("x-push");

/// Inbound headers copied onto pushed requests. Everything else is dropped.
pub const PROXIED_HEADERS: [HeaderName; 5] = [
    ACCEPT_ENCODING,
    ACCEPT_LANGUAGE,
    CACHE_CONTROL,
    header::HOST,
    USER_AGENT,
];

/// Build the base header set for pushes issued on behalf of a request.
///
/// All values of each allow-listed header are kept in order. HTTP/2
/// requests carry the host in `:authority`, so `Host` falls back to the URI
/// authority when the header itself is absent. The push marker is always set.
pub fn proxied_headers(headers: &HeaderMap, uri: &Uri) -> HeaderMap {
    let mut out = HeaderMap::new();
    for name in PROXIED_HEADERS {
        for value in headers.get_all(&name) {
            out.append(name.clone(), value.clone());
        }
    }

    if !out.contains_key(header::HOST) {
        if let Some(host) = uri
            .authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
        {
            out.insert(header::HOST, host);
        }
    }

    out.insert(PUSH_MARKER, HeaderValue::from_static("1"));
    out
}

/// Copy `base`, then append every value of `overlay` after it.
///
/// Values are never overwritten: a name present in both keeps the base
/// values first and the overlay values after.
pub fn merge_headers(base: &HeaderMap, overlay: &HeaderMap) -> HeaderMap {
    let mut out = base.clone();
    for (name, value) in overlay {
        out.append(name.clone(), value.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<'a>(headers: &'a HeaderMap, name: &str) -> Vec<&'a str> {
        headers
            .get_all(name)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect()
    }

    #[test]
    fn test_merge_appends_overlay_after_base() {
        let mut base = HeaderMap::new();
        base.append("a", HeaderValue::from_static("1"));
        let mut overlay = HeaderMap::new();
        overlay.append("a", HeaderValue::from_static("2"));
        overlay.append("b", HeaderValue::from_static("3"));

        let merged = merge_headers(&base, &overlay);
        assert_eq!(values(&merged, "a"), ["1", "2"]);
        assert_eq!(values(&merged, "b"), ["3"]);
        assert_eq!(values(&base, "a"), ["1"]);
    }

    #[test]
    fn test_only_allow_listed_headers_propagate() {
        let mut inbound = HeaderMap::new();
        inbound.insert(USER_AGENT, HeaderValue::from_static("X"));
        inbound.insert("x-custom", HeaderValue::from_static("Y"));
        inbound.insert(header::COOKIE, HeaderValue::from_static("session=1"));
        inbound.append(ACCEPT_LANGUAGE, HeaderValue::from_static("en"));
        inbound.append(ACCEPT_LANGUAGE, HeaderValue::from_static("fr"));

        let proxied = proxied_headers(&inbound, &Uri::from_static("/"));
        assert_eq!(values(&proxied, "user-agent"), ["X"]);
        assert_eq!(values(&proxied, "accept-language"), ["en", "fr"]);
        assert!(!proxied.contains_key("x-custom"));
        assert!(!proxied.contains_key(header::COOKIE));
        assert!(proxied.contains_key(PUSH_MARKER));
    }

    #[test]
    fn test_host_falls_back_to_authority() {
        let proxied = proxied_headers(
            &HeaderMap::new(),
            &Uri::from_static("https://example.com/index.html"),
        );
        assert_eq!(values(&proxied, "host"), ["example.com"]);

        let mut inbound = HeaderMap::new();
        inbound.insert(header::HOST, HeaderValue::from_static("origin.test"));
        let proxied = proxied_headers(&inbound, &Uri::from_static("https://example.com/"));
        assert_eq!(values(&proxied, "host"), ["origin.test"]);
    }
}
