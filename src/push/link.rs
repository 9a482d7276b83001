//! Preload `Link` header parsing.
//!
//! A `Link` header value is a comma-separated list of entries, each shaped
//! like `<url>; directive; directive`. A response may carry several `Link`
//! headers; each one is parsed independently.

/// A single advertised resource from a `Link` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry<'a> {
    target: &'a str,
    directives: Vec<&'a str>,
}

impl<'a> LinkEntry<'a> {
    /// Parse one comma-delimited entry. Returns `None` for empty entries.
    pub fn parse(raw: &'a str) -> Option<Self> {
        let mut fields = raw.split(';').map(str::trim);
        let url = fields.next()?;
        let target = url.strip_prefix('<').unwrap_or(url);
        let target = target.strip_suffix('>').unwrap_or(target).trim();
        if target.is_empty() {
            return None;
        }

        Some(Self {
            target,
            directives: fields.filter(|field| !field.is_empty()).collect(),
        })
    }

    /// The URL with its angle brackets removed.
    pub fn target(&self) -> &'a str {
        self.target
    }

    /// The origin asked for this link not to be pushed, usually because the
    /// client already has it cached.
    pub fn is_nopush(&self) -> bool {
        self.directives.iter().any(|d| d.ends_with("nopush"))
    }

    pub fn is_remote(&self) -> bool {
        is_remote_resource(self.target)
    }
}

/// Iterate over the non-empty entries of one `Link` header value.
pub fn parse_link_header(value: &str) -> impl Iterator<Item = LinkEntry<'_>> {
    value.split(',').filter_map(LinkEntry::parse)
}

/// Only same-origin resources may be pushed.
pub fn is_remote_resource(target: &str) -> bool {
    target.starts_with("//") || target.starts_with("http://") || target.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_entry() {
        let entry = LinkEntry::parse("</b.css>; rel=preload; as=style").unwrap();
        assert_eq!(entry.target(), "/b.css");
        assert_eq!(entry.directives, ["rel=preload", "as=style"]);
        assert!(!entry.is_nopush());
        assert!(!entry.is_remote());
    }

    #[test]
    fn test_nopush_in_any_position() {
        assert!(LinkEntry::parse("</a.css>; rel=preload; nopush").unwrap().is_nopush());
        assert!(LinkEntry::parse("</a.css>; nopush; rel=preload").unwrap().is_nopush());
        assert!(!LinkEntry::parse("</nopush.css>; rel=preload").unwrap().is_nopush());
    }

    #[test]
    fn test_remote_targets() {
        for target in ["//cdn.example.com/a.js", "http://x/a.js", "https://x/a.js"] {
            assert!(is_remote_resource(target), "{target}");
        }
        assert!(!is_remote_resource("/a.js"));
        assert!(!is_remote_resource("a.js"));
    }

    #[test]
    fn test_multiple_entries_and_whitespace() {
        let entries: Vec<_> =
            parse_link_header("</a.js>; rel=preload,  </b.css> ; rel=preload ,, ").collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].target(), "/a.js");
        assert_eq!(entries[1].target(), "/b.css");
        assert_eq!(entries[1].directives, ["rel=preload"]);
    }

    #[test]
    fn test_malformed_entries_are_tolerated() {
        assert!(LinkEntry::parse("").is_none());
        assert!(LinkEntry::parse("   ").is_none());
        assert!(LinkEntry::parse("<>; rel=preload").is_none());

        // Missing brackets still yield the bare target.
        let entry = LinkEntry::parse("/c.js; rel=preload").unwrap();
        assert_eq!(entry.target(), "/c.js");
    }
}
