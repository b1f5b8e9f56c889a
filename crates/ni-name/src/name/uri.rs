//! Generic URI splitting into the six components a name is built from.

/// Schemes rendered with a `//` authority marker even when it is empty.
const NETLOC_SCHEMES: [&str; 3] = ["ni", "http", "https"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct UriParts {
    pub scheme:    String,
    pub authority: String,
    pub path:      String,
    pub params:    String,
    pub query:     String,
    pub fragment:  String,
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Split `uri` into components. `None` when there is no scheme prefix or the
/// text contains whitespace or control characters.
pub(crate) fn split(uri: &str) -> Option<UriParts> {
    if uri.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return None;
    }
    let (scheme, mut rest) = uri.split_once(':').filter(|(s, _)| is_scheme(s))?;

    let mut authority = "";
    if let Some(after) = rest.strip_prefix("//") {
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        authority = &after[..end];
        rest = &after[end..];
    }

    let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
    let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

    // params start at the first ';' of the last path segment
    let seg_start = rest.rfind('/').unwrap_or(0);
    let (path, params) = match rest[seg_start..].find(';') {
        Some(i) => (&rest[..seg_start + i], &rest[seg_start + i + 1..]),
        None => (rest, ""),
    };

    Some(UriParts {
        scheme:    scheme.to_ascii_lowercase(),
        authority: authority.to_string(),
        path:      path.to_string(),
        params:    params.to_string(),
        query:     query.to_string(),
        fragment:  fragment.to_string(),
    })
}

/// Inverse of [`split`]; empty params, query and fragment are omitted.
pub(crate) fn unsplit(parts: &UriParts) -> String {
    let mut url = String::with_capacity(
        parts.scheme.len() + parts.authority.len() + parts.path.len() + parts.params.len() + 8,
    );
    url.push_str(&parts.scheme);
    url.push(':');

    if !parts.authority.is_empty() || NETLOC_SCHEMES.contains(&parts.scheme.as_str()) {
        url.push_str("//");
        url.push_str(&parts.authority);
        if !parts.path.is_empty() && !parts.path.starts_with('/') {
            url.push('/');
        }
    }
    url.push_str(&parts.path);

    if !parts.params.is_empty() {
        url.push(';');
        url.push_str(&parts.params);
    }
    if !parts.query.is_empty() {
        url.push('?');
        url.push_str(&parts.query);
    }
    if !parts.fragment.is_empty() {
        url.push('#');
        url.push_str(&parts.fragment);
    }
    url
}

/// Split a path at its last `/` into (directory, file).
pub(crate) fn split_path(path: &str) -> (&str, &str) { path.rsplit_once('/').unwrap_or(("", path)) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_full_ni() {
        let p = split("ni://tcd.ie/sha-256;abc?c=image%2Fjson#frag").unwrap();
        assert_eq!(p.scheme, "ni");
        assert_eq!(p.authority, "tcd.ie");
        assert_eq!(p.path, "/sha-256");
        assert_eq!(p.params, "abc");
        assert_eq!(p.query, "c=image%2Fjson");
        assert_eq!(p.fragment, "frag");
    }

    #[test]
    fn test_split_nih_keeps_check_digit_in_params() {
        let p = split("nih:sha-256-32;f4b3b165;f").unwrap();
        assert_eq!(p.authority, "");
        assert_eq!(p.path, "sha-256-32");
        assert_eq!(p.params, "f4b3b165;f");
    }

    #[test]
    fn test_split_params_only_from_last_segment() {
        let p = split("ni://h/a;x/sha-256;digest").unwrap();
        assert_eq!(p.path, "/a;x/sha-256");
        assert_eq!(p.params, "digest");
        assert_eq!(split_path(&p.path), ("/a;x", "sha-256"));
    }

    #[test]
    fn test_split_empty_template_params() {
        let p = split("ni://tcd.ie/sha-256;?c=x").unwrap();
        assert_eq!(p.params, "");
        assert_eq!(p.query, "c=x");
    }

    #[test]
    fn test_split_lowercases_scheme() {
        assert_eq!(split("NI:///sha-256").unwrap().scheme, "ni");
    }

    #[test]
    fn test_split_rejects_schemeless_input() {
        assert!(split("sha-256;abc").is_none());
        assert!(split("://host/sha-256").is_none());
        assert!(split("1ni://host/sha-256").is_none());
        assert!(split("ni://host/sha 256").is_none());
    }

    #[test]
    fn test_unsplit_round_trips() {
        for uri in [
            "ni://tcd.ie/sha-256;abc?c=x",
            "ni:///sha-256",
            "nih:sha-256-32;abcd;1",
            "nih:6",
            "zz://tcd.ie/sha-256#f",
        ] {
            assert_eq!(unsplit(&split(uri).unwrap()), uri);
        }
    }

    #[test]
    fn test_unsplit_adds_slash_before_relative_path() {
        let parts = UriParts {
            scheme: "ni".into(),
            authority: "tcd.ie".into(),
            path: "sha-256".into(),
            ..Default::default()
        };
        assert_eq!(unsplit(&parts), "ni://tcd.ie/sha-256");
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/sha-256"), ("", "sha-256"));
        assert_eq!(split_path("sha-256"), ("", "sha-256"));
        assert_eq!(split_path("/a/b/sha-256"), ("/a/b", "sha-256"));
    }
}
