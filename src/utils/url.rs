// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

/// Title used when a URL yields nothing readable.
pub const FALLBACK_TITLE: &str = "Shared Reel";

/// Query markers that identify share/tracking parameters.
const TRACKING_PARAMS: [&str; 5] = ["si=", "igsh=", "utm_", "fbclid=", "s="];

/// Paths whose content id lives in the path, making the query disposable.
const CONTENT_PATHS: [&str; 4] = [
    "youtube.com/shorts/",
    "youtu.be/",
    "instagram.com/reel/",
    "tiktok.com/",
];

/// Canonicalize a shared link so that re-shares of one post compare equal.
///
/// Drops the query string of known content URLs when it carries tracking
/// parameters, and removes a trailing slash. Applying it twice changes
/// nothing.
///
/// # Examples
/// ```
/// use reelvault::utils::url::normalize;
///
/// assert_eq!(
///     normalize(" https://youtube.com/shorts/abc?si=XYZ "),
///     "https://youtube.com/shorts/abc"
/// );
/// ```
pub fn normalize(raw: &str) -> String {
    let mut current = normalize_once(raw);
    // Every changing pass shortens the string, so this terminates.
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(url: &str) -> String {
    let mut normalized = url.trim();

    if normalized.contains('?')
        && TRACKING_PARAMS.iter().any(|p| normalized.contains(p))
        && CONTENT_PATHS.iter().any(|p| normalized.contains(p))
    {
        if let Some((before_query, _)) = normalized.split_once('?') {
            normalized = before_query;
        }
    }

    strip_trailing_slash(normalized).to_string()
}

/// Remove one trailing slash, keeping `//` runs such as `https://` intact.
fn strip_trailing_slash(url: &str) -> &str {
    match url.strip_suffix('/') {
        Some(rest) if !rest.ends_with('/') => rest,
        _ => url,
    }
}

/// Check that a trimmed input looks like a savable web link.
///
/// Requires an `http://` or `https://` prefix, a parseable URL and a host
/// with at least one dot (bare words such as `http://badscheme` are not
/// links anyone shares).
pub fn is_savable_url(url: &str) -> bool {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.contains('.')))
        .unwrap_or(false)
}

/// Derive a readable title from the URL alone.
///
/// Produces `"authority - first-segment"`, or just the authority when the
/// path is empty, or [`FALLBACK_TITLE`] for anything without an http(s)
/// scheme and host. The authority is kept as written (case and port), minus
/// a leading `www.`; query and fragment are ignored.
///
/// # Examples
/// ```
/// use reelvault::utils::url::fallback_title;
///
/// assert_eq!(fallback_title("https://www.youtube.com/shorts/abc"), "youtube.com - shorts");
/// assert_eq!(fallback_title("http://example.com:8080/page"), "example.com:8080 - page");
/// ```
pub fn fallback_title(url: &str) -> String {
    let Some(rest) = url
        .trim()
        .strip_prefix("https://")
        .or_else(|| url.trim().strip_prefix("http://"))
    else {
        return FALLBACK_TITLE.to_string();
    };
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let mut parts = rest.split('/');
    let domain = parts.next().unwrap_or_default();
    if domain.trim().is_empty() {
        return FALLBACK_TITLE.to_string();
    }

    match parts.next().filter(|segment| !segment.trim().is_empty()) {
        Some(segment) => format!("{domain} - {segment}"),
        None => domain.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_youtube_share_param() {
        assert_eq!(
            normalize("https://youtube.com/shorts/abc?si=XYZ"),
            "https://youtube.com/shorts/abc"
        );
    }

    #[test]
    fn test_normalize_strips_instagram_igsh() {
        assert_eq!(
            normalize("https://www.instagram.com/reel/C1x2y3/?igsh=MWQ1ZGUx"),
            "https://www.instagram.com/reel/C1x2y3"
        );
    }

    #[test]
    fn test_normalize_strips_tiktok_query() {
        assert_eq!(
            normalize("https://www.tiktok.com/@chef/video/7301?is_from_webapp=1&utm_source=copy"),
            "https://www.tiktok.com/@chef/video/7301"
        );
    }

    #[test]
    fn test_normalize_removes_trailing_slash() {
        assert_eq!(
            normalize("https://example.com/page/"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_normalize_keeps_query_on_unknown_platform() {
        let url = "https://example.com/watch?utm_source=feed";
        assert_eq!(normalize(url), url);
    }

    #[test]
    fn test_normalize_keeps_non_tracking_query() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert_eq!(normalize(url), url);
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize("  https://youtu.be/abc?si=1  "),
            "https://youtu.be/abc"
        );
    }

    #[test]
    fn test_normalize_never_eats_scheme_slashes() {
        assert_eq!(normalize("https://"), "https://");
        assert_eq!(normalize("https://example.com//"), "https://example.com//");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "",
            "/",
            "   ",
            "https://",
            "https://example.com/ /",
            "https://youtu.be/abc/?si=1",
            "https://youtu.be/abc?si=1/",
            "https://www.instagram.com/reel/xyz/?igsh=abc",
            "https://example.com/a?b=c/",
            "https://example.com///",
            "not a url/",
            "https://tiktok.com/ ?s=1 /",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_is_savable_url() {
        assert!(is_savable_url("https://www.instagram.com/reel/abc"));
        assert!(is_savable_url("http://127.0.0.1:8080/page"));
        assert!(!is_savable_url("ftp://example.com/file"));
        assert!(!is_savable_url("www.instagram.com/reel/abc"));
        assert!(!is_savable_url("http://badscheme"));
        assert!(!is_savable_url("https://"));
    }

    #[test]
    fn test_fallback_title_with_path() {
        assert_eq!(
            fallback_title("https://www.youtube.com/shorts/abc"),
            "youtube.com - shorts"
        );
    }

    #[test]
    fn test_fallback_title_keeps_authority_as_written() {
        assert_eq!(
            fallback_title("http://Example.com:8080/page"),
            "Example.com:8080 - page"
        );
        assert_eq!(fallback_title("https://fb.watch/xyz?si=1"), "fb.watch - xyz");
        assert_eq!(fallback_title("https://example.com?q=1"), "example.com");
    }

    #[test]
    fn test_fallback_title_domain_only() {
        assert_eq!(fallback_title("https://fb.watch"), "fb.watch");
    }

    #[test]
    fn test_fallback_title_unparseable() {
        assert_eq!(fallback_title("not a url"), FALLBACK_TITLE);
        assert_eq!(fallback_title("https://"), FALLBACK_TITLE);
        assert_eq!(fallback_title("https:///path"), FALLBACK_TITLE);
    }
}
