// src/utils/tags.rs

//! Platform tag inference from URLs.

/// A platform tag plus an optional content-type refinement.
struct PlatformRule {
    domains: &'static [&'static str],
    tag: &'static str,
    content: Option<(&'static [&'static str], &'static str)>,
}

const PLATFORM_RULES: [PlatformRule; 6] = [
    PlatformRule {
        domains: &["instagram.com", "instagr.am"],
        tag: "Instagram",
        content: Some((&["/reel/", "/reels/"], "Reels")),
    },
    PlatformRule {
        domains: &["tiktok.com"],
        tag: "TikTok",
        content: None,
    },
    PlatformRule {
        domains: &["youtube.com", "youtu.be"],
        tag: "YouTube",
        content: Some((&["/shorts/"], "Shorts")),
    },
    PlatformRule {
        domains: &["twitter.com", "x.com"],
        tag: "X",
        content: None,
    },
    PlatformRule {
        domains: &["facebook.com", "fb.watch"],
        tag: "Facebook",
        content: None,
    },
    PlatformRule {
        domains: &["snapchat.com"],
        tag: "Snapchat",
        content: None,
    },
];

/// Infer human-readable platform tags from a URL.
///
/// Matching is a case-insensitive substring test against the rule table in
/// order. The first platform that matches supplies the tags, so a link
/// mentioning a second platform in its query still gets one platform tag.
/// An unknown site yields no tags.
///
/// # Examples
/// ```
/// use reelvault::utils::tags::infer_tags;
///
/// assert_eq!(infer_tags("https://youtube.com/shorts/abc"), vec!["YouTube", "Shorts"]);
/// assert!(infer_tags("https://plainsite.com/video").is_empty());
/// ```
pub fn infer_tags(url: &str) -> Vec<String> {
    let lower = url.to_lowercase();
    let Some(rule) = PLATFORM_RULES
        .iter()
        .find(|rule| rule.domains.iter().any(|d| lower.contains(d)))
    else {
        return Vec::new();
    };

    let mut tags = vec![rule.tag.to_string()];
    if let Some((paths, content_tag)) = rule.content {
        if paths.iter().any(|p| lower.contains(p)) {
            tags.push(content_tag.to_string());
        }
    }
    tags
}
