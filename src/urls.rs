//! Cleaning of user-supplied URL lists and sitemap content.

use ahash::AHashSet;
use regex::Regex;
use std::sync::LazyLock;

static LOC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<loc>\s*(.*?)\s*</loc>").expect("valid <loc> pattern"));

/// Turns raw sitemap content into a newline-delimited URL list.
///
/// XML sitemaps are reduced to their `<loc>` entries (with `&amp;` decoded).
/// Anything without `<loc>` tags is assumed to already be a plain list and is
/// returned as-is.
pub fn extract_sitemap_urls(content: &str) -> String {
    if !LOC_PATTERN.is_match(content) {
        return content.to_string();
    }

    let urls: Vec<String> = LOC_PATTERN
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().replace("&amp;", "&"))
        .filter(|url| !url.is_empty())
        .collect();

    tracing::debug!("Extracted {} URLs from sitemap XML", urls.len());
    urls.join("\n")
}

/// Length of the `scheme://host` prefix, or 0 when the URL has no scheme.
fn origin_len(url: &str) -> usize {
    let Some((scheme, _)) = url.split_once("://") else {
        return 0;
    };
    let is_scheme = scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !is_scheme {
        return 0;
    }
    let host_start = scheme.len() + 3;
    url[host_start..]
        .find('/')
        .map_or(url.len(), |idx| host_start + idx)
}

/// Cleans one URL: drops query and fragment, and trailing slashes unless the
/// path is the site root.
fn clean_url(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let url = &raw[..end];

    let origin = origin_len(url);
    let path = &url[origin..];
    if path == "/" {
        return url;
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && origin == 0 && !path.is_empty() {
        // A bare "/" or "//" is the root of a relative sitemap
        return "/";
    }
    &url[..origin + trimmed.len()]
}

/// Splits raw input into a de-duplicated, ordered list of cleaned URLs.
///
/// Entries may be separated by newlines, commas or any whitespace. Each entry
/// loses its query string and fragment, and trailing slashes are removed except
/// for the root path. Empty entries are dropped and the first occurrence of a
/// duplicate wins. Re-normalizing the output yields the same list.
pub fn normalize_urls(raw: &str) -> Vec<String> {
    let mut seen: AHashSet<&str> = AHashSet::new();
    let mut urls = Vec::new();

    for entry in raw.split(|c: char| c == ',' || c.is_whitespace()) {
        let url = clean_url(entry);
        if url.is_empty() {
            continue;
        }
        if seen.insert(url) {
            urls.push(url.to_string());
        }
    }

    urls
}
