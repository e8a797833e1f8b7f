//! URL list cleanup without analysis.

use crate::urls::{extract_sitemap_urls, normalize_urls};
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NormalizeUrlsRequest {
    /// URLs separated by newlines, commas or spaces, or raw sitemap XML
    pub input: String,
}

/// Returns the cleaned, de-duplicated URLs, one per line.
pub fn handle_normalize_urls(request: &NormalizeUrlsRequest) -> Result<String, String> {
    let urls = normalize_urls(&extract_sitemap_urls(&request.input));
    if urls.is_empty() {
        return Err("No URLs found in input".to_string());
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{} unique URL{}:",
        urls.len(),
        if urls.len() == 1 { "" } else { "s" }
    );
    for url in &urls {
        let _ = writeln!(output, "{}", url);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn test_handle_normalize_urls() {
        let request = NormalizeUrlsRequest {
            input: "<urlset><url><loc>https://a.com/x/?q=1</loc></url>\
                    <url><loc>https://a.com/x</loc></url></urlset>"
                .to_string(),
        };
        let_assert!(Ok(text) = handle_normalize_urls(&request));
        check!(text == "1 unique URL:\nhttps://a.com/x\n");
    }

    #[test]
    fn test_handle_normalize_urls_empty() {
        let request = NormalizeUrlsRequest {
            input: " ,\n ".to_string(),
        };
        check!(handle_normalize_urls(&request).is_err());
    }
}
