//! Wikilink matching and rewriting.
//!
//! A link is `[[target]]` or `[[target|alias]]`. Matching a target is anchored
//! on the opening brackets and must be followed by `]]` or `|`, so the title
//! `ab` never matches inside `[[abc]]`.

use regex::Regex;
use regex::bytes::Regex as BytesRegex;
use std::sync::LazyLock;

static WIKILINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]|]+)(?:\|[^\]]*)?\]\]").unwrap());

/// Compiled patterns for one link target
#[derive(Debug, Clone)]
pub struct LinkPattern {
    title: String,
    detect: BytesRegex,
    rewrite: Regex,
}

impl LinkPattern {
    /// Build the patterns for links pointing at `title` (an identifier without extension).
    pub fn for_title(title: &str) -> Self {
        // One pattern for both, so every detected link is rewritable.
        let source = format!(r"\[\[{}(\|[^\]]*)?\]\]", regex::escape(title));
        let detect = BytesRegex::new(&source).expect("escaped wikilink pattern is valid");
        let rewrite = Regex::new(&source).expect("escaped wikilink pattern is valid");
        Self {
            title: title.to_string(),
            detect,
            rewrite,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether raw note bytes contain a link to this title
    pub fn is_match(&self, content: &[u8]) -> bool {
        self.detect.is_match(content)
    }

    /// Point every link at `new_title`, keeping aliases.
    /// Returns `None` when the content holds no link to this title.
    pub fn rewrite(&self, content: &str, new_title: &str) -> Option<String> {
        if !self.rewrite.is_match(content) {
            return None;
        }
        let replaced = self.rewrite.replace_all(content, |caps: &regex::Captures<'_>| {
            let alias = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            format!("[[{}{}]]", new_title, alias)
        });
        if replaced == content {
            None
        } else {
            Some(replaced.into_owned())
        }
    }
}

/// Outgoing link targets in first-seen order, aliases stripped, deduplicated
pub fn extract_wikilinks(content: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for cap in WIKILINK_RE.captures_iter(content) {
        let target = cap[1].trim().to_string();
        if !target.is_empty() && !links.contains(&target) {
            links.push(target);
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_bare_and_aliased_links() {
        let pattern = LinkPattern::for_title("b");
        assert!(pattern.is_match(b"see [[b]]"));
        assert!(pattern.is_match(b"[[b|Beta]] link"));
        assert!(!pattern.is_match(b"plain b in prose"));
    }

    #[test]
    fn test_no_partial_prefix_collision() {
        let pattern = LinkPattern::for_title("ab");
        assert!(!pattern.is_match(b"[[abc]]"));
        assert!(!pattern.is_match(b"[[abc|x]]"));
        assert!(pattern.is_match(b"[[abc]] and [[ab]]"));
    }

    #[test]
    fn test_title_with_regex_metacharacters() {
        let pattern = LinkPattern::for_title("C++ (lang)");
        assert!(pattern.is_match(b"[[C++ (lang)]]"));
        assert!(!pattern.is_match(b"[[C (lang)]]"));
    }

    #[test]
    fn test_rewrite_preserves_alias_and_other_text() {
        let pattern = LinkPattern::for_title("b");
        let out = pattern
            .rewrite("see [[b]], [[b|Beta]] and [[bb]] but not b", "bee")
            .unwrap();
        assert_eq!(out, "see [[bee]], [[bee|Beta]] and [[bb]] but not b");
    }

    #[test]
    fn test_empty_alias_is_detected_and_rewritten() {
        let pattern = LinkPattern::for_title("b");
        assert!(pattern.is_match(b"see [[b|]]"));
        assert_eq!(pattern.rewrite("see [[b|]]", "bee").unwrap(), "see [[bee|]]");
    }

    #[test]
    fn test_detection_agrees_with_rewrite() {
        let pattern = LinkPattern::for_title("b");
        for text in ["[[b]]", "[[b|Beta]]", "[[b|]]", "[[b|open", "[[bc]]", "b", "[[b"] {
            assert_eq!(
                pattern.is_match(text.as_bytes()),
                pattern.rewrite(text, "bee").is_some(),
                "disagreement on {:?}",
                text
            );
        }
    }

    #[test]
    fn test_rewrite_without_links_is_none() {
        let pattern = LinkPattern::for_title("b");
        assert!(pattern.rewrite("nothing here [[bc]]", "bee").is_none());
    }

    #[test]
    fn test_rewrite_handles_dollar_in_new_title() {
        let pattern = LinkPattern::for_title("price");
        let out = pattern.rewrite("[[price|cost]]", "$5 deal").unwrap();
        assert_eq!(out, "[[$5 deal|cost]]");
    }

    #[test]
    fn test_extract_wikilinks() {
        let links = extract_wikilinks("[[a]] then [[b|Beta]] and [[a]] again, [[concept/c]]");
        assert_eq!(links, vec!["a", "b", "concept/c"]);
    }
}
