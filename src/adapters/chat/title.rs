//! Thread title derivation.
//!
//! Titles come from the mention text itself: markdown markup, URLs,
//! and special characters are stripped, the first five words are kept,
//! anything over 100 characters is truncated with an ellipsis, and
//! degenerate results fall back to a generic per-organization title.

use once_cell::sync::Lazy;
use regex::Regex;

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());
static MARKDOWN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[*_~`>#\[\]()]").unwrap());
static SPECIALS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s?!.,'-]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const MAX_LEN: usize = 100;
const MAX_WORDS: usize = 5;
const MIN_LEN: usize = 3;

/// Derives a thread title from the mention content.
pub fn derive_title(content: &str, org_name: &str) -> String {
    let cleaned = URL.replace_all(content, "");
    let cleaned = MARKDOWN.replace_all(&cleaned, "");
    let cleaned = SPECIALS.replace_all(&cleaned, "");
    let cleaned = WHITESPACE.replace_all(cleaned.trim(), " ");

    let title = cleaned
        .split(' ')
        .filter(|w| !w.is_empty())
        .take(MAX_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    // Length limits are in characters, not bytes; multibyte content
    // must not trip the thresholds early.
    let length = title.chars().count();
    if length < MIN_LEN {
        return format!("Question about {}", org_name);
    }
    if length > MAX_LEN {
        let cut: String = title.chars().take(MAX_LEN - 3).collect();
        return format!("{}...", cut);
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn keeps_the_first_five_words() {
        assert_eq!(
            derive_title("how do I configure the webhook retries please", "acme"),
            "how do I configure the"
        );
    }

    #[test]
    fn strips_urls_and_markdown() {
        assert_eq!(
            derive_title("**broken** link https://docs.example.com/a/b here", "acme"),
            "broken link here"
        );
    }

    #[test]
    fn short_content_falls_back_to_the_org_title() {
        assert_eq!(derive_title("ok", "acme"), "Question about acme");
        assert_eq!(derive_title("  ", "acme"), "Question about acme");
        assert_eq!(derive_title("https://only.a/link", "acme"), "Question about acme");
    }

    #[test]
    fn long_single_words_are_truncated_with_ellipsis() {
        let word = "a".repeat(150);
        let title = derive_title(&word, "acme");
        assert_eq!(title.len(), MAX_LEN);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn limits_count_characters_not_bytes() {
        // 60 two-byte characters stay under the 100-character cap.
        let word = "é".repeat(60);
        assert_eq!(derive_title(&word, "acme"), word);

        let long = "é".repeat(150);
        let title = derive_title(&long, "acme");
        assert_eq!(title.chars().count(), MAX_LEN);
        assert!(title.ends_with("..."));
    }

    proptest! {
        #[test]
        fn title_is_bounded_and_never_empty(content in ".{0,400}", org in "[a-z]{1,20}") {
            let title = derive_title(&content, &org);
            prop_assert!(!title.is_empty());
            prop_assert!(title.chars().count() <= MAX_LEN);
        }
    }
}
