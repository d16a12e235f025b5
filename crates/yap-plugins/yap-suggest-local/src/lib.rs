//! # yap-suggest-local
//!
//! Offline implementation of `SuggestionService`. A network-backed model
//! could replace this behind the same port; the contract either way is that
//! the composer never blocks and never sees an error: `improve` degrades to
//! the input and `suggest_tags` to an empty list.

use async_trait::async_trait;
use yap_core::traits::SuggestionService;

const MAX_TAGS: usize = 3;
const MIN_WORD_LEN: usize = 4;

/// Heuristic suggester working only on the text it is given.
pub struct LocalSuggester;

#[async_trait]
impl SuggestionService for LocalSuggester {
    /// Tidies whitespace and nothing else. Identity in spirit.
    async fn improve(&self, text: &str) -> String {
        let tidied = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if tidied.is_empty() {
            text.to_string()
        } else {
            tidied
        }
    }

    /// Proposes up to three tags from the post's own prominent words,
    /// skipping words the author already tagged.
    async fn suggest_tags(&self, text: &str) -> Vec<String> {
        let existing: Vec<String> = text
            .split_whitespace()
            .filter_map(|w| w.strip_prefix('#'))
            .map(str::to_lowercase)
            .collect();

        // Frequency count preserving first-encounter order.
        let mut counts: Vec<(String, usize)> = Vec::new();
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
                .to_lowercase();
            if word.len() < MIN_WORD_LEN || existing.iter().any(|t| *t == word) {
                continue;
            }
            match counts.iter_mut().find(|(w, _)| *w == word) {
                Some((_, n)) => *n += 1,
                None => counts.push((word, 1)),
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.len().cmp(&a.0.len())));
        counts
            .into_iter()
            .take(MAX_TAGS)
            .map(|(w, _)| format!("#{}", w))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn improve_collapses_whitespace() {
        let s = LocalSuggester;
        assert_eq!(s.improve("  hello   world ").await, "hello world");
        // Degenerate input degrades to identity, never an error.
        assert_eq!(s.improve("   ").await, "   ");
    }

    #[tokio::test]
    async fn suggests_frequent_words_as_tags() {
        let s = LocalSuggester;
        let tags = s
            .suggest_tags("rust rust rust makes systems systems programming fun")
            .await;
        assert_eq!(tags.first().map(String::as_str), Some("#rust"));
        assert!(tags.len() <= 3);
    }

    #[tokio::test]
    async fn skips_words_already_tagged() {
        let s = LocalSuggester;
        let tags = s.suggest_tags("#rust rust rust evenings evenings").await;
        assert!(!tags.contains(&"#rust".to_string()));
        assert!(tags.contains(&"#evenings".to_string()));
    }

    #[tokio::test]
    async fn empty_input_yields_no_tags() {
        let s = LocalSuggester;
        assert!(s.suggest_tags("").await.is_empty());
    }
}
