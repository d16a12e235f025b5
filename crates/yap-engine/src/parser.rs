//! # Content Parser
//!
//! Scans free text for hashtag and mention tokens.
//!
//! Two views of the same text serve two consumers:
//!
//! - [`tokens`] is the rendering view: a lazy iterator of typed spans whose
//!   concatenation reproduces the input byte-for-byte, so a renderer can
//!   re-emit the text with hashtags and mentions made clickable.
//! - [`scan_hashtags`] is the matching view: every `#word` occurrence
//!   anywhere in the text, including mid-word, which is what trending and
//!   hashtag search count.
//!
//! Both are pure functions of their input; iterators restart by calling the
//! constructor again.

/// Classification of a rendered span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plain,
    Hashtag,
    Mention,
}

/// One span of the original text. `text` is the exact source substring with
/// case preserved for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Case-folded form used for matching (click-to-filter, search).
    pub fn normalized(&self) -> String {
        self.text.to_lowercase()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True when an entire whitespace-delimited word is `#` followed by one or
/// more word characters.
fn is_hashtag_word(word: &str) -> bool {
    matches!(word.strip_prefix('#'), Some(rest) if !rest.is_empty() && rest.chars().all(is_word_char))
}

fn is_mention_word(word: &str) -> bool {
    matches!(word.strip_prefix('@'), Some(rest) if !rest.is_empty() && rest.chars().all(is_word_char))
}

/// Lazy token iterator over `text`. Whitespace runs come through as `Plain`
/// tokens so nothing is lost between words.
pub fn tokens(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let first = self.rest.chars().next()?;
        let take_while = |pred: fn(char) -> bool, s: &str| {
            s.find(|c: char| !pred(c)).unwrap_or(s.len())
        };

        let (len, kind) = if first.is_whitespace() {
            (take_while(char::is_whitespace, self.rest), TokenKind::Plain)
        } else {
            let len = take_while(|c| !c.is_whitespace(), self.rest);
            let word = &self.rest[..len];
            let kind = if is_hashtag_word(word) {
                TokenKind::Hashtag
            } else if is_mention_word(word) {
                TokenKind::Mention
            } else {
                TokenKind::Plain
            };
            (len, kind)
        };

        let (text, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(Token { kind, text })
    }
}

/// Every `#[A-Za-z0-9_]+` occurrence in `text`, in source order, with the
/// leading `#` and original casing. Unlike [`tokens`], a tag embedded in a
/// larger word (e.g. `(#launch)`) still counts.
pub fn scan_hashtags(text: &str) -> HashtagScan<'_> {
    HashtagScan { rest: text }
}

pub struct HashtagScan<'a> {
    rest: &'a str,
}

impl<'a> Iterator for HashtagScan<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            let hash = self.rest.find('#')?;
            let after = &self.rest[hash + 1..];
            let len = after
                .find(|c: char| !is_word_char(c))
                .unwrap_or(after.len());
            if len == 0 {
                // Bare '#' with no word characters after it; keep scanning.
                self.rest = after;
                continue;
            }
            let tag = &self.rest[hash..hash + 1 + len];
            self.rest = &after[len..];
            return Some(tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, &str)> {
        tokens(text).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn concatenation_reproduces_input() {
        let input = "hey  @alice,\tcheck #Rust_2024 out! #";
        let rebuilt: String = tokens(input).map(|t| t.text).collect();
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn classifies_whole_words_only() {
        let toks = kinds("go #launch with @bob today");
        assert!(toks.contains(&(TokenKind::Hashtag, "#launch")));
        assert!(toks.contains(&(TokenKind::Mention, "@bob")));
        // Punctuation glued onto a word demotes it to plain for rendering.
        let toks = kinds("(#launch) @bob!");
        assert_eq!(toks[0], (TokenKind::Plain, "(#launch)"));
        assert_eq!(toks[2], (TokenKind::Plain, "@bob!"));
    }

    #[test]
    fn lone_sigils_are_plain() {
        assert_eq!(kinds("#"), vec![(TokenKind::Plain, "#")]);
        assert_eq!(kinds("@"), vec![(TokenKind::Plain, "@")]);
    }

    #[test]
    fn normalized_is_case_folded() {
        let tok = tokens("#Launch").next().unwrap();
        assert_eq!(tok.kind, TokenKind::Hashtag);
        assert_eq!(tok.text, "#Launch");
        assert_eq!(tok.normalized(), "#launch");
    }

    #[test]
    fn scan_finds_tags_anywhere() {
        let tags: Vec<&str> = scan_hashtags("launch day (#Launch) and#hidden too #").collect();
        assert_eq!(tags, vec!["#Launch", "#hidden"]);
    }

    #[test]
    fn scan_preserves_case_and_order() {
        let tags: Vec<&str> = scan_hashtags("#Foo then #foo then #Foo").collect();
        assert_eq!(tags, vec!["#Foo", "#foo", "#Foo"]);
    }

    #[test]
    fn scan_is_restartable() {
        let text = "#a #b";
        assert_eq!(scan_hashtags(text).count(), 2);
        assert_eq!(scan_hashtags(text).count(), 2);
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokens("").count(), 0);
        assert_eq!(scan_hashtags("").count(), 0);
    }
}
