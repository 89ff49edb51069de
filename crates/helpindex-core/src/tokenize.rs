//! Markup-aware scanner that pulls the `<title>` text and the content tokens
//! out of one HTML help page.
//!
//! The scan is a single left-to-right pass. Characters between `<` and `>`
//! form a tag name; text inside a `<title>` element goes to the title; all
//! other text is split on [`is_token_delimiter`] into tokens. Runs of three
//! characters or fewer are dropped, which keeps articles, markup remnants and
//! short identifiers out of the index without a stop-word list.

use std::collections::BTreeMap;

/// Tokens must be strictly longer than this many characters.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Title and distinct tokens of one scanned page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedDocument {
    pub title: String,
    /// Distinct tokens, ordered and deduplicated case-insensitively. The first
    /// spelling seen in the page is kept.
    pub tokens: Vec<String>,
}

#[must_use]
pub const fn is_token_delimiter(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | '\n' | ',' | '.' | ';' | ':' | '/' | '\\' | '(' | ')' | '[' | ']' | '|' | '='
    )
}

#[must_use]
pub fn scan_document(content: &str) -> ScannedDocument {
    let mut scanner = Scanner::default();
    for ch in content.chars() {
        scanner.push(ch);
    }
    scanner.finish()
}

#[derive(Debug, Default)]
struct Scanner {
    in_tag: bool,
    in_title: bool,
    tag_name: String,
    title: String,
    token: String,
    token_chars: usize,
    tokens: BTreeMap<String, String>,
}

impl Scanner {
    fn push(&mut self, ch: char) {
        match ch {
            '<' => {
                self.flush_token();
                self.in_title = false;
                self.in_tag = true;
                self.tag_name.clear();
            }
            '>' => {
                self.in_tag = false;
                self.in_title = self.tag_name.eq_ignore_ascii_case("title");
            }
            _ if self.in_tag => self.tag_name.push(ch),
            _ if self.in_title => self.title.push(ch),
            _ if is_token_delimiter(ch) => self.flush_token(),
            _ => {
                self.token.push(ch);
                self.token_chars += 1;
            }
        }
    }

    fn flush_token(&mut self) {
        if self.token_chars > MIN_TOKEN_CHARS {
            let token = std::mem::take(&mut self.token);
            self.tokens.entry(token.to_lowercase()).or_insert(token);
        } else {
            self.token.clear();
        }
        self.token_chars = 0;
    }

    // A token still pending at end of input is dropped: flushing only happens
    // on a delimiter or an opening tag.
    fn finish(self) -> ScannedDocument {
        ScannedDocument {
            title: self.title,
            tokens: self.tokens.into_values().collect(),
        }
    }
}
