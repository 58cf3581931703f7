// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tokenizer (C1): lowercase, split on `[a-z0-9]+`, stem alphabetic tokens.
//!
//! Index-time tokenization keeps every token in source order, including
//! repeats, and applies no stop-word filtering — `tf` depends on it. Query
//! tokenization additionally dedups and drops stop-words (section 4.1).

use std::collections::HashSet;

/// Closed English stop-word list used only at query time.
///
/// Transcribed from the reference search service's `STOP_WORDS` constant.
/// One entry there was a tab-mangled `"ours\tourselves"` literal (a
/// transcription bug, not a third stop-word) — split into the two correct
/// words here.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does", "doesn't",
    "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had", "hadn't",
    "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd", "i'll",
    "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "let's",
    "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on",
    "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "same", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so", "some",
    "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then",
    "there", "there's", "these", "they", "they'd", "they'll", "they're", "they've", "this",
    "those", "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we",
    "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when", "when's",
    "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's", "with",
    "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
    "yourself", "yourselves",
];

fn stop_word_set() -> &'static HashSet<&'static str> {
    use std::sync::OnceLock;
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

#[inline]
fn is_stop_word(token: &str) -> bool {
    stop_word_set().contains(token)
}

/// Find maximal `[a-z0-9]+` runs in the lowercased input, in left-to-right
/// order, stemming alphabetic runs and passing all-digit runs through.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();

    let mut flush = |current: &mut String, tokens: &mut Vec<String>| {
        if current.is_empty() {
            return;
        }
        if current.bytes().all(|b| b.is_ascii_digit()) {
            tokens.push(std::mem::take(current));
        } else {
            tokens.push(crate::stemmer::stem(current));
            current.clear();
        }
    };

    for c in lowered.chars() {
        if c.is_ascii_digit() || (c.is_ascii_alphabetic()) {
            current.push(c);
        } else {
            flush(&mut current, &mut tokens);
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

/// Query-time tokenization: same extraction and stemming rules, then
/// deduplicated and stop-words removed.
pub fn tokenize_query(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| !is_stop_word(t))
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_alphanumeric() {
        assert_eq!(
            tokenize("hello, world!"),
            vec!["hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn digits_pass_through_unchanged() {
        assert_eq!(tokenize("room 101"), vec!["room".to_string(), "101".to_string()]);
    }

    #[test]
    fn preserves_repeats_and_order() {
        assert_eq!(
            tokenize("hello hello world"),
            vec!["hello".to_string(), "hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn mixed_alnum_runs_are_not_split() {
        // "abc123" is one maximal [a-z0-9]+ match, not two tokens.
        let tokens = tokenize("abc123 def");
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn query_dedups_and_drops_stopwords() {
        assert_eq!(tokenize_query("foo foo"), tokenize_query("foo"));
        let tokens = tokenize_query("the quick brown fox");
        assert!(!tokens.contains(&"the".to_string()));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn query_all_stopwords_is_empty() {
        assert!(tokenize_query("the a an").is_empty());
    }
}
