// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Minimal raw-HTML -> field-region adapter.
//!
//! HTML parsing and boilerplate stripping are declared out of scope (section
//! 1 of the distilled spec); the field extractor (C2) is specified to
//! consume an already-parsed document with four region strings already
//! concatenated (section 4.2). This module is exactly that thin adapter —
//! not a general HTML parser — grounded on the original prototype's
//! `get_token_fields`, which built the same four regions with
//! `soup.find_all(...)` + `.get_text()` and took the whole document's text
//! via `soup.get_text(separator=' ', strip=True)`.
//!
//! Nesting is intentionally ignored: a `<strong>` inside a `<p>` contributes
//! its text to both the strong region and the body region, because both
//! ancestor tags are tracked simultaneously while the text node is emitted.

use crate::types::ParsedDocument;

const HEADER_TAGS: &[&str] = &["h1", "h2", "h3"];
const BODY_TAGS: &[&str] = &["p", "span", "div"];

/// Parse raw HTML into plaintext plus the four field regions.
///
/// This is the `parse(raw) -> (plaintext, field_regions)` collaborator C2
/// depends on.
pub fn extract_regions(raw: &str) -> ParsedDocument {
    let mut doc = ParsedDocument::default();
    let mut stack: Vec<String> = Vec::new();
    let bytes = raw.as_bytes();
    let mut i = 0;
    let n = bytes.len();

    let mut push_text = |doc: &mut ParsedDocument, stack: &[String], text: &str| {
        let text = decode_entities(text);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        append_with_space(&mut doc.plaintext, trimmed);
        if stack.iter().any(|t| t == "title") {
            append_with_space(&mut doc.title_text, trimmed);
        }
        if stack.iter().any(|t| HEADER_TAGS.contains(&t.as_str())) {
            append_with_space(&mut doc.header_text, trimmed);
        }
        if stack.iter().any(|t| t == "strong") {
            append_with_space(&mut doc.strong_text, trimmed);
        }
        if stack.iter().any(|t| BODY_TAGS.contains(&t.as_str())) {
            append_with_space(&mut doc.body_text, trimmed);
        }
    };

    while i < n {
        match bytes[i] {
            b'<' => {
                if raw[i..].starts_with("<!--") {
                    if let Some(end) = raw[i..].find("-->") {
                        i += end + 3;
                    } else {
                        break;
                    }
                    continue;
                }
                if let Some(close) = raw[i..].find('>') {
                    let tag_src = &raw[i + 1..i + close];
                    handle_tag(tag_src, &mut stack);
                    i += close + 1;
                } else {
                    break;
                }
            }
            _ => {
                let next_lt = raw[i..].find('<').map(|p| i + p).unwrap_or(n);
                let text = &raw[i..next_lt];
                if !matches!(stack.last().map(String::as_str), Some("script") | Some("style")) {
                    push_text(&mut doc, &stack, text);
                }
                i = next_lt;
            }
        }
    }

    doc
}

fn handle_tag(tag_src: &str, stack: &mut Vec<String>) {
    let tag_src = tag_src.trim();
    if tag_src.starts_with('!') || tag_src.starts_with('?') {
        return; // doctype / processing instruction
    }
    let (is_close, rest) = match tag_src.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, tag_src),
    };
    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if name.is_empty() {
        return;
    }
    let self_closing = rest.trim_end().ends_with('/');

    if is_close {
        if let Some(pos) = stack.iter().rposition(|t| *t == name) {
            stack.truncate(pos);
        }
    } else if !self_closing && !is_void_element(&name) {
        stack.push(name);
    }
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn append_with_space(dest: &mut String, text: &str) {
    if !dest.is_empty() {
        dest.push(' ');
    }
    dest.push_str(text);
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_title_header_strong_body() {
        let html = "<html><head><title>Cat</title></head><body><h1>About</h1><p>cat <strong>dog</strong></p></body></html>";
        let doc = extract_regions(html);
        assert_eq!(doc.title_text, "Cat");
        assert_eq!(doc.header_text, "About");
        assert_eq!(doc.strong_text, "dog");
        assert!(doc.body_text.contains("cat"));
        assert!(doc.body_text.contains("dog"));
    }

    #[test]
    fn nested_strong_in_body_counts_in_both() {
        let html = "<p><strong>word</strong></p>";
        let doc = extract_regions(html);
        assert_eq!(doc.strong_text, "word");
        assert_eq!(doc.body_text, "word");
    }

    #[test]
    fn script_and_style_text_excluded() {
        let html = "<p>hello</p><script>var x = 1;</script><style>.a{}</style>";
        let doc = extract_regions(html);
        assert!(!doc.plaintext.contains("var x"));
        assert!(doc.plaintext.contains("hello"));
    }
}
