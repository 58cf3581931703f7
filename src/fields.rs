// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Field extractor (C2): for each term, which of {title, header, strong,
//! body} it appears in.
//!
//! Each region is tokenized once; a term belongs to a field iff its stemmed
//! form is present in that field's token set. Membership is set-valued — a
//! term can belong to several fields at once — and nesting is irrelevant
//! because [`crate::html::extract_regions`] already folded nested text into
//! every enclosing region.

use crate::tokenizer::tokenize;
use crate::types::{FieldSet, FieldType, ParsedDocument};
use std::collections::{HashMap, HashSet};

/// Compute field membership for every term in `terms`.
pub fn fields_for_terms(doc: &ParsedDocument, terms: &HashSet<String>) -> HashMap<String, FieldSet> {
    let title_tokens: HashSet<String> = tokenize(&doc.title_text).into_iter().collect();
    let header_tokens: HashSet<String> = tokenize(&doc.header_text).into_iter().collect();
    let strong_tokens: HashSet<String> = tokenize(&doc.strong_text).into_iter().collect();
    let body_tokens: HashSet<String> = tokenize(&doc.body_text).into_iter().collect();

    let mut result = HashMap::with_capacity(terms.len());
    for term in terms {
        let mut set = FieldSet::new();
        if title_tokens.contains(term) {
            set.insert(FieldType::Title);
        }
        if header_tokens.contains(term) {
            set.insert(FieldType::Header);
        }
        if strong_tokens.contains(term) {
            set.insert(FieldType::Strong);
        }
        if body_tokens.contains(term) {
            set.insert(FieldType::Body);
        }
        result.insert(term.clone(), set);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::extract_regions;

    #[test]
    fn term_can_belong_to_multiple_fields() {
        let doc = extract_regions("<title>Cat</title><p>cat dog</p>");
        let terms: HashSet<String> = ["cat".to_string(), "dog".to_string()].into_iter().collect();
        let fields = fields_for_terms(&doc, &terms);
        assert!(fields["cat"].contains(&FieldType::Title));
        assert!(fields["cat"].contains(&FieldType::Body));
        assert!(!fields["dog"].contains(&FieldType::Title));
        assert!(fields["dog"].contains(&FieldType::Body));
    }

    #[test]
    fn absent_term_has_empty_field_set() {
        let doc = extract_regions("<p>hello</p>");
        let terms: HashSet<String> = ["world".to_string()].into_iter().collect();
        let fields = fields_for_terms(&doc, &terms);
        assert!(fields["world"].is_empty());
    }
}
