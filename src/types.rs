// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the index: documents, terms, postings.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Posting**: `tf >= 1`; `fields` has no duplicate entries (it's a set).
//! - **PostingList** (one term's postings after merge): ascending by `docid`,
//!   each `docid` appears at most once.
//! - **Final index / shard lines**: ascending by `token`.
//! - **docid -> url map**: dense from 1, ascending.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A document identifier. Dense, strictly increasing, assigned starting at 1.
pub type DocId = u64;

/// One of the four regions a term can appear in.
///
/// Ordered so that `BTreeSet<FieldType>` serializes deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Body,
    Header,
    Strong,
    Title,
}

/// A set of fields a term occurred in for one document. Duplicates are
/// impossible by construction (`BTreeSet`); order in the serialized array
/// follows `FieldType`'s `Ord` impl, not insertion order.
pub type FieldSet = BTreeSet<FieldType>;

/// One term's contribution to one document.
///
/// `tfidf` is only populated after [`crate::shard::split_and_score`] runs; it
/// is omitted from the final (unscored) index's JSON entirely rather than
/// serialized as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub docid: DocId,
    pub tf: u32,
    pub fields: FieldSet,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tfidf: Option<f64>,
}

impl Posting {
    pub fn new(docid: DocId, tf: u32, fields: FieldSet) -> Self {
        Self {
            docid,
            tf,
            fields,
            tfidf: None,
        }
    }
}

/// One line of the final (or sharded) index: a term and its postings.
///
/// `postings` must be ascending by `docid` with no repeats — see
/// [`crate::build::merge`] for how that's guaranteed without a second sort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRecord {
    pub token: String,
    pub postings: Vec<Posting>,
}

/// One line of the docid -> url map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocRecord {
    pub docid: DocId,
    pub url: String,
}

/// A document ready for C1/C2/C3: raw plaintext plus the four field regions,
/// as produced by [`crate::html::extract_regions`].
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub plaintext: String,
    pub title_text: String,
    pub header_text: String,
    pub strong_text: String,
    pub body_text: String,
}

/// One ranked result returned by the query evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub score: f64,
}

/// Directory layout and tunables for one indexing run.
///
/// Replaces the reference implementation's process-wide globals
/// (`DOC_ID_COUNT`, `THRESHOLD_SIZE`, `PARTIAL_INDEX_DIR`, ...) with an
/// explicit context object constructed once at job start.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub corpus_root: std::path::PathBuf,
    pub partial_dir: std::path::PathBuf,
    pub shard_dir: std::path::PathBuf,
    pub final_index_path: std::path::PathBuf,
    pub doc_id_path: std::path::PathBuf,
    pub threshold_bytes: usize,
    pub duplicate_similarity_threshold: f64,
    pub duplicate_min_tokens: usize,
}

impl IndexerConfig {
    /// Sensible defaults rooted at `corpus_root`, with everything else
    /// nested under `output_root`.
    pub fn new(corpus_root: impl Into<std::path::PathBuf>, output_root: impl Into<std::path::PathBuf>) -> Self {
        let output_root = output_root.into();
        Self {
            corpus_root: corpus_root.into(),
            partial_dir: output_root.join("partial"),
            shard_dir: output_root.join("shards"),
            final_index_path: output_root.join("index.jsonl"),
            doc_id_path: output_root.join("doc_id.jsonl"),
            threshold_bytes: 20_000_000,
            duplicate_similarity_threshold: 0.85,
            duplicate_min_tokens: 10,
        }
    }
}
