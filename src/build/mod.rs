// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! External-memory inverted-index builder (C4).
//!
//! Corpus walker -> (per document) tokenize + field-extract, optionally in
//! parallel -> serialized dedup check + docid assignment + partial-index
//! accumulation -> flush on memory pressure -> k-way merge -> doc-id map.
//!
//! The parallelizable part (parsing, tokenizing, field extraction) and the
//! serialized part (docid assignment, partial-index accumulation) are kept
//! as two distinct stages so the externally observable ordering invariant
//! holds: documents committed to the index get docids in the exact order
//! they were accepted by the serialization point, regardless of which order
//! the parallel stage happened to finish parsing them in (section 5).

pub mod document;
pub mod merge;
pub mod partial;

use crate::dedup::DuplicateFilter;
use crate::types::{DocId, DocRecord, FieldSet, IndexerConfig, Posting};
use crate::{fields, html, tokenizer};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Summary counters returned by [`run_build`].
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub partial_flushes: usize,
    pub terms: usize,
}

/// The parallelizable half of processing one document: everything that
/// doesn't need to see the rest of the batch.
struct PreparedDocument {
    url: String,
    tokens: Vec<String>,
    term_freq: HashMap<String, u32>,
    fields_by_term: HashMap<String, FieldSet>,
}

/// Parse, tokenize, and field-extract one corpus file. Returns `None` on
/// any corpus-file error (missing/unreadable file, malformed JSON) — that's
/// a recoverable, logged skip, not a fatal error (section 7).
fn prepare_document(path: &Path) -> Option<PreparedDocument> {
    let doc = match document::load_document(path) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("skip: {}", e);
            return None;
        }
    };
    if doc.url.is_empty() || doc.content.is_empty() {
        eprintln!("skip: {} has empty url or content", path.display());
        return None;
    }

    let parsed = html::extract_regions(&doc.content);
    let tokens = tokenizer::tokenize(&parsed.plaintext);

    let mut term_freq: HashMap<String, u32> = HashMap::new();
    for term in &tokens {
        *term_freq.entry(term.clone()).or_insert(0) += 1;
    }
    let term_set: HashSet<String> = term_freq.keys().cloned().collect();
    let fields_by_term = fields::fields_for_terms(&parsed, &term_set);

    Some(PreparedDocument {
        url: document::defragment_url(&doc.url),
        tokens,
        term_freq,
        fields_by_term,
    })
}

/// The indexer's mutable state for one run: docid counter, the in-memory
/// partial index, and the batch-local duplicate filter. Replaces the
/// reference implementation's process-wide globals with an explicit
/// context constructed at job start (section 9).
pub struct IndexBuilder {
    config: IndexerConfig,
    next_docid: DocId,
    doc_id_map: Vec<DocRecord>,
    partial_index: BTreeMap<String, Vec<Posting>>,
    partial_paths: Vec<PathBuf>,
    dedup: DuplicateFilter,
}

impl IndexBuilder {
    pub fn new(config: IndexerConfig) -> Result<Self, String> {
        fs::create_dir_all(&config.partial_dir)
            .map_err(|e| format!("failed to create {}: {}", config.partial_dir.display(), e))?;
        let dedup = DuplicateFilter::new(config.duplicate_min_tokens, config.duplicate_similarity_threshold);
        Ok(Self {
            config,
            next_docid: 1,
            doc_id_map: Vec::new(),
            partial_index: BTreeMap::new(),
            partial_paths: Vec::new(),
            dedup,
        })
    }

    /// Accept one already-prepared document: check for near-duplication,
    /// assign a docid if accepted, and fold its postings into the partial
    /// index. Returns `true` if the document was indexed, `false` if it was
    /// rejected as a near-duplicate (section 4.3's side effect on `false`
    /// case already happened inside `dedup.is_duplicate`).
    fn accumulate(&mut self, prepared: PreparedDocument) -> bool {
        if self.dedup.is_duplicate(&prepared.tokens) {
            eprintln!("skip: near-duplicate of an already-indexed document ({})", prepared.url);
            return false;
        }

        let docid = self.next_docid;
        self.next_docid += 1;
        self.doc_id_map.push(DocRecord { docid, url: prepared.url });

        for (term, tf) in prepared.term_freq {
            let fields = prepared.fields_by_term.get(&term).cloned().unwrap_or_default();
            self.partial_index.entry(term).or_default().push(Posting::new(docid, tf, fields));
        }
        true
    }

    /// Flush the current partial index to disk if its estimated in-memory
    /// size crosses `threshold_bytes`.
    pub fn maybe_flush(&mut self) -> Result<(), String> {
        if estimate_bytes(&self.partial_index) > self.config.threshold_bytes {
            self.flush()?;
        }
        Ok(())
    }

    /// Flush the current partial index unconditionally (no-op if empty).
    fn flush(&mut self) -> Result<(), String> {
        if self.partial_index.is_empty() {
            return Ok(());
        }
        let path = self.config.partial_dir.join(format!("{}.jsonl", self.partial_paths.len()));
        partial::write_partial(&path, &self.partial_index)?;
        self.partial_paths.push(path);
        self.partial_index.clear();
        self.dedup.clear();
        Ok(())
    }

    /// Flush any residual partial, merge everything into the final index,
    /// and persist the docid -> url mapping.
    pub fn finalize(mut self) -> Result<BuildStats, String> {
        self.flush()?;

        if let Some(parent) = self.config.final_index_path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("failed to create {}: {}", parent.display(), e))?;
        }
        merge::merge_partials(&self.partial_paths, &self.config.final_index_path)?;
        self.save_doc_id_map()?;

        let terms = count_terms(&self.config.final_index_path)?;
        Ok(BuildStats {
            documents_indexed: self.doc_id_map.len(),
            documents_skipped: 0,
            partial_flushes: self.partial_paths.len(),
            terms,
        })
    }

    fn save_doc_id_map(&self) -> Result<(), String> {
        let file = File::create(&self.config.doc_id_path)
            .map_err(|e| format!("failed to create {}: {}", self.config.doc_id_path.display(), e))?;
        let mut writer = BufWriter::new(file);
        for record in &self.doc_id_map {
            let line = serde_json::to_string(record).map_err(|e| format!("failed to serialize doc record: {}", e))?;
            writeln!(writer, "{}", line).map_err(|e| format!("write failed: {}", e))?;
        }
        writer
            .flush()
            .map_err(|e| format!("failed to flush {}: {}", self.config.doc_id_path.display(), e))
    }
}

/// A deliberately crude, monotone overestimate of the partial index's
/// live byte size — the spec only requires the estimator never
/// *underestimate* badly enough to blow the memory budget (section 5).
fn estimate_bytes(index: &BTreeMap<String, Vec<Posting>>) -> usize {
    const POSTING_OVERHEAD: usize = 40; // docid + tf + small field set + Vec/struct overhead
    index
        .iter()
        .map(|(term, postings)| term.len() + 24 + postings.len() * POSTING_OVERHEAD)
        .sum()
}

fn count_terms(final_index_path: &Path) -> Result<usize, String> {
    let file = File::open(final_index_path)
        .map_err(|e| format!("failed to read {}: {}", final_index_path.display(), e))?;
    let mut count = 0;
    for line in std::io::BufRead::lines(std::io::BufReader::new(file)) {
        let line = line.map_err(|e| format!("failed to read {}: {}", final_index_path.display(), e))?;
        if !line.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

/// Run the full ingestion pipeline over `config.corpus_root`, writing the
/// final index and doc-id map under `config`'s output paths.
pub fn run_build(config: IndexerConfig) -> Result<BuildStats, String> {
    let files = document::walk_corpus(&config.corpus_root)
        .map_err(|e| format!("failed to walk {}: {}", config.corpus_root.display(), e))?;

    #[cfg(feature = "parallel")]
    let progress = indicatif::ProgressBar::new(files.len() as u64);
    #[cfg(feature = "parallel")]
    progress.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.cyan} indexing [{bar:40.cyan/dim}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    #[cfg(feature = "parallel")]
    let prepared: Vec<Option<PreparedDocument>> = files
        .par_iter()
        .map(|path| {
            let result = prepare_document(path);
            progress.inc(1);
            result
        })
        .collect();

    #[cfg(not(feature = "parallel"))]
    let prepared: Vec<Option<PreparedDocument>> = files.iter().map(|path| prepare_document(path)).collect();

    #[cfg(feature = "parallel")]
    progress.finish_and_clear();

    let mut builder = IndexBuilder::new(config)?;
    let mut skipped = 0usize;

    // Serialized stage: docid order follows corpus order, not completion order.
    for maybe_doc in prepared {
        match maybe_doc {
            None => skipped += 1,
            Some(doc) => {
                if !builder.accumulate(doc) {
                    skipped += 1;
                }
                builder.maybe_flush()?;
            }
        }
    }

    let mut stats = builder.finalize()?;
    stats.documents_skipped = skipped;
    Ok(stats)
}
