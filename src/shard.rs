// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shard & Score (C5): split the merged index by leading-character bucket
//! and annotate each posting with its field-boosted tf-idf.
//!
//! Consumes the merged index in one streaming pass — the merge already
//! guarantees ascending term order, so bucket membership is contiguous and
//! each bucket's records can be flushed the moment the bucket key changes,
//! without holding the whole index in memory (section 4.5).

use crate::types::{DocRecord, FieldType, Posting, TermRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn title_boost(fields: &std::collections::BTreeSet<FieldType>) -> f64 {
    let mut boost = 1.0;
    if fields.contains(&FieldType::Title) {
        boost *= 2.0;
    }
    if fields.contains(&FieldType::Header) {
        boost *= 1.5;
    }
    if fields.contains(&FieldType::Strong) {
        boost *= 1.3;
    }
    boost
}

/// tf' = 1 + ln(tf); idf = ln(N / (1 + df)); tfidf = tf' * idf * boost.
fn score_posting(posting: &Posting, doc_count: u64, df: usize) -> f64 {
    let tf_prime = 1.0 + (posting.tf as f64).ln();
    let idf = (doc_count as f64 / (1 + df) as f64).ln();
    tf_prime * idf * title_boost(&posting.fields)
}

/// The bucket a term's first character maps to: a lowercased ASCII letter,
/// or the literal `"other"` for anything else (digits, punctuation, and any
/// non-ASCII lead byte). This is the policy C6 depends on; an as-is first
/// character policy (no `other` fallback) would scatter non-letter-leading
/// terms into buckets the query evaluator never probes.
pub(crate) fn bucket_key(token: &str) -> String {
    match token.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_lowercase().to_string(),
        _ => "other".to_string(),
    }
}

fn count_documents(doc_id_path: &Path) -> Result<u64, String> {
    let file = File::open(doc_id_path).map_err(|e| format!("failed to open {}: {}", doc_id_path.display(), e))?;
    let reader = BufReader::new(file);
    let mut count = 0u64;
    for line in reader.lines() {
        let line = line.map_err(|e| format!("read error: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let _record: DocRecord =
            serde_json::from_str(&line).map_err(|e| format!("corrupt doc record: {}", e))?;
        count += 1;
    }
    Ok(count)
}

struct BucketWriter {
    key: String,
    writer: BufWriter<File>,
}

impl BucketWriter {
    fn open(shard_dir: &Path, key: &str) -> Result<Self, String> {
        let path = shard_dir.join(format!("{}.jsonl", key));
        let file = File::create(&path).map_err(|e| format!("failed to create {}: {}", path.display(), e))?;
        Ok(Self {
            key: key.to_string(),
            writer: BufWriter::new(file),
        })
    }

    fn write_record(&mut self, record: &TermRecord) -> Result<(), String> {
        let line = serde_json::to_string(record).map_err(|e| format!("failed to serialize shard record: {}", e))?;
        writeln!(self.writer, "{}", line).map_err(|e| format!("write failed: {}", e))
    }

    fn finish(mut self) -> Result<(), String> {
        self.writer.flush().map_err(|e| format!("failed to flush shard {}: {}", self.key, e))
    }
}

/// Read the merged index, compute tf-idf for every posting, and write the
/// per-bucket shard files into `shard_dir`.
pub fn split_and_score(final_index_path: &Path, doc_id_path: &Path, shard_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(shard_dir).map_err(|e| format!("failed to create {}: {}", shard_dir.display(), e))?;

    let doc_count = count_documents(doc_id_path)?;

    let file = File::open(final_index_path)
        .map_err(|e| format!("failed to open {}: {}", final_index_path.display(), e))?;
    let reader = BufReader::new(file);

    let mut current: Option<BucketWriter> = None;

    for line in reader.lines() {
        let line = line.map_err(|e| format!("read error: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let mut record: TermRecord =
            serde_json::from_str(&line).map_err(|e| format!("corrupt index record: {}", e))?;

        let df = record.postings.len();
        for posting in &mut record.postings {
            posting.tfidf = Some(score_posting(posting, doc_count, df));
        }

        let key = bucket_key(&record.token);
        match &mut current {
            Some(w) if w.key == key => w.write_record(&record)?,
            _ => {
                if let Some(w) = current.take() {
                    w.finish()?;
                }
                let mut w = BucketWriter::open(shard_dir, &key)?;
                w.write_record(&record)?;
                current = Some(w);
            }
        }
    }

    if let Some(w) = current.take() {
        w.finish()?;
    }

    Ok(())
}
