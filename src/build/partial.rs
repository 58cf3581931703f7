// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Partial-index flush and streaming read.
//!
//! On-disk shape: one JSON object per line, each a single key (the term)
//! mapping to its posting array — `{"<term>": [...]}`. This differs from
//! the final/shard record shape (`{"token": ..., "postings": ...}`)
//! deliberately; it's a distinct, transient, merge-only format (section 3).

use crate::types::Posting;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Write one partial index to disk. Terms are iterated in ascending order
/// (the caller owns a `BTreeMap` so this is free), one record per line.
/// A write failure here is fatal to the run (section 7): the caller should
/// propagate the error rather than continue with a missing partial.
pub fn write_partial(path: &Path, index: &BTreeMap<String, Vec<Posting>>) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("failed to create {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    for (term, postings) in index {
        let postings_value = serde_json::to_value(postings)
            .map_err(|e| format!("failed to serialize postings for {:?}: {}", term, e))?;
        let mut record = Map::new();
        record.insert(term.clone(), postings_value);
        let line = serde_json::to_string(&Value::Object(record))
            .map_err(|e| format!("failed to serialize record for {:?}: {}", term, e))?;
        writeln!(writer, "{}", line).map_err(|e| format!("write failed: {}", e))?;
    }
    writer
        .flush()
        .map_err(|e| format!("failed to flush {}: {}", path.display(), e))
}

/// A streaming reader over one partial-index file, used by the k-way merge.
pub struct PartialReader {
    lines: std::io::Lines<BufReader<File>>,
}

impl PartialReader {
    pub fn open(path: &Path) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("failed to open {}: {}", path.display(), e))?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
        })
    }

    /// Read the next `(term, postings)` record, or `None` at EOF.
    ///
    /// A parse failure here is a fatal merge error (section 7): a partial
    /// file that fails to parse would leave the final index incomplete.
    pub fn next_record(&mut self) -> Result<Option<(String, Vec<Posting>)>, String> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                let line: String = line.map_err(|e: io::Error| format!("read error: {}", e))?;
                if line.trim().is_empty() {
                    return self.next_record();
                }
                let record: Map<String, Value> =
                    serde_json::from_str(&line).map_err(|e| format!("corrupt partial record: {}", e))?;
                let (term, postings_value) = record
                    .into_iter()
                    .next()
                    .ok_or_else(|| "empty partial record".to_string())?;
                let postings: Vec<Posting> = serde_json::from_value(postings_value)
                    .map_err(|e| format!("corrupt postings for {:?}: {}", term, e))?;
                Ok(Some((term, postings)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldSet;

    #[test]
    fn round_trips_a_partial_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("0.jsonl");

        let mut index: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        index.insert("cat".to_string(), vec![Posting::new(1, 2, FieldSet::new())]);
        index.insert("dog".to_string(), vec![Posting::new(1, 1, FieldSet::new())]);

        write_partial(&path, &index).unwrap();

        let mut reader = PartialReader::open(&path).unwrap();
        let (t1, p1) = reader.next_record().unwrap().unwrap();
        assert_eq!(t1, "cat");
        assert_eq!(p1[0].tf, 2);
        let (t2, _) = reader.next_record().unwrap().unwrap();
        assert_eq!(t2, "dog");
        assert!(reader.next_record().unwrap().is_none());
    }
}
