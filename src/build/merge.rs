// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! K-way merge of partial indexes into the final sorted index.
//!
//! Opens every partial file simultaneously and merges them with a min-heap
//! keyed on `(term, source_id)`, exactly as described in section 4.4. The
//! reference implementation's historical bug — refilling the heap using the
//! surrounding loop's index variable instead of the index of the file that
//! was just popped — does not exist here: each popped [`HeapEntry`] carries
//! its own `source_id`, and that's what gets re-read.
//!
//! Because postings within one partial are already docid-ascending (a
//! document contributes at most one posting per term, and documents are
//! processed in strictly increasing docid order before a flush) and because
//! a docid is produced by exactly one partial, concatenating postings from
//! different partials for the same term preserves ascending docid order —
//! *provided* same-term entries are popped in ascending `source_id` order,
//! which the heap's tie-break guarantees (earlier partials hold strictly
//! smaller docids, so source-id order is also file-age order). No second
//! sort of the merged postings is needed; we do, however, assert the
//! resulting invariant rather than silently trust it (section 7: a
//! non-monotone term or duplicate `(term, docid)` pair is a fatal merge
//! invariant violation, not something to paper over).

use super::partial::PartialReader;
use crate::types::{Posting, TermRecord};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

struct HeapEntry {
    term: String,
    source_id: usize,
    postings: Vec<Posting>,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term && self.source_id == other.source_id
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.term.cmp(&other.term).then(self.source_id.cmp(&other.source_id))
    }
}

/// Merge `partial_paths` (in flush order — file 0 holds the earliest
/// docids) into a single sorted JSON-lines stream at `out_path`.
pub fn merge_partials(partial_paths: &[std::path::PathBuf], out_path: &Path) -> Result<(), String> {
    let mut readers: Vec<PartialReader> = partial_paths
        .iter()
        .map(|p| PartialReader::open(p))
        .collect::<Result<_, _>>()?;

    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    for (source_id, reader) in readers.iter_mut().enumerate() {
        if let Some((term, postings)) = reader.next_record()? {
            heap.push(Reverse(HeapEntry { term, source_id, postings }));
        }
    }

    let out_file =
        File::create(out_path).map_err(|e| format!("failed to create {}: {}", out_path.display(), e))?;
    let mut writer = BufWriter::new(out_file);

    let mut current_token: Option<String> = None;
    let mut accumulator: Vec<Posting> = Vec::new();

    while let Some(Reverse(HeapEntry { term, source_id, postings })) = heap.pop() {
        match &current_token {
            Some(t) if *t == term => {
                accumulator.extend(postings);
            }
            _ => {
                if let Some(t) = current_token.take() {
                    emit_term(&mut writer, t, std::mem::take(&mut accumulator))?;
                }
                current_token = Some(term);
                accumulator = postings;
            }
        }

        // Refill using the popped entry's OWN file index — the historical
        // bug this spec calls out used an outer loop variable instead.
        if let Some((next_term, next_postings)) = readers[source_id].next_record()? {
            heap.push(Reverse(HeapEntry {
                term: next_term,
                source_id,
                postings: next_postings,
            }));
        }
    }

    if let Some(t) = current_token.take() {
        emit_term(&mut writer, t, accumulator)?;
    }

    writer
        .flush()
        .map_err(|e| format!("failed to flush {}: {}", out_path.display(), e))
}

fn emit_term(writer: &mut impl Write, token: String, postings: Vec<Posting>) -> Result<(), String> {
    validate_ascending_unique(&token, &postings)?;
    let record = TermRecord { token, postings };
    let line = serde_json::to_string(&record).map_err(|e| format!("failed to serialize term record: {}", e))?;
    writeln!(writer, "{}", line).map_err(|e| format!("write failed: {}", e))
}

fn validate_ascending_unique(token: &str, postings: &[Posting]) -> Result<(), String> {
    for pair in postings.windows(2) {
        if pair[0].docid >= pair[1].docid {
            return Err(format!(
                "merge invariant violation for term {:?}: docid {} not strictly less than {}",
                token, pair[0].docid, pair[1].docid
            ));
        }
    }
    Ok(())
}
