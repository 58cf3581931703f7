// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Near-duplicate filter (C3): batch-local fingerprint-based rejection.
//!
//! Fingerprints a token stream as a sampled set of trigram-hashes and
//! rejects documents whose Jaccard similarity against any fingerprint
//! already recorded in the current batch is >= the configured threshold.
//! The batch is exactly one partial index's worth of documents — the set
//! is cleared on flush (see [`crate::build::IndexBuilder::flush`]), so
//! cross-batch near-duplicates are not caught. That's an accepted
//! approximation inherited from the reference implementation, not a bug:
//! re-detecting fingerprints across flushes would mean keeping every
//! fingerprint in memory for the whole run, defeating the point of
//! flushing at all.

use std::collections::BTreeSet;

/// Polynomial rolling hash: base 31, modulus 1e9+7, per-character
/// contribution `(byte - 'a' + 1)`. This deliberately applies the same
/// formula to digits and punctuation as to letters (not just `ord(c) -
/// ord('a') + 1` restricted to alphabetic input) — reproducing this
/// bit-exactly matters because fingerprints must match the reference.
fn trigram_hash(s: &str) -> u64 {
    const BASE: u64 = 31;
    const MODULUS: u64 = 1_000_000_007;
    let mut hash_val: u64 = 0;
    let mut p_pow: u64 = 1;
    for &b in s.as_bytes() {
        let contribution = (b as i64 - b'a' as i64 + 1).rem_euclid(MODULUS as i64) as u64;
        hash_val = (hash_val + (contribution * p_pow) % MODULUS) % MODULUS;
        p_pow = (p_pow * BASE) % MODULUS;
    }
    hash_val
}

/// A document's sampled fingerprint: hashes of its deduplicated trigrams
/// where `h mod 4 == 0`.
pub type Fingerprint = BTreeSet<u64>;

fn fingerprint(tokens: &[String]) -> Fingerprint {
    let mut trigrams: BTreeSet<String> = BTreeSet::new();
    for window in tokens.windows(3) {
        trigrams.insert(window.join(" "));
    }
    trigrams
        .iter()
        .map(|t| trigram_hash(t))
        .filter(|h| h % 4 == 0)
        .collect()
}

fn jaccard(a: &Fingerprint, b: &Fingerprint) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Batch-local near-duplicate detector. Cleared on every partial-index flush.
#[derive(Debug, Default)]
pub struct DuplicateFilter {
    seen: Vec<Fingerprint>,
    min_tokens: usize,
    similarity_threshold: f64,
}

impl DuplicateFilter {
    pub fn new(min_tokens: usize, similarity_threshold: f64) -> Self {
        Self {
            seen: Vec::new(),
            min_tokens,
            similarity_threshold,
        }
    }

    /// Returns `true` if `tokens` is a near-duplicate of a document already
    /// recorded in this batch. On `false`, records this document's
    /// fingerprint so later calls can compare against it.
    pub fn is_duplicate(&mut self, tokens: &[String]) -> bool {
        if tokens.len() < self.min_tokens {
            return false;
        }
        let fp = fingerprint(tokens);
        for existing in &self.seen {
            if jaccard(&fp, existing) >= self.similarity_threshold {
                return true;
            }
        }
        self.seen.push(fp);
        false
    }

    /// Clears all recorded fingerprints. Called when the owning partial
    /// index is flushed to disk.
    pub fn clear(&mut self) {
        self.seen.clear();
    }
}
