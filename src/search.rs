// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query Evaluator (C6): tokenize, locate postings via sharded binary
//! search, intersect smallest-first, score, rank.

use crate::tokenizer;
use crate::types::{DocId, DocRecord, Posting, SearchResult, TermRecord};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Exact error returned for a query that tokenizes to nothing — grounded in
/// the reference HTTP surface's empty-query rejection.
pub const EMPTY_QUERY_ERROR: &str = "please provide a valid query";

fn shard_path(shard_dir: &Path, token: &str) -> PathBuf {
    shard_dir.join(format!("{}.jsonl", crate::shard::bucket_key(token)))
}

/// Binary search a shard file's lines for `token`. A missing shard file is
/// indistinguishable from a shard with no hits (empty result). A corrupt
/// line encountered during the search is a hard error: the sorted
/// invariant the search depends on cannot be trusted past that point
/// (section 4.6).
fn shard_lookup(shard_dir: &Path, token: &str) -> Result<Vec<Posting>, String> {
    let path = shard_path(shard_dir, token);
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(_) => return Ok(Vec::new()),
    };
    let lines: Vec<String> = BufReader::new(file)
        .lines()
        .collect::<Result<_, _>>()
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    let mut lo: isize = 0;
    let mut hi: isize = lines.len() as isize - 1;
    while lo <= hi {
        let mid = (lo + hi) / 2;
        let line = &lines[mid as usize];
        let value: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| format!("corrupt shard line in {}: {}", path.display(), e))?;
        let mid_token = value
            .get("token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| format!("corrupt shard line in {}: missing token field", path.display()))?;

        match mid_token.cmp(token) {
            Ordering::Equal => {
                let record: TermRecord = serde_json::from_str(line)
                    .map_err(|e| format!("corrupt shard line in {}: {}", path.display(), e))?;
                return Ok(record.postings);
            }
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid - 1,
        }
    }
    Ok(Vec::new())
}

fn load_doc_id_map(doc_id_path: &Path) -> Result<HashMap<DocId, String>, String> {
    let file =
        File::open(doc_id_path).map_err(|e| format!("failed to open {}: {}", doc_id_path.display(), e))?;
    let mut map = HashMap::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| format!("read error: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: DocRecord =
            serde_json::from_str(&line).map_err(|e| format!("corrupt doc record: {}", e))?;
        map.insert(record.docid, record.url);
    }
    Ok(map)
}

/// Evaluate one query against a sharded index, returning ranked results.
///
/// Returns `Err(EMPTY_QUERY_ERROR)` only if `query` is empty (after
/// trimming). A non-empty query whose every token is a stop-word is a
/// well-formed query that simply matches nothing: it returns `Ok(vec![])`,
/// not an error (section 8's boundary case).
pub fn search(shard_dir: &Path, doc_id_path: &Path, query: &str) -> Result<Vec<SearchResult>, String> {
    if query.trim().is_empty() {
        return Err(EMPTY_QUERY_ERROR.to_string());
    }

    let tokens = tokenizer::tokenize_query(query);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut token_postings: Vec<(String, Vec<Posting>)> = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let postings = shard_lookup(shard_dir, token)?;
        token_postings.push((token.clone(), postings));
    }

    // Any token with zero postings makes the AND empty.
    if token_postings.iter().any(|(_, postings)| postings.is_empty()) {
        return Ok(Vec::new());
    }

    // Smallest posting set first keeps the intersection cheap.
    token_postings.sort_by_key(|(_, postings)| postings.len());

    let mut candidates: BTreeSet<DocId> = token_postings[0].1.iter().map(|p| p.docid).collect();
    for (_, postings) in &token_postings[1..] {
        let set: HashSet<DocId> = postings.iter().map(|p| p.docid).collect();
        candidates.retain(|docid| set.contains(docid));
    }

    let mut scored: Vec<(DocId, f64)> = Vec::with_capacity(candidates.len());
    for docid in &candidates {
        let mut score = 0.0;
        for (_, postings) in &token_postings {
            if let Ok(idx) = postings.binary_search_by_key(docid, |p| p.docid) {
                score += postings[idx].tfidf.unwrap_or(0.0);
            }
        }
        scored.push((*docid, score));
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

    let doc_urls = load_doc_id_map(doc_id_path)?;
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut results = Vec::with_capacity(scored.len());
    for (docid, score) in scored {
        if let Some(url) = doc_urls.get(&docid) {
            if seen_urls.insert(url.clone()) {
                results.push(SearchResult { url: url.clone(), score });
            }
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::run_build;
    use crate::shard::split_and_score;
    use crate::types::IndexerConfig;
    use std::fs;

    fn write_doc(dir: &Path, host: &str, file: &str, url: &str, content: &str) {
        let host_dir = dir.join(host);
        fs::create_dir_all(&host_dir).unwrap();
        let body = serde_json::json!({ "url": url, "content": content });
        fs::write(host_dir.join(file), body.to_string()).unwrap();
    }

    fn build_and_shard(corpus: &Path, out: &Path) -> IndexerConfig {
        let config = IndexerConfig::new(corpus, out);
        run_build(config.clone()).unwrap();
        split_and_score(&config.final_index_path, &config.doc_id_path, &config.shard_dir).unwrap();
        config
    }

    #[test]
    fn empty_query_is_rejected() {
        let corpus = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "a.com", "1.json", "https://a.com/1", "<p>hello world</p>");
        let out = tempfile::tempdir().unwrap();
        let config = build_and_shard(corpus.path(), out.path());

        let err = search(&config.shard_dir, &config.doc_id_path, "   ").unwrap_err();
        assert_eq!(err, EMPTY_QUERY_ERROR);
    }

    #[test]
    fn all_stopword_query_is_empty_results_not_an_error() {
        let corpus = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "a.com", "1.json", "https://a.com/1", "<p>hello world</p>");
        let out = tempfile::tempdir().unwrap();
        let config = build_and_shard(corpus.path(), out.path());

        let results = search(&config.shard_dir, &config.doc_id_path, "the and or").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn and_semantics_and_title_boost_ranking() {
        let corpus = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "a.com", "1.json", "https://a.com/1", "<title>Cat</title><p>cat dog</p>");
        write_doc(corpus.path(), "a.com", "2.json", "https://a.com/2", "<p>dog</p>");
        let out = tempfile::tempdir().unwrap();
        let config = build_and_shard(corpus.path(), out.path());

        let both = search(&config.shard_dir, &config.doc_id_path, "cat dog").unwrap();
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].url, "https://a.com/1");

        let dog_only = search(&config.shard_dir, &config.doc_id_path, "dog").unwrap();
        assert_eq!(dog_only.len(), 2);
        assert_eq!(dog_only[1].url, "https://a.com/1");
    }

    #[test]
    fn unknown_token_yields_no_results() {
        let corpus = tempfile::tempdir().unwrap();
        write_doc(corpus.path(), "a.com", "1.json", "https://a.com/1", "<p>hello world</p>");
        let out = tempfile::tempdir().unwrap();
        let config = build_and_shard(corpus.path(), out.path());

        let results = search(&config.shard_dir, &config.doc_id_path, "nonexistentterm").unwrap();
        assert!(results.is_empty());
    }
}
