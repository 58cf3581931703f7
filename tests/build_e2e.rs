// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for the build -> shard -> search pipeline.

use siftdex::types::IndexerConfig;
use siftdex::{run_build, search, split_and_score};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_doc(corpus_root: &Path, host: &str, file: &str, url: &str, content: &str) {
    let host_dir = corpus_root.join(host);
    fs::create_dir_all(&host_dir).unwrap();
    let doc = serde_json::json!({ "url": url, "content": content, "encoding": "utf-8" });
    fs::write(host_dir.join(file), doc.to_string()).unwrap();
}

#[test]
fn full_pipeline_single_document() {
    let corpus = TempDir::new().unwrap();
    write_doc(corpus.path(), "a.example", "1.json", "https://a.example/1", "<title>Hello</title><p>hello world</p>");

    let out = TempDir::new().unwrap();
    let config = IndexerConfig::new(corpus.path(), out.path());

    let stats = run_build(config.clone()).expect("build should succeed");
    assert_eq!(stats.documents_indexed, 1);
    assert!(config.final_index_path.exists(), "final index should be written");
    assert!(config.doc_id_path.exists(), "doc-id map should be written");

    split_and_score(&config.final_index_path, &config.doc_id_path, &config.shard_dir).unwrap();
    assert!(config.shard_dir.join("h.jsonl").exists());

    let results = search(&config.shard_dir, &config.doc_id_path, "hello").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "https://a.example/1");
}

#[test]
fn multi_document_and_query_and_ranking() {
    let corpus = TempDir::new().unwrap();
    // D1: title "Cat", body "cat dog" -- matches S2 from the design notes.
    write_doc(corpus.path(), "a.example", "1.json", "https://a.example/1", "<title>Cat</title><p>cat dog</p>");
    write_doc(corpus.path(), "a.example", "2.json", "https://a.example/2", "<p>dog</p>");

    let out = TempDir::new().unwrap();
    let config = IndexerConfig::new(corpus.path(), out.path());
    run_build(config.clone()).unwrap();
    split_and_score(&config.final_index_path, &config.doc_id_path, &config.shard_dir).unwrap();

    let and_query = search(&config.shard_dir, &config.doc_id_path, "cat dog").unwrap();
    assert_eq!(and_query.len(), 1);
    assert_eq!(and_query[0].url, "https://a.example/1");

    let dog_query = search(&config.shard_dir, &config.doc_id_path, "dog").unwrap();
    assert_eq!(dog_query.len(), 2);
    // D1's "dog" has no field boost (only body), same as D2's -- tie breaks on docid.
    assert_eq!(dog_query[0].url, "https://a.example/1");
    assert_eq!(dog_query[1].url, "https://a.example/2");
}

#[test]
fn near_duplicate_pages_are_rejected_but_distinct_pages_are_kept() {
    let corpus = TempDir::new().unwrap();
    let shared = "<p>the quick brown fox jumps over the lazy dog while the sun sets slowly</p>";
    write_doc(corpus.path(), "a.example", "1.json", "https://a.example/1", shared);
    write_doc(corpus.path(), "a.example", "2.json", "https://a.example/2", shared);
    write_doc(corpus.path(), "a.example", "3.json", "https://a.example/3", "<p>completely unrelated content about cooking recipes and kitchen tools</p>");

    let out = TempDir::new().unwrap();
    let config = IndexerConfig::new(corpus.path(), out.path());
    let stats = run_build(config.clone()).unwrap();

    assert_eq!(stats.documents_indexed, 2);
    assert_eq!(stats.documents_skipped, 1);
}

#[test]
fn empty_query_is_a_reported_error_not_an_empty_result() {
    let corpus = TempDir::new().unwrap();
    write_doc(corpus.path(), "a.example", "1.json", "https://a.example/1", "<p>hello world</p>");

    let out = TempDir::new().unwrap();
    let config = IndexerConfig::new(corpus.path(), out.path());
    run_build(config.clone()).unwrap();
    split_and_score(&config.final_index_path, &config.doc_id_path, &config.shard_dir).unwrap();

    let err = search(&config.shard_dir, &config.doc_id_path, "   ").unwrap_err();
    assert_eq!(err, "please provide a valid query");
}

#[test]
fn all_stopword_query_returns_empty_results_not_an_error() {
    let corpus = TempDir::new().unwrap();
    write_doc(corpus.path(), "a.example", "1.json", "https://a.example/1", "<p>hello world</p>");

    let out = TempDir::new().unwrap();
    let config = IndexerConfig::new(corpus.path(), out.path());
    run_build(config.clone()).unwrap();
    split_and_score(&config.final_index_path, &config.doc_id_path, &config.shard_dir).unwrap();

    let results = search(&config.shard_dir, &config.doc_id_path, "the a an").unwrap();
    assert!(results.is_empty());
}

#[test]
fn shards_partition_the_merged_index_without_overlap() {
    let corpus = TempDir::new().unwrap();
    for (i, word) in ["apple", "banana", "cherry", "123abc", "!!!"].iter().enumerate() {
        write_doc(
            corpus.path(),
            "a.example",
            &format!("{i}.json"),
            &format!("https://a.example/{i}"),
            &format!("<p>{word} filler words to pass the minimum token count threshold here today now</p>"),
        );
    }

    let out = TempDir::new().unwrap();
    let config = IndexerConfig::new(corpus.path(), out.path());
    run_build(config.clone()).unwrap();
    split_and_score(&config.final_index_path, &config.doc_id_path, &config.shard_dir).unwrap();

    let merged = fs::read_to_string(&config.final_index_path).unwrap();
    let merged_terms: usize = merged.lines().filter(|l| !l.trim().is_empty()).count();

    let mut shard_terms = 0usize;
    for entry in fs::read_dir(&config.shard_dir).unwrap() {
        let entry = entry.unwrap();
        let content = fs::read_to_string(entry.path()).unwrap();
        shard_terms += content.lines().filter(|l| !l.trim().is_empty()).count();
    }

    assert_eq!(merged_terms, shard_terms, "every term must land in exactly one shard");
}
