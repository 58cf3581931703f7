// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! siftdex CLI: build, search, and inspect a static inverted-index.
//!
//! ```bash
//! # Build an index from a crawled corpus
//! siftdex index --corpus ./corpus --output ./data
//!
//! # Search it
//! siftdex search --index ./data "rust concurrency"
//!
//! # Inspect summary statistics
//! siftdex inspect --index ./data
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use siftdex::types::IndexerConfig;
use siftdex::{run_build, search, split_and_score};

mod cli;
use cli::display::{
    double_footer, double_header, pad_right, row, score_value, section_bot, section_top, styled,
    timing_ms, title, truncate_path, BOLD,
};
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            corpus,
            output,
            threshold_bytes,
            duplicate_similarity,
            duplicate_min_tokens,
        } => run_index(&corpus, &output, threshold_bytes, duplicate_similarity, duplicate_min_tokens),
        Commands::Search { index, query, limit } => run_search(&index, &query, limit),
        Commands::Inspect { index } => run_inspect(&index),
    }
}

fn run_index(corpus: &str, output: &str, threshold_bytes: usize, duplicate_similarity: f64, duplicate_min_tokens: usize) {
    let mut config = IndexerConfig::new(PathBuf::from(corpus), PathBuf::from(output));
    config.threshold_bytes = threshold_bytes;
    config.duplicate_similarity_threshold = duplicate_similarity;
    config.duplicate_min_tokens = duplicate_min_tokens;

    let build_start = Instant::now();
    let stats = match run_build(config.clone()) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let build_elapsed = build_start.elapsed();

    let shard_start = Instant::now();
    if let Err(e) = split_and_score(&config.final_index_path, &config.doc_id_path, &config.shard_dir) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
    let shard_elapsed = shard_start.elapsed();

    double_header();
    title("INDEX BUILD COMPLETE");
    double_footer();
    section_top("SUMMARY");
    row(&format!(" documents indexed   {}", stats.documents_indexed));
    row(&format!(" documents skipped   {}", stats.documents_skipped));
    row(&format!(" terms               {}", stats.terms));
    row(&format!(" partial flushes     {}", stats.partial_flushes));
    row(&format!(" build time          {}", timing_ms(build_elapsed.as_secs_f64() * 1000.0)));
    row(&format!(" shard+score time    {}", timing_ms(shard_elapsed.as_secs_f64() * 1000.0)));
    section_bot();
}

fn run_search(index_dir: &str, query: &str, limit: usize) {
    let base = PathBuf::from(index_dir);
    let shard_dir = base.join("shards");
    let doc_id_path = base.join("doc_id.jsonl");

    let start = Instant::now();
    let results = match search(&shard_dir, &doc_id_path, query) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    section_top(&format!("RESULTS FOR {:?}", query));
    if results.is_empty() {
        row(" no matches");
    } else {
        for (rank, result) in results.iter().take(limit).enumerate() {
            let label = format!(" {:>3}. {}", rank + 1, truncate_path(&result.url, 60));
            row(&format!("{}  {}", pad_right(&label, 68), score_value(result.score)));
        }
        if results.len() > limit {
            row(&format!(" ... and {} more", results.len() - limit));
        }
    }
    section_bot();
    println!(
        "{} matched in {}ms",
        styled(&[BOLD], &results.len().to_string()),
        timing_ms(elapsed.as_secs_f64() * 1000.0).trim()
    );
}

fn run_inspect(index_dir: &str) {
    let base = PathBuf::from(index_dir);
    let doc_id_path = base.join("doc_id.jsonl");
    let shard_dir = base.join("shards");
    let final_index_path = base.join("index.jsonl");

    let doc_count = std::fs::read_to_string(&doc_id_path)
        .map(|s| s.lines().filter(|l| !l.trim().is_empty()).count())
        .unwrap_or(0);

    section_top("INDEX SUMMARY");
    row(&format!(" index directory     {}", base.display()));
    row(&format!(" documents            {}", doc_count));
    row(&format!(
        " merged index exists  {}",
        final_index_path.exists()
    ));

    match std::fs::read_dir(&shard_dir) {
        Ok(entries) => {
            let mut shards: Vec<(String, u64)> = entries
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    let len = e.metadata().ok()?.len();
                    Some((e.file_name().to_string_lossy().into_owned(), len))
                })
                .collect();
            shards.sort();
            row(&format!(" shards               {}", shards.len()));
            for (name, len) in shards {
                row(&format!("   {:<12} {} bytes", name, len));
            }
        }
        Err(_) => row(" shards               (none built yet)"),
    }
    section_bot();
}
