// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the siftdex command-line interface.
//!
//! Three subcommands: `index` to build an index from a crawled corpus,
//! `search` to run a query against a built index, and `inspect` to print
//! summary statistics about a built index's doc-id map and shards.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "siftdex", about = "Static inverted-index search engine", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index from a crawled corpus directory
    Index {
        /// Corpus root: one subdirectory per host, one JSON file per page
        #[arg(short, long)]
        corpus: String,

        /// Output directory for partials, the merged index, shards, and the doc-id map
        #[arg(short, long)]
        output: String,

        /// Partial-index flush threshold, in estimated bytes
        #[arg(long, default_value = "20000000")]
        threshold_bytes: usize,

        /// Near-duplicate Jaccard similarity threshold
        #[arg(long, default_value = "0.85")]
        duplicate_similarity: f64,

        /// Minimum token count below which a document is never flagged as a duplicate
        #[arg(long, default_value = "10")]
        duplicate_min_tokens: usize,
    },

    /// Search a built index
    Search {
        /// Output directory passed to `index` (holds shards/ and doc_id.jsonl)
        #[arg(short, long)]
        index: String,

        /// Search query
        query: String,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Print summary statistics about a built index
    Inspect {
        /// Output directory passed to `index`
        #[arg(short, long)]
        index: String,
    },
}
