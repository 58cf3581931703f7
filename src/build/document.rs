// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus input format and directory walker.
//!
//! The corpus root contains one subdirectory per host, each holding one
//! captured-page JSON file per document (section 6 of the distilled spec).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One captured page, as stored on disk by the (out-of-scope) crawler.
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusDocument {
    pub url: String,
    pub content: String,
    /// Advisory only; this crate always treats `content` as UTF-8.
    #[serde(default)]
    pub encoding: String,
}

/// Strip a URL fragment (`#...`), per the docid-assignment rule in section
/// 4.4: "defragment the URL (strip any `#...`)".
pub fn defragment_url(url: &str) -> String {
    match url.find('#') {
        Some(pos) => url[..pos].to_string(),
        None => url.to_string(),
    }
}

/// List every document file under `corpus_root/<host>/<file>`, in a stable
/// (sorted) order so that successive runs over the same corpus assign the
/// same docids.
pub fn walk_corpus(corpus_root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut hosts: Vec<PathBuf> = fs::read_dir(corpus_root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    hosts.sort();

    let mut files = Vec::new();
    for host_dir in hosts {
        let mut entries: Vec<PathBuf> = fs::read_dir(&host_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        entries.sort();
        files.extend(entries);
    }
    Ok(files)
}

/// Read and parse one corpus-file. Any failure (I/O, malformed JSON,
/// missing fields) is a recoverable corpus-file error — the caller logs and
/// skips it (section 7).
pub fn load_document(path: &Path) -> Result<CorpusDocument, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("{}: invalid JSON: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fragment() {
        assert_eq!(defragment_url("https://a.com/x#section"), "https://a.com/x");
        assert_eq!(defragment_url("https://a.com/x"), "https://a.com/x");
    }

    #[test]
    fn walk_corpus_is_sorted_and_recursive_one_level() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("b-host")).unwrap();
        fs::create_dir(dir.path().join("a-host")).unwrap();
        fs::write(dir.path().join("a-host/2.json"), "{}").unwrap();
        fs::write(dir.path().join("a-host/1.json"), "{}").unwrap();
        fs::write(dir.path().join("b-host/x.json"), "{}").unwrap();

        let files = walk_corpus(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["a-host/1.json", "a-host/2.json", "b-host/x.json"]
        );
    }
}
