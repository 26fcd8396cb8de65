//! Describe local files as release attachments.
//!
//! Before upload, every attachment gets an [`Asset`] entry with integrity
//! fields filled in: the SHA-256 of its contents and its size in bytes. This
//! module walks a directory and produces those entries, so a creator can
//! point at a build output folder instead of writing the list by hand.
//!
//! ```text
//! release/                      name              uri
//! ├── model.glb            →    model.glb         ipfs://QmDir/model.glb
//! ├── docs/
//! │   └── manual.pdf       →    docs/manual.pdf   ipfs://QmDir/docs/manual.pdf
//! └── .DS_Store                 (hidden, skipped)
//! ```
//!
//! - **Names** are paths relative to the scanned directory, `/`-separated on
//!   every platform, so the same folder yields the same manifest everywhere.
//! - **MIME types** come from the extension via
//!   [`mime_for_filename`](crate::file_type::mime_for_filename); there is no
//!   browser to ask.
//! - **URIs** are the base URI of the uploaded directory joined with the name.
//!
//! Hashing reads every file in full, so it runs in parallel on the rayon pool.
//! The result is sorted by name regardless of completion order.

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::file_type::mime_for_filename;
use crate::types::Asset;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{path} is {size} bytes, above the {limit} byte upload limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// How scanned files map to asset entries.
#[derive(Debug, Clone)]
pub struct AssetScanOptions {
    /// URI of the uploaded directory, e.g. `ipfs://QmDir`.
    pub base_uri: String,
    /// Files above this many bytes are rejected.
    pub max_file_size: u64,
}

/// SHA-256 of a file's contents as lowercase hex.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Join a base URI and a relative name with exactly one `/`.
pub fn join_uri(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Relative name of `path` under `root`, `/`-separated.
fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Walk `dir` and describe every regular, non-hidden file as an [`Asset`].
pub fn scan_assets(dir: &Path, options: &AssetScanOptions) -> Result<Vec<Asset>, AssetError> {
    let mut files: Vec<(PathBuf, u64)> = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let size = entry.metadata()?.len();
        if size > options.max_file_size {
            return Err(AssetError::TooLarge {
                path: entry.path().to_path_buf(),
                size,
                limit: options.max_file_size,
            });
        }
        files.push((entry.into_path(), size));
    }

    tracing::debug!(dir = %dir.display(), files = files.len(), "hashing assets");

    let mut assets = files
        .par_iter()
        .map(|(path, size)| {
            let sha256 = hash_file(path).map_err(|source| AssetError::Io {
                path: path.clone(),
                source,
            })?;
            let name = relative_name(dir, path);
            Ok(Asset {
                mime: mime_for_filename(&name).to_string(),
                uri: join_uri(&options.base_uri, &name),
                name,
                sha256: Some(sha256),
                size: Some(*size),
            })
        })
        .collect::<Result<Vec<_>, AssetError>>()?;

    assets.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn options() -> AssetScanOptions {
        AssetScanOptions {
            base_uri: "ipfs://QmDir/".into(),
            max_file_size: 1024,
        }
    }

    #[test]
    fn hash_file_known_digest() {
        let tmp = write_tree(&[("hello.txt", "hello")]);
        assert_eq!(
            hash_file(&tmp.path().join("hello.txt")).unwrap(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn hash_file_streams_multi_buffer_files() {
        let big = "abcdefgh".repeat(64 * 1024);
        let tmp = write_tree(&[("big.bin", big.as_str())]);
        assert_eq!(
            hash_file(&tmp.path().join("big.bin")).unwrap(),
            format!("{:x}", Sha256::digest(big.as_bytes()))
        );
    }

    #[test]
    fn hash_file_missing_is_an_error() {
        let tmp = write_tree(&[]);
        assert!(hash_file(&tmp.path().join("nope.bin")).is_err());
    }

    #[test]
    fn join_uri_normalizes_slashes() {
        assert_eq!(join_uri("ipfs://QmDir", "a.pdf"), "ipfs://QmDir/a.pdf");
        assert_eq!(join_uri("ipfs://QmDir/", "/a.pdf"), "ipfs://QmDir/a.pdf");
    }

    #[test]
    fn scans_nested_files_sorted_by_name() {
        let tmp = write_tree(&[
            ("model.glb", "glTF"),
            ("docs/manual.pdf", "%PDF-1.7"),
            ("archive.zip", "PK"),
        ]);
        let assets = scan_assets(tmp.path(), &options()).unwrap();

        let names: Vec<&str> = assets.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["archive.zip", "docs/manual.pdf", "model.glb"]);

        let manual = &assets[1];
        assert_eq!(manual.mime, "application/pdf");
        assert_eq!(manual.uri, "ipfs://QmDir/docs/manual.pdf");
        assert_eq!(manual.size, Some(8));
        assert_eq!(manual.sha256.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn skips_hidden_files_and_directories() {
        let tmp = write_tree(&[
            ("visible.stl", "solid"),
            (".DS_Store", "junk"),
            (".git/HEAD", "ref"),
        ]);
        let assets = scan_assets(tmp.path(), &options()).unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "visible.stl");
        assert_eq!(assets[0].mime, "model/stl");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        let tmp = write_tree(&[("data.bin", "\u{0}\u{1}")]);
        let assets = scan_assets(tmp.path(), &options()).unwrap();
        assert_eq!(assets[0].mime, "application/octet-stream");
    }

    #[test]
    fn rejects_files_over_limit() {
        let big = "x".repeat(2048);
        let tmp = write_tree(&[("big.zip", big.as_str())]);
        let err = scan_assets(tmp.path(), &options()).unwrap_err();
        assert!(matches!(err, AssetError::TooLarge { size: 2048, limit: 1024, .. }));
    }

    #[test]
    fn empty_directory_yields_no_assets() {
        let tmp = write_tree(&[]);
        assert!(scan_assets(tmp.path(), &options()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = write_tree(&[]);
        let missing = tmp.path().join("nope");
        assert!(scan_assets(&missing, &options()).is_err());
    }
}
