//! Shared test fixtures for the zdrive test suite.
//!
//! Builders for release inputs and documents that tests tweak with struct
//! update syntax:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let input = CreateReleaseInput {
//!     assets: vec![zip_asset()],
//!     ..minimal_input()
//! };
//! let metadata = build_release_metadata(&input);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::license::CbeLicenseKind;
use crate::metadata::{
    CollectionInput, CreateReleaseInput, GateInput, LicenseInput, PreviewFile,
    build_release_metadata,
};
use crate::types::{Asset, ExternalLink, ExternalLinkKind, ReleaseContent, ReleaseMetadata};

// =========================================================================
// Builder inputs
// =========================================================================

/// Required fields only.
pub fn minimal_input() -> CreateReleaseInput {
    CreateReleaseInput {
        name: "Test Release".into(),
        description: "A test release".into(),
        cover_image_uri: "ipfs://QmCover123".into(),
        creator_address: "0x1234567890abcdef1234567890abcdef12345678".into(),
        ..Default::default()
    }
}

/// Every optional part filled in.
pub fn full_input() -> CreateReleaseInput {
    CreateReleaseInput {
        preview_file: Some(PreviewFile {
            uri: "ipfs://QmModel/chair.glb".into(),
            mime: "model/gltf-binary".into(),
        }),
        assets: vec![zip_asset()],
        external: vec![github_link()],
        collection: Some(CollectionInput {
            title: "Tyrolean Chair Studies".into(),
            slug: None,
            ordering_index: Some(1),
        }),
        license: Some(LicenseInput {
            cbe_type: CbeLicenseKind::NonCommercial,
            gate: Some(GateInput {
                min_balance: "10000".into(),
            }),
        }),
        creator_address: "0xABCDEF0123456789ABCDEF0123456789ABCDEF01".into(),
        ..minimal_input()
    }
}

pub fn zip_asset() -> Asset {
    Asset {
        name: "source.zip".into(),
        mime: "application/zip".into(),
        uri: "ipfs://QmZip123".into(),
        sha256: Some("abc123".into()),
        size: Some(1024),
    }
}

pub fn github_link() -> ExternalLink {
    ExternalLink {
        kind: ExternalLinkKind::Github,
        url: "https://github.com/user/repo".into(),
        git_ref: Some("v1.0.0".into()),
    }
}

// =========================================================================
// Documents
// =========================================================================

/// A built minimal document with the given primary content.
pub fn metadata_with_content(mime: &str, uri: &str) -> ReleaseMetadata {
    let mut metadata = build_release_metadata(&minimal_input());
    metadata.content = Some(ReleaseContent {
        mime: mime.into(),
        uri: uri.into(),
    });
    metadata.animation_url = Some(uri.into());
    metadata
}

// =========================================================================
// Filesystem
// =========================================================================

/// Write `files` (relative path, contents) under a fresh temp directory.
pub fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, contents) in files {
        let path = tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }
    tmp
}

/// Read a file the test wrote, panicking with the path on failure.
pub fn read_string(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}
