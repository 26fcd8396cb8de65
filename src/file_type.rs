//! File-type classification for content items.
//!
//! Every content item (the primary preview file, each attachment) is routed
//! to a viewer and a badge by its [`FileType`]. Classification looks at two
//! signals:
//!
//! - **Extension** of the filename, when one is known. Checked first.
//! - **MIME type** as reported at upload time. Checked only when the
//!   extension is absent or unrecognized.
//!
//! The extension wins because browsers and OS file pickers routinely report
//! `application/octet-stream` (or nothing) for formats they don't know, such
//! as `.glb` and `.stl`, while the extension of a user-picked file is always
//! there.
//!
//! ## Tag set
//!
//! | Tag | Extensions | MIME types |
//! |-----|-----------|------------|
//! | `pdf` | pdf | application/pdf |
//! | `glb` | glb | model/gltf-binary, model/gltf+json |
//! | `gltf` | gltf | |
//! | `stl` | stl | model/stl, application/sla, application/vnd.ms-pki.stl, model/x.stl-binary, model/x.stl-ascii |
//! | `zip` | zip | application/zip, application/x-zip-compressed |
//! | `image` | jpg, jpeg, png, gif, webp | image/jpeg, image/png, image/gif, image/webp |
//! | `video` | mp4, webm | video/mp4, video/webm |
//! | `other` | everything else | everything else |
//!
//! `model/gltf+json` maps to `glb` rather than `gltf`: both render in the same
//! 3D viewer, and stored documents already carry that classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Glb,
    Gltf,
    Stl,
    Image,
    Video,
    Zip,
    Other,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Glb => "glb",
            FileType::Gltf => "gltf",
            FileType::Stl => "stl",
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Zip => "zip",
            FileType::Other => "other",
        }
    }

    /// Whether an in-page viewer exists for this type.
    pub fn is_previewable(self) -> bool {
        !matches!(self, FileType::Zip | FileType::Other)
    }

    pub fn is_3d_model(self) -> bool {
        matches!(self, FileType::Glb | FileType::Gltf | FileType::Stl)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a content item. Total: unknown input is [`FileType::Other`].
///
/// ```
/// use zdrive::file_type::{file_type, FileType};
///
/// assert_eq!(file_type(Some("application/pdf"), None), FileType::Pdf);
/// assert_eq!(file_type(Some("application/octet-stream"), Some("model.glb")), FileType::Glb);
/// assert_eq!(file_type(None, None), FileType::Other);
/// ```
pub fn file_type(mime: Option<&str>, filename: Option<&str>) -> FileType {
    if let Some(found) = filename.and_then(from_filename) {
        return found;
    }
    mime.and_then(from_mime).unwrap_or(FileType::Other)
}

/// Lowercased text after the last `.`; the whole name when there is no dot.
fn extension(filename: &str) -> String {
    let ext = match filename.rfind('.') {
        Some(pos) => &filename[pos + 1..],
        None => filename,
    };
    ext.to_ascii_lowercase()
}

fn from_filename(filename: &str) -> Option<FileType> {
    let ft = match extension(filename).as_str() {
        "pdf" => FileType::Pdf,
        "glb" => FileType::Glb,
        "gltf" => FileType::Gltf,
        "stl" => FileType::Stl,
        "zip" => FileType::Zip,
        "jpg" | "jpeg" | "png" | "gif" | "webp" => FileType::Image,
        "mp4" | "webm" => FileType::Video,
        _ => return None,
    };
    Some(ft)
}

fn from_mime(mime: &str) -> Option<FileType> {
    let ft = match mime {
        "application/pdf" => FileType::Pdf,
        "model/gltf-binary" | "model/gltf+json" => FileType::Glb,
        // Browsers report STL under many non-standard types
        "model/stl"
        | "application/sla"
        | "application/vnd.ms-pki.stl"
        | "model/x.stl-binary"
        | "model/x.stl-ascii" => FileType::Stl,
        "application/zip" | "application/x-zip-compressed" => FileType::Zip,
        "image/jpeg" | "image/png" | "image/gif" | "image/webp" => FileType::Image,
        "video/mp4" | "video/webm" => FileType::Video,
        _ => return None,
    };
    Some(ft)
}

/// Canonical MIME type for a filename, by extension.
///
/// Used when describing local files, where no browser-reported type exists.
/// Falls back to `application/octet-stream`.
pub fn mime_for_filename(filename: &str) -> &'static str {
    match extension(filename).as_str() {
        "pdf" => "application/pdf",
        "glb" => "model/gltf-binary",
        "gltf" => "model/gltf+json",
        "stl" => "model/stl",
        "zip" => "application/zip",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "md" | "markdown" => "text/markdown",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Extract a filename from a storage URI, if the last path segment has an
/// extension.
///
/// - `ipfs://QmHash/model.stl` → `Some("model.stl")`
/// - `https://gateway.ipfs.io/ipfs/QmHash/doc.pdf` → `Some("doc.pdf")`
/// - `ipfs://QmHash` → `None`
pub fn filename_from_uri(uri: &str) -> Option<&str> {
    let last = uri.rsplit('/').next()?;
    (!last.is_empty() && last.contains('.')).then_some(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // MIME detection
    // =========================================================================

    #[test]
    fn detects_by_mime() {
        let cases = [
            ("application/pdf", FileType::Pdf),
            ("model/gltf-binary", FileType::Glb),
            ("model/gltf+json", FileType::Glb),
            ("model/stl", FileType::Stl),
            ("application/sla", FileType::Stl),
            ("application/vnd.ms-pki.stl", FileType::Stl),
            ("application/zip", FileType::Zip),
            ("application/x-zip-compressed", FileType::Zip),
            ("image/jpeg", FileType::Image),
            ("image/webp", FileType::Image),
            ("video/mp4", FileType::Video),
            ("video/webm", FileType::Video),
        ];
        for (mime, expected) in cases {
            assert_eq!(file_type(Some(mime), None), expected, "{mime}");
        }
    }

    #[test]
    fn mime_match_is_exact() {
        assert_eq!(file_type(Some("Application/PDF"), None), FileType::Other);
        assert_eq!(file_type(Some("image/svg+xml"), None), FileType::Other);
        assert_eq!(file_type(Some("video/quicktime"), None), FileType::Other);
    }

    // =========================================================================
    // Extension detection
    // =========================================================================

    #[test]
    fn detects_by_extension() {
        assert_eq!(file_type(None, Some("document.pdf")), FileType::Pdf);
        assert_eq!(file_type(None, Some("model.glb")), FileType::Glb);
        assert_eq!(file_type(None, Some("scene.gltf")), FileType::Gltf);
        assert_eq!(file_type(None, Some("part.stl")), FileType::Stl);
        assert_eq!(file_type(None, Some("archive.zip")), FileType::Zip);
        assert_eq!(file_type(None, Some("photo.jpg")), FileType::Image);
        assert_eq!(file_type(None, Some("clip.mp4")), FileType::Video);
    }

    #[test]
    fn extension_is_case_insensitive_and_uses_last_dot() {
        assert_eq!(file_type(None, Some("PHOTO.JPEG")), FileType::Image);
        assert_eq!(file_type(None, Some("backup.tar.zip")), FileType::Zip);
        assert_eq!(file_type(None, Some("model.glb.txt")), FileType::Other);
    }

    #[test]
    fn dotless_filename_is_looked_up_whole() {
        assert_eq!(file_type(None, Some("pdf")), FileType::Pdf);
        assert_eq!(file_type(None, Some("README")), FileType::Other);
    }

    // =========================================================================
    // Priority and fallback
    // =========================================================================

    #[test]
    fn extension_wins_over_mime() {
        assert_eq!(
            file_type(Some("application/octet-stream"), Some("model.glb")),
            FileType::Glb
        );
        assert_eq!(
            file_type(Some("application/octet-stream"), Some("model.stl")),
            FileType::Stl
        );
        assert_eq!(
            file_type(Some("application/pdf"), Some("cover.png")),
            FileType::Image
        );
    }

    #[test]
    fn unknown_extension_falls_back_to_mime() {
        assert_eq!(
            file_type(Some("application/pdf"), Some("paper.bin")),
            FileType::Pdf
        );
    }

    #[test]
    fn defaults_to_other() {
        assert_eq!(file_type(None, None), FileType::Other);
        assert_eq!(file_type(Some("application/octet-stream"), None), FileType::Other);
        assert_eq!(
            file_type(Some("application/octet-stream"), Some("file.xyz")),
            FileType::Other
        );
        assert_eq!(file_type(Some(""), Some("")), FileType::Other);
    }

    #[test]
    fn previewable_and_3d_flags() {
        assert!(FileType::Pdf.is_previewable());
        assert!(FileType::Stl.is_previewable());
        assert!(!FileType::Zip.is_previewable());
        assert!(!FileType::Other.is_previewable());
        assert!(FileType::Gltf.is_3d_model());
        assert!(!FileType::Image.is_3d_model());
    }

    // =========================================================================
    // mime_for_filename / filename_from_uri
    // =========================================================================

    #[test]
    fn canonical_mime_classifies_back_to_same_type() {
        for name in ["a.pdf", "a.glb", "a.stl", "a.zip", "a.png", "a.webm"] {
            let mime = mime_for_filename(name);
            assert_eq!(file_type(Some(mime), None), file_type(None, Some(name)), "{name}");
        }
        assert_eq!(mime_for_filename("notes.unknown"), "application/octet-stream");
    }

    #[test]
    fn filename_from_ipfs_and_http_uris() {
        assert_eq!(filename_from_uri("ipfs://QmHash/model.stl"), Some("model.stl"));
        assert_eq!(
            filename_from_uri("https://gateway.ipfs.io/ipfs/QmHash/doc.pdf"),
            Some("doc.pdf")
        );
    }

    #[test]
    fn filename_from_bare_cid_is_none() {
        assert_eq!(filename_from_uri("ipfs://QmHash"), None);
        assert_eq!(filename_from_uri("ipfs://bafkreiabcdef1234567890"), None);
        assert_eq!(filename_from_uri("ipfs://QmHash/"), None);
    }
}
