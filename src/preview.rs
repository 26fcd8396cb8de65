//! Viewer and badge selection for a release.
//!
//! The release page shows exactly one preview. It is picked in this order:
//!
//! 1. The primary `content` item, routed by [`file_type`] of its MIME type.
//! 2. The first GitHub link among the external links.
//! 3. The cover image.
//! 4. Nothing.
//!
//! Content whose type has no viewer still wins step 1: the page shows the
//! cover with a "preview not available for <mime>" note ([`Preview::Unsupported`])
//! rather than skipping to the GitHub link.
//!
//! Release cards carry a small file-type [`Badge`]. A GitHub link overrides
//! the content type, since a code release is better described by its source.

use serde::Serialize;

use crate::file_type::{FileType, file_type};
use crate::types::{ExternalLink, ExternalLinkKind, ReleaseMetadata};

/// Which viewer to render, with what it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "viewer", rename_all = "snake_case")]
pub enum Preview {
    Pdf { uri: String },
    Model3d { uri: String },
    Image { uri: String },
    Video { uri: String, mime: String, poster_uri: String },
    /// Content exists but no viewer handles it; show the cover instead.
    Unsupported { mime: String, cover_uri: String },
    Github { url: String, git_ref: Option<String> },
    Cover { uri: String },
    Nothing,
}

/// Pick the preview for a release page.
pub fn select_preview(metadata: &ReleaseMetadata) -> Preview {
    if let Some(content) = metadata
        .content
        .as_ref()
        .filter(|c| !c.uri.is_empty() && !c.mime.is_empty())
    {
        let uri = content.uri.clone();
        return match file_type(Some(&content.mime), None) {
            FileType::Pdf => Preview::Pdf { uri },
            FileType::Glb | FileType::Gltf => Preview::Model3d { uri },
            FileType::Image => Preview::Image { uri },
            FileType::Video => Preview::Video {
                uri,
                mime: content.mime.clone(),
                poster_uri: metadata.image.clone(),
            },
            _ => Preview::Unsupported {
                mime: content.mime.clone(),
                cover_uri: metadata.image.clone(),
            },
        };
    }

    if let Some(link) = github_link(metadata) {
        return Preview::Github {
            url: link.url.clone(),
            git_ref: link.git_ref.clone(),
        };
    }

    if !metadata.image.is_empty() {
        return Preview::Cover {
            uri: metadata.image.clone(),
        };
    }

    Preview::Nothing
}

fn github_link(metadata: &ReleaseMetadata) -> Option<&ExternalLink> {
    metadata
        .properties
        .zdrive
        .release
        .as_ref()?
        .external
        .as_ref()?
        .iter()
        .find(|link| link.kind == ExternalLinkKind::Github)
}

/// File-type label shown on release cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    Pdf,
    ThreeD,
    Zip,
    Github,
    File,
}

impl Badge {
    pub fn label(self) -> &'static str {
        match self {
            Badge::Pdf => "PDF",
            Badge::ThreeD => "3D",
            Badge::Zip => "ZIP",
            Badge::Github => "GitHub",
            Badge::File => "File",
        }
    }
}

/// Badge for a release card.
pub fn badge(metadata: &ReleaseMetadata) -> Badge {
    if github_link(metadata).is_some() {
        return Badge::Github;
    }
    let mime = metadata.content.as_ref().map(|c| c.mime.as_str());
    match file_type(mime, None) {
        FileType::Pdf => Badge::Pdf,
        ft if ft.is_3d_model() => Badge::ThreeD,
        FileType::Zip => Badge::Zip,
        _ => Badge::File,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{CreateReleaseInput, build_release_metadata};
    use crate::test_helpers::*;

    fn with_github() -> ReleaseMetadata {
        build_release_metadata(&CreateReleaseInput {
            external: vec![crate::test_helpers::github_link()],
            ..minimal_input()
        })
    }

    #[test]
    fn routes_content_by_mime() {
        let cases = [
            ("application/pdf", "pdf"),
            ("model/gltf-binary", "model3d"),
            ("image/png", "image"),
            ("video/mp4", "video"),
            ("model/stl", "unsupported"),
            ("application/octet-stream", "unsupported"),
        ];
        for (mime, viewer) in cases {
            let preview = select_preview(&metadata_with_content(mime, "ipfs://QmContent"));
            let tagged = serde_json::to_value(&preview).unwrap();
            assert_eq!(tagged["viewer"], viewer, "{mime}");
        }
    }

    #[test]
    fn video_uses_cover_as_poster() {
        let preview = select_preview(&metadata_with_content("video/webm", "ipfs://QmVid"));
        assert_eq!(
            preview,
            Preview::Video {
                uri: "ipfs://QmVid".into(),
                mime: "video/webm".into(),
                poster_uri: "ipfs://QmCover123".into(),
            }
        );
    }

    #[test]
    fn content_beats_github_link() {
        let mut metadata = with_github();
        metadata.content = metadata_with_content("application/pdf", "ipfs://QmPdf").content;
        assert_eq!(
            select_preview(&metadata),
            Preview::Pdf {
                uri: "ipfs://QmPdf".into()
            }
        );
    }

    #[test]
    fn github_link_when_no_content() {
        assert_eq!(
            select_preview(&with_github()),
            Preview::Github {
                url: "https://github.com/user/repo".into(),
                git_ref: Some("v1.0.0".into()),
            }
        );
    }

    #[test]
    fn empty_content_fields_are_ignored() {
        let metadata = metadata_with_content("", "ipfs://QmContent");
        assert_eq!(
            select_preview(&metadata),
            Preview::Cover {
                uri: "ipfs://QmCover123".into()
            }
        );
    }

    #[test]
    fn falls_back_to_cover_then_nothing() {
        let mut metadata = build_release_metadata(&minimal_input());
        assert!(matches!(select_preview(&metadata), Preview::Cover { .. }));
        metadata.image.clear();
        assert_eq!(select_preview(&metadata), Preview::Nothing);
    }

    #[test]
    fn badges() {
        assert_eq!(badge(&metadata_with_content("application/pdf", "u")), Badge::Pdf);
        assert_eq!(badge(&metadata_with_content("model/stl", "u")), Badge::ThreeD);
        assert_eq!(badge(&metadata_with_content("application/zip", "u")), Badge::Zip);
        assert_eq!(badge(&metadata_with_content("image/png", "u")), Badge::File);
        assert_eq!(badge(&build_release_metadata(&minimal_input())), Badge::File);
        assert_eq!(badge(&with_github()), Badge::Github);
        assert_eq!(Badge::ThreeD.label(), "3D");
    }
}
