//! The release metadata document.
//!
//! These types are the JSON shape persisted to content-addressed storage and
//! read back on every page view. Field names and nesting are a wire contract:
//! everything Z:Drive-specific lives under `properties.zdrive`, and a reader
//! recognizes a compatible document solely by
//! `properties.zdrive.schemaVersion == SCHEMA_VERSION`.
//!
//! Optional parts are omitted from the JSON when absent rather than written as
//! `null` or as empty objects, so consumers can rely on key presence.

use serde::{Deserialize, Serialize};

use crate::license::{CbeLicenseKind, TokenAmount};

/// The only schema version this crate reads or writes.
pub const SCHEMA_VERSION: u32 = 1;

/// Full metadata for a release coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    pub name: String,
    /// Empty when stored as null or as a non-string.
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    /// Cover image URI.
    pub image: String,
    /// Mirrors `content.uri` for generic media-preview consumers.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub animation_url: Option<String>,
    /// The primary previewable item.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub content: Option<ReleaseContent>,
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseContent {
    pub mime: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub zdrive: ZDriveProperties,
}

/// Everything under `properties.zdrive`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZDriveProperties {
    #[serde(deserialize_with = "lenient::schema_version")]
    pub schema_version: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub release: Option<Release>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub license: Option<License>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub collection: Option<Collection>,
}

impl ZDriveProperties {
    /// Properties carrying only the current schema version.
    pub fn current() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            release: None,
            license: None,
            collection: None,
        }
    }
}

/// Attachments and external links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub assets: Option<Vec<Asset>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional"
    )]
    pub external: Option<Vec<ExternalLink>>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub mime: String,
    pub uri: String,
    /// Lowercase hex SHA-256 of the file contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalLinkKind {
    Github,
}

/// A link to an external source of the work, e.g. a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    #[serde(rename = "type")]
    pub kind: ExternalLinkKind,
    pub url: String,
    /// Tag or branch, e.g. `v1.0.0` or `main`.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseBaseline {
    #[serde(rename = "ALL_RIGHTS_RESERVED")]
    AllRightsReserved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub baseline: LicenseBaseline,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbe: Option<CbeGrant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<Gate>,
}

/// The CBE license granted on top of the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CbeGrant {
    #[serde(rename = "type")]
    pub kind: CbeLicenseKind,
    #[serde(rename = "textUrl")]
    pub text_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateToken {
    #[serde(rename = "RELEASE_COIN")]
    ReleaseCoin,
}

/// Minimum release-coin balance for the license terms to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gate {
    pub enabled: bool,
    pub token: GateToken,
    pub min_balance: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// `<chainId>:<creatorAddressLowercase>:<slug>`
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<CollectionOrdering>,
}

/// Position of a release within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionOrdering {
    pub index: u32,
}

/// Nested sub-objects of a stored document are trusted, not validated: a
/// malformed one reads as absent instead of failing the whole document.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};

    pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed nested metadata field");
                Ok(None)
            }
        }
    }

    /// A string, or `""` for null and non-string values.
    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(s),
            serde_json::Value::Null => Ok(String::new()),
            other => {
                tracing::debug!(value = %other, "ignoring non-string text field");
                Ok(String::new())
            }
        }
    }

    /// Accepts integral floats (`1.0`) as well as integers.
    pub fn schema_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        value
            .as_u64()
            .or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u64)
            })
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid schema version: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_document_omits_optional_keys() {
        let doc = ReleaseMetadata {
            name: "Test".into(),
            description: "Desc".into(),
            image: "ipfs://QmCover".into(),
            animation_url: None,
            content: None,
            properties: Properties {
                zdrive: ZDriveProperties::current(),
            },
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Test",
                "description": "Desc",
                "image": "ipfs://QmCover",
                "properties": { "zdrive": { "schemaVersion": 1 } }
            })
        );
    }

    #[test]
    fn external_link_uses_type_and_ref_keys() {
        let link = ExternalLink {
            kind: ExternalLinkKind::Github,
            url: "https://github.com/user/repo".into(),
            git_ref: Some("v1.0.0".into()),
        };
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({ "type": "github", "url": "https://github.com/user/repo", "ref": "v1.0.0" })
        );
    }

    #[test]
    fn gate_serializes_with_wire_constants() {
        let gate = Gate {
            enabled: true,
            token: GateToken::ReleaseCoin,
            min_balance: TokenAmount::from("10000".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&gate).unwrap(),
            json!({ "enabled": true, "token": "RELEASE_COIN", "minBalance": "10000" })
        );
    }

    #[test]
    fn cbe_grant_uses_type_and_text_url_keys() {
        let grant = CbeGrant {
            kind: CbeLicenseKind::Cc0,
            text_url: CbeLicenseKind::Cc0.text_url().into(),
        };
        let value = serde_json::to_value(&grant).unwrap();
        assert_eq!(value["type"], "CBE_CC0");
        assert_eq!(value["textUrl"], CbeLicenseKind::Cc0.text_url());
    }

    #[test]
    fn malformed_nested_license_reads_as_absent() {
        let doc: ReleaseMetadata = serde_json::from_value(json!({
            "name": "Test",
            "image": "ipfs://QmCover",
            "properties": { "zdrive": {
                "schemaVersion": 1,
                "license": { "baseline": "SOMETHING_ELSE" },
                "collection": { "id": "8453:0xabc:slug", "slug": "slug", "title": "T" }
            } }
        }))
        .unwrap();
        assert!(doc.properties.zdrive.license.is_none());
        assert_eq!(doc.properties.zdrive.collection.unwrap().slug, "slug");
        assert_eq!(doc.description, "");
    }

    #[test]
    fn null_or_non_string_description_reads_as_empty() {
        for description in [json!(null), json!(42), json!(["a"])] {
            let doc: ReleaseMetadata = serde_json::from_value(json!({
                "name": "Test",
                "description": description,
                "image": "ipfs://QmCover",
                "properties": { "zdrive": { "schemaVersion": 1 } }
            }))
            .unwrap();
            assert_eq!(doc.description, "");
        }
    }

    #[test]
    fn non_string_animation_url_reads_as_absent() {
        let doc: ReleaseMetadata = serde_json::from_value(json!({
            "name": "Test",
            "image": "ipfs://QmCover",
            "animation_url": { "uri": "ipfs://QmX" },
            "properties": { "zdrive": { "schemaVersion": 1 } }
        }))
        .unwrap();
        assert!(doc.animation_url.is_none());
    }

    #[test]
    fn malformed_assets_keep_external_links() {
        let doc: ReleaseMetadata = serde_json::from_value(json!({
            "name": "Test",
            "image": "ipfs://QmCover",
            "properties": { "zdrive": {
                "schemaVersion": 1,
                "release": {
                    "assets": [{ "name": "a.zip", "mime": "application/zip", "size": "1024" }],
                    "external": [{ "type": "github", "url": "https://github.com/user/repo" }]
                }
            } }
        }))
        .unwrap();
        let release = doc.properties.zdrive.release.unwrap();
        assert!(release.assets.is_none());
        let links = release.external.unwrap();
        assert_eq!(links[0].url, "https://github.com/user/repo");
        assert!(links[0].git_ref.is_none());
    }

    #[test]
    fn null_nested_fields_read_as_absent() {
        let doc: ReleaseMetadata = serde_json::from_value(json!({
            "name": "Test",
            "image": "ipfs://QmCover",
            "content": null,
            "properties": { "zdrive": { "schemaVersion": 1, "release": null } }
        }))
        .unwrap();
        assert!(doc.content.is_none());
        assert!(doc.properties.zdrive.release.is_none());
    }
}
