//! Building, validating, and parsing release metadata.
//!
//! A release document goes through three pure steps over its lifetime:
//!
//! ```text
//! CreateReleaseInput ──build──▶ ReleaseMetadata ──(store)──▶ raw JSON ──parse──▶ ReleaseMetadata
//!                                      │
//!                                  validate
//! ```
//!
//! ## Build
//!
//! [`build_release_metadata`] is total and does not validate. It copies the
//! required fields verbatim and adds each optional part only when its input
//! was supplied. Empty attachment or link lists count as "not supplied", so a
//! built document never carries an empty `release` object.
//!
//! ## Validate
//!
//! [`validate_release_metadata`] checks every rule and collects all failures
//! instead of stopping at the first, so a form can show them together.
//!
//! ## Parse
//!
//! [`parse_release_metadata`] accepts whatever JSON came back from storage or
//! the indexer. It checks just enough to know the value is a Z:Drive release
//! of the supported schema version (a `name`, an `image`, and the version
//! tag) and otherwise trusts the shape. Anything else reads as `None`:
//! "no release here", never an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::collection::{build_collection_id, slugify};
use crate::license::{CbeLicenseKind, TokenAmount};
use crate::types::{
    Asset, CbeGrant, Collection, CollectionOrdering, ExternalLink, Gate, GateToken, License,
    LicenseBaseline, Properties, Release, ReleaseContent, ReleaseMetadata, SCHEMA_VERSION,
    ZDriveProperties,
};

/// Chain every release is minted on (Base mainnet).
pub const SUPPORTED_CHAIN_ID: i64 = 8453;

// ============================================================================
// Builder input
// ============================================================================

/// Everything the create form collects for a new release.
///
/// Deserializes from the camelCase JSON the create flow produces. Optional
/// lists may be omitted or empty; both mean "none".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReleaseInput {
    pub name: String,
    pub description: String,
    pub cover_image_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_file: Option<PreviewFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<ExternalLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseInput>,
    /// Only used to derive the collection id.
    pub creator_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewFile {
    pub uri: String,
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionInput {
    pub title: String,
    /// Derived from `title` when absent or empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInput {
    pub cbe_type: CbeLicenseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateInput {
    /// Decimal string, carried through untouched.
    pub min_balance: String,
}

// ============================================================================
// Build
// ============================================================================

/// Build the metadata document for a new release on [`SUPPORTED_CHAIN_ID`].
pub fn build_release_metadata(input: &CreateReleaseInput) -> ReleaseMetadata {
    build_release_metadata_on_chain(input, SUPPORTED_CHAIN_ID)
}

/// Build the metadata document, deriving the collection id on `chain_id`.
pub fn build_release_metadata_on_chain(input: &CreateReleaseInput, chain_id: i64) -> ReleaseMetadata {
    let mut zdrive = ZDriveProperties::current();

    if !input.assets.is_empty() || !input.external.is_empty() {
        zdrive.release = Some(Release {
            assets: (!input.assets.is_empty()).then(|| input.assets.clone()),
            external: (!input.external.is_empty()).then(|| input.external.clone()),
        });
    }

    zdrive.license = input.license.as_ref().map(build_license);

    zdrive.collection = input
        .collection
        .as_ref()
        .map(|c| build_collection(c, &input.creator_address, chain_id));

    let (content, animation_url) = match &input.preview_file {
        Some(file) => (
            Some(ReleaseContent {
                mime: file.mime.clone(),
                uri: file.uri.clone(),
            }),
            Some(file.uri.clone()),
        ),
        None => (None, None),
    };

    tracing::debug!(
        name = %input.name,
        has_content = content.is_some(),
        has_release = zdrive.release.is_some(),
        has_license = zdrive.license.is_some(),
        has_collection = zdrive.collection.is_some(),
        "built release metadata"
    );

    ReleaseMetadata {
        name: input.name.clone(),
        description: input.description.clone(),
        image: input.cover_image_uri.clone(),
        animation_url,
        content,
        properties: Properties { zdrive },
    }
}

fn build_license(input: &LicenseInput) -> License {
    License {
        baseline: LicenseBaseline::AllRightsReserved,
        cbe: Some(CbeGrant {
            kind: input.cbe_type,
            text_url: input.cbe_type.text_url().to_string(),
        }),
        gate: input.gate.as_ref().map(|gate| Gate {
            enabled: true,
            token: GateToken::ReleaseCoin,
            min_balance: TokenAmount::from(gate.min_balance.clone()),
        }),
    }
}

fn build_collection(input: &CollectionInput, creator_address: &str, chain_id: i64) -> Collection {
    let slug = match input.slug.as_deref() {
        Some(explicit) if !explicit.is_empty() => explicit.to_string(),
        _ => slugify(&input.title),
    };
    Collection {
        id: build_collection_id(chain_id, creator_address, &slug),
        slug,
        title: input.title.clone(),
        ordering: input
            .ordering_index
            .map(|index| CollectionOrdering { index }),
    }
}

// ============================================================================
// Validate
// ============================================================================

/// A single validation failure. The display text is the user-facing message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Name is required")]
    MissingName,
    #[error("Description is required")]
    MissingDescription,
    #[error("Cover image is required")]
    MissingCoverImage,
    #[error("Invalid schema version")]
    InvalidSchemaVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Every rule the document breaks, in rule order.
pub fn validation_issues(metadata: &ReleaseMetadata) -> Vec<ValidationIssue> {
    let blank = |s: &str| s.trim().is_empty();
    let mut issues = Vec::new();

    if blank(&metadata.name) {
        issues.push(ValidationIssue::MissingName);
    }
    if blank(&metadata.description) {
        issues.push(ValidationIssue::MissingDescription);
    }
    if blank(&metadata.image) {
        issues.push(ValidationIssue::MissingCoverImage);
    }
    if metadata.properties.zdrive.schema_version != SCHEMA_VERSION {
        issues.push(ValidationIssue::InvalidSchemaVersion);
    }
    issues
}

/// Check a document before submission. Never fails; collects all errors.
pub fn validate_release_metadata(metadata: &ReleaseMetadata) -> ValidationReport {
    let errors: Vec<String> = validation_issues(metadata)
        .iter()
        .map(ToString::to_string)
        .collect();
    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

// ============================================================================
// Parse
// ============================================================================

/// Read release metadata from an untrusted JSON value.
///
/// Returns `None` when the value is not an object, lacks a truthy `name` or
/// `image`, or is not tagged with the supported schema version. Nested parts
/// are not checked; malformed ones read as absent.
pub fn parse_release_metadata(raw: &Value) -> Option<ReleaseMetadata> {
    let Some(meta) = raw.as_object() else {
        tracing::debug!("metadata is not an object");
        return None;
    };

    if !meta.get("name").is_some_and(is_truthy) || !meta.get("image").is_some_and(is_truthy) {
        tracing::debug!("metadata missing name or image");
        return None;
    }

    let version = raw.pointer("/properties/zdrive/schemaVersion");
    if !version.is_some_and(is_supported_version) {
        tracing::debug!(?version, "not a Z:Drive release or unsupported schema version");
        return None;
    }

    match serde_json::from_value(raw.clone()) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::debug!(error = %e, "metadata fields have unexpected types");
            None
        }
    }
}

/// Parse JSON text, then [`parse_release_metadata`]. Invalid JSON is `None`.
pub fn parse_release_metadata_str(json: &str) -> Option<ReleaseMetadata> {
    let raw: Value = serde_json::from_str(json).ok()?;
    parse_release_metadata(&raw)
}

/// JSON truthiness: `null`, `false`, `0`, and `""` are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Numeric equality with the schema version, so `1` and `1.0` both match.
fn is_supported_version(value: &Value) -> bool {
    value
        .as_f64()
        .is_some_and(|v| v == f64::from(SCHEMA_VERSION))
}
