//! CLI output formatting for every `zdrive` command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not URI-centric**. The primary display for
//! every entity (release, attachment, link) is its name and positional index;
//! storage URIs are secondary context on indented lines. Where a URI points at
//! IPFS or Arweave, its HTTP gateway form is shown next to it so it can be
//! opened directly.
//!
//! # Output Format
//!
//! ## Inspect
//!
//! ```text
//! Tyrolean Chair
//!     Description: Measured drawings of a carved chair
//!     Cover: ipfs://QmCover
//!         https://magic.decentralized-content.com/ipfs/QmCover
//!     Content: glb (model/gltf-binary)
//!         ipfs://QmModel/chair.glb
//!
//! Attachments
//! 001 source.zip
//!     application/zip, 1,024 bytes
//!     ipfs://QmZip
//!
//! Links
//! 001 github https://github.com/user/repo @ v1.0.0
//!
//! License
//!     Non-Commercial Use (CBE_NONCOMMERCIAL)
//!     Gate: 10,000 (10K) release coins
//!
//! Collection
//!     Tyrolean Chair Studies #1
//!     Id: 8453:0xabc...:tyrolean-chair-studies
//!
//! Preview: 3D model ipfs://QmModel/chair.glb
//! Badge: GitHub
//! ```
//!
//! ## Validate
//!
//! ```text
//! Invalid (2 errors)
//!     Description is required
//!     Cover image is required
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::collection::CollectionId;
use crate::config::GatewayConfig;
use crate::file_type::{FileType, file_type};
use crate::license::{CbeLicenseKind, LicenseStatus, TokenAmount};
use crate::metadata::ValidationReport;
use crate::preview::{Badge, Preview};
use crate::types::{Asset, ExternalLinkKind, ReleaseMetadata};

// ============================================================================
// Display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Group digits of an integer with commas: `1234567` → `1,234,567`.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// A storage URI, plus its gateway URL on the next line when they differ.
fn uri_lines(uri: &str, gateways: &GatewayConfig, depth: usize) -> Vec<String> {
    let mut lines = vec![format!("{}{}", indent(depth), uri)];
    let http = gateways.to_http(uri);
    if http != uri {
        lines.push(format!("{}{}", indent(depth + 1), http));
    }
    lines
}

/// Shorten a wallet address for display: `0x1234...5678`.
///
/// Keeps the `0x` prefix plus `chars` characters at each end. Addresses too
/// short to shorten are returned unchanged.
pub fn truncate_address(address: &str, chars: usize) -> String {
    let len = address.chars().count();
    if len <= chars * 2 + 2 {
        return address.to_string();
    }
    let head: String = address.chars().take(chars + 2).collect();
    let tail: String = address.chars().skip(len - chars).collect();
    format!("{head}...{tail}")
}

/// Compact a large count with a K/M/B suffix, one decimal, `.0` dropped.
///
/// `950` → `950`, `1500` → `1.5K`, `2_000_000` → `2M`, `1_234_000_000` → `1.2B`.
pub fn format_number(n: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];
    for (scale, suffix) in UNITS {
        if n >= scale {
            let scaled = format!("{:.1}", n as f64 / scale as f64);
            let trimmed = scaled.strip_suffix(".0").unwrap_or(&scaled);
            return format!("{trimmed}{suffix}");
        }
    }
    n.to_string()
}

/// A token amount grouped with commas, plus the compact form when it fits a
/// `u64`.
fn token_amount_display(amount: &TokenAmount) -> String {
    let grouped = group_digits(amount.as_str());
    match amount.as_str().parse::<u64>() {
        Ok(n) if n >= 1_000 => format!("{grouped} ({})", format_number(n)),
        _ => grouped,
    }
}

// ============================================================================
// Validate
// ============================================================================

pub fn format_validation_report(report: &ValidationReport) -> Vec<String> {
    if report.valid {
        return vec!["Valid".to_string()];
    }
    let noun = if report.errors.len() == 1 { "error" } else { "errors" };
    let mut lines = vec![format!("Invalid ({} {})", report.errors.len(), noun)];
    lines.extend(report.errors.iter().map(|e| format!("{}{}", indent(1), e)));
    lines
}

pub fn print_validation_report(report: &ValidationReport) {
    for line in format_validation_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Inspect
// ============================================================================

/// Everything a release document says, section by section.
pub fn format_metadata_summary(metadata: &ReleaseMetadata, gateways: &GatewayConfig) -> Vec<String> {
    let mut lines = vec![metadata.name.clone()];

    if !metadata.description.is_empty() {
        lines.push(format!(
            "{}Description: {}",
            indent(1),
            truncate_desc(&metadata.description, 60)
        ));
    }
    lines.push(format!("{}Cover: {}", indent(1), metadata.image));
    let cover = uri_lines(&metadata.image, gateways, 2);
    lines.extend(cover.into_iter().skip(1));

    if let Some(content) = &metadata.content {
        let ft = file_type(Some(&content.mime), None);
        lines.push(format!("{}Content: {} ({})", indent(1), ft, content.mime));
        lines.extend(uri_lines(&content.uri, gateways, 2));
    }

    let zdrive = &metadata.properties.zdrive;
    let release = zdrive.release.as_ref();

    if let Some(assets) = release.and_then(|r| r.assets.as_ref()).filter(|a| !a.is_empty()) {
        lines.push(String::new());
        lines.push("Attachments".to_string());
        lines.extend(format_asset_entries(assets, gateways));
    }

    if let Some(links) = release.and_then(|r| r.external.as_ref()).filter(|l| !l.is_empty()) {
        lines.push(String::new());
        lines.push("Links".to_string());
        for (i, link) in links.iter().enumerate() {
            let kind = match link.kind {
                ExternalLinkKind::Github => "github",
            };
            let line = match &link.git_ref {
                Some(r) => format!("{} {} {} @ {}", format_index(i + 1), kind, link.url, r),
                None => format!("{} {} {}", format_index(i + 1), kind, link.url),
            };
            lines.push(line);
        }
    }

    lines.push(String::new());
    lines.push("License".to_string());
    match zdrive.license.as_ref().and_then(|l| l.cbe.as_ref()) {
        Some(cbe) => {
            lines.push(format!("{}{} ({})", indent(1), cbe.kind.display_name(), cbe.kind));
            if let Some(gate) = zdrive.license.as_ref().and_then(|l| l.gate.as_ref()) {
                if gate.enabled {
                    lines.push(format!(
                        "{}Gate: {} release coins",
                        indent(1),
                        token_amount_display(&gate.min_balance)
                    ));
                }
            }
        }
        None => lines.push(format!("{}{}", indent(1), crate::license::ALL_RIGHTS_RESERVED_NAME)),
    }

    if let Some(collection) = &zdrive.collection {
        lines.push(String::new());
        lines.push("Collection".to_string());
        match collection.ordering {
            Some(ordering) => lines.push(format!("{}{} #{}", indent(1), collection.title, ordering.index)),
            None => lines.push(format!("{}{}", indent(1), collection.title)),
        }
        lines.push(format!("{}Id: {}", indent(1), collection.id));
    }

    lines
}

/// One line naming the viewer and what it will show.
pub fn format_preview(preview: &Preview) -> String {
    match preview {
        Preview::Pdf { uri } => format!("Preview: PDF {uri}"),
        Preview::Model3d { uri } => format!("Preview: 3D model {uri}"),
        Preview::Image { uri } => format!("Preview: image {uri}"),
        Preview::Video { uri, mime, .. } => format!("Preview: video ({mime}) {uri}"),
        Preview::Unsupported { mime, cover_uri } => {
            format!("Preview: not available for {mime}, showing cover {cover_uri}")
        }
        Preview::Github { url, git_ref } => match git_ref {
            Some(r) => format!("Preview: GitHub {url} @ {r}"),
            None => format!("Preview: GitHub {url}"),
        },
        Preview::Cover { uri } => format!("Preview: cover {uri}"),
        Preview::Nothing => "Preview: none".to_string(),
    }
}

pub fn format_inspect_output(
    metadata: &ReleaseMetadata,
    preview: &Preview,
    badge: Badge,
    gateways: &GatewayConfig,
) -> Vec<String> {
    let mut lines = format_metadata_summary(metadata, gateways);
    lines.push(String::new());
    lines.push(format_preview(preview));
    lines.push(format!("Badge: {}", badge.label()));
    lines
}

pub fn print_inspect_output(
    metadata: &ReleaseMetadata,
    preview: &Preview,
    badge: Badge,
    gateways: &GatewayConfig,
) {
    for line in format_inspect_output(metadata, preview, badge, gateways) {
        println!("{}", line);
    }
}

// ============================================================================
// Classify
// ============================================================================

pub fn format_classification(ft: FileType, mime: Option<&str>, filename: Option<&str>) -> Vec<String> {
    let mut lines = vec![ft.to_string()];
    if let Some(m) = mime {
        lines.push(format!("{}MIME: {}", indent(1), m));
    }
    if let Some(f) = filename {
        lines.push(format!("{}Filename: {}", indent(1), f));
    }
    lines.push(format!(
        "{}Previewable: {}",
        indent(1),
        if ft.is_previewable() { "yes" } else { "no" }
    ));
    lines
}

pub fn print_classification(ft: FileType, mime: Option<&str>, filename: Option<&str>) {
    for line in format_classification(ft, mime, filename) {
        println!("{}", line);
    }
}

// ============================================================================
// Collection ids
// ============================================================================

pub fn format_collection_id(raw: &str, decoded: Option<&CollectionId>) -> Vec<String> {
    match decoded {
        Some(id) => vec![
            raw.to_string(),
            format!("{}Chain: {}", indent(1), id.chain_id),
            format!(
                "{}Creator: {} ({})",
                indent(1),
                id.creator_address,
                truncate_address(&id.creator_address, 4)
            ),
            format!("{}Slug: {}", indent(1), id.slug),
        ],
        None => vec![format!("{} is not a collection id", raw)],
    }
}

pub fn print_collection_id(raw: &str, decoded: Option<&CollectionId>) {
    for line in format_collection_id(raw, decoded) {
        println!("{}", line);
    }
}

// ============================================================================
// Licenses
// ============================================================================

/// The six CBE licenses, in canonical order.
pub fn format_license_table() -> Vec<String> {
    let mut lines = Vec::new();
    for (i, kind) in CbeLicenseKind::ALL.iter().enumerate() {
        lines.push(format!("{} {} ({})", format_index(i + 1), kind.display_name(), kind));
        lines.push(format!("{}{}", indent(1), kind.description()));
        lines.push(format!("{}Text: {}", indent(1), kind.text_url()));
    }
    lines
}

pub fn print_license_table() {
    for line in format_license_table() {
        println!("{}", line);
    }
}

pub fn format_license_status(status: &LicenseStatus, balance: &TokenAmount) -> Vec<String> {
    let mut lines = vec![status.license_name.clone()];
    lines.push(format!(
        "{}Licensed: {}",
        indent(1),
        if status.is_licensed { "yes" } else { "no" }
    ));
    if status.requires_gate {
        lines.push(format!(
            "{}Requires: {} release coins",
            indent(1),
            token_amount_display(&status.min_required)
        ));
        lines.push(format!(
            "{}Holding: {} release coins ({})",
            indent(1),
            token_amount_display(balance),
            if status.meets_gate_requirement { "meets gate" } else { "below gate" }
        ));
    }
    lines
}

pub fn print_license_status(status: &LicenseStatus, balance: &TokenAmount) {
    for line in format_license_status(status, balance) {
        println!("{}", line);
    }
}

// ============================================================================
// Assets
// ============================================================================

fn format_asset_entries(assets: &[Asset], gateways: &GatewayConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, asset) in assets.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), asset.name));
        match asset.size {
            Some(size) => lines.push(format!(
                "{}{}, {} bytes",
                indent(1),
                asset.mime,
                group_digits(&size.to_string())
            )),
            None => lines.push(format!("{}{}", indent(1), asset.mime)),
        }
        lines.extend(uri_lines(&asset.uri, gateways, 1));
        if let Some(sha) = &asset.sha256 {
            lines.push(format!("{}sha256: {}", indent(1), sha));
        }
    }
    lines
}

/// Attachment list with a total line.
pub fn format_asset_list(assets: &[Asset], gateways: &GatewayConfig) -> Vec<String> {
    let mut lines = format_asset_entries(assets, gateways);
    let total: u64 = assets.iter().filter_map(|a| a.size).sum();
    let noun = if assets.len() == 1 { "file" } else { "files" };
    lines.push(format!(
        "{} {}, {} bytes",
        assets.len(),
        noun,
        group_digits(&total.to_string())
    ));
    lines
}

pub fn print_asset_list(assets: &[Asset], gateways: &GatewayConfig) {
    for line in format_asset_list(assets, gateways) {
        println!("{}", line);
    }
}
