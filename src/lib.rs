//! # zdrive
//!
//! Release metadata for Z:Drive, a marketplace where every published work is a
//! tradeable release coin. A release is a cover image, an optional previewable
//! file, downloadable attachments, source links, a license, and a place in a
//! creator's collection. All of it travels as one JSON document stored next to
//! the coin, and this crate is the single source of truth for that document.
//!
//! # Document Lifecycle
//!
//! ```text
//! CreateReleaseInput ──build──▶ ReleaseMetadata ──validate──▶ ValidationReport
//!                                      │
//!                                 serde_json
//!                                      │
//!                untrusted JSON ──parse──▶ Option<ReleaseMetadata>
//!                                      │
//!                          select_preview / badge / license_status
//! ```
//!
//! - **Build** is total: any input produces a document, optional parts are
//!   omitted rather than emitted empty.
//! - **Validate** never fails; it collects every broken rule.
//! - **Parse** is strict at the top (object, `name`, `image`, schema version)
//!   and lenient below: a malformed nested part reads as absent.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | The document model (`ReleaseMetadata` and its nested parts) |
//! | [`metadata`] | Build, validate, and parse release documents |
//! | [`file_type`] | MIME / filename classification into viewer categories |
//! | [`collection`] | Collection id codec and title slugs |
//! | [`license`] | CBE license tables, token amounts, license status for a holder |
//! | [`preview`] | Which viewer a release page shows, and the card badge |
//! | [`assets`] | Describe a local directory as attachments (hash, size, MIME) |
//! | [`config`] | `zdrive.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Schema Version Gate
//!
//! Every document carries `properties.zdrive.schemaVersion`. The parser only
//! accepts the current version, so a future format change cannot be misread
//! by an old client; it is simply not a release document to that client.
//!
//! ## Token Amounts as Strings
//!
//! Gate thresholds are `uint256` on chain. They are kept as decimal strings
//! and compared digit-wise ([`license::TokenAmount`]), never through floats.
//!
//! ## Collection Ids
//!
//! A collection is keyed by `<chainId>:<creator>:<slug>` with the creator
//! lowercased, so the same creator and title always land in the same
//! collection regardless of address checksum casing. See [`collection`].

pub mod assets;
pub mod collection;
pub mod config;
pub mod file_type;
pub mod license;
pub mod metadata;
pub mod output;
pub mod preview;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
