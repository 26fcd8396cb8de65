//! Collection identifiers and slugs.
//!
//! A collection is identified globally by the triple of chain, creator, and
//! slug, joined into one string key:
//!
//! ```text
//! 8453:0x1234567890abcdef1234567890abcdef12345678:tyrolean-chair-studies
//! └──┘ └────────────────────────────────────────┘ └────────────────────┘
//! chain        creator address (lowercased)              slug
//! ```
//!
//! The same slug chosen by two creators, or on two chains, never collides.
//! The key doubles as a URL path segment (callers percent-encode it) and as a
//! lookup key, so its format is fixed.
//!
//! ## Slugs
//!
//! When a creator doesn't pick a slug, one is derived from the collection
//! title with [`slugify`]:
//!
//! - `"Tyrolean Chair Studies"` → `"tyrolean-chair-studies"`
//! - `"  Hello,   World!  "` → `"hello-world"`
//! - `"snake_case stays"` → `"snake_case-stays"`

/// Decoded parts of a collection identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionId {
    pub chain_id: i64,
    /// Exactly as found in the identifier; not re-normalized.
    pub creator_address: String,
    pub slug: String,
}

/// Join chain, creator, and slug into a collection identifier.
///
/// The creator address is lowercased so checksummed and plain addresses map
/// to the same key.
pub fn build_collection_id(chain_id: i64, creator_address: &str, slug: &str) -> String {
    format!("{chain_id}:{}:{slug}", creator_address.to_lowercase())
}

/// Split a collection identifier back into its parts.
///
/// Returns `None` unless there are exactly three `:`-separated parts and the
/// first is a base-10 integer. Negative chain ids decode.
pub fn parse_collection_id(id: &str) -> Option<CollectionId> {
    let parts: Vec<&str> = id.split(':').collect();
    let [chain, creator, slug] = parts.as_slice() else {
        return None;
    };
    let chain_id = chain.parse::<i64>().ok()?;
    Some(CollectionId {
        chain_id,
        creator_address: creator.to_string(),
        slug: slug.to_string(),
    })
}

/// Convert a title to a URL-friendly slug.
///
/// - Lowercases and trims
/// - Replaces whitespace runs with a single dash
/// - Drops everything except ASCII letters, digits, `_`, and `-`
/// - Collapses consecutive dashes
/// - Strips leading and trailing dashes
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        }
    }

    // Collapse consecutive dashes
    let mut collapsed = String::with_capacity(slug.len());
    let mut prev_dash = false;
    for c in slug.chars() {
        if c == '-' {
            if !prev_dash {
                collapsed.push('-');
            }
            prev_dash = true;
        } else {
            collapsed.push(c);
            prev_dash = false;
        }
    }

    collapsed.trim_matches('-').to_string()
}

/// Pick a slug not yet in `existing`, appending `-2`, `-3`, ... as needed.
///
/// Only a local guess: real uniqueness has to be checked against the
/// creator's published collections.
pub fn unique_slug(base: &str, existing: &[&str]) -> String {
    if !existing.contains(&base) {
        return base.to_string();
    }
    (2u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !existing.contains(&candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}
