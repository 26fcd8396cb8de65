//! "Can't Be Evil" license tables, token amounts, and license status.
//!
//! A release may carry one of the six a16z CBE licenses on top of the
//! all-rights-reserved baseline. Each license kind maps to a fixed, already
//! published license text on Arweave plus a display name and a one-line
//! description for pickers. These are static tables: nothing here is computed
//! or uploaded.
//!
//! ## Text URIs
//!
//! The canonical texts live under a single Arweave manifest, indexed by the
//! order of the kinds:
//!
//! ```text
//! ar://_D9kN1WrNWbCq55BSAGRbTB4bS3v8QAPTYmBThSbX3A/{0..5}
//! 0 = CC0, 1 = exclusive, 2 = non-exclusive, 3 = commercial,
//! 4 = non-commercial, 5 = personal
//! ```
//!
//! ## Token amounts
//!
//! Gate thresholds and holder balances are on-chain `uint256` values. They
//! travel through the document and this module as decimal strings
//! ([`TokenAmount`]) and are compared digit-wise, so amounts beyond 64 (or
//! 128) bits never lose precision.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::types::License;

/// Display name used when no license applies to the viewer.
pub const ALL_RIGHTS_RESERVED_NAME: &str = "All Rights Reserved";

/// One of the six CBE license variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CbeLicenseKind {
    /// Public domain dedication.
    #[serde(rename = "CBE_CC0")]
    Cc0,
    /// Exclusive commercial rights.
    #[serde(rename = "CBE_EXCLUSIVE")]
    Exclusive,
    /// Non-exclusive commercial rights.
    #[serde(rename = "CBE_NONEXCLUSIVE")]
    NonExclusive,
    /// Commercial use allowed.
    #[serde(rename = "CBE_COMMERCIAL")]
    Commercial,
    /// Non-commercial use only.
    #[serde(rename = "CBE_NONCOMMERCIAL")]
    NonCommercial,
    /// Personal use only.
    #[serde(rename = "CBE_PERSONAL")]
    Personal,
}

impl CbeLicenseKind {
    /// All kinds, in Arweave index order.
    pub const ALL: [CbeLicenseKind; 6] = [
        CbeLicenseKind::Cc0,
        CbeLicenseKind::Exclusive,
        CbeLicenseKind::NonExclusive,
        CbeLicenseKind::Commercial,
        CbeLicenseKind::NonCommercial,
        CbeLicenseKind::Personal,
    ];

    /// Wire name, e.g. `CBE_NONCOMMERCIAL`.
    pub fn as_str(self) -> &'static str {
        match self {
            CbeLicenseKind::Cc0 => "CBE_CC0",
            CbeLicenseKind::Exclusive => "CBE_EXCLUSIVE",
            CbeLicenseKind::NonExclusive => "CBE_NONEXCLUSIVE",
            CbeLicenseKind::Commercial => "CBE_COMMERCIAL",
            CbeLicenseKind::NonCommercial => "CBE_NONCOMMERCIAL",
            CbeLicenseKind::Personal => "CBE_PERSONAL",
        }
    }

    /// Canonical license text location.
    pub fn text_url(self) -> &'static str {
        match self {
            CbeLicenseKind::Cc0 => "ar://_D9kN1WrNWbCq55BSAGRbTB4bS3v8QAPTYmBThSbX3A/0",
            CbeLicenseKind::Exclusive => "ar://_D9kN1WrNWbCq55BSAGRbTB4bS3v8QAPTYmBThSbX3A/1",
            CbeLicenseKind::NonExclusive => "ar://_D9kN1WrNWbCq55BSAGRbTB4bS3v8QAPTYmBThSbX3A/2",
            CbeLicenseKind::Commercial => "ar://_D9kN1WrNWbCq55BSAGRbTB4bS3v8QAPTYmBThSbX3A/3",
            CbeLicenseKind::NonCommercial => "ar://_D9kN1WrNWbCq55BSAGRbTB4bS3v8QAPTYmBThSbX3A/4",
            CbeLicenseKind::Personal => "ar://_D9kN1WrNWbCq55BSAGRbTB4bS3v8QAPTYmBThSbX3A/5",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            CbeLicenseKind::Cc0 => "CC0 (Public Domain)",
            CbeLicenseKind::Exclusive => "Exclusive Commercial Rights",
            CbeLicenseKind::NonExclusive => "Non-Exclusive Commercial Rights",
            CbeLicenseKind::Commercial => "Commercial Use",
            CbeLicenseKind::NonCommercial => "Non-Commercial Use",
            CbeLicenseKind::Personal => "Personal Use Only",
        }
    }

    /// One-line description for license pickers.
    pub fn description(self) -> &'static str {
        match self {
            CbeLicenseKind::Cc0 => "Dedicate to public domain. Anyone can use for any purpose.",
            CbeLicenseKind::Exclusive => "Grant exclusive commercial rights to token holders.",
            CbeLicenseKind::NonExclusive => {
                "Grant non-exclusive commercial rights to token holders."
            }
            CbeLicenseKind::Commercial => "Allow commercial use by token holders.",
            CbeLicenseKind::NonCommercial => "Allow non-commercial use only by token holders.",
            CbeLicenseKind::Personal => "Allow personal use only by token holders.",
        }
    }
}

impl fmt::Display for CbeLicenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown CBE license kind: {0}")]
pub struct UnknownLicenseKind(pub String);

impl FromStr for CbeLicenseKind {
    type Err = UnknownLicenseKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CbeLicenseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownLicenseKind(s.to_string()))
    }
}

// ============================================================================
// Token amounts
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not an unsigned decimal integer: {0:?}")]
pub struct InvalidTokenAmount(pub String);

/// An on-chain token quantity as an unsigned decimal string.
///
/// Serialized as a bare JSON string. The raw text is kept verbatim so a
/// document round-trips byte for byte; [`TokenAmount::parse`] is the checked
/// constructor, while deserialization accepts whatever string was stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(String);

impl TokenAmount {
    /// Parse an unsigned decimal integer (digits only, no sign, no separators).
    pub fn parse(raw: &str) -> Result<Self, InvalidTokenAmount> {
        if is_decimal(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidTokenAmount(raw.to_string()))
        }
    }

    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// The text as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the stored text is a well-formed unsigned decimal integer.
    pub fn is_valid(&self) -> bool {
        is_decimal(&self.0)
    }

    /// Canonical digits: leading zeros stripped, `"0"` for zero.
    fn digits(&self) -> &str {
        let trimmed = self.0.trim_start_matches('0');
        if trimmed.is_empty() { "0" } else { trimmed }
    }

    /// Arbitrary-precision numeric comparison.
    ///
    /// Both sides must be valid; callers decide how to treat malformed text.
    fn cmp_value(&self, other: &Self) -> Ordering {
        let (a, b) = (self.digits(), other.digits());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }

    /// `self >= other`, numerically.
    pub fn at_least(&self, other: &TokenAmount) -> bool {
        self.cmp_value(other) != Ordering::Less
    }

    /// Lossy conversion for percentage display only.
    fn approx_f64(&self) -> f64 {
        self.digits().parse::<f64>().unwrap_or(0.0)
    }

    fn is_zero(&self) -> bool {
        self.digits() == "0"
    }
}

impl From<String> for TokenAmount {
    /// Wrap text verbatim without checking it (builder inputs are copied as-is).
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl FromStr for TokenAmount {
    type Err = InvalidTokenAmount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_decimal(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// License status
// ============================================================================

/// Whether a release's license applies to a given holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseStatus {
    /// Name of the license that applies to this holder.
    pub license_name: String,
    pub is_licensed: bool,
    pub requires_gate: bool,
    pub meets_gate_requirement: bool,
    pub min_required: TokenAmount,
}

/// Evaluate the license terms for a holder with `balance` tokens.
///
/// - No license, or a license without a CBE grant: all rights reserved.
/// - CBE grant without an enabled gate: licensed for everyone.
/// - Gated grant: licensed iff `balance >= minBalance`. A malformed
///   `minBalance` counts as zero, as does a malformed balance.
pub fn license_status(license: Option<&License>, balance: &TokenAmount) -> LicenseStatus {
    let Some(cbe) = license.and_then(|l| l.cbe.as_ref()) else {
        return LicenseStatus {
            license_name: ALL_RIGHTS_RESERVED_NAME.to_string(),
            is_licensed: false,
            requires_gate: false,
            meets_gate_requirement: false,
            min_required: TokenAmount::zero(),
        };
    };
    let name = cbe.kind.display_name();

    let gate = license
        .and_then(|l| l.gate.as_ref())
        .filter(|gate| gate.enabled);
    let Some(gate) = gate else {
        return LicenseStatus {
            license_name: name.to_string(),
            is_licensed: true,
            requires_gate: false,
            meets_gate_requirement: true,
            min_required: TokenAmount::zero(),
        };
    };

    let min_required = if gate.min_balance.is_valid() {
        gate.min_balance.clone()
    } else {
        TokenAmount::zero()
    };
    let held = if balance.is_valid() {
        balance.clone()
    } else {
        TokenAmount::zero()
    };
    let meets = held.at_least(&min_required);

    LicenseStatus {
        license_name: (if meets { name } else { ALL_RIGHTS_RESERVED_NAME }).to_string(),
        is_licensed: meets,
        requires_gate: true,
        meets_gate_requirement: meets,
        min_required,
    }
}

/// Share of the total supply held, formatted for display.
///
/// `"0%"` when either side is zero, `"<0.01%"` for dust, two decimals under
/// one percent, one decimal otherwise.
pub fn holding_percentage(balance: &TokenAmount, total_supply: &TokenAmount) -> String {
    if !balance.is_valid() || !total_supply.is_valid() || total_supply.is_zero() || balance.is_zero()
    {
        return "0%".to_string();
    }
    let pct = balance.approx_f64() / total_supply.approx_f64() * 100.0;
    if pct < 0.01 {
        "<0.01%".to_string()
    } else if pct < 1.0 {
        format!("{pct:.2}%")
    } else {
        format!("{pct:.1}%")
    }
}
