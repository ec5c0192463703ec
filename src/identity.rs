// 👤 Identity Record - Decoded on-chain identity for one address
//
// Contact fields arrive from the chain as raw bytes; values that could not
// be decoded to text stay in "0x..." hex form and must never be linkified.

use serde::{Deserialize, Serialize};

use crate::judgements::{JudgementEntry, JudgementFlags};

// ============================================================================
// IDENTITY RECORD
// ============================================================================

/// Decoded identity record for one address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// True when an identity is actually registered for the address
    pub is_existent: bool,

    /// Display name shown as the card title
    pub display: String,

    /// Legal name, shown as the card subtitle
    pub legal: Option<String>,

    /// Contact fields - each possibly still hex-encoded
    pub email: Option<String>,
    pub web: Option<String>,
    pub twitter: Option<String>,
    pub riot: Option<String>,

    /// Parent address when this is a sub-identity (lookup only, no ownership)
    pub parent: Option<String>,

    /// Raw judgement list: (registrar index, judgement)
    pub judgements: Vec<JudgementEntry>,
}

impl IdentityRecord {
    /// Create an existent record with just a display name
    pub fn new(display: impl Into<String>) -> Self {
        IdentityRecord {
            is_existent: true,
            display: display.into(),
            ..Default::default()
        }
    }

    /// Classification flags derived from the judgement list
    pub fn flags(&self) -> JudgementFlags {
        JudgementFlags::from_entries(&self.judgements)
    }

    pub fn is_good(&self) -> bool {
        self.flags().is_good
    }

    pub fn is_bad(&self) -> bool {
        self.flags().is_bad
    }

    pub fn is_known_good(&self) -> bool {
        self.flags().is_known_good
    }

    pub fn is_erroneous(&self) -> bool {
        self.flags().is_erroneous
    }
}

// ============================================================================
// HEX DETECTION
// ============================================================================

/// Check whether a field value is still raw hex ("0x" prefix, even length,
/// hex digits only). Hex values render as plain text, never as links.
pub fn is_hex(value: &str) -> bool {
    value.starts_with("0x")
        && value.len() % 2 == 0
        && value[2..].chars().all(|c| c.is_ascii_hexdigit())
}

// ============================================================================
// TESTS
// ============================================================================
