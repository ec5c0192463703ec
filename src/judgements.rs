// ⚖️ Judgement Model - Registrar attestations + classification
// Maps the raw on-chain judgement list to display-ready flags and groups

use serde::{Deserialize, Serialize};

// ============================================================================
// JUDGEMENT
// ============================================================================

/// A registrar's attestation of an identity's trustworthiness.
///
/// Variant set mirrors the on-chain identity pallet. `FeePaid` and
/// `OutOfDate` are neither good nor bad: they leave the identity "pending".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgement {
    /// No judgement issued yet
    Unknown,

    /// Requester paid the registrar fee, judgement pending
    FeePaid,

    /// Identity data appears reasonable, not independently verified
    Reasonable,

    /// Identity data verified by the registrar
    KnownGood,

    /// A previously issued judgement that is no longer current
    OutOfDate,

    /// Identity data is low quality but not outright wrong
    LowQuality,

    /// Identity data is erroneous
    Erroneous,
}

impl Judgement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Judgement::Unknown => "Unknown",
            Judgement::FeePaid => "Fee paid",
            Judgement::Reasonable => "Reasonable",
            Judgement::KnownGood => "Known good",
            Judgement::OutOfDate => "Out of date",
            Judgement::LowQuality => "Low quality",
            Judgement::Erroneous => "Erroneous",
        }
    }

    /// Good-class judgements: the registrar vouches for the identity
    pub fn is_good(&self) -> bool {
        matches!(self, Judgement::KnownGood | Judgement::Reasonable)
    }

    /// Bad-class judgements: the registrar flagged the identity
    pub fn is_bad(&self) -> bool {
        matches!(self, Judgement::Erroneous | Judgement::LowQuality)
    }
}

/// One judgement as stored on chain: (registrar index, judgement)
pub type JudgementEntry = (u32, Judgement);

// ============================================================================
// DERIVED FLAGS
// ============================================================================

/// Classification flags derived from an identity's judgement list.
///
/// `is_bad` and `is_known_good` are not structurally exclusive (a mixed
/// judgement list can set both); consumers resolve the conflict with a
/// priority chain that checks `is_bad` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JudgementFlags {
    pub is_good: bool,
    pub is_bad: bool,
    pub is_known_good: bool,
    pub is_erroneous: bool,
}

impl JudgementFlags {
    /// Derive flags from a raw judgement list
    pub fn from_entries(entries: &[JudgementEntry]) -> Self {
        JudgementFlags {
            is_good: entries.iter().any(|(_, j)| j.is_good()),
            is_bad: entries.iter().any(|(_, j)| j.is_bad()),
            is_known_good: entries.iter().any(|(_, j)| *j == Judgement::KnownGood),
            is_erroneous: entries.iter().any(|(_, j)| *j == Judgement::Erroneous),
        }
    }
}

// ============================================================================
// JUDGEMENT GROUPS
// ============================================================================

/// Display-ready group: one judgement value plus every registrar that issued it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgementGroup {
    pub judgement: Judgement,
    pub registrar_indexes: Vec<u32>,
}

/// Group a raw judgement list by judgement value.
///
/// Groups keep first-seen order; registrar indices within a group keep the
/// order they appear in the source list.
pub fn group_judgements(entries: &[JudgementEntry]) -> Vec<JudgementGroup> {
    let mut groups: Vec<JudgementGroup> = Vec::new();

    for (index, judgement) in entries {
        match groups.iter_mut().find(|g| g.judgement == *judgement) {
            Some(group) => group.registrar_indexes.push(*index),
            None => groups.push(JudgementGroup {
                judgement: *judgement,
                registrar_indexes: vec![*index],
            }),
        }
    }

    groups
}

// ============================================================================
// TESTS
// ============================================================================
