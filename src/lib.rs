// Identity Inspector - Core Library
// Chain-type registry + on-chain identity view derivation
// Exposes all modules for use in CLI, API server, and tests

pub mod registry;   // Chain name → type-definition bundle mapping
pub mod judgements; // Judgement records, flags, grouping
pub mod identity;   // Identity record + hex detection
pub mod lookup;     // Injected collaborator interfaces
pub mod view;       // Pure view derivation

// Re-export commonly used types
pub use registry::{
    bundle_fingerprint, default_overlays, ChainTypeRegistry, TypeBundle,
};
pub use judgements::{
    group_judgements, Judgement, JudgementEntry, JudgementFlags, JudgementGroup,
};
pub use identity::{is_hex, IdentityRecord};
pub use lookup::{
    seed_demo_data, ApiCapabilities, IdentityLookup, InMemoryIdentityStore,
    InMemoryRegistrarSet, InMemorySubidentityIndex, RegistrarInfo, RegistrarLookup,
    SubidentityLookup,
};
pub use view::{
    derive_identity_view, FieldValue, IdentityView, JudgementPanel, JudgementTag,
    PanelState, RegistrarAction, SubsSection, TagColor, SUBS_DISPLAY_THRESHOLD,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
