// 🔌 Collaborator Interfaces - Injected data sources
// Identity, registrar and sub-identity resolution live behind traits;
// the view derivation only sees already-resolved data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::identity::IdentityRecord;
use crate::judgements::Judgement;

// ============================================================================
// API CAPABILITIES
// ============================================================================

/// Capability flags of the active chain connection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ApiCapabilities {
    /// Whether the connected chain supports identity queries at all
    pub supports_identity_lookup: bool,
}

impl ApiCapabilities {
    pub fn with_identity_lookup() -> Self {
        ApiCapabilities {
            supports_identity_lookup: true,
        }
    }
}

// ============================================================================
// REGISTRAR INFO
// ============================================================================

/// One entry of the on-chain registrar set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrarInfo {
    /// Registrar index referenced by judgement entries
    pub index: u32,

    /// Registrar account address
    pub account: String,

    /// Fee charged per judgement request
    pub fee: u64,
}

// ============================================================================
// LOOKUP TRAITS
// ============================================================================

/// Resolves the identity record registered for an address
pub trait IdentityLookup {
    fn identity_of(&self, address: &str) -> Option<IdentityRecord>;
}

/// Resolves the registrar set and registrar membership
pub trait RegistrarLookup {
    fn registrars(&self) -> Vec<RegistrarInfo>;

    fn is_registrar(&self, address: &str) -> bool {
        self.registrars().iter().any(|r| r.account == address)
    }
}

/// Resolves the sub-identity addresses linked to a parent address
pub trait SubidentityLookup {
    fn subs_of(&self, address: &str) -> Vec<String>;
}

// ============================================================================
// IN-MEMORY STORES
// ============================================================================

/// In-memory identity store for the CLI, server and tests
#[derive(Default)]
pub struct InMemoryIdentityStore {
    identities: Arc<RwLock<HashMap<String, IdentityRecord>>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn insert(&self, address: impl Into<String>, record: IdentityRecord) {
        let mut identities = self.identities.write().unwrap();
        identities.insert(address.into(), record);
    }

    pub fn len(&self) -> usize {
        self.identities.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.read().unwrap().is_empty()
    }
}

impl IdentityLookup for InMemoryIdentityStore {
    fn identity_of(&self, address: &str) -> Option<IdentityRecord> {
        let identities = self.identities.read().unwrap();
        identities.get(address).cloned()
    }
}

/// In-memory registrar set
#[derive(Default)]
pub struct InMemoryRegistrarSet {
    registrars: Arc<RwLock<Vec<RegistrarInfo>>>,
}

impl InMemoryRegistrarSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn register(&self, registrar: RegistrarInfo) {
        let mut registrars = self.registrars.write().unwrap();
        registrars.push(registrar);
    }
}

impl RegistrarLookup for InMemoryRegistrarSet {
    fn registrars(&self) -> Vec<RegistrarInfo> {
        self.registrars.read().unwrap().clone()
    }
}

/// In-memory sub-identity index: parent address → linked addresses
#[derive(Default)]
pub struct InMemorySubidentityIndex {
    subs: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl InMemorySubidentityIndex {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn link(&self, parent: impl Into<String>, sub: impl Into<String>) {
        let mut subs = self.subs.write().unwrap();
        subs.entry(parent.into()).or_default().push(sub.into());
    }
}

impl SubidentityLookup for InMemorySubidentityIndex {
    fn subs_of(&self, address: &str) -> Vec<String> {
        let subs = self.subs.read().unwrap();
        subs.get(address).cloned().unwrap_or_default()
    }
}

// ============================================================================
// DEMO DATA
// ============================================================================

/// Seed the three stores with a small demo data set (used by the CLI and
/// the server when no external chain connection is wired in)
pub fn seed_demo_data(
    identities: &InMemoryIdentityStore,
    registrars: &InMemoryRegistrarSet,
    subs: &InMemorySubidentityIndex,
) {
    registrars.register(RegistrarInfo {
        index: 0,
        account: "5Registrar0".to_string(),
        fee: 5_000_000_000,
    });
    registrars.register(RegistrarInfo {
        index: 1,
        account: "5Registrar1".to_string(),
        fee: 0,
    });

    // Fully verified identity with contact fields and sub-identities
    let mut alice = IdentityRecord::new("Alice");
    alice.legal = Some("Alice Chainwright".to_string());
    alice.email = Some("alice@example.com".to_string());
    alice.web = Some("example.com".to_string());
    alice.twitter = Some("alice".to_string());
    alice.riot = Some("@alice:matrix.org".to_string());
    alice.judgements = vec![(0, Judgement::KnownGood), (1, Judgement::Reasonable)];
    identities.insert("5Alice", alice);

    for n in 0..5 {
        subs.link("5Alice", format!("5AliceSub{}", n));
    }

    // Unverified identity with a raw hex contact field
    let mut bob = IdentityRecord::new("Bob");
    bob.email = Some("0x626f62".to_string());
    bob.parent = Some("5Alice".to_string());
    identities.insert("5Bob", bob);

    // Flagged identity
    let mut eve = IdentityRecord::new("Eve");
    eve.web = Some("eve.example".to_string());
    eve.judgements = vec![(0, Judgement::Erroneous)];
    identities.insert("5Eve", eve);
}

// ============================================================================
// TESTS
// ============================================================================
