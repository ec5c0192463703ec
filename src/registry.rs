// ⛓️ Chain Type Registry - Chain name → type-definition bundle
// Base mapping + fixed overlay list, several names aliasing one bundle
//
// Bundles are opaque JSON consumed by downstream chain-decoding setup.
// The registry is built once at process start and never mutated after.

use anyhow::{Context as AnyhowContext, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// TYPE BUNDLE
// ============================================================================

/// Opaque set of type definitions for one chain's on-chain data format
pub type TypeBundle = serde_json::Value;

/// Content fingerprint of a bundle (hex SHA-256 of its JSON form).
/// Lets listings show which chain names carry identical definitions.
pub fn bundle_fingerprint(bundle: &TypeBundle) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bundle.to_string());
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// CHAIN TYPE REGISTRY
// ============================================================================

/// Immutable mapping from chain display name to its type bundle.
///
/// Values are shared by reference: overlay aliases resolve to the identical
/// `Arc`, observable via `Arc::ptr_eq`. Later entries silently shadow
/// earlier ones with the same key - accepted behavior, not an error.
#[derive(Debug)]
pub struct ChainTypeRegistry {
    chains: HashMap<String, Arc<TypeBundle>>,
    built_at: DateTime<Utc>,
}

impl ChainTypeRegistry {
    /// Build from a base mapping plus an ordered overlay list.
    /// Overlays are applied after the base, in order, shadowing silently.
    pub fn build(
        base: HashMap<String, Arc<TypeBundle>>,
        overlays: impl IntoIterator<Item = (String, Arc<TypeBundle>)>,
    ) -> Self {
        let mut chains = base;

        for (name, bundle) in overlays {
            chains.insert(name, bundle);
        }

        ChainTypeRegistry {
            chains,
            built_at: Utc::now(),
        }
    }

    /// Load a base mapping from a JSON file (object of name → bundle),
    /// then apply overlays as in `build`
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        overlays: impl IntoIterator<Item = (String, Arc<TypeBundle>)>,
    ) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read chain types file: {:?}", path.as_ref()))?;

        let base: HashMap<String, TypeBundle> = serde_json::from_str(&content)
            .context("Failed to parse chain types JSON")?;

        let base = base
            .into_iter()
            .map(|(name, bundle)| (name, Arc::new(bundle)))
            .collect();

        Ok(ChainTypeRegistry::build(base, overlays))
    }

    /// Look up the bundle for a chain display name
    pub fn get(&self, chain_name: &str) -> Option<&Arc<TypeBundle>> {
        self.chains.get(chain_name)
    }

    /// Number of registered chain names
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// All chain names, sorted for stable listings
    pub fn chain_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.chains.keys().cloned().collect();
        names.sort();
        names
    }

    /// When this registry was built
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

// ============================================================================
// DEFAULT OVERLAYS
// ============================================================================

/// The fixed overlay list applied on top of the base mapping.
///
/// "Development" and the Bein testnet nicknames intentionally share one
/// Clover bundle (alias by reference, not by copy).
pub fn default_overlays() -> Vec<(String, Arc<TypeBundle>)> {
    let crust_maxwell = Arc::new(crust_maxwell_bundle());
    let clover = Arc::new(clover_bundle());

    vec![
        ("Crust Maxwell".to_string(), crust_maxwell),
        ("Development".to_string(), Arc::clone(&clover)),
        ("bein".to_string(), Arc::clone(&clover)),
        ("Bein".to_string(), clover),
    ]
}

fn crust_maxwell_bundle() -> TypeBundle {
    json!({
        "Address": "AccountId",
        "AddressInfo": "Vec<u8>",
        "FileAlias": "Vec<u8>",
        "Guarantee": {
            "targets": "Vec<IndividualExposure<AccountId, Balance>>",
            "total": "Compact<Balance>",
            "submitted_in": "EraIndex",
            "suppressed": "bool"
        },
        "IASSig": "Vec<u8>",
        "LookupSource": "AccountId",
        "MerchantInfo": {
            "address": "Vec<u8>",
            "storage_price": "Balance",
            "file_map": "Vec<(Vec<u8>, Vec<Hash>)>"
        },
        "ReportSlot": "u64",
        "SworkerCert": "Vec<u8>",
        "SworkerCode": "Vec<u8>",
        "SworkerPubKey": "Vec<u8>",
        "SworkerSignature": "Vec<u8>"
    })
}

fn clover_bundle() -> TypeBundle {
    json!({
        "Amount": "i128",
        "AmountOf": "Amount",
        "Balance": "u128",
        "CurrencyId": "u8",
        "CurrencyIdOf": "CurrencyId",
        "CurrencyTypeEnum": {
            "_enum": ["CLV", "CUSDT", "DOT", "CETH"]
        },
        "EcdsaSignature": "[u8; 65]",
        "EvmAddress": "H160",
        "PairKey": "u64",
        "PoolId": {
            "_enum": { "Swap": "u64" }
        },
        "Rate": "FixedU128",
        "Ratio": "FixedU128",
        "Share": "u128"
    })
}

// ============================================================================
// TESTS
// ============================================================================
