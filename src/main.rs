use anyhow::Result;
use std::collections::HashMap;
use std::env;
use std::sync::Arc;

use identity_inspector::{
    bundle_fingerprint, default_overlays, derive_identity_view, seed_demo_data,
    ApiCapabilities, ChainTypeRegistry, FieldValue, IdentityLookup, InMemoryIdentityStore,
    InMemoryRegistrarSet, InMemorySubidentityIndex, PanelState, SubsSection, TypeBundle,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("chains") => run_chains(args.get(2).map(String::as_str))?,
        Some("inspect") if args.len() > 2 => run_inspect(&args[2]),
        _ => print_usage(),
    }

    Ok(())
}

fn print_usage() {
    println!("Identity Inspector v{}", identity_inspector::VERSION);
    println!();
    println!("Usage:");
    println!("  identity-inspector chains [base-types.json]   List the chain type registry");
    println!("  identity-inspector inspect <address>          Derive the identity view");
}

fn run_chains(base_file: Option<&str>) -> Result<()> {
    println!("⛓️  Chain Type Registry");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let registry = match base_file {
        Some(path) => {
            println!("\n📂 Loading base types from {}...", path);
            ChainTypeRegistry::from_file(path, default_overlays())?
        }
        None => ChainTypeRegistry::build(HashMap::new(), default_overlays()),
    };

    println!("✓ Registry built with {} chains\n", registry.len());

    // Group names by fingerprint so aliases show up together
    let mut by_fingerprint: HashMap<String, Vec<String>> = HashMap::new();
    for name in registry.chain_names() {
        if let Some(bundle) = registry.get(&name) {
            by_fingerprint
                .entry(bundle_fingerprint(bundle))
                .or_default()
                .push(name);
        }
    }

    for name in registry.chain_names() {
        let bundle: &Arc<TypeBundle> = match registry.get(&name) {
            Some(bundle) => bundle,
            None => continue,
        };
        let fingerprint = bundle_fingerprint(bundle);
        let aliases: Vec<&String> = by_fingerprint
            .get(&fingerprint)
            .map(|names| names.iter().filter(|n| **n != name).collect())
            .unwrap_or_default();

        print!("  {} [{}]", name, &fingerprint[..12]);
        if !aliases.is_empty() {
            let list: Vec<&str> = aliases.iter().map(|n| n.as_str()).collect();
            print!("  (shares types with: {})", list.join(", "));
        }
        println!();
    }

    Ok(())
}

fn run_inspect(address: &str) {
    println!("🔍 Identity Inspector");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let identities = InMemoryIdentityStore::new();
    let registrars = InMemoryRegistrarSet::new();
    let subs = InMemorySubidentityIndex::new();
    seed_demo_data(&identities, &registrars, &subs);

    println!("\n📊 Deriving view for {}...", address);

    let identity = identities.identity_of(address);
    let view = derive_identity_view(
        address,
        identity.as_ref(),
        ApiCapabilities::with_identity_lookup(),
        &registrars,
        &subs,
        None,
        PanelState::Closed,
    );

    let view = match view {
        Some(view) => view,
        None => {
            println!("✗ No identity section to render for this address");
            return;
        }
    };

    println!("✓ Identity found\n");
    println!("  {} — {} judgement(s), {} ({})",
        view.title,
        view.tag.count,
        view.tag.label,
        view.tag.color.as_str()
    );
    if let Some(subtitle) = &view.subtitle {
        println!("  legal:   {}", subtitle);
    }
    if let Some(parent) = &view.parent {
        println!("  parent:  {}", parent);
    }
    print_field("email", view.email.as_ref());
    print_field("website", view.website.as_ref());
    print_field("twitter", view.twitter.as_ref());
    if let Some(riot) = &view.riot {
        println!("  riot:    {}", riot);
    }
    match &view.subs {
        Some(SubsSection::Collapsed { count, .. }) => {
            println!("  subs:    {} (collapsed)", count);
        }
        Some(SubsSection::Inline { count, addresses }) => {
            println!("  subs:    {} — {}", count, addresses.join(", "));
        }
        None => {}
    }
}

fn print_field(name: &str, value: Option<&FieldValue>) {
    match value {
        Some(FieldValue::Link { href, text }) => {
            println!("  {}: {} → {}", name, text, href);
        }
        Some(FieldValue::Text(text)) => {
            println!("  {}: {} (unverified, not linked)", name, text);
        }
        None => {}
    }
}
