// 🔍 Identity View Derivation - Pure (inputs) → view model
// Re-derived whenever any input changes; owns no state beyond what the
// caller passes in (the judgement-panel toggle lives with the caller).

use serde::{Deserialize, Serialize};

use crate::identity::{is_hex, IdentityRecord};
use crate::judgements::{group_judgements, JudgementGroup};
use crate::lookup::{ApiCapabilities, RegistrarInfo, RegistrarLookup, SubidentityLookup};

/// Sub-identity lists longer than this collapse behind an expandable summary
pub const SUBS_DISPLAY_THRESHOLD: usize = 4;

const TWITTER_URL_BASE: &str = "https://twitter.com/";

// ============================================================================
// VIEW MODEL TYPES
// ============================================================================

/// Tri-state trust color for the judgement tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagColor {
    Red,
    Yellow,
    Green,
}

impl TagColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagColor::Red => "red",
            TagColor::Yellow => "yellow",
            TagColor::Green => "green",
        }
    }
}

/// Judgement summary shown next to the section header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgementTag {
    pub count: usize,
    pub color: TagColor,
    pub label: String,
}

/// A contact field value: a clickable link only when trust-gating allows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Verified, decoded value rendered as a hyperlink
    Link { href: String, text: String },

    /// Unverified or still hex-encoded value rendered as plain text
    Text(String),
}

impl FieldValue {
    pub fn is_link(&self) -> bool {
        matches!(self, FieldValue::Link { .. })
    }
}

/// Sub-identity list rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubsSection {
    /// Count + full list rendered unconditionally
    Inline { count: usize, addresses: Vec<String> },

    /// Summary shows the count; the list sits behind an expander
    Collapsed { count: usize, addresses: Vec<String> },
}

impl SubsSection {
    pub fn count(&self) -> usize {
        match self {
            SubsSection::Inline { count, .. } => *count,
            SubsSection::Collapsed { count, .. } => *count,
        }
    }
}

/// Judgement-panel toggle state, owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

impl PanelState {
    pub fn toggle(self) -> Self {
        match self {
            PanelState::Closed => PanelState::Open,
            PanelState::Open => PanelState::Closed,
        }
    }
}

/// Registrar-only action exposed in the view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrarAction {
    pub icon: String,
    pub label: String,
}

/// Judgement-submission panel descriptor (the modal equivalent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgementPanel {
    pub address: String,
    pub registrars: Vec<RegistrarInfo>,
}

/// Renderable identity section for one address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityView {
    pub address: String,

    /// Header card: display name + optional legal name
    pub title: String,
    pub subtitle: Option<String>,

    pub tag: JudgementTag,
    pub judgements: Vec<JudgementGroup>,

    /// Table rows - absent fields suppress their row
    pub parent: Option<String>,
    pub email: Option<FieldValue>,
    pub website: Option<FieldValue>,
    pub twitter: Option<FieldValue>,
    pub riot: Option<String>,
    pub subs: Option<SubsSection>,

    pub registrar_action: Option<RegistrarAction>,
    pub judgement_panel: Option<JudgementPanel>,
}

// ============================================================================
// DERIVATION
// ============================================================================

/// Derive the renderable identity section for an address.
///
/// Returns `None` when the identity is absent, not existent, or the active
/// connection cannot look identities up at all - a hard short-circuit, not
/// a degraded render.
pub fn derive_identity_view(
    address: &str,
    identity: Option<&IdentityRecord>,
    caps: ApiCapabilities,
    registrar_lookup: &dyn RegistrarLookup,
    sub_lookup: &dyn SubidentityLookup,
    viewer: Option<&str>,
    panel: PanelState,
) -> Option<IdentityView> {
    let identity = identity?;

    if !identity.is_existent || !caps.supports_identity_lookup {
        return None;
    }

    let flags = identity.flags();
    let known_good = flags.is_known_good;

    let tag = JudgementTag {
        count: identity.judgements.len(),
        color: if flags.is_bad {
            TagColor::Red
        } else if flags.is_good {
            TagColor::Green
        } else {
            TagColor::Yellow
        },
        label: judgement_label(identity).to_string(),
    };

    let is_registrar = viewer
        .map(|v| registrar_lookup.is_registrar(v))
        .unwrap_or(false);

    let registrar_action = is_registrar.then(|| RegistrarAction {
        icon: "address-card".to_string(),
        label: "Add identity judgment".to_string(),
    });

    // Panel requires both the toggle and registrar capability
    let judgement_panel = (is_registrar && panel == PanelState::Open).then(|| JudgementPanel {
        address: address.to_string(),
        registrars: registrar_lookup.registrars(),
    });

    Some(IdentityView {
        address: address.to_string(),
        title: identity.display.clone(),
        subtitle: identity.legal.clone(),
        tag,
        judgements: group_judgements(&identity.judgements),
        parent: identity.parent.clone(),
        email: identity
            .email
            .as_deref()
            .map(|v| gate_field(v, known_good, |e| format!("mailto:{}", e))),
        website: identity
            .web
            .as_deref()
            .map(|v| gate_field(v, known_good, force_https)),
        twitter: identity
            .twitter
            .as_deref()
            .map(|v| gate_field(v, known_good, twitter_url)),
        riot: identity.riot.clone(),
        subs: subs_section(sub_lookup.subs_of(address)),
        registrar_action,
        judgement_panel,
    })
}

/// Label priority chain: zero judgements first, then bad before good
fn judgement_label(identity: &IdentityRecord) -> &'static str {
    let flags = identity.flags();

    if identity.judgements.is_empty() {
        "No judgments"
    } else if flags.is_bad {
        if flags.is_erroneous {
            "Erroneous"
        } else {
            "Low quality"
        }
    } else if flags.is_known_good {
        "Known good"
    } else {
        "Reasonable"
    }
}

/// Trust gate for one contact field: link only when the value decoded and
/// the identity is known good
fn gate_field(value: &str, known_good: bool, linkify: impl Fn(&str) -> String) -> FieldValue {
    if is_hex(value) || !known_good {
        FieldValue::Text(value.to_string())
    } else {
        FieldValue::Link {
            href: linkify(value),
            text: value.to_string(),
        }
    }
}

/// Force an https scheme onto a website value
fn force_https(url: &str) -> String {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    format!("https://{}", rest)
}

/// Full profile URLs pass through; bare handles get the canonical base
fn twitter_url(value: &str) -> String {
    if value.starts_with(TWITTER_URL_BASE) {
        value.to_string()
    } else {
        format!("{}{}", TWITTER_URL_BASE, value)
    }
}

fn subs_section(addresses: Vec<String>) -> Option<SubsSection> {
    if addresses.is_empty() {
        return None;
    }

    let count = addresses.len();

    if count > SUBS_DISPLAY_THRESHOLD {
        Some(SubsSection::Collapsed { count, addresses })
    } else {
        Some(SubsSection::Inline { count, addresses })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judgements::Judgement;
    use crate::lookup::{InMemoryRegistrarSet, InMemorySubidentityIndex};

    fn caps() -> ApiCapabilities {
        ApiCapabilities::with_identity_lookup()
    }

    fn empty_lookups() -> (InMemoryRegistrarSet, InMemorySubidentityIndex) {
        (InMemoryRegistrarSet::new(), InMemorySubidentityIndex::new())
    }

    fn derive(
        identity: Option<&IdentityRecord>,
        capabilities: ApiCapabilities,
    ) -> Option<IdentityView> {
        let (registrars, subs) = empty_lookups();
        derive_identity_view(
            "5Alice",
            identity,
            capabilities,
            &registrars,
            &subs,
            None,
            PanelState::Closed,
        )
    }

    fn known_good_identity() -> IdentityRecord {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![(0, Judgement::KnownGood)];
        record
    }

    // ------------------------------------------------------------------
    // Eligibility gate
    // ------------------------------------------------------------------

    #[test]
    fn test_gate_absent_identity() {
        assert!(derive(None, caps()).is_none());
    }

    #[test]
    fn test_gate_non_existent_identity() {
        let mut record = IdentityRecord::new("Alice");
        record.is_existent = false;
        record.email = Some("alice@example.com".to_string());

        assert!(derive(Some(&record), caps()).is_none());
    }

    #[test]
    fn test_gate_missing_capability() {
        let record = known_good_identity();

        assert!(derive(Some(&record), ApiCapabilities::default()).is_none());
    }

    // ------------------------------------------------------------------
    // Judgement tag
    // ------------------------------------------------------------------

    #[test]
    fn test_tag_no_judgements() {
        let record = IdentityRecord::new("Alice");
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.tag.count, 0);
        assert_eq!(view.tag.label, "No judgments");
        assert_eq!(view.tag.color, TagColor::Yellow);
    }

    #[test]
    fn test_tag_erroneous() {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![(0, Judgement::Erroneous)];
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.tag.label, "Erroneous");
        assert_eq!(view.tag.color, TagColor::Red);
    }

    #[test]
    fn test_tag_low_quality() {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![(0, Judgement::LowQuality)];
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.tag.label, "Low quality");
        assert_eq!(view.tag.color, TagColor::Red);
    }

    #[test]
    fn test_tag_known_good() {
        let view = derive(Some(&known_good_identity()), caps()).unwrap();

        assert_eq!(view.tag.label, "Known good");
        assert_eq!(view.tag.color, TagColor::Green);
        assert_eq!(view.tag.count, 1);
    }

    #[test]
    fn test_tag_reasonable() {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![(0, Judgement::Reasonable)];
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.tag.label, "Reasonable");
        assert_eq!(view.tag.color, TagColor::Green);
    }

    #[test]
    fn test_tag_pending_only_is_yellow() {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![(0, Judgement::FeePaid)];
        let view = derive(Some(&record), caps()).unwrap();

        // Has judgements but neither clearly good nor bad
        assert_eq!(view.tag.label, "Reasonable");
        assert_eq!(view.tag.color, TagColor::Yellow);
    }

    #[test]
    fn test_tag_bad_wins_over_known_good() {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![(0, Judgement::KnownGood), (1, Judgement::Erroneous)];
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.tag.label, "Erroneous");
        assert_eq!(view.tag.color, TagColor::Red);
    }

    // ------------------------------------------------------------------
    // Contact field link gating
    // ------------------------------------------------------------------

    #[test]
    fn test_email_links_when_known_good() {
        let mut record = known_good_identity();
        record.email = Some("alice@example.com".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(
            view.email,
            Some(FieldValue::Link {
                href: "mailto:alice@example.com".to_string(),
                text: "alice@example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_email_plain_when_not_known_good() {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![(0, Judgement::Reasonable)];
        record.email = Some("alice@example.com".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(
            view.email,
            Some(FieldValue::Text("alice@example.com".to_string()))
        );
    }

    #[test]
    fn test_hex_value_never_links() {
        let mut record = known_good_identity();
        record.email = Some("0x616c696365".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.email, Some(FieldValue::Text("0x616c696365".to_string())));
    }

    #[test]
    fn test_website_forces_https() {
        let mut record = known_good_identity();
        record.web = Some("example.com".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(
            view.website,
            Some(FieldValue::Link {
                href: "https://example.com".to_string(),
                text: "example.com".to_string(),
            })
        );
    }

    #[test]
    fn test_website_rewrites_http() {
        let mut record = known_good_identity();
        record.web = Some("http://example.com".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        let Some(FieldValue::Link { href, .. }) = view.website else {
            panic!("website should be a link");
        };
        assert_eq!(href, "https://example.com");
    }

    #[test]
    fn test_website_keeps_https() {
        assert_eq!(force_https("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_twitter_handle_gets_profile_url() {
        let mut record = known_good_identity();
        record.twitter = Some("alice".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(
            view.twitter,
            Some(FieldValue::Link {
                href: "https://twitter.com/alice".to_string(),
                text: "alice".to_string(),
            })
        );
    }

    #[test]
    fn test_twitter_full_url_passes_through() {
        let mut record = known_good_identity();
        record.twitter = Some("https://twitter.com/alice".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        let Some(FieldValue::Link { href, .. }) = view.twitter else {
            panic!("twitter should be a link");
        };
        assert_eq!(href, "https://twitter.com/alice");
    }

    #[test]
    fn test_riot_is_always_plain_text() {
        let mut record = known_good_identity();
        record.riot = Some("@alice:matrix.org".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.riot, Some("@alice:matrix.org".to_string()));
    }

    #[test]
    fn test_missing_fields_suppress_rows() {
        let view = derive(Some(&known_good_identity()), caps()).unwrap();

        assert!(view.email.is_none());
        assert!(view.website.is_none());
        assert!(view.twitter.is_none());
        assert!(view.riot.is_none());
        assert!(view.parent.is_none());
        assert!(view.subs.is_none());
    }

    #[test]
    fn test_header_and_parent_rows() {
        let mut record = known_good_identity();
        record.legal = Some("Alice Chainwright".to_string());
        record.parent = Some("5Parent".to_string());
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.title, "Alice");
        assert_eq!(view.subtitle, Some("Alice Chainwright".to_string()));
        assert_eq!(view.parent, Some("5Parent".to_string()));
    }

    // ------------------------------------------------------------------
    // Sub-identities
    // ------------------------------------------------------------------

    fn derive_with_subs(count: usize) -> IdentityView {
        let registrars = InMemoryRegistrarSet::new();
        let subs = InMemorySubidentityIndex::new();
        for n in 0..count {
            subs.link("5Alice", format!("5Sub{}", n));
        }

        let record = known_good_identity();
        derive_identity_view(
            "5Alice",
            Some(&record),
            caps(),
            &registrars,
            &subs,
            None,
            PanelState::Closed,
        )
        .unwrap()
    }

    #[test]
    fn test_subs_above_threshold_collapse() {
        let view = derive_with_subs(5);

        let Some(SubsSection::Collapsed { count, addresses }) = view.subs else {
            panic!("5 subs should collapse");
        };
        assert_eq!(count, 5);
        assert_eq!(addresses.len(), 5);
    }

    #[test]
    fn test_subs_at_or_below_threshold_inline() {
        let view = derive_with_subs(3);

        let Some(SubsSection::Inline { count, addresses }) = view.subs else {
            panic!("3 subs should render inline");
        };
        assert_eq!(count, 3);
        assert_eq!(addresses, vec!["5Sub0", "5Sub1", "5Sub2"]);

        // Threshold is exclusive: exactly 4 still renders inline
        let view = derive_with_subs(SUBS_DISPLAY_THRESHOLD);
        assert!(matches!(view.subs, Some(SubsSection::Inline { count: 4, .. })));
    }

    // ------------------------------------------------------------------
    // Registrar action + judgement panel
    // ------------------------------------------------------------------

    fn registrar_set() -> InMemoryRegistrarSet {
        let set = InMemoryRegistrarSet::new();
        set.register(RegistrarInfo {
            index: 0,
            account: "5Registrar0".to_string(),
            fee: 0,
        });
        set
    }

    fn derive_as(viewer: Option<&str>, panel: PanelState) -> IdentityView {
        let registrars = registrar_set();
        let subs = InMemorySubidentityIndex::new();
        let record = known_good_identity();

        derive_identity_view(
            "5Alice",
            Some(&record),
            caps(),
            &registrars,
            &subs,
            viewer,
            panel,
        )
        .unwrap()
    }

    #[test]
    fn test_registrar_sees_action() {
        let view = derive_as(Some("5Registrar0"), PanelState::Closed);

        let action = view.registrar_action.unwrap();
        assert_eq!(action.label, "Add identity judgment");
        assert_eq!(action.icon, "address-card");
        assert!(view.judgement_panel.is_none());
    }

    #[test]
    fn test_non_registrar_sees_no_action() {
        let view = derive_as(Some("5Bob"), PanelState::Open);

        assert!(view.registrar_action.is_none());
        // Open toggle without registrar capability shows no panel
        assert!(view.judgement_panel.is_none());
    }

    #[test]
    fn test_open_panel_carries_address_and_registrars() {
        let view = derive_as(Some("5Registrar0"), PanelState::Open);

        let panel = view.judgement_panel.unwrap();
        assert_eq!(panel.address, "5Alice");
        assert_eq!(panel.registrars.len(), 1);
        assert_eq!(panel.registrars[0].account, "5Registrar0");
    }

    #[test]
    fn test_panel_state_toggle() {
        assert_eq!(PanelState::Closed.toggle(), PanelState::Open);
        assert_eq!(PanelState::Open.toggle(), PanelState::Closed);
        assert_eq!(PanelState::default(), PanelState::Closed);
    }

    // ------------------------------------------------------------------
    // Judgement grouping in the view
    // ------------------------------------------------------------------

    #[test]
    fn test_view_groups_judgements() {
        let mut record = IdentityRecord::new("Alice");
        record.judgements = vec![
            (0, Judgement::Reasonable),
            (2, Judgement::Reasonable),
            (1, Judgement::KnownGood),
        ];
        let view = derive(Some(&record), caps()).unwrap();

        assert_eq!(view.judgements.len(), 2);
        assert_eq!(view.judgements[0].registrar_indexes, vec![0, 2]);
        assert_eq!(view.tag.count, 3);
    }
}
