use proptest::prelude::*;
use revdiff_types::{EntityId, LangCode, RevisionId};
use std::collections::HashSet;
use std::str::FromStr;

// ── RevisionId ────────────────────────────────────────────────────

#[test]
fn revision_id_orders_by_recency() {
    assert!(RevisionId::new(3) < RevisionId::new(10));
    assert_eq!(RevisionId::new(7).max(RevisionId::new(2)), RevisionId::new(7));
}

#[test]
fn revision_id_display_and_parse() {
    let id = RevisionId::new(42);
    assert_eq!(id.to_string(), "42");
    assert_eq!(RevisionId::parse("42").unwrap(), id);
    assert_eq!(RevisionId::from_str(" 42 ").unwrap(), id);
}

#[test]
fn revision_id_parse_invalid() {
    assert!(RevisionId::parse("").is_err());
    assert!(RevisionId::parse("-1").is_err());
    assert!(RevisionId::parse("abc").is_err());
}

#[test]
fn revision_id_serializes_transparently() {
    let json = serde_json::to_string(&RevisionId::new(9)).unwrap();
    assert_eq!(json, "9");
    let back: RevisionId = serde_json::from_str(&json).unwrap();
    assert_eq!(back.get(), 9);
}

#[test]
fn revision_id_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(RevisionId::new(1));
    set.insert(RevisionId::from(1));
    assert_eq!(set.len(), 1);
}

proptest! {
    #[test]
    fn revision_id_order_matches_ordinal(a in any::<u64>(), b in any::<u64>()) {
        prop_assert_eq!(RevisionId::new(a).cmp(&RevisionId::new(b)), a.cmp(&b));
    }
}

// ── EntityId ──────────────────────────────────────────────────────

#[test]
fn entity_id_is_opaque() {
    let id = EntityId::new("node-17");
    assert_eq!(id.as_str(), "node-17");
    assert_eq!(id.to_string(), "node-17");
    assert_eq!(EntityId::from("node-17"), id);
}

// ── LangCode ──────────────────────────────────────────────────────

#[test]
fn lang_code_is_lowercased() {
    let code = LangCode::parse("PT-BR").unwrap();
    assert_eq!(code.as_str(), "pt-br");
    assert_eq!(code, LangCode::parse("pt-br").unwrap());
}

#[test]
fn lang_code_rejects_blank_and_whitespace() {
    assert!(LangCode::parse("").is_err());
    assert!(LangCode::parse("   ").is_err());
    assert!(LangCode::parse("e n").is_err());
}

#[test]
fn lang_code_deserialize_validates() {
    let ok: LangCode = serde_json::from_str("\"EN\"").unwrap();
    assert_eq!(ok.as_str(), "en");
    assert!(serde_json::from_str::<LangCode>("\"\"").is_err());
}
