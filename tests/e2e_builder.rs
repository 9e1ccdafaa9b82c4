//! End-to-end tests for the builder protocol and slot promotion.
//!
//! Each test builds Things through the public `PropertiesBuilder` API and
//! reads them back through `Thing`/`PredicatesObjects`.

use pretty_assertions::assert_eq;
use thing_rs::{
    vocab, DatatypeRegistry, Error, LangString, Link, Literal, PredicatesObjects,
    PredicatesObjectsBuilder, PropertiesBuilder, SlotState, Thing, Value,
};

const IRI: &str = "https://x/1";
const P: &str = "https://example.org/p";

fn builder() -> thing_rs::ThingBuilder {
    let mut builder = Thing::builder();
    builder.iri(IRI);
    builder
}

fn strings(values: &[Value]) -> Vec<&str> {
    values.iter().filter_map(Value::as_str).collect()
}

// ============================================================================
// 1. Predicate order is first-touched order
// ============================================================================

#[test]
fn test_predicate_iris_in_insertion_order() {
    let thing = builder().set("b", "B").set("a", "A").build().unwrap();
    assert_eq!(thing.predicate_iris().collect::<Vec<_>>(), vec!["b", "a"]);
}

// ============================================================================
// 2. Ordered promotion is sticky
// ============================================================================

#[test]
fn test_add_after_add_ordered_appends() {
    let thing = builder()
        .add_ordered(P, "c")
        .add_ordered(P, "b")
        .add(P, "a")
        .build()
        .unwrap();

    assert!(thing.is_ordered(P));
    assert_eq!(strings(thing.get(P).unwrap().values()), vec!["c", "b", "a"]);
}

#[test]
fn test_unordered_to_ordered_keeps_prior_insertion_order() {
    let thing = builder()
        .set(P, "first")
        .add(P, "second")
        .add_all_ordered(P, ["third", "second"])
        .build()
        .unwrap();

    assert_eq!(thing.slot_state(P), Some(SlotState::Ordered));
    assert_eq!(
        strings(thing.get(P).unwrap().values()),
        vec!["first", "second", "third", "second"]
    );
}

// ============================================================================
// 3. Plain add is an unordered set
// ============================================================================

#[test]
fn test_add_add_is_unordered_set() {
    let thing = builder().add(P, "a").add(P, "b").build().unwrap();
    let slot = thing.get(P).unwrap();

    assert!(!thing.is_ordered(P));
    assert!(thing.is_iterable(P));
    let set = slot.to_set();
    assert_eq!(set.len(), 2);
    assert!(set.contains(&Value::from("a")));
    assert!(set.contains(&Value::from("b")));
}

#[test]
fn test_unordered_equality_ignores_insertion_order() {
    let ab = builder().add(P, "a").add(P, "b").build().unwrap();
    let ba = builder().add(P, "b").add(P, "a").build().unwrap();
    assert_eq!(ab, ba);
}

#[test]
fn test_duplicate_in_unordered_slot_fails_build() {
    let mut b = builder();
    b.add_all(P, ["a", "b", "a"]);
    assert_eq!(
        b.build().unwrap_err(),
        Error::DuplicateValue { predicate: P.into(), value: "\"a\"".into() }
    );
}

// ============================================================================
// 4. IRI rules
// ============================================================================

#[test]
fn test_build_without_iri_fails() {
    let err = Thing::builder().set(P, "v").build().unwrap_err();
    assert_eq!(err, Error::MissingIri);
}

#[test]
fn test_build_twice_yields_independent_values() {
    let mut b = builder();
    b.set(P, "one");
    let first = b.build().unwrap();
    b.set(P, "two");
    let second = b.build().unwrap();

    assert_eq!(first.get_string(P).unwrap().as_deref(), Some("one"));
    assert_eq!(second.get_string(P).unwrap().as_deref(), Some("two"));
}

// ============================================================================
// 5. Literals and datatypes
// ============================================================================

#[test]
fn test_literal_date() {
    let thing = builder()
        .set(P, Literal::new("2024-10-06", vocab::xsd::DATE))
        .build()
        .unwrap();

    assert_eq!(thing.get_string(P).unwrap(), Some("2024-10-06".to_string()));
    assert_eq!(thing.datatype(P), Some(vocab::xsd::DATE));

    let datatypes = DatatypeRegistry::standard();
    let date: chrono::NaiveDate = thing.get_as(P, &datatypes).unwrap().unwrap();
    assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2024, 10, 6).unwrap());
}

#[test]
fn test_typed_read_without_datatype_is_an_error() {
    let thing = builder().set(P, "42").build().unwrap();
    let err = thing.get_as::<i64>(P, &DatatypeRegistry::standard()).unwrap_err();
    assert_eq!(
        err,
        Error::MissingDatatype { predicate: P.into(), value: "\"42\"".into(), target: "INTEGER".into() }
    );
}

#[test]
fn test_typed_read_of_collection() {
    let thing = builder()
        .add_all_ordered_with_datatype(P, ["3", "1", "2"], vocab::xsd::INT)
        .build()
        .unwrap();
    let numbers: Vec<i64> = thing.get_all_as(P, &DatatypeRegistry::standard()).unwrap();
    assert_eq!(numbers, vec![3, 1, 2]);
}

#[test]
fn test_missing_predicate_is_absent_not_error() {
    let thing = builder().build().unwrap();
    let datatypes = DatatypeRegistry::standard();
    assert_eq!(thing.get(P), None);
    assert_eq!(thing.get_string(P).unwrap(), None);
    assert_eq!(thing.get_as::<i64>(P, &datatypes).unwrap(), None);
    assert_eq!(thing.get_all_as::<i64>(P, &datatypes).unwrap(), Vec::<i64>::new());
}

#[test]
fn test_lang_string_reads_as_text() {
    let thing = builder()
        .set(vocab::rdfs::LABEL, LangString::new("Hallo", "de"))
        .build()
        .unwrap();
    assert_eq!(thing.get_string(vocab::rdfs::LABEL).unwrap().as_deref(), Some("Hallo"));
}

// ============================================================================
// 6. Links and structs
// ============================================================================

#[test]
fn test_links_are_not_strings() {
    let thing = builder()
        .set(vocab::schema::URL, Link::new("https://example.org/home"))
        .set(vocab::schema::NAME, "https://example.org/home")
        .build()
        .unwrap();

    assert_eq!(thing.links(vocab::schema::URL).len(), 1);
    assert!(thing.links(vocab::schema::NAME).is_empty());
}

#[test]
fn test_nested_struct() {
    let address = PredicatesObjects::builder()
        .set("https://schema.org/streetAddress", "Main St 1")
        .build()
        .unwrap();
    let thing = builder().set("https://schema.org/address", address.clone()).build().unwrap();

    assert!(thing.is_struct("https://schema.org/address"));
    let nested: PredicatesObjects =
        thing.get_as("https://schema.org/address", &DatatypeRegistry::standard()).unwrap().unwrap();
    assert_eq!(nested, address);
}

// ============================================================================
// 7. JSON loading
// ============================================================================

#[test]
fn test_from_json() {
    let json = serde_json::json!({
        "https://schema.org/name": "Ada",
        "https://example.org/steps": ["one", "two"],
        "https://example.org/nested": { "https://example.org/n": 1 }
    });
    let po = PredicatesObjectsBuilder::from_json(json.as_object().unwrap())
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(po.get_string("https://schema.org/name").unwrap().as_deref(), Some("Ada"));
    assert!(po.is_ordered("https://example.org/steps"));
    assert!(po.is_struct("https://example.org/nested"));
}

// ============================================================================
// 8. Serde round trip of a built Thing
// ============================================================================

#[test]
fn test_thing_serde_json() {
    let thing = builder()
        .set(P, "v")
        .add_ordered("https://example.org/list", 1)
        .add_ordered("https://example.org/list", 1)
        .build()
        .unwrap();
    let json = serde_json::to_string(&thing).unwrap();
    let back: Thing = serde_json::from_str(&json).unwrap();
    assert_eq!(back, thing);
    assert!(back.is_ordered("https://example.org/list"));
}

#[test]
fn test_thing_deserialize_rejects_broken_state() {
    let json = |properties: &str| format!(r#"{{"iri":"{IRI}","properties":{properties}}}"#);
    let value = r#"{"type":"String","value":"v"}"#;

    let good = json(&format!(
        r#"{{"properties":{{"{P}":{{"values":[{value}],"multi":false,"ordered":false}}}},"datatypes":{{}},"order":["{P}"]}}"#
    ));
    let thing: Thing = serde_json::from_str(&good).unwrap();
    assert_eq!(thing.to_string(), format!("<{IRI}> {{<{P}>: \"v\"}}"));

    let empty_slot = json(&format!(
        r#"{{"properties":{{"{P}":{{"values":[],"multi":false,"ordered":false}}}},"datatypes":{{}},"order":["{P}"]}}"#
    ));
    assert!(serde_json::from_str::<Thing>(&empty_slot).is_err());

    let missing_order = json(&format!(
        r#"{{"properties":{{"{P}":{{"values":[{value}],"multi":false,"ordered":false}}}},"datatypes":{{}},"order":[]}}"#
    ));
    assert!(serde_json::from_str::<Thing>(&missing_order).is_err());

    let stray_order = json(r#"{"properties":{},"datatypes":{},"order":["https://example.org/q"]}"#);
    assert!(serde_json::from_str::<Thing>(&stray_order).is_err());

    let empty_iri = r#"{"iri":"","properties":{"properties":{},"datatypes":{},"order":[]}}"#;
    assert!(serde_json::from_str::<Thing>(empty_iri).is_err());
}

// ============================================================================
// 9. Equality follows the visible slot state
// ============================================================================

#[test]
fn test_scalar_after_ordered_equals_plain_scalar() {
    let once_ordered = builder().add_ordered(P, "x").set(P, "a").build().unwrap();
    let plain = builder().set(P, "a").build().unwrap();

    assert_eq!(once_ordered.slot_state(P), Some(SlotState::Scalar));
    assert_eq!(once_ordered, plain);

    // The lineage is still carried by the builder: adding keeps order.
    let appended = once_ordered.copy().add(P, "a").build().unwrap();
    assert!(appended.is_ordered(P));
}
