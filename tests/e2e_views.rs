//! End-to-end tests for typed views: capability tables, interface
//! composition, kind registries and chains.

use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use thing_rs::view::common::{
    HasLabel, HasLabelBuilder, HasSameAs, HasSameAsBuilder, HasType, HAS_LABEL, HAS_SAME_AS,
};
use thing_rs::{
    capability, vocab, AsView, DatatypeRegistry, Error, Interface, KindChain, KindFactory,
    KindRegistry, Link, PropertiesBuilder, Thing, ThingRepository, Value, View, ViewBuilder,
};

const PERSON: &str = "https://example.org/Person";
const BOOK: &str = "https://example.org/Book";

capability! {
    pub const PERSON_CAP: Person, PersonBuilder {
        name, set_name: One String => vocab::schema::NAME, None;
        born, set_born: One NaiveDate => "https://schema.org/birthDate", Some(vocab::xsd::DATE);
        height, set_height: One f64 => "https://schema.org/height", Some(vocab::xsd::DOUBLE);
        knows, add_knows: Many Link => "https://schema.org/knows", None;
        steps, add_step: Ordered String => "https://example.org/steps", None;
    }
}

capability! {
    pub const BOOK_CAP: Book, BookBuilder {
        title, set_title: One String => vocab::schema::NAME, None;
        pages, set_pages: One i64 => "https://schema.org/numberOfPages", Some(vocab::xsd::INT);
    }
}

capability! {
    /// Binds `schema:name` as a date, clashing with `PERSON_CAP`.
    pub const BROKEN_CAP: Broken, BrokenBuilder {
        name_as_date, set_name_as_date: One NaiveDate => vocab::schema::NAME, Some(vocab::xsd::DATE);
    }
}

capability! {
    pub const MEASURED_CAP: Measured, MeasuredBuilder {
        small, set_small: One i64 => "https://example.org/small", Some(vocab::xsd::INT);
    }
}

mod shop {
    use thing_rs::capability;

    capability! {
        pub const HAS_CODE: HasCode, HasCodeBuilder {
            sku, set_sku: One String => "https://example.org/sku", None;
        }
    }
}

mod postal {
    use thing_rs::capability;

    capability! {
        pub const HAS_CODE: HasCode, HasCodeBuilder {
            zip, set_zip: One String => "https://example.org/zip", None;
        }
    }
}

fn datatypes() -> Arc<DatatypeRegistry> {
    Arc::new(DatatypeRegistry::standard())
}

fn kinds() -> KindRegistry {
    KindRegistry::new(datatypes())
        .with(PERSON, &[&PERSON_CAP, &HAS_LABEL, &HAS_SAME_AS])
        .unwrap()
        .with(BOOK, &[&BOOK_CAP, &HAS_LABEL])
        .unwrap()
}

// ============================================================================
// 1. Getters and setters dispatch through the datatype registry
// ============================================================================

#[test]
fn test_typed_round_trip() {
    let view = kinds()
        .create(PERSON)
        .unwrap()
        .iri("https://example.org/ada")
        .set_name("Ada")
        .set_born(NaiveDate::from_ymd_opt(1815, 12, 10).unwrap())
        .set_height(1.65)
        .add_knows("https://example.org/charles")
        .add_step("wake")
        .add_step("compute")
        .add_step("wake")
        .build()
        .unwrap();

    assert_eq!(view.name().unwrap().as_deref(), Some("Ada"));
    assert_eq!(view.born().unwrap(), NaiveDate::from_ymd_opt(1815, 12, 10));
    assert_eq!(view.height().unwrap(), Some(1.65));
    assert_eq!(view.knows().unwrap(), vec![Link::new("https://example.org/charles")]);
    assert_eq!(view.steps().unwrap(), vec!["wake", "compute", "wake"]);

    let thing = view.thing();
    assert_eq!(thing.get_value("https://schema.org/birthDate"), Some(&Value::from("1815-12-10")));
    assert_eq!(thing.datatype("https://schema.org/birthDate"), Some(vocab::xsd::DATE));
    assert!(thing.is_ordered("https://example.org/steps"));
}

#[test]
fn test_values_are_converted_to_declared_kind() {
    let view = kinds()
        .create(BOOK)
        .unwrap()
        .iri("https://example.org/book")
        .set_pages(320)
        .build()
        .unwrap();
    assert_eq!(view.values("pages").unwrap(), vec![Value::Int(320)]);
    assert_eq!(view.thing().get_value("https://schema.org/numberOfPages"), Some(&Value::from("320")));
}

#[test]
fn test_generic_data_read_through_view() {
    let thing = Thing::builder()
        .iri("https://example.org/book")
        .set_with_datatype("https://schema.org/numberOfPages", "99", vocab::xsd::INT)
        .set(vocab::schema::NAME, "Notes")
        .build()
        .unwrap();
    let view = kinds().view(BOOK, thing).unwrap();
    assert_eq!(view.pages().unwrap(), Some(99));
    assert_eq!(view.title().unwrap().as_deref(), Some("Notes"));
}

#[test]
fn test_bad_stored_value_is_a_conversion_error() {
    let thing = Thing::builder()
        .iri("https://example.org/book")
        .set_with_datatype("https://schema.org/numberOfPages", "many", vocab::xsd::INT)
        .build()
        .unwrap();
    let view = kinds().view(BOOK, thing).unwrap();
    let Err(Error::Conversion { datatype, value, target, .. }) = view.pages() else {
        panic!("expected a conversion error");
    };
    assert_eq!(
        (datatype.as_str(), value.as_str(), target.as_str()),
        (vocab::xsd::INT, "\"many\"", "INTEGER")
    );
}

#[test]
fn test_out_of_range_write_fails_build() {
    let interface = Arc::new(Interface::of(&[&MEASURED_CAP]).unwrap());
    let mut builder = ViewBuilder::new(interface, datatypes());
    builder.iri("https://example.org/m").set_small(3_000_000_000_i64);
    assert!(matches!(builder.build(), Err(Error::Conversion { .. })));

    let mut builder = ViewBuilder::new(Arc::new(Interface::of(&[&MEASURED_CAP]).unwrap()), datatypes());
    let view = builder.iri("https://example.org/m").set_small(7_i64).build().unwrap();
    assert_eq!(view.small().unwrap(), Some(7));
}

// ============================================================================
// 2. Fresh kind builders are self-describing
// ============================================================================

#[test]
fn test_fresh_view_is_typed() {
    let view = kinds().create(BOOK).unwrap().iri("https://example.org/b").build().unwrap();
    assert_eq!(view.types().unwrap(), vec![Link::new(BOOK)]);
}

#[test]
fn test_copy_of_view_keeps_type_once() {
    let view = kinds().create(BOOK).unwrap().iri("https://example.org/b").build().unwrap();
    let copied = view.copy().set_title("Again").build().unwrap();
    assert_eq!(copied.thing().type_iris(), vec![BOOK]);
}

// ============================================================================
// 3. Composition
// ============================================================================

#[test]
fn test_shared_predicate_with_same_binding_composes() {
    // PERSON_CAP.name and BOOK_CAP.title both bind schema:name as a plain string.
    let interface = Interface::of(&[&PERSON_CAP, &BOOK_CAP]).unwrap();
    assert_eq!(interface.for_predicate(vocab::schema::NAME).unwrap().name, "name");

    let view = ViewBuilder::new(Arc::new(interface), datatypes())
        .iri("https://example.org/both")
        .set_title("Shared")
        .build()
        .unwrap();
    assert_eq!(view.name().unwrap().as_deref(), Some("Shared"));
}

#[test]
fn test_conflicting_binding_is_rejected_at_registration() {
    let err = KindRegistry::new(datatypes())
        .with("https://example.org/Broken", &[&PERSON_CAP, &BROKEN_CAP])
        .unwrap_err();
    assert!(matches!(err, Error::AccessorConflict { .. }));
}

#[test]
fn test_capabilities_sharing_a_name_both_apply() {
    use postal::HasCodeBuilder as _;
    use shop::HasCodeBuilder as _;

    let interface = Interface::of(&[&shop::HAS_CODE, &postal::HAS_CODE]).unwrap();
    assert!(interface.implements(&shop::HAS_CODE));
    assert!(interface.implements(&postal::HAS_CODE));

    let mut builder = ViewBuilder::new(Arc::new(interface), datatypes());
    builder.iri("https://example.org/parcel").set_sku("A-1").set_zip("12345");
    assert_eq!(builder.error(), None);
    let view = builder.build().unwrap();
    assert_eq!(postal::HasCode::zip(&view).unwrap().as_deref(), Some("12345"));
    assert_eq!(shop::HasCode::sku(&view).unwrap().as_deref(), Some("A-1"));
}

#[test]
fn test_reader_on_view_without_capability_is_not_handled() {
    let view = kinds().create(BOOK).unwrap().iri("https://example.org/b").build().unwrap();
    assert!(!view.implements(&PERSON_CAP));
    assert!(matches!(view.born(), Err(Error::NotHandled(_))));
}

// ============================================================================
// 4. Kind chain
// ============================================================================

#[test]
fn test_chain_resolves_by_type() {
    let first = KindRegistry::new(datatypes()).with(BOOK, &[&BOOK_CAP]).unwrap();
    let chain = KindChain::new().with(first).with(kinds());

    // BOOK resolves in the first registry, which lacks HAS_LABEL.
    let book = chain.create(BOOK).unwrap().iri("https://example.org/b").build().unwrap();
    assert!(!book.implements(&HAS_LABEL));

    let person = chain.create(PERSON).unwrap().iri("https://example.org/p").build().unwrap();
    let again: View = chain.view_of(person.into_thing()).unwrap();
    assert!(again.implements(&PERSON_CAP));
}

#[test]
fn test_unknown_kind_is_not_handled() {
    let chain = KindChain::new().with(kinds());
    let err = chain.create("https://example.org/Unicorn").unwrap_err();
    assert_eq!(err, Error::NotHandled("kind https://example.org/Unicorn".into()));
}

// ============================================================================
// 5. Link resolution through a provider
// ============================================================================

#[test]
fn test_get_thing_resolves_links() {
    let repo = ThingRepository::new();
    let kinds = kinds();

    let charles = kinds.create(PERSON).unwrap().iri("https://example.org/charles").set_name("Charles").build_thing().unwrap();
    repo.store(charles.clone()).unwrap();

    let ada = kinds
        .create(PERSON)
        .unwrap()
        .iri("https://example.org/ada")
        .add_knows("https://example.org/charles")
        .add_knows("https://example.org/nobody")
        .add_same_as("https://en.wikipedia.org/wiki/Ada_Lovelace")
        .build()
        .unwrap();

    assert_eq!(ada.get_things("knows", &repo).unwrap(), vec![charles]);
    assert_eq!(ada.get_thing("same_as", &repo).unwrap(), None);
    assert_eq!(ada.same_as().unwrap().len(), 1);
}

// ============================================================================
// 6. Views behind AsView
// ============================================================================

struct Wrapped(View);

impl AsView for Wrapped {
    fn view(&self) -> &View {
        &self.0
    }
}

#[test]
fn test_readers_work_on_any_as_view() {
    let view = kinds().create(PERSON).unwrap().iri("https://example.org/w").set_label("w").build().unwrap();
    let wrapped = Wrapped(view);
    assert_eq!(wrapped.label().unwrap().as_deref(), Some("w"));
}
