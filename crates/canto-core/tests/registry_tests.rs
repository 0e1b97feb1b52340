// Core registry tests: site registration, per-unit load records in input
// order, the type-tag index, and qualified lookup.

use canto_core::definition::{DefinitionBuilder, Param};
use canto_core::error::Error;
use canto_core::ident::CantoPath;
use canto_core::node::Node;
use canto_core::registry::Core;
use pretty_assertions::assert_eq;

fn site_with_pages(site_name: &str, pages: &[&str]) -> std::sync::Arc<canto_core::definition::Definition> {
    let site = DefinitionBuilder::site(site_name).build();
    for page in pages {
        site.attach_child(
            DefinitionBuilder::definition(*page)
                .type_tag("page")
                .contents(Node::text(*page)),
        );
    }
    site
}

#[test]
fn definitions_of_type_preserves_registration_order() {
    let core = Core::new();
    core.register_site(site_with_pages("first", &["a", "b"])).unwrap();
    core.register_site(site_with_pages("second", &["c"])).unwrap();

    let pages: Vec<String> = core
        .definitions_of_type("page")
        .iter()
        .map(|d| d.qualified_name().to_string())
        .collect();
    assert_eq!(pages, vec!["first.a", "first.b", "second.c"]);
    assert!(core.definitions_of_type("mailtemplate").is_empty());
}

#[test]
fn duplicate_site_registration_is_rejected_and_recorded() {
    let core = Core::new();
    core.register_site(site_with_pages("app", &["a"])).unwrap();
    let err = core
        .register_site(site_with_pages("app", &["b"]))
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateSite { .. }));

    // The first registration is undisturbed.
    assert_eq!(core.definitions_of_type("page").len(), 1);

    let records = core.load_records();
    assert_eq!(records.len(), 2);
    assert!(records[0].ok);
    assert!(!records[1].ok);
}

#[test]
fn parse_failures_keep_their_input_position() {
    let core = Core::new();
    core.register_site(site_with_pages("one", &[])).unwrap();
    core.record_failure("two", "unbalanced braces at line 14");
    core.register_site(site_with_pages("three", &[])).unwrap();

    let records = core.load_records();
    let units: Vec<&str> = records.iter().map(|r| r.unit.as_str()).collect();
    assert_eq!(units, vec!["one", "two", "three"]);
    assert!(records[0].ok && records[2].ok);
    assert!(!records[1].ok);
    assert_eq!(
        records[1].detail.as_deref(),
        Some("unbalanced braces at line 14")
    );
}

#[test]
fn qualified_lookup_walks_site_children() {
    let core = Core::new();
    let site = DefinitionBuilder::site("app").build();
    let layout = site.attach_child(DefinitionBuilder::definition("layout"));
    layout.attach_child(DefinitionBuilder::definition("header").contents(Node::text("<h1>")));
    core.register_site(site).unwrap();

    let found = core
        .lookup_qualified(&CantoPath::from_qualified("app.layout.header"))
        .unwrap();
    assert_eq!(found.qualified_name().to_string(), "app.layout.header");
    assert!(core
        .lookup_qualified(&CantoPath::from_qualified("app.layout.footer"))
        .is_none());
    assert!(core
        .lookup_qualified(&CantoPath::from_qualified("elsewhere.header"))
        .is_none());
}

#[test]
fn qualified_lookup_honors_the_call_site_argument_count() {
    let core = Core::new();
    let lib = DefinitionBuilder::site("lib").build();
    lib.attach_child(DefinitionBuilder::definition("item").contents(Node::text("plain")));
    lib.attach_child(
        DefinitionBuilder::definition("item")
            .params(vec![Param::required("n")])
            .contents(Node::text("unary")),
    );
    core.register_site(lib).unwrap();

    let path = CantoPath::from_qualified("lib.item");
    assert!(core
        .lookup_qualified_with_arity(&path, 0)
        .unwrap()
        .accepts_arity(0));
    assert!(core
        .lookup_qualified_with_arity(&path, 1)
        .unwrap()
        .accepts_arity(1));
    assert!(core.lookup_qualified_with_arity(&path, 2).is_none());
    // A bare site name is a zero-arity container, never a call target.
    assert!(core
        .lookup_qualified_with_arity(&CantoPath::from_qualified("lib"), 1)
        .is_none());
}

#[test]
fn only_sites_can_be_registered() {
    let core = Core::new();
    let plain = DefinitionBuilder::definition("loose").build();
    assert!(core.register_site(plain).is_err());
}
