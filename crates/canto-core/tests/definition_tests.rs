// Definition model tests: owner chains and qualified names, string
// constants, overload selection by arity, and default-clause lookup.

use canto_core::definition::{DefinitionBuilder, Durability, Param, ParamList};
use canto_core::ident::{CantoPath, Ident};
use canto_core::node::Node;
use pretty_assertions::assert_eq;

#[test]
fn qualified_name_concatenates_the_owner_chain() {
    let site = DefinitionBuilder::site("app").build();
    let layout = site.attach_child(DefinitionBuilder::definition("layout"));
    let header = layout.attach_child(DefinitionBuilder::definition("header"));

    assert_eq!(header.qualified_name().to_string(), "app.layout.header");
    assert_eq!(header.owner_name(), "layout");
    assert_eq!(site.qualified_name().to_string(), "app");
    assert_eq!(site.owner_name(), "");
}

#[test]
fn qualified_names_compose_and_decompose() {
    let site = DefinitionBuilder::site("app").build();
    let layout = site.attach_child(DefinitionBuilder::definition("layout"));
    let header = layout.attach_child(DefinitionBuilder::definition("header"));

    let scope = header.qualified_name().parent().unwrap();
    assert_eq!(scope.to_string(), "app.layout");
    assert_eq!(
        scope.with_segment("footer".into()).to_string(),
        "app.layout.footer"
    );
    assert!(CantoPath::from_qualified("app").parent().unwrap().is_empty());
}

#[test]
fn string_constant_lookup_falls_back_to_the_supplied_default() {
    let plain = DefinitionBuilder::definition("Home").build();
    assert_eq!(plain.get_string_constant("fileExtension", "html"), "html");

    let tuned = DefinitionBuilder::definition("Feed")
        .constant("fileExtension", "xml")
        .build();
    assert_eq!(tuned.get_string_constant("fileExtension", "xml"), "xml");
    assert_eq!(tuned.get_string_constant("fileExtension", "html"), "xml");
    // No chain walk: an owner's constant is not visible from a child.
    let site = DefinitionBuilder::site("app")
        .constant("outputDirectory", "out")
        .build();
    let child = site.attach_child(DefinitionBuilder::definition("page"));
    assert_eq!(child.get_string_constant("outputDirectory", "."), ".");
}

#[test]
fn arity_compatibility_and_abstractness() {
    let def = DefinitionBuilder::definition("greet")
        .params(vec![
            Param::required("who"),
            Param::with_default("greeting", Node::text("hello")),
        ])
        .build();

    assert!(def.accepts_arity(1));
    assert!(def.accepts_arity(2));
    assert!(!def.accepts_arity(0));
    assert!(!def.accepts_arity(3));
    assert!(def.is_abstract_for(0));
    assert!(!def.is_abstract_for(1));
}

#[test]
fn a_bare_abstract_body_is_abstract() {
    let def = DefinitionBuilder::definition("todo")
        .contents(Node::null(true))
        .build();
    assert!(def.is_abstract_for(0));

    let concrete = DefinitionBuilder::definition("done")
        .contents(Node::null(false))
        .build();
    assert!(!concrete.is_abstract_for(0));
}

#[test]
fn exact_arity_beats_default_filled_match() {
    let site = DefinitionBuilder::site("app").build();
    // Declared first: a two-parameter shape that could bind one argument by
    // filling a default.
    site.attach_child(
        DefinitionBuilder::definition("x")
            .params(vec![
                Param::required("a"),
                Param::with_default("b", Node::text("d")),
            ])
            .contents(Node::text("filled")),
    );
    site.attach_child(
        DefinitionBuilder::definition("x")
            .params(vec![Param::required("a")])
            .contents(Node::text("exact")),
    );

    let name = Ident::new("x");
    let chosen = site.lookup_child(&name, 1).unwrap();
    let list: &ParamList = chosen.matching_param_list(1).unwrap();
    assert_eq!(list.arity(), 1);

    // With two arguments only the first shape is compatible.
    let chosen = site.lookup_child(&name, 2).unwrap();
    assert_eq!(chosen.matching_param_list(2).unwrap().arity(), 2);
}

#[test]
fn incompatible_arity_is_not_a_match() {
    let site = DefinitionBuilder::site("app").build();
    site.attach_child(
        DefinitionBuilder::definition("x")
            .params(vec![Param::required("a")])
            .contents(Node::text("unary")),
    );
    assert!(site.lookup_child(&Ident::new("x"), 0).is_none());
    assert!(site.lookup_child(&Ident::new("x"), 1).is_some());
}

#[test]
fn default_clauses_are_invisible_to_ordinary_lookup() {
    let site = DefinitionBuilder::site("app").build();
    site.attach_child(
        DefinitionBuilder::definition("x")
            .default_clause()
            .contents(Node::text("fallback")),
    );

    let name = Ident::new("x");
    assert!(site.lookup_child(&name, 0).is_none());
    let fallback = site.lookup_default_child(&name).unwrap();
    assert!(fallback.is_default());
}

#[test]
fn durability_defaults_to_static() {
    let def = DefinitionBuilder::definition("x").build();
    assert_eq!(def.durability(), Durability::Static);
}
