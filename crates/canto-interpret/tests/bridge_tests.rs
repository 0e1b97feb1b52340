// External-object bridge tests: member lookup by name and argument count,
// nested objects, and host-collection conversion.

use std::sync::Arc;

use canto_core::definition::{Definition, DefinitionBuilder};
use canto_core::node::Node;
use canto_core::registry::Core;
use canto_core::value::Value;
use canto_interpret::bridge::{mapping_value, sequence_value, Extern, NativeRecord};
use canto_interpret::{Context, Flow, Instantiation};
use pretty_assertions::assert_eq;

fn registered(site: Arc<Definition>) -> Arc<Core> {
    let core = Core::new();
    core.register_site(site).unwrap();
    Arc::new(core)
}

fn env_object() -> Arc<NativeRecord> {
    Arc::new(
        NativeRecord::new("Env")
            .field("name", "prod")
            .object(
                "db",
                Arc::new(NativeRecord::new("Db").field("host", "localhost")),
            )
            .method("items", 0, |_args| {
                Ok(Extern::Value(sequence_value(["a", "b", "c"])))
            })
            .method("items", 1, |args| {
                let prefix = args[0].render();
                Ok(Extern::Value(sequence_value([
                    format!("{}a", prefix),
                    format!("{}b", prefix),
                ])))
            }),
    )
}

fn rendered_with_env(page: &Arc<Definition>, core: &Arc<Core>) -> String {
    let mut ctx = Context::new(core.clone()).with_external("env", env_object());
    match Instantiation::new(page.clone()).render(&mut ctx).unwrap() {
        Flow::Value(value) => value.render(),
        Flow::Redirect(r) => panic!("unexpected {}", r),
    }
}

#[test]
fn fields_bind_by_plain_name() {
    let site = DefinitionBuilder::site("app").build();
    let page = site.attach_child(
        DefinitionBuilder::definition("Home").contents(Node::reference("env.name")),
    );
    let core = registered(site);
    assert_eq!(rendered_with_env(&page, &core), "prod");
}

#[test]
fn nested_objects_resolve_recursively() {
    let site = DefinitionBuilder::site("app").build();
    let page = site.attach_child(
        DefinitionBuilder::definition("Home").contents(Node::reference("env.db.host")),
    );
    let core = registered(site);
    assert_eq!(rendered_with_env(&page, &core), "localhost");
}

#[test]
fn methods_overload_by_argument_count() {
    let site = DefinitionBuilder::site("app").build();
    let page = site.attach_child(DefinitionBuilder::definition("Home").contents(Node::block(
        vec![
            Node::reference("env.items"),
            Node::text(" | "),
            Node::reference_with_args("env.items", vec![Node::text("x")]),
        ],
    )));
    let core = registered(site);
    // Host sequences arrive as the engine's own list primitive.
    assert_eq!(rendered_with_env(&page, &core), "abc | xaxb");
}

#[test]
fn missing_members_are_reported() {
    let site = DefinitionBuilder::site("app").build();
    let page = site.attach_child(
        DefinitionBuilder::definition("Home").contents(Node::reference("env.nothing")),
    );
    let core = registered(site);

    let mut ctx = Context::new(core.clone()).with_external("env", env_object());
    let err = Instantiation::new(page.clone())
        .render(&mut ctx)
        .unwrap_err();
    assert!(err.to_string().contains("external bridge"));
}

#[test]
fn host_collections_convert_to_engine_primitives() {
    let list = sequence_value([1i64, 2, 3]);
    assert_eq!(list, Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));

    let table = mapping_value([
        ("host".to_string(), Value::text("localhost")),
        ("port".to_string(), Value::Int(5432)),
    ]);
    match &table {
        Value::Table(entries) => {
            // Insertion order is preserved.
            assert_eq!(entries[0].0, "host");
            assert_eq!(entries[1].0, "port");
        }
        other => panic!("expected a table, got {:?}", other),
    }
    assert_eq!(table.render(), "host: localhost\nport: 5432");
}
