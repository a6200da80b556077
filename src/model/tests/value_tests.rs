//! Tests for runtime values and bean identity.

use crate::model::{BeanRef, TypeName, Value, well_known};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(Value::Null, None)]
#[case(Value::Bool(true), Some(well_known::BOOLEAN))]
#[case(Value::Int(4), Some(well_known::INTEGER))]
#[case(Value::Float(1.5), Some(well_known::DOUBLE))]
#[case(Value::text("x"), Some(well_known::STRING))]
#[case(Value::list([]), Some(well_known::LIST))]
#[case(Value::map([]), Some(well_known::MAP))]
#[case(Value::optional(None), Some(well_known::OPTIONAL))]
fn runtime_types_match_value_shapes(#[case] value: Value, #[case] expected: Option<&str>) {
    assert_eq!(value.runtime_type(), expected.map(TypeName::new));
}

#[rstest]
fn beans_compare_by_identity() {
    let first = BeanRef::new("Fish").with("name", "nemo");
    let second = BeanRef::new("Fish").with("name", "nemo");

    assert_eq!(first, first.clone());
    assert_ne!(first, second);
    assert_ne!(first.identity(), second.identity());
}

#[rstest]
fn bean_properties_can_be_wired_after_construction() {
    let parent = BeanRef::new("Node");
    let child = BeanRef::new("Node").with("parent", parent.clone());
    parent.set("child", child.clone());

    assert_eq!(parent.get("child"), Some(Value::Bean(child)));
    assert_eq!(parent.value_of("missing"), Value::Null);
    assert_eq!(parent.get("missing"), None);
}

#[rstest]
fn cyclic_beans_render_without_recursing() {
    let node = BeanRef::new("Node");
    node.set("self", node.clone());

    let rendered = format!("{node:?}");

    assert!(rendered.starts_with("BeanRef(Node@"));
}

#[rstest]
fn containers_compare_structurally() {
    let left = Value::list([Value::Int(1), Value::Null]);
    let right = Value::list([Value::Int(1), Value::Null]);
    let different = Value::set([Value::Int(1), Value::Null]);

    assert_eq!(left, right);
    assert_ne!(left, different);
}

#[rstest]
fn json_rendering_covers_nested_containers() {
    let value = Value::map([(Value::text("a"), Value::list([Value::Int(1), Value::Null]))]);
    assert_eq!(value.to_json(), json!([["a", [1, null]]]));
}

#[rstest]
fn optional_values_convert_to_null() {
    let absent: Option<&str> = None;
    assert_eq!(Value::from(absent), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::text("x"));
}
