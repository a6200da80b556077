//! Tests for the built-in extractors.

use crate::extraction::{
    adapters::{
        ArrayElementExtractor, IterableElementExtractor, ListElementExtractor, MapKeyExtractor,
        MapValueExtractor, OptionalValueExtractor,
    },
    domain::{ExtractedValue, ValueCollector},
    ports::ValueExtractor,
};
use crate::model::Value;
use rstest::rstest;

fn extract(extractor: &dyn ValueExtractor, value: &Value) -> Vec<ExtractedValue> {
    let mut collector = ValueCollector::default();
    extractor.extract(value, &mut collector);
    collector.into_values()
}

#[rstest]
fn list_elements_carry_their_index() {
    let values = extract(
        &ListElementExtractor,
        &Value::list([Value::text("a"), Value::Null]),
    );

    assert_eq!(values.len(), 2);
    assert_eq!(values.iter().map(|v| v.index).collect::<Vec<_>>(), vec![Some(0), Some(1)]);
    assert!(values.iter().all(|v| v.iterable));
    assert_eq!(values.first().and_then(|v| v.node_name.as_deref()), Some("<list element>"));
}

#[rstest]
fn iterable_elements_have_no_index() {
    let values = extract(&IterableElementExtractor, &Value::set([Value::Int(1)]));

    assert_eq!(
        values,
        vec![ExtractedValue {
            node_name: Some("<iterable element>".to_owned()),
            iterable: true,
            index: None,
            key: None,
            value: Value::Int(1),
        }]
    );
}

#[rstest]
fn array_elements_are_indexed_iterable_elements() {
    let values = extract(&ArrayElementExtractor, &Value::array([Value::Int(7)]));

    assert_eq!(values.first().map(|v| v.index), Some(Some(0)));
    assert_eq!(
        values.first().and_then(|v| v.node_name.as_deref()),
        Some("<iterable element>")
    );
}

#[rstest]
fn map_keys_are_keyed_by_themselves() {
    let map = Value::map([(Value::text("k"), Value::Int(1))]);

    let values = extract(&MapKeyExtractor, &map);

    assert_eq!(values.first().map(|v| v.value.clone()), Some(Value::text("k")));
    assert_eq!(values.first().and_then(|v| v.key.clone()), Some(Value::text("k")));
}

#[rstest]
fn map_values_are_keyed_by_their_entry_key() {
    let map = Value::map([(Value::text("k"), Value::Int(1))]);

    let values = extract(&MapValueExtractor, &map);

    assert_eq!(values.first().map(|v| v.value.clone()), Some(Value::Int(1)));
    assert_eq!(values.first().and_then(|v| v.key.clone()), Some(Value::text("k")));
    assert_eq!(values.first().and_then(|v| v.node_name.as_deref()), Some("<map value>"));
}

#[rstest]
#[case(Value::optional(Some(Value::Int(3))), Value::Int(3))]
#[case(Value::optional(None), Value::Null)]
fn optional_content_is_reported_at_the_container_node(
    #[case] optional: Value,
    #[case] expected: Value,
) {
    let values = extract(&OptionalValueExtractor, &optional);

    assert_eq!(values.len(), 1);
    assert_eq!(values.first().map(|v| v.value.clone()), Some(expected));
    assert_eq!(values.first().and_then(|v| v.node_name.clone()), None);
}

#[rstest]
fn extractors_ignore_foreign_shapes() {
    assert!(extract(&ListElementExtractor, &Value::Int(1)).is_empty());
    assert!(extract(&MapKeyExtractor, &Value::list([Value::Int(1)])).is_empty());
}
