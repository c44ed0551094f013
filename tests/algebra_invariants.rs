//! Integration tests for the quantified invariants of spec.md §8, exercised
//! through the public facade.

use jsonsubschema::{is_subschema, is_uninhabited, join, meet};
use serde_json::{json, Value};
use test_case::test_case;

fn schemas() -> Vec<Value> {
    vec![
        json!(true),
        json!(false),
        json!({"type": "boolean"}),
        json!({"type": "null"}),
        json!({"type": "integer", "minimum": 0, "maximum": 100}),
        json!({"type": "number", "minimum": -1.5}),
        json!({"type": "string", "minLength": 1, "maxLength": 20}),
        json!({"type": "string", "pattern": "^foo.*$"}),
        json!({"type": "array", "items": {"type": "integer"}}),
        json!({"type": "object", "properties": {"a": {"type": "string"}}, "required": ["a"]}),
    ]
}

#[test_case(0)]
#[test_case(1)]
#[test_case(2)]
#[test_case(3)]
#[test_case(4)]
#[test_case(5)]
#[test_case(6)]
#[test_case(7)]
#[test_case(8)]
#[test_case(9)]
fn test_reflexivity(index: usize) {
    let s = &schemas()[index];
    assert!(is_subschema(s, s).unwrap(), "{s} should be ≤ itself");
}

#[test_case(0)]
#[test_case(4)]
#[test_case(6)]
#[test_case(8)]
#[test_case(9)]
fn test_bottom_and_top_bound_every_schema(index: usize) {
    let s = &schemas()[index];
    assert!(is_subschema(&json!(false), s).unwrap());
    assert!(is_subschema(s, &json!(true)).unwrap());
}

#[test_case(4, 6)]
#[test_case(6, 8)]
#[test_case(4, 9)]
fn test_meet_is_lower_bound(i: usize, j: usize) {
    let all = schemas();
    let (s1, s2) = (&all[i], &all[j]);
    let m = meet(s1, s2).unwrap();
    assert!(is_subschema(&m, s1).unwrap(), "meet should be ≤ s1");
    assert!(is_subschema(&m, s2).unwrap(), "meet should be ≤ s2");
}

#[test_case(4, 6)]
#[test_case(6, 8)]
#[test_case(2, 3)]
fn test_join_is_upper_bound(i: usize, j: usize) {
    let all = schemas();
    let (s1, s2) = (&all[i], &all[j]);
    let j_schema = join(s1, s2).unwrap();
    assert!(is_subschema(s1, &j_schema).unwrap(), "s1 should be ≤ join");
    assert!(is_subschema(s2, &j_schema).unwrap(), "s2 should be ≤ join");
}

#[test_case(4)]
#[test_case(6)]
#[test_case(8)]
#[test_case(9)]
fn test_absorption_with_top_and_bottom(index: usize) {
    let s = &schemas()[index];
    let meet_top = meet(s, &json!(true)).unwrap();
    assert!(is_subschema(&meet_top, s).unwrap() && is_subschema(s, &meet_top).unwrap());

    let join_bot = join(s, &json!(false)).unwrap();
    assert!(is_subschema(&join_bot, s).unwrap() && is_subschema(s, &join_bot).unwrap());

    assert!(is_uninhabited(&meet(s, &json!(false)).unwrap()).unwrap());
    assert_eq!(join(s, &json!(true)).unwrap(), json!(true));
}

#[test]
fn test_uninhabited_is_bot_equivalent() {
    let empty = json!({"type": "integer", "minimum": 10, "maximum": 0});
    assert!(is_uninhabited(&empty).unwrap());
    for s in schemas() {
        if s != json!(false) {
            assert!(is_subschema(&empty, &s).unwrap());
        }
    }
}

#[test]
fn test_enum_respect() {
    let s = json!({"type": "integer", "enum": [1, 2, 3]});
    let t = json!({"type": "integer", "minimum": 0, "maximum": 5});
    assert!(is_subschema(&s, &t).unwrap());

    let narrower = json!({"type": "integer", "minimum": 2, "maximum": 3});
    assert!(!is_subschema(&s, &narrower).unwrap());
}

#[test]
fn test_typeless_enum_is_subschema_of_matching_integer_range() {
    let s1 = json!({"enum": [1, 2]});
    let s2 = json!({"type": "integer", "minimum": 0, "maximum": 5});
    assert!(is_subschema(&s1, &s2).unwrap());

    let narrower = json!({"type": "integer", "minimum": 0, "maximum": 1});
    assert!(!is_subschema(&s1, &narrower).unwrap());
}

#[test]
fn test_meet_typeless_enum_with_integer_range() {
    let s1 = json!({"enum": [1, 2]});
    let s2 = json!({"type": "integer", "minimum": 0, "maximum": 5});
    let m = meet(&s1, &s2).unwrap();
    assert!(!is_uninhabited(&m).unwrap());
    assert!(is_subschema(&m, &s1).unwrap());
    assert!(is_subschema(&m, &s2).unwrap());
}

#[test]
fn test_all_of_equals_meet() {
    let a = json!({"type": "integer", "minimum": 0});
    let b = json!({"type": "integer", "maximum": 10});
    let all_of = json!({"allOf": [a.clone(), b.clone()]});
    let via_meet = meet(&a, &b).unwrap();
    assert!(is_subschema(&all_of, &via_meet).unwrap());
    assert!(is_subschema(&via_meet, &all_of).unwrap());
}
