//! Property-based tests for the roundtrip guarantees of the keyfile format
//!
//! Typed values are wrapped in a single group so every case goes through the
//! full document path: escaping, line scanning and field binding.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_keyfile::escape::{escape, join, split, unescape};
use num_complex::{Complex32, Complex64};
use serde_keyfile::{from_str, to_string, Document, Value};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Wrapper<T> {
    group: Field<T>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Field<T> {
    value: T,
}

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: T,
) -> bool {
    let wrapped = Wrapper {
        group: Field { value },
    };
    match to_string(&wrapped) {
        Ok(serialized) => match from_str::<Wrapper<T>>(&serialized) {
            Ok(deserialized) => wrapped == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

// Text without backslashes; surrounding whitespace is limited to what `\s` restores.
const TEXT: &str = "[a-zA-Z0-9 \t\n\r=#;,.\\[\\]-]{0,24}";

// Multiples of 1/8 are exact at both complex widths.
fn part() -> impl Strategy<Value = f64> {
    (-80_000i32..80_000).prop_map(|n| f64::from(n) / 8.0)
}

fn any_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::Integer),
        (-1e300f64..1e300f64).prop_map(Value::Float),
        (-1_000_000i32..1_000_000).prop_map(|n| Value::Float(f64::from(n))),
        any::<bool>().prop_map(Value::Bool),
        (part(), part()).prop_map(|(re, im)| Value::Complex(Complex64::new(re, im))),
        "[a-zA-Z ,;]{0,12}"
            .prop_filter("text that infers as another variant", |s| {
                Value::infer(s) == Value::String(s.clone())
            })
            .prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(b));
    }

    #[test]
    fn prop_f64(f in -1e300f64..1e300f64) {
        prop_assert!(roundtrip(f));
    }

    #[test]
    fn prop_f32(f in -1e30f32..1e30f32) {
        prop_assert!(roundtrip(f));
    }

    #[test]
    fn prop_integral_f64(n in any::<i32>()) {
        prop_assert!(roundtrip(f64::from(n)));
    }

    #[test]
    fn prop_complex64(re in part(), im in part()) {
        prop_assert!(roundtrip(Complex64::new(re, im)));
    }

    #[test]
    fn prop_complex32(re in part(), im in part()) {
        prop_assert!(roundtrip(Complex32::new(re as f32, im as f32)));
    }

    #[test]
    fn prop_value(value in any_value()) {
        prop_assert!(roundtrip(value));
    }

    #[test]
    fn prop_string(s in TEXT) {
        prop_assert!(roundtrip(s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(v));
    }

    #[test]
    fn prop_vec_string(v in prop::collection::vec("[a-z0-9;]{1,6}", 0..10)) {
        prop_assert!(roundtrip(v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(opt));
    }

    #[test]
    fn prop_option_string(opt in proptest::option::of("[a-z]{1,8}")) {
        prop_assert!(roundtrip(opt));
    }

    #[test]
    fn prop_locale_map(map in prop::collection::btree_map("[a-z]{0,2}(_[A-Z]{2})?", "[a-z ]{1,8}[a-z]", 0..6)) {
        prop_assert!(roundtrip(map));
    }

    #[test]
    fn prop_integer_infers_as_integer(n in any::<i64>()) {
        prop_assert_eq!(Value::infer(&n.to_string()), Value::Integer(n));
    }

    #[test]
    fn prop_bool_any_case(s in "[tT][rR][uU][eE]|[fF][aA][lL][sS][eE]") {
        let expected = s.eq_ignore_ascii_case("true");
        prop_assert_eq!(Value::infer(&s), Value::Bool(expected));
    }

    #[test]
    fn prop_escape_roundtrip(s in "[a-zA-Z0-9 \t\n\r=#;,.äöü€-]{0,32}") {
        prop_assert_eq!(unescape(&escape(&s)), s);
    }

    #[test]
    fn prop_escaped_value_is_one_line(s in "[a-zA-Z0-9 \t\n\r=#;,.äöü€-]{0,32}") {
        let escaped = escape(&s);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
    }

    #[test]
    fn prop_split_join_roundtrip(
        items in prop::collection::vec("[a-z;, ]{0,8}", 2..6),
        sep in prop::sample::select(vec![";", ",", "::"]),
    ) {
        prop_assert_eq!(split(&join(&items, sep), sep), items);
    }

    #[test]
    fn prop_document_roundtrip(
        entries in prop::collection::vec(("[a-z]{1,6}", "[A-Za-z]{1,6}", TEXT), 0..12)
    ) {
        let mut doc = Document::new();
        for (group, key, value) in &entries {
            doc.insert(group, key, "", value);
        }
        let reparsed = Document::parse(&doc.to_string()).unwrap();
        let original: BTreeMap<_, _> = doc.entries().map(|e| ((e.group, e.key), e.value)).collect();
        let restored: BTreeMap<_, _> = reparsed.entries().map(|e| ((e.group, e.key), e.value)).collect();
        prop_assert_eq!(original, restored);
    }
}
