//! Property-based tests for the ordering and skip guarantees of the encoders.

use indexmap::IndexMap;
use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_ini_codec::{encode_full, encode_simple, from_str, to_string, IniMap, SimpleMap, Value};

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{0,12}"
}

fn simple_doc() -> impl Strategy<Value = SimpleMap> {
    prop::collection::btree_map(
        name(),
        prop::collection::btree_map(name(), text(), 0..5),
        0..5,
    )
    .prop_map(|sections| {
        sections
            .into_iter()
            .map(|(name, items)| (name, items.into_iter().collect::<IndexMap<_, _>>()))
            .collect()
    })
}

fn reversed(doc: &SimpleMap) -> SimpleMap {
    doc.iter()
        .rev()
        .map(|(name, items)| {
            let items: IndexMap<String, String> =
                items.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect();
            (name.clone(), items)
        })
        .collect()
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Record {
    id: u32,
    offset: i64,
    enabled: bool,
    label: String,
    #[serde(default)]
    tags: Vec<String>,
}

proptest! {
    #[test]
    fn prop_simple_mode_is_order_independent(doc in simple_doc()) {
        let forward = encode_simple(&doc, None).unwrap();
        let backward = encode_simple(&reversed(&doc), None).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn prop_section_headers_are_strictly_ascending(doc in simple_doc()) {
        let out = String::from_utf8(encode_simple(&doc, None).unwrap()).unwrap();
        let headers: Vec<&str> = out
            .lines()
            .filter_map(|l| l.strip_prefix('[').and_then(|l| l.strip_suffix(']')))
            .collect();
        prop_assert_eq!(headers.len(), doc.len());
        prop_assert!(headers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_default_section_has_no_header(doc in simple_doc(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!doc.is_empty());
        let default = doc.get_index(pick.index(doc.len())).map(|(name, _)| name.clone()).unwrap();

        let out = String::from_utf8(encode_simple(&doc, Some(default.as_str())).unwrap()).unwrap();
        let header = format!("[{}]", default);
        prop_assert!(!out.lines().any(|l| l == header));
    }

    #[test]
    fn prop_integer_arrays_are_absent(
        key in "int_[a-z]{1,6}",
        ints in prop::collection::vec(any::<i64>(), 0..6),
        label in "[A-Z0-9]{0,8}",
    ) {
        let mut section = IniMap::new();
        section.insert(key.clone(), Value::Integers(ints.clone()));
        section.insert("label".to_string(), Value::String(label));

        let mut doc = IniMap::new();
        doc.insert(key.clone(), Value::Integers(ints));
        doc.insert("s".to_string(), Value::Section(section));

        let out = String::from_utf8(encode_full(&doc, None).unwrap()).unwrap();
        prop_assert!(!out.contains(&key));
    }

    #[test]
    fn prop_struct_round_trip(
        id in any::<u32>(),
        offset in any::<i64>(),
        enabled in any::<bool>(),
        label in "[a-zA-Z0-9_.-]{1,12}",
        tags in prop::collection::vec("[a-z0-9]{1,6}", 0..4),
    ) {
        let record = Record { id, offset, enabled, label, tags };
        let ini = to_string(&record).unwrap();
        let back: Record = from_str(&ini).unwrap();
        prop_assert_eq!(back, record);
    }
}
