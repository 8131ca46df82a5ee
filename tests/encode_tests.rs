use indexmap::IndexMap;
use serde::Serialize;
use serde_ini_codec::{
    encode, encode_full, encode_simple, ini, to_writer, EncodeOptions, Error, IniMap, SimpleMap,
    Value,
};
use std::collections::{BTreeMap, HashMap};
use std::io;

fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}

fn simple(sections: &[(&str, &[(&str, &str)])]) -> SimpleMap {
    sections
        .iter()
        .map(|(name, items)| {
            let items: IndexMap<String, String> = items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            (name.to_string(), items)
        })
        .collect()
}

#[test]
fn test_scalar_only_document_has_one_line_per_entry() {
    let doc = ini!({ "port": 8080, "name": "svc", "debug": false, "ratio": 0.75 });
    let out = text(encode_full(doc.as_section().unwrap(), None).unwrap());

    assert_eq!(out, "debug = false\nname = svc\nport = 8080\nratio = 0.75\n");
    assert!(!out.contains('['));
}

#[test]
fn test_section_headers_are_ascending_and_precede_their_entries() {
    let doc = ini!({
        "zulu": { "z": "1" },
        "alpha": { "a": "2" },
        "mike": { "m": 3 },
        "Bravo": { "B": true }
    });

    let out = text(encode(&doc, None).unwrap());

    let headers: Vec<&str> = out.lines().filter(|l| l.starts_with('[')).collect();
    assert_eq!(headers, vec!["[Bravo]", "[alpha]", "[mike]", "[zulu]"]);

    let mut current = "";
    for line in out.lines() {
        if line.starts_with('[') {
            current = line.trim_matches(|c| c == '[' || c == ']');
        } else if let Some((key, _)) = line.split_once(" = ") {
            assert!(current.starts_with(key), "{key} written under [{current}]");
        }
    }
}

#[test]
fn test_simple_mode_ignores_input_order() {
    let forward = simple(&[("a", &[("x", "1"), ("y", "2")]), ("b", &[("k", "v")])]);
    let reverse = simple(&[("b", &[("k", "v")]), ("a", &[("y", "2"), ("x", "1")])]);

    let first = encode_simple(&forward, None).unwrap();
    let second = encode_simple(&reverse, None).unwrap();
    assert_eq!(first, second);
    assert_eq!(text(first), "[a]\nx = 1\ny = 2\n\n[b]\nk = v\n\n");
}

#[test]
fn test_simple_mode_exact_output() {
    let doc = simple(&[("S", &[("a", "1"), ("b", "2")])]);
    assert_eq!(text(encode_simple(&doc, None).unwrap()), "[S]\na = 1\nb = 2\n\n");

    let mut nested = HashMap::new();
    nested.insert("S", HashMap::from([("b", "2"), ("a", "1")]));
    assert_eq!(text(encode(&nested, None).unwrap()), "[S]\na = 1\nb = 2\n\n");
}

#[test]
fn test_default_section_never_gets_a_header() {
    let simple_doc = simple(&[("main", &[("k", "v")]), ("aaa", &[("x", "y")])]);
    let out = text(encode_simple(&simple_doc, Some("main")).unwrap());
    assert!(!out.contains("[main]"));
    assert_eq!(out, "k = v\n\n[aaa]\nx = y\n\n");

    let full_doc = ini!({ "main": { "k": 1 }, "aaa": { "x": 2 }, "top": "t" });
    let out = text(encode_full(full_doc.as_section().unwrap(), Some("main")).unwrap());
    assert!(!out.contains("[main]"));
    assert_eq!(out, "k = 1\ntop = t\n[aaa]\nx = 2\n");
}

#[test]
fn test_integer_arrays_produce_no_lines() {
    #[derive(Serialize)]
    struct Ports {
        name: String,
        ports: Vec<u16>,
    }

    #[derive(Serialize)]
    struct Doc {
        listen: Vec<i64>,
        server: Ports,
    }

    let doc = Doc {
        listen: vec![1, 2, 3],
        server: Ports {
            name: "web".into(),
            ports: vec![80, 443],
        },
    };

    let out = text(encode(&doc, None).unwrap());
    assert_eq!(out, "[server]\nname = web\n");
    assert!(!out.contains("listen"));
    assert!(!out.contains("ports"));
}

#[test]
fn test_unsupported_shapes_are_skipped() {
    #[derive(Serialize)]
    struct Doc {
        missing: Option<String>,
        flags: Vec<bool>,
        pair: (u8, String),
        deep: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
        kept: String,
    }

    let mut deep = BTreeMap::new();
    deep.insert(
        "outer".to_string(),
        BTreeMap::from([("inner".to_string(), BTreeMap::new())]),
    );

    let doc = Doc {
        missing: None,
        flags: vec![true],
        pair: (1, "x".into()),
        deep,
        kept: "yes".into(),
    };

    assert_eq!(text(encode(&doc, None).unwrap()), "kept = yes\n[deep]\n");
}

#[test]
fn test_float_formatting() {
    #[derive(Serialize)]
    struct Numbers {
        a: f32,
        b: f64,
        c: f64,
        d: i64,
    }

    let out = text(
        encode(
            &Numbers {
                a: 0.1,
                b: 3.0,
                c: -2.5,
                d: i64::MIN,
            },
            None,
        )
        .unwrap(),
    );
    assert_eq!(out, "a = 0.1\nb = 3\nc = -2.5\nd = -9223372036854775808\n");
}

#[test]
fn test_values_are_not_escaped() {
    let doc = ini!({ "s": { "note": "line1\nline2", "eq": "a=b" } });
    let out = text(encode(&doc, None).unwrap());
    assert_eq!(out, "[s]\neq = a=b\nnote = line1\nline2\n\n");
}

#[test]
fn test_non_documents_are_rejected_without_output() {
    let mut out = Vec::new();
    let err = to_writer(&mut out, &vec![1, 2, 3], &EncodeOptions::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidInputKind { .. }));
    assert!(out.is_empty());

    assert!(matches!(
        encode(&Value::from(true), None),
        Err(Error::InvalidInputKind { found: "boolean" })
    ));
    assert!(matches!(
        encode(&Option::<BTreeMap<String, String>>::None, None),
        Err(Error::InvalidInputKind { found: "null" })
    ));
}

#[test]
fn test_empty_documents_encode_to_nothing() {
    assert!(encode(&BTreeMap::<String, String>::new(), None).unwrap().is_empty());
    assert!(encode_full(&IniMap::new(), Some("main")).unwrap().is_empty());
    assert!(encode_simple(&SimpleMap::new(), None).unwrap().is_empty());
}

#[test]
fn test_sink_failures_surface_as_write_errors() {
    struct Full;

    impl io::Write for Full {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "no space"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let doc = ini!({ "s": { "k": "v" } });
    let err = to_writer(Full, &doc, &EncodeOptions::new()).unwrap_err();
    assert!(matches!(err, Error::Write(ref msg) if msg.contains("no space")));
}

#[test]
fn test_non_string_map_keys() {
    let mut doc = BTreeMap::new();
    doc.insert(1, "one");
    doc.insert(2, "two");
    assert_eq!(text(encode(&doc, None).unwrap()), "1 = one\n2 = two\n");

    let mut bad = BTreeMap::new();
    bad.insert((1, 2), "pair");
    assert!(matches!(encode(&bad, None), Err(Error::Custom(_))));
}
