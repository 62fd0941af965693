//! The three readers must produce identical observable behavior for every well-formed input: the
//! same sequence of classifications, key strings, numeric values, and boolean/null results.

use pulljson::{JsonReader, Number, Reader, TreeWriter, Value};

fn parse_to_tree(source: &str) -> Value {
    let mut reader = Reader::from_str(source);
    let mut tree = TreeWriter::new();
    reader.expect_any_value(&mut tree).unwrap();
    tree.into_value().unwrap()
}

/// A trace of every classification/consumption `walk` performs, independent of which backend
/// produced it, so traces from different backends can be compared directly.
#[derive(Debug, PartialEq)]
enum Event {
    Key(String),
    Str(String),
    Num(Number),
    Bool(bool),
    Null,
    ArrayStart,
    ArrayEnd,
    ObjectStart,
    ObjectEnd,
}

fn walk<'a>(reader: &mut impl JsonReader<'a>, out: &mut Vec<Event>) {
    if reader.check_array() {
        reader.expect_array().unwrap();
        out.push(Event::ArrayStart);
        while reader.has_next().unwrap() {
            walk(reader, out);
        }
        out.push(Event::ArrayEnd);
    } else if reader.check_object() {
        reader.expect_object().unwrap();
        out.push(Event::ObjectStart);
        while let Some(key) = reader.next_key().unwrap() {
            out.push(Event::Key(key.to_owned()));
            walk(reader, out);
        }
        out.push(Event::ObjectEnd);
    } else if reader.check_string() {
        out.push(Event::Str(reader.expect_string().unwrap().to_owned()));
    } else if reader.check_num() {
        out.push(Event::Num(reader.expect_num().unwrap()));
    } else if reader.check_bool() {
        out.push(Event::Bool(reader.expect_bool().unwrap()));
    } else if reader.check_null() {
        reader.expect_null().unwrap();
        out.push(Event::Null);
    } else {
        panic!("unrecognized value");
    }
}

const SAMPLES: &[&str] = &[
    r#"{"a":1,"b":[true,false,null],"c":{"nested":"value","again":2.5}}"#,
    r#"[1,2.5,-3,"str",null,true,{"k":[]}]"#,
    r#""plain string with spaces""#,
    r#"-17.5e3"#,
    r#"{}"#,
    r#"[[[1]]]"#,
];

#[test]
fn text_byte_and_tree_readers_agree_on_every_sample() {
    for &sample in SAMPLES {
        let mut text_trace = Vec::new();
        walk(&mut Reader::from_str(sample), &mut text_trace);

        let mut byte_trace = Vec::new();
        walk(&mut Reader::from_slice(sample.as_bytes()), &mut byte_trace);
        assert_eq!(text_trace, byte_trace, "text vs byte backend differ for {sample}");

        let tree = parse_to_tree(sample);
        let mut tree_trace = Vec::new();
        walk(&mut Reader::from_value(&tree), &mut tree_trace);
        assert_eq!(text_trace, tree_trace, "text vs tree backend differ for {sample}");
    }
}

#[test]
fn check_x_is_idempotent_without_advancing() {
    let mut r = Reader::from_str(r#"{"a":1}"#);
    assert!(r.check_object());
    assert!(r.check_object());
    r.expect_object().unwrap();
    assert_eq!(r.next_key().unwrap(), Some("a"));
    assert!(r.check_int());
    assert!(r.check_int());
    assert_eq!(r.expect_int().unwrap(), 1);
}

#[test]
fn copy_lets_original_and_copy_advance_independently() {
    let mut r = Reader::from_str(r#"[1,2,3]"#);
    r.expect_array().unwrap();
    assert!(r.has_next().unwrap());
    assert_eq!(r.expect_int().unwrap(), 1);

    let mut snapshot = r.copy();
    assert!(r.has_next().unwrap());
    assert_eq!(r.expect_int().unwrap(), 2);

    // The snapshot still sees element 2 next, unaffected by the original's advance.
    assert!(snapshot.has_next().unwrap());
    assert_eq!(snapshot.expect_int().unwrap(), 2);
}
