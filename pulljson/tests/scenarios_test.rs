use pulljson::{JsonReader, Number, Reader};

#[test]
fn scenario_1_nested_array_walk() {
    let mut r = Reader::from_str(r#"{"a": [1, 2.5, true]}"#);
    r.expect_object().unwrap();
    assert_eq!(r.next_key().unwrap(), Some("a"));
    r.expect_array().unwrap();
    assert!(r.has_next().unwrap());
    assert_eq!(r.expect_int().unwrap(), 1);
    assert!(r.has_next().unwrap());
    assert_eq!(r.expect_double().unwrap(), 2.5);
    assert!(r.has_next().unwrap());
    assert!(r.expect_bool().unwrap());
    assert!(!r.has_next().unwrap());
    assert_eq!(r.next_key().unwrap(), None);
}

#[test]
fn scenario_2_try_key_skips_past_unmatched_candidates() {
    let mut r = Reader::from_str(r#"{"aab":"aab"}"#);
    r.expect_object().unwrap();
    assert_eq!(r.try_key(&["aac", "bab"]).unwrap(), None);
    assert_eq!(r.try_key(&["aab"]).unwrap(), Some("aab"));
    assert_eq!(r.try_string_matching(&["aab"]).unwrap(), Some("aab"));
    r.end_object().unwrap();
}

#[test]
fn scenario_3_skip_object_entry_and_try_key_interleave() {
    let mut r = Reader::from_str(r#"[{"a":["test"],"b":42,"c":"str"},37]"#);
    r.expect_array().unwrap();
    assert!(r.has_next().unwrap());
    r.expect_object().unwrap();
    assert_eq!(r.try_key(&["a", "c"]).unwrap(), Some("a"));
    r.skip_any_value().unwrap();
    assert_eq!(r.try_key(&["a", "c"]).unwrap(), None);
    assert!(r.skip_object_entry().unwrap());
    assert_eq!(r.try_key(&["a", "c"]).unwrap(), Some("c"));
    r.skip_any_value().unwrap();
    assert!(!r.skip_object_entry().unwrap());
    assert!(r.has_next().unwrap());
    assert_eq!(r.expect_int().unwrap(), 37);
    assert!(!r.has_next().unwrap());
}

#[test]
fn scenario_4_escape_sequence_decoding() {
    let mut r = Reader::from_str("\"\\b\\t\\n\\r\\f\\\\\\\"\\/\u{fffd}\"");
    assert_eq!(r.expect_string().unwrap(), "\u{8}\t\n\r\u{c}\\\"/\u{fffd}");
}

#[test]
fn scenario_5_tree_writer_shape() {
    use pulljson::{TreeWriter, Value};
    use pulljson::JsonSink;

    let mut w = TreeWriter::new();
    w.start_object().unwrap();
    w.add_key("x").unwrap();
    w.start_array().unwrap();
    w.add_number(Number::Int(1)).unwrap();
    w.add_number(Number::Double(2.5)).unwrap();
    w.add_bool(true).unwrap();
    w.end_array().unwrap();
    w.add_key("y").unwrap();
    w.add_number(Number::Int(1)).unwrap();
    w.end_object().unwrap();

    let Value::Object(map) = w.into_value().unwrap() else { panic!("expected an object") };
    assert_eq!(
        map.get("x"),
        Some(&Value::Array(vec![
            Value::Number(Number::Int(1)),
            Value::Number(Number::Double(2.5)),
            Value::Bool(true),
        ]))
    );
    assert_eq!(map.get("y"), Some(&Value::Number(Number::Int(1))));
}

#[test]
fn scenario_6_large_integer_roundtrips_via_source_slice() {
    use pulljson::{JsonSink, SourceSlice, Writer};

    let mut r = Reader::from_str(r#"{"x":123456789123456789123456789123456789}"#);
    let mut out = String::new();
    let mut w = Writer::compact(&mut out);

    r.expect_object().unwrap();
    let key = r.next_key().unwrap().unwrap();
    w.start_object().unwrap();
    w.add_key(key).unwrap();
    let lexeme = r.expect_any_value_source().unwrap();
    w.add_source_value(SourceSlice::Str(lexeme)).unwrap();
    assert_eq!(r.next_key().unwrap(), None);
    w.end_object().unwrap();

    assert_eq!(out, r#"{"x":123456789123456789123456789123456789}"#);
}
