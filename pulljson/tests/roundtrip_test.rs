//! Round-trip laws from the testable-properties section: text reader -> sink-processor -> tree
//! builder matches `serde_json`'s own parse (used only as a test oracle); tree -> compact writer
//! reproduces `serde_json`'s compact re-serialization; byte-writer/byte-reader round-trips are the
//! identity on structure for each output encoding.

use pulljson::{ByteWriter, Encoding, JsonReader, JsonSink, Reader, StringWriter, TreeWriter, Value, Number};

fn feed_into_sink<'a, R: JsonReader<'a>>(reader: &mut R, sink: &mut dyn JsonSink) {
    reader.expect_any_value(sink).unwrap();
}

fn to_oracle(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::Int(i))
            } else {
                Value::Number(Number::Double(n.as_f64().unwrap()))
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::Array(items.iter().map(to_oracle).collect()),
        serde_json::Value::Object(map) => {
            let mut out = indexmap::IndexMap::new();
            for (k, v) in map {
                out.insert(k.clone(), to_oracle(v));
            }
            Value::Object(out)
        }
    }
}

const SAMPLES: &[&str] = &[
    r#"{"a":1,"b":[true,false,null],"c":{"nested":"value"}}"#,
    r#"[1,2.5,-3,"str",null,true,{"k":[]}]"#,
    r#""plain string""#,
    r#"42"#,
    r#"{"escaped":"line1\nline2\t\"quoted\""}"#,
    r#"{}"#,
    r#"[]"#,
];

#[test]
fn text_reader_through_tree_builder_matches_serde_json_oracle() {
    for &sample in SAMPLES {
        let mut reader = Reader::from_str(sample);
        let mut tree = TreeWriter::new();
        feed_into_sink(&mut reader, &mut tree);
        let built = tree.into_value().unwrap();

        let oracle: serde_json::Value = serde_json::from_str(sample).unwrap();
        assert_eq!(built, to_oracle(&oracle), "mismatch for {sample}");
    }
}

#[test]
fn tree_reader_through_compact_writer_matches_serde_json_compact_form() {
    for &sample in SAMPLES {
        let oracle: serde_json::Value = serde_json::from_str(sample).unwrap();
        let expected = serde_json::to_string(&oracle).unwrap();

        let value = to_oracle(&oracle);
        let mut reader = Reader::from_value(&value);
        let mut out = String::new();
        let mut writer = StringWriter::compact(&mut out);
        feed_into_sink(&mut reader, &mut writer);

        assert_eq!(out, expected, "mismatch for {sample}");
    }
}

#[test]
fn byte_writer_then_byte_reader_is_the_identity_on_structure() {
    for &sample in SAMPLES {
        for encoding in [Encoding::Ascii, Encoding::Latin1, Encoding::Utf8] {
            let mut reader = Reader::from_str(sample);
            let mut tree_before = TreeWriter::new();
            feed_into_sink(&mut reader, &mut tree_before);
            let before = tree_before.into_value().unwrap();

            let mut bytes = Vec::new();
            {
                let mut reader = Reader::from_value(&before);
                let mut writer = ByteWriter::new(&mut bytes, encoding);
                feed_into_sink(&mut reader, &mut writer);
            }

            let mut byte_reader = pulljson::SliceReader::new(&bytes);
            let mut tree_after = TreeWriter::new();
            feed_into_sink(&mut byte_reader, &mut tree_after);
            let after = tree_after.into_value().unwrap();

            assert_eq!(before, after, "round-trip mismatch for {sample} via {encoding:?}");
        }
    }
}
