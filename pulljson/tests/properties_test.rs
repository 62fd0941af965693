//! Property tests for candidate matching and the structural validator, using `proptest` to
//! generate inputs the way `kallsyms-gasp` (this pack's other `proptest` consumer) does.

use proptest::prelude::*;
use pulljson::{JsonReader, Reader, ValidatingSink, JsonSink, Number, TreeWriter};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sorted_candidates(mut words: Vec<String>) -> Vec<String> {
    words.sort();
    words.dedup();
    words
}

proptest! {
    /// `try_key` on a sorted candidate list returns the candidate equal to the next key iff one is
    /// present (with no escapes), leaving the cursor at the key on a miss.
    #[test]
    fn try_key_matches_iff_key_is_a_candidate(
        key in "[a-z]{1,6}",
        other_candidates in prop::collection::vec("[a-z]{1,6}", 0..5),
    ) {
        init_logging();

        let mut candidates = other_candidates.clone();
        let with_match = {
            let mut v = candidates.clone();
            v.push(key.clone());
            sorted_candidates(v)
        };
        let without_match = {
            candidates.retain(|c| c != &key);
            sorted_candidates(candidates)
        };

        let source = format!(r#"{{"{key}":1}}"#);
        let refs: Vec<&str> = with_match.iter().map(String::as_str).collect();
        let mut r = Reader::from_str(&source);
        r.expect_object().unwrap();
        prop_assert_eq!(r.try_key(&refs).unwrap(), Some(key.as_str()));

        if !without_match.contains(&key) {
            let refs: Vec<&str> = without_match.iter().map(String::as_str).collect();
            let mut r = Reader::from_str(&source);
            r.expect_object().unwrap();
            prop_assert_eq!(r.try_key(&refs).unwrap(), None);
            // cursor is untouched: the key is still readable as a plain next_key.
            prop_assert_eq!(r.next_key().unwrap(), Some(key.as_str()));
        }
    }

    /// Any well-formed sequence of sink events (built recursively from a small JSON-shape
    /// generator) is accepted end-to-end by `ValidatingSink` without error.
    #[test]
    fn validating_sink_accepts_every_well_formed_shape(shape in json_shape(3)) {
        init_logging();
        let mut sink = ValidatingSink::new(TreeWriter::new());
        emit_shape(&shape, &mut sink).unwrap();
        prop_assert!(sink.is_complete());
    }

    /// Ending a composite one level too early (before all its children have been emitted) is
    /// always rejected by the validator.
    #[test]
    fn validating_sink_rejects_premature_end_object(extra_key in "[a-z]{1,4}") {
        init_logging();
        let mut sink = ValidatingSink::new(TreeWriter::new());
        sink.start_object().unwrap();
        sink.add_key(&extra_key).unwrap();
        // A value is now required; ending the object here is structurally invalid.
        prop_assert!(sink.end_object().is_err());
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Null,
    Bool(bool),
    Num(i64),
    Str(String),
    Array(Vec<Shape>),
    Object(Vec<(String, Shape)>),
}

fn json_shape(depth: u32) -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        Just(Shape::Null),
        any::<bool>().prop_map(Shape::Bool),
        any::<i32>().prop_map(|n| Shape::Num(n as i64)),
        "[a-z]{0,8}".prop_map(Shape::Str),
    ];
    leaf.prop_recursive(depth, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Shape::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(Shape::Object),
        ]
    })
}

fn emit_shape(shape: &Shape, sink: &mut dyn JsonSink) -> Result<(), Box<dyn std::error::Error>> {
    match shape {
        Shape::Null => sink.add_null()?,
        Shape::Bool(b) => sink.add_bool(*b)?,
        Shape::Num(n) => sink.add_number(Number::Int(*n))?,
        Shape::Str(s) => sink.add_string(s)?,
        Shape::Array(items) => {
            sink.start_array()?;
            for item in items {
                emit_shape(item, sink)?;
            }
            sink.end_array()?;
        }
        Shape::Object(entries) => {
            sink.start_object()?;
            for (key, value) in entries {
                sink.add_key(key)?;
                emit_shape(value, sink)?;
            }
            sink.end_object()?;
        }
    }
    Ok(())
}
