use llsd::{decode_with, encode, Format, Kind, LlsdError, Value};

fn decode(text: &str) -> Result<Value, LlsdError> {
    decode_with(text.as_bytes(), Format::Xml)
}

fn doc(body: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><llsd>{body}</llsd>")
}

#[test]
fn empty_tag_defaults_matrix() {
    let cases: Vec<(&str, Value)> = vec![
        ("<undef/>", Value::Undefined),
        ("<boolean/>", Value::Boolean(false)),
        ("<integer/>", Value::Integer(0)),
        ("<real/>", Value::Real(0.0)),
        ("<uuid/>", Value::Uuid(uuid::Uuid::nil())),
        ("<string/>", Value::from("")),
        ("<date/>", Value::Date(llsd::value::epoch())),
        ("<uri/>", Value::uri("")),
        ("<binary/>", Value::Binary(vec![])),
        ("<array/>", Value::Array(vec![])),
        ("<map/>", Value::Map(Default::default())),
    ];
    for (body, expected) in cases {
        assert_eq!(decode(&doc(body)), Ok(expected), "body {body:?}");
        // Paired empty tags behave like self-closing ones
        let paired = body.replace("/>", ">").to_owned()
            + &body.replace('<', "</").replace("/>", ">");
        assert_eq!(
            decode(&doc(&paired)).unwrap().kind(),
            decode(&doc(body)).unwrap().kind(),
            "paired {paired:?}"
        );
    }
}

#[test]
fn boolean_spellings() {
    assert_eq!(decode(&doc("<boolean>1</boolean>")), Ok(Value::Boolean(true)));
    assert_eq!(
        decode(&doc("<boolean>true</boolean>")),
        Ok(Value::Boolean(true))
    );
    assert_eq!(decode(&doc("<boolean>0</boolean>")), Ok(Value::Boolean(false)));
    assert_eq!(
        decode(&doc("<boolean>false</boolean>")),
        Ok(Value::Boolean(false))
    );
}

#[test]
fn real_spellings() {
    assert!(matches!(
        decode(&doc("<real>nan</real>")),
        Ok(Value::Real(r)) if r.is_nan()
    ));
    assert!(matches!(
        decode(&doc("<real>NaN</real>")),
        Ok(Value::Real(r)) if r.is_nan()
    ));
    assert_eq!(
        decode(&doc("<real>-1.1123123E+50</real>")),
        Ok(Value::Real(-1.1123123e50))
    );
}

#[test]
fn integer_ignores_leading_zeros() {
    assert_eq!(
        decode(&doc("<integer>007</integer>")),
        Ok(Value::Integer(7))
    );
}

#[test]
fn uuid_element() {
    let v = decode(&doc("<uuid>97f4aeca-88a1-42a1-b385-b97b18abb255</uuid>")).unwrap();
    assert_eq!(v.kind(), Kind::Uuid);
    assert_eq!(v.as_string(), "97f4aeca-88a1-42a1-b385-b97b18abb255");
}

#[test]
fn string_escaping_round_trip() {
    for s in ["a<b>c&d'e\"f", "plain", "☃ unicode 😀", " padded "] {
        let bytes = encode(&Value::from(s), Format::Xml);
        assert_eq!(
            decode_with(&bytes, Format::Xml),
            Ok(Value::from(s)),
            "string {s:?}"
        );
    }
}

#[test]
fn binary_base64_with_wrapped_lines() {
    let body = "<binary encoding=\"base64\">AAEC\n AwQF </binary>";
    assert_eq!(
        decode(&doc(body)),
        Ok(Value::Binary(vec![0, 1, 2, 3, 4, 5]))
    );
}

#[test]
fn unsupported_binary_encoding_is_distinct_error() {
    assert_eq!(
        decode(&doc("<binary encoding=\"base85\">x</binary>")),
        Err(LlsdError::UnsupportedEncoding("base85".into()))
    );
}

#[test]
fn map_and_array_nesting_round_trip() {
    let mut inner = std::collections::HashMap::new();
    inner.insert("id".to_owned(), Value::Integer(1));
    inner.insert("tags".to_owned(), Value::Array(vec![Value::from("a"), Value::from("b")]));
    let mut outer = std::collections::HashMap::new();
    outer.insert("payload".to_owned(), Value::Map(inner));
    outer.insert("ok".to_owned(), Value::Boolean(true));
    let value = Value::Map(outer);

    let bytes = encode(&value, Format::Xml);
    assert_eq!(decode_with(&bytes, Format::Xml), Ok(value));
}

#[test]
fn unknown_and_misplaced_elements_fail() {
    assert_eq!(
        decode(&doc("<widget/>")),
        Err(LlsdError::UnexpectedElement("widget".into()))
    );
    // A value element where a <key> belongs
    assert!(decode(&doc("<map><integer>1</integer></map>")).is_err());
    // Nested element inside a scalar
    assert!(decode(&doc("<string><b>x</b></string>")).is_err());
}

#[test]
fn surrounding_whitespace_and_comments_are_ignored() {
    let text = "\n<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- capability response -->\n<llsd>\n  <integer>3</integer>\n</llsd>\n";
    assert_eq!(decode(text), Ok(Value::Integer(3)));
}
