use register_canonical::{
    CanonicalizationError, Canonicalizer, ContentHash, FieldCatalog, FieldOrder, RawRecord,
};

fn catalog(defs: &[(&str, &str, &str)]) -> FieldCatalog {
    let mut catalog = FieldCatalog::new();
    for (name, cardinality, datatype) in defs {
        catalog.insert_tags(*name, cardinality, datatype).unwrap();
    }
    catalog
}

fn row(names: &[&str], values: &[&str]) -> RawRecord {
    let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    RawRecord::from_row(&names, values.iter().map(|s| s.to_string()).collect())
}

#[test]
fn builds_json_with_escaped_quotes_and_arrays() {
    let canonicalizer = Canonicalizer::new(catalog(&[
        ("a", "1", "string"),
        ("b", "1", "string"),
        ("c", "n", "string"),
    ]));
    let record = row(&["c", "b", "a"], &["d;h", r#"e "f" g"#, "1"]);
    let order = FieldOrder::for_names(&["c", "b", "a"]);
    assert_eq!(order.indices(), &[2, 1, 0]);

    let canonical = canonicalizer.canonicalize_ordered(&record, &order).unwrap();
    assert_eq!(canonical.as_str(), r#"{"a":"1","b":"e \"f\" g","c":["d","h"]}"#);
    assert_eq!(
        ContentHash::of_record(&canonical).to_string(),
        "sha256:2bcd369959f4fd9768e44e20f43dd28cfc0e3942d7df4f3de448f9a037b30228"
    );
}

#[test]
fn builds_json_with_curies() {
    let canonicalizer = Canonicalizer::new(catalog(&[
        ("a", "1", "string"),
        ("b", "1", "curie"),
        ("c", "n", "curie"),
    ]));
    let record = row(&["c", "b", "a"], &["d:e;h:i", "j:k", "1"]);
    let canonical = canonicalizer.canonicalize(&record).unwrap();
    assert_eq!(canonical.as_str(), r#"{"a":"1","b":"j:k","c":["d:e","h:i"]}"#);
}

#[test]
fn ignores_whitespace_only_values() {
    let canonicalizer = Canonicalizer::new(catalog(&[
        ("a", "1", "string"),
        ("b", "1", "string"),
        ("c", "n", "string"),
    ]));
    let record = row(&["c", "b", "a"], &["d", "  ", "1"]);
    let canonical = canonicalizer.canonicalize(&record).unwrap();
    assert_eq!(canonical.as_str(), r#"{"a":"1","c":["d"]}"#);
}

#[test]
fn empty_record_is_empty_object() {
    let canonicalizer = Canonicalizer::new(catalog(&[("a", "1", "string")]));
    let record = row(&["a"], &[""]);
    let canonical = canonicalizer.canonicalize(&record).unwrap();
    assert_eq!(canonical.as_str(), "{}");
    assert_eq!(
        ContentHash::of_record(&canonical).hex(),
        "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
    );
}

#[test]
fn canonicalization_is_deterministic_across_input_orders() {
    let canonicalizer = Canonicalizer::new(catalog(&[
        ("fields", "n", "string"),
        ("phase", "1", "string"),
        ("register", "1", "string"),
        ("registry", "1", "string"),
        ("text", "1", "text"),
    ]));
    let forward = row(
        &["register", "text", "registry", "phase", "fields"],
        &["address", "Postal address", "office-for", "alpha", "address"],
    );
    let mut reversed_pairs = forward.fields().to_vec();
    reversed_pairs.reverse();
    let reversed = RawRecord::new(reversed_pairs);

    let a = canonicalizer.canonicalize(&forward).unwrap();
    let b = canonicalizer.canonicalize(&reversed).unwrap();
    let again = canonicalizer.canonicalize(&forward).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, again);
    assert_eq!(
        a.as_str(),
        r#"{"fields":["address"],"phase":"alpha","register":"address","registry":"office-for","text":"Postal address"}"#
    );
    assert_eq!(
        ContentHash::of_record(&a).hex(),
        "2b4d6f919a4ae2eecdfc1e26996149b01a7a61cd792d70f15c31a40d777a6b83"
    );
}

#[test]
fn unknown_field_is_rejected_not_dropped() {
    let canonicalizer = Canonicalizer::new(catalog(&[("a", "1", "string")]));
    let record = row(&["a", "d"], &["1", "x"]);
    match canonicalizer.canonicalize(&record) {
        Err(CanonicalizationError::UnknownField { field }) => assert_eq!(field, "d"),
        other => panic!("expected UnknownField, got {other:?}"),
    }
}

#[test]
fn numeric_lists_are_bare() {
    let canonicalizer = Canonicalizer::new(catalog(&[
        ("ids", "n", "integer"),
        ("name", "1", "string"),
    ]));
    let record = row(&["name", "ids"], &["x", "1;2;3"]);
    let canonical = canonicalizer.canonicalize(&record).unwrap();
    assert_eq!(canonical.as_str(), r#"{"ids":[1,2,3],"name":"x"}"#);
}
