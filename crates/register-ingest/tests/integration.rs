use register_canonical::{Canonicalizer, ContentHash, FieldCatalog};
use register_ingest::{
    load_field_catalog_file, IngestError, RecordSource, TsvSource, YamlSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

fn catalog() -> FieldCatalog {
    load_field_catalog_file(&data("field-records.json")).unwrap()
}

#[test]
fn test_field_records_fixture() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 12);
    assert!(catalog.contains("street"));
    assert!(catalog.contains("official-name"));
}

#[test]
fn test_tsv_rows_canonicalize_in_order() {
    let canonicalizer = Canonicalizer::new(catalog());
    let mut source = TsvSource::open(&data("country.tsv")).unwrap();
    canonicalizer
        .catalog()
        .check_names(source.header().iter().map(String::as_str))
        .unwrap();
    let order = source.order().clone();

    let mut canonical = Vec::new();
    while let Some(record) = source.next_record().unwrap() {
        canonical.push(canonicalizer.canonicalize_ordered(&record, &order).unwrap());
    }
    assert_eq!(source.rows_read(), 3);

    assert_eq!(
        canonical[0].as_str(),
        r#"{"citizen-names":"Briton;British citizen","country":"GB","name":"United Kingdom","official-name":"The United Kingdom of Great Britain and Northern Ireland"}"#
    );
    assert_eq!(
        ContentHash::of_record(&canonical[0]).hex(),
        "6b18693874513ba13da54d61aafa7cad0c8f5573f3431d6f1c04b07ddb27d6bb"
    );
    assert_eq!(
        canonical[1].as_str(),
        r#"{"citizen-names":"Czechoslovak","country":"CS","end-date":"1992-12-31","name":"Czechoslovakia","official-name":"Czechoslovak Republic"}"#
    );
    // Quoted cell, whitespace-only end-date.
    assert_eq!(
        ContentHash::of_record(&canonical[2]).hex(),
        "747dbb718cb9f9799852e7bf698c499e6b83fb1a46ec06dbd6087f35c1e955cc"
    );
}

#[test]
fn test_yaml_directory_in_file_name_order() {
    let canonicalizer = Canonicalizer::new(catalog());
    let mut source = YamlSource::from_dir(&data("register")).unwrap();
    assert_eq!(source.paths().len(), 2);

    let hashes: Vec<String> = source
        .records()
        .map(|record| {
            let record = record.unwrap();
            let canonical = canonicalizer.canonicalize(&record).unwrap();
            ContentHash::of_record(&canonical).to_string()
        })
        .collect();

    assert_eq!(
        hashes,
        vec![
            "sha256:2b4d6f919a4ae2eecdfc1e26996149b01a7a61cd792d70f15c31a40d777a6b83",
            "sha256:610bde42d3ae2ed3dd829263fe461542742a10ca33865d96d31ae043b242c300",
        ]
    );
}

#[test]
fn test_yaml_source_sorts_and_filters() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.yaml"), "name: b\n").unwrap();
    fs::write(dir.path().join("a.yaml"), "name: a\n").unwrap();
    fs::write(dir.path().join("c.yml"), "name: c\n").unwrap();
    fs::create_dir(dir.path().join("d.yaml")).unwrap();

    let mut source = YamlSource::from_dir(dir.path()).unwrap();
    let names: Vec<String> = source
        .records()
        .map(|r| r.unwrap().get("name").unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(source.current_path(), Some(dir.path().join("b.yaml").as_path()));
}

#[test]
fn test_yaml_unknown_key_is_caught_by_catalog() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("x.yaml"), "register: x\ncolour: red\n").unwrap();

    let catalog = catalog();
    let mut source = YamlSource::from_dir(dir.path()).unwrap();
    let record = source.next_record().unwrap().unwrap();
    let err = catalog.check_names(record.names()).unwrap_err();
    assert!(err.to_string().contains("colour"));
}

#[test]
fn test_missing_inputs() {
    assert!(matches!(
        TsvSource::open(Path::new("/nonexistent/data.tsv")),
        Err(IngestError::Io(_))
    ));
    assert!(matches!(
        YamlSource::from_dir(Path::new("/nonexistent/dir")),
        Err(IngestError::Io(_))
    ));
}
