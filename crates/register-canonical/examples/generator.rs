use register_canonical::{Canonicalizer, ContentHash, FieldCatalog, RawRecord};

fn main() {
    let mut catalog = FieldCatalog::new();
    for (name, cardinality, datatype) in [
        ("country", "1", "string"),
        ("name", "1", "string"),
        ("citizen-names", "n", "string"),
        ("end-date", "1", "datetime"),
    ] {
        catalog
            .insert_tags(name, cardinality, datatype)
            .expect("valid metadata");
    }
    let canonicalizer = Canonicalizer::new(catalog);

    let record: RawRecord = [
        ("name", "United Kingdom"),
        ("end-date", ""),
        ("country", "GB"),
        ("citizen-names", "Briton;British citizen"),
    ]
    .into_iter()
    .collect();

    match canonicalizer.canonicalize(&record) {
        Ok(canonical) => {
            println!("{}", canonical);
            println!("{}", ContentHash::of_record(&canonical));
        }
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
