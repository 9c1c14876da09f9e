//! Smoke test to verify basic functionality

use dmn_search::{load_tables, search_rules, DocumentFormat, SearchRequest};

#[test]
fn smoke_test_load_and_search() {
    let tables = load_tables(
        r#"
id: smoke
inputs:
  - id: i0
    expression_text: a
rules:
  - id: R1
    input_entries: ["true"]
  - id: R2
    input_entries: ["false"]
"#,
        DocumentFormat::Yaml,
    )
    .unwrap();

    let table = &tables[0];
    let columns = table.columns();
    // Basic sanity checks
    assert_eq!(columns.len(), 2);
    let hits = search_rules(
        Some(table.rules.as_slice()),
        &columns,
        false,
        &SearchRequest::term("TRUE"),
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "R1");
}
