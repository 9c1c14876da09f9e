//! Search CLI commands: columns, search, unmatched

use super::util::{check_column, flag_value, has_flag, load_document, positional};
use dmn_search::*;

pub fn cmd_columns(args: &[String]) -> Result<()> {
    let files = positional(args);
    let Some(path) = files.first() else {
        return Err("Usage: dmnsearch columns <table.yaml> [--json]".into());
    };
    let (document, _) = load_document(path)?;

    if has_flag(args, "--json") {
        let tables: Vec<_> = document
            .tables()
            .iter()
            .map(|t| serde_json::json!({ "id": t.id, "columns": t.columns() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    for table in document.tables() {
        println!("{}", table.name.as_deref().unwrap_or(&table.id));
        for column in table.columns() {
            let index = column.index.map(|i| i.to_string()).unwrap_or_else(|| "-".into());
            println!("  {:<10} {:>3}  {:<20} {}", column.kind, index, column.id, column.label);
        }
    }
    Ok(())
}

pub fn cmd_search(args: &[String]) -> Result<()> {
    let files = positional(args);
    if files.is_empty() {
        return Err(
            "Usage: dmnsearch search <table.yaml> [term] [--column <id>] [--negate] [--json]"
                .into(),
        );
    }
    let path = files[0];
    let request = SearchRequest {
        term: files.get(1).map(|t| t.to_string()),
        column_id: flag_value(args, &["--column", "-c"]),
    };
    let negate = has_flag(args, "--negate");

    let (document, _) = load_document(path)?;
    check_column(&document, request.column_id.as_deref())?;

    let results: Vec<(&DecisionTable, Vec<&Rule>)> = document
        .tables()
        .iter()
        .map(|t| {
            let hits = search_rules(Some(t.rules.as_slice()), &t.columns(), negate, &request);
            (t, hits)
        })
        .collect();

    if has_flag(args, "--json") {
        let output: Vec<_> = results
            .iter()
            .map(|(table, hits)| {
                serde_json::json!({
                    "table": table.id,
                    "total": table.rules.len(),
                    "rules": hits.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (table, hits) in &results {
        println!(
            "{}: {} of {} rule(s)",
            table.id,
            hits.len(),
            table.rules.len()
        );
        for rule in hits {
            println!("  {}  {}", rule.id, row_preview(rule));
        }
    }
    Ok(())
}

pub fn cmd_unmatched(args: &[String]) -> Result<()> {
    let files = positional(args);
    let term = flag_value(args, &["--term"]);
    let (files, term) = match term {
        Some(term) => (files, term),
        None => match files.split_last() {
            Some((term, files)) if !files.is_empty() => (files.to_vec(), term.to_string()),
            _ => {
                return Err(
                    "Usage: dmnsearch unmatched <table.yaml>... <term> [--column <id>] [--json]"
                        .into(),
                )
            }
        },
    };
    let request = SearchRequest {
        term: Some(term),
        column_id: flag_value(args, &["--column", "-c"]),
    };

    let mut tables = Vec::new();
    for path in &files {
        let (document, _) = load_document(path)?;
        tables.extend(document.tables().iter().cloned());
    }

    let unmatched = search_tables_without_matches(&tables, &request);

    if has_flag(args, "--json") {
        let ids: Vec<_> = unmatched.iter().map(|t| t.id.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&ids)?);
        return Ok(());
    }

    if unmatched.is_empty() {
        println!("✓ Every table has a matching rule");
    } else {
        for table in unmatched {
            println!("✗ {}", table.name.as_deref().unwrap_or(&table.id));
        }
    }
    Ok(())
}

/// One-line rendering of a rule row: inputs | outputs | annotation
fn row_preview(rule: &Rule) -> String {
    let join = |cells: &[Cell]| {
        cells
            .iter()
            .map(|c| c.text().unwrap_or("-"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut preview = format!("{} | {}", join(&rule.input_entries), join(&rule.output_entries));
    if let Some(annotation) = &rule.annotation {
        preview.push_str(" | ");
        preview.push_str(annotation);
    }
    preview
}
