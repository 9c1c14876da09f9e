//! Rule search
//!
//! Filters the rule rows of a decision table by a case-insensitive search
//! term, optionally restricted to one column and optionally negated.
//!
//! ```rust
//! use dmn_search::{search_rules, DecisionTable, SearchRequest};
//!
//! let table = DecisionTable::from_yaml(r#"
//! id: t
//! inputs: [{ id: i0, expression_text: word }]
//! rules:
//!   - { id: r1, input_entries: ["Hallo"] }
//!   - { id: r2, input_entries: ["Huch"] }
//! "#).unwrap();
//!
//! let request = SearchRequest::term(" huCH ");
//! let hits = search_rules(Some(table.rules.as_slice()), &table.columns(), false, &request);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, "r2");
//! ```

use crate::column::{Column, ColumnFilter, ColumnKind};
use crate::table::{Cell, DecisionTable, Rule};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A search over the rules of one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchRequest {
    /// Search term; empty or absent matches every rule
    #[serde(default)]
    pub term: Option<String>,

    /// Restrict the search to this column; absent searches all columns
    #[serde(default, alias = "columnId")]
    pub column_id: Option<String>,
}

impl SearchRequest {
    /// Search all columns for `term`
    pub fn term(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            column_id: None,
        }
    }

    /// Restrict the search to one column
    pub fn in_column(mut self, column_id: impl Into<String>) -> Self {
        self.column_id = Some(column_id.into());
        self
    }

    /// The trimmed, lower-cased term, or `None` when there is nothing to search for
    pub fn needle(&self) -> Option<String> {
        normalize_term(self.term.as_deref())
    }
}

/// Trim and lower-case a search term; empty terms normalize to `None`
pub fn normalize_term(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}

/// Case-insensitive substring test
///
/// An absent or empty needle is contained in everything, including absent
/// text. Absent text contains no non-empty needle.
pub fn contains_ignore_case(text: Option<&str>, needle: Option<&str>) -> bool {
    match (text, needle) {
        (_, None) => true,
        (_, Some("")) => true,
        (None, Some(_)) => false,
        (Some(text), Some(needle)) => text.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Whether any cell of `rule` inside `filter` contains `needle`
pub fn rule_matches(rule: &Rule, filter: &ColumnFilter, needle: &str) -> bool {
    cells_match(&rule.input_entries, ColumnKind::Input, filter, needle)
        || cells_match(&rule.output_entries, ColumnKind::Output, filter, needle)
        || (filter.accepts(None, ColumnKind::Annotation)
            && contains_ignore_case(rule.annotation.as_deref(), Some(needle)))
}

fn cells_match(cells: &[Cell], kind: ColumnKind, filter: &ColumnFilter, needle: &str) -> bool {
    cells.iter().enumerate().any(|(i, cell)| {
        filter.accepts(Some(i), kind) && contains_ignore_case(cell.text(), Some(needle))
    })
}

/// Filter rules by a search request
///
/// Returns the matching rules in their original order, or the non-matching
/// ones when `negate` is set. An empty term matches every rule, so negating
/// it yields nothing. Absent `rules` yield nothing.
pub fn search_rules<'a>(
    rules: Option<&'a [Rule]>,
    columns: &[Column],
    negate: bool,
    request: &SearchRequest,
) -> Vec<&'a Rule> {
    let Some(rules) = rules else {
        return Vec::new();
    };

    let Some(needle) = request.needle() else {
        return if negate { Vec::new() } else { rules.iter().collect() };
    };

    let filter = ColumnFilter::resolve(request.column_id.as_deref(), columns);
    let result: Vec<&Rule> = rules
        .iter()
        .filter(|rule| rule_matches(rule, &filter, &needle) != negate)
        .collect();

    tracing::debug!(
        needle = %needle,
        filter = %filter,
        negate,
        matched = result.len(),
        total = rules.len(),
        "searched rules"
    );

    result
}

/// Tables in which no rule matches the request
pub fn search_tables_without_matches<'a>(
    tables: &'a [DecisionTable],
    request: &SearchRequest,
) -> Vec<&'a DecisionTable> {
    tables
        .iter()
        .filter(|table| {
            search_rules(Some(table.rules.as_slice()), &table.columns(), false, request).is_empty()
        })
        .collect()
}
