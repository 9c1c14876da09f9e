// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # dmn-search — search and replace over DMN decision tables
//!
//! Column-aware filtering and text substitution across the rule rows of a
//! decision table.
//!
//! ## Core Concept
//!
//! A decision table is a matrix: each **rule** is a row holding one cell per
//! input clause, one cell per output clause, and an optional annotation.
//! dmn-search addresses that matrix through **columns**:
//!
//! - **Classify** the clause lists into an ordered column list
//! - **Search** rules for a case-insensitive term, in all columns or one
//! - **Negate** a search to list the rules that do *not* match
//! - **Replace** text in the matching cells of a rule, counting touched cells
//! - **Find tables** of a model in which nothing matches
//!
//! ## Quick Start
//!
//! ```rust
//! use dmn_search::{
//!     replace_in_rule, search_rules, DecisionTable, DirectEditor, PatternOptions,
//!     ReplaceRequest, SearchRequest,
//! };
//!
//! let mut table = DecisionTable::from_yaml(r#"
//! id: greeting
//! inputs:
//!   - id: in_word
//!     expression_text: word
//! outputs:
//!   - id: out_reply
//! rules:
//!   - id: r1
//!     input_entries: ["Hallo"]
//!     output_entries: ["Hi"]
//!   - id: r2
//!     input_entries: ["alternative"]
//!     output_entries: ["Hallo"]
//! "#)?;
//!
//! let columns = table.columns();
//! let request = SearchRequest::term("hallo").in_column("out_reply");
//! let hits = search_rules(Some(table.rules.as_slice()), &columns, false, &request);
//! assert_eq!(hits.len(), 1);
//!
//! let replace = ReplaceRequest::new("hallo", "Moin");
//! let touched = replace_in_rule(
//!     &mut table.rules[1],
//!     &columns,
//!     &replace,
//!     &mut DirectEditor,
//!     PatternOptions::default(),
//! )?;
//! assert_eq!(touched, 1);
//! assert_eq!(table.rules[1].output_entries[0].text(), Some("Moin"));
//! # Ok::<(), dmn_search::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  DecisionTable (inputs, outputs, rules)                     │
//! │       │                                                     │
//! │       ├──► derive_columns(inputs, outputs) ──► Vec<Column>  │
//! │       │                                                     │
//! │       ├──► search_rules(rules, columns, negate, request)    │
//! │       │                               ──► Vec<&Rule>        │
//! │       │                                                     │
//! │       └──► replace_in_rule(rule, columns, request, editor)  │
//! │                                       ──► touched count     │
//! │                                                             │
//! │  [DecisionTable]                                            │
//! │       └──► search_tables_without_matches ──► Vec<&Table>   │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod replace;
pub mod search;
pub mod table;

// Re-exports
pub use column::{derive_columns, Column, ColumnFilter, ColumnKind, ANNOTATION_COLUMN_ID};
pub use config::SearchConfig;
pub use error::{Error, Result};
pub use replace::{
    compile_pattern, replace_in_rule, replace_in_rules, DirectEditor, Edit, EditTarget,
    PatternMode, PatternOptions, RecordingEditor, ReplaceRequest, ReplaceSummary, TableEditor,
};
pub use search::{
    contains_ignore_case, normalize_term, rule_matches, search_rules,
    search_tables_without_matches, SearchRequest,
};
pub use table::{
    load_tables, Cell, CellRef, DecisionModel, DecisionTable, DocumentFormat, InputClause,
    OutputClause, Rule, TableDocument,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
