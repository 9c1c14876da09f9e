//! Column classification
//!
//! Derives the ordered list of searchable columns of a decision table from
//! its clause lists, and resolves a column id into the predicate that
//! restricts search and replace to that column.
//!
//! Column order is fixed: all output columns, then all input columns, then
//! the single annotation column. Display code relies on this order.

use crate::table::{InputClause, OutputClause};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id of the annotation pseudo-column
pub const ANNOTATION_COLUMN_ID: &str = "description";

/// Label of the annotation pseudo-column
pub const ANNOTATION_COLUMN_LABEL: &str = "Annotation";

/// Kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnKind {
    Input,
    Output,
    Annotation,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ColumnKind::Input => "INPUT",
            ColumnKind::Output => "OUTPUT",
            ColumnKind::Annotation => "ANNOTATION",
        })
    }
}

/// One addressable column of a rule matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Clause id, or `"description"` for the annotation column
    pub id: String,

    /// Display label
    pub label: String,

    /// Position within the columns of the same kind (`None` for the annotation)
    pub index: Option<usize>,

    pub kind: ColumnKind,
}

impl Column {
    /// The annotation pseudo-column
    pub fn annotation() -> Self {
        Self {
            id: ANNOTATION_COLUMN_ID.to_string(),
            label: ANNOTATION_COLUMN_LABEL.to_string(),
            index: None,
            kind: ColumnKind::Annotation,
        }
    }
}

/// Derive the searchable columns of a table
///
/// Outputs come first, then inputs, then the annotation column. Labels fall
/// back to the input expression text or the output clause id when unset.
pub fn derive_columns(inputs: &[InputClause], outputs: &[OutputClause]) -> Vec<Column> {
    let mut columns = Vec::with_capacity(inputs.len() + outputs.len() + 1);

    columns.extend(outputs.iter().enumerate().map(|(i, clause)| Column {
        id: clause.id.clone(),
        label: non_empty(clause.name.as_deref()).unwrap_or(&clause.id).to_string(),
        index: Some(i),
        kind: ColumnKind::Output,
    }));

    columns.extend(inputs.iter().enumerate().map(|(i, clause)| Column {
        id: clause.id.clone(),
        label: non_empty(clause.label.as_deref())
            .unwrap_or(&clause.expression_text)
            .to_string(),
        index: Some(i),
        kind: ColumnKind::Input,
    }));

    columns.push(Column::annotation());
    columns
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

/// Column restriction applied while matching cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFilter {
    /// No restriction
    Any,
    /// Only the column at this position and kind
    Only {
        index: Option<usize>,
        kind: ColumnKind,
    },
    /// The requested column does not exist; nothing is accepted
    Nothing,
}

impl ColumnFilter {
    /// Resolve an optional column id against a column list
    pub fn resolve(column_id: Option<&str>, columns: &[Column]) -> Self {
        let Some(id) = column_id else {
            return ColumnFilter::Any;
        };

        match columns.iter().find(|c| c.id == id) {
            Some(column) => ColumnFilter::Only {
                index: column.index,
                kind: column.kind,
            },
            None => ColumnFilter::Nothing,
        }
    }

    /// Whether a cell at `(index, kind)` is inside the filter
    pub fn accepts(&self, index: Option<usize>, kind: ColumnKind) -> bool {
        match self {
            ColumnFilter::Any => true,
            ColumnFilter::Only {
                index: want_index,
                kind: want_kind,
            } => *want_index == index && *want_kind == kind,
            ColumnFilter::Nothing => false,
        }
    }
}

impl fmt::Display for ColumnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnFilter::Any => write!(f, "any"),
            ColumnFilter::Only {
                index: Some(i),
                kind,
            } => write!(f, "{}[{}]", kind, i),
            ColumnFilter::Only { index: None, kind } => write!(f, "{}", kind),
            ColumnFilter::Nothing => write!(f, "nothing"),
        }
    }
}
