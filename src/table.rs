//! Decision table types — the data model the engine searches
//!
//! A `DecisionTable` carries the clause lists that define its columns and
//! the rule rows whose cells are searched and rewritten. Only the fields the
//! search engine needs are modelled; this is not the DMN XML object model.
//!
//! ## Example Table
//!
//! ```yaml
//! id: greeting
//! name: "Greeting"
//! inputs:
//!   - id: in_word
//!     label: Word
//!     expression_text: word
//! outputs:
//!   - id: out_reply
//!     name: Reply
//! rules:
//!   - id: r1
//!     input_entries: ["\"Hallo\""]
//!     output_entries: ["\"Hi\""]
//!   - id: r2
//!     input_entries: ["\"Huch\""]
//!     output_entries: [null]
//!     annotation: "Ne Annotation"
//! ```

use crate::column::{derive_columns, Column, ColumnKind};
use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An input clause of a decision table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct InputClause {
    /// Clause identifier
    pub id: String,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Raw input expression text
    #[serde(default, alias = "expressionText")]
    pub expression_text: String,
}

/// An output clause of a decision table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OutputClause {
    /// Clause identifier
    pub id: String,

    /// Output name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One entry of a rule row
///
/// Serialized as the bare text (or `null`), so a rule reads like a row of
/// the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Cell {
    pub text: Option<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn empty() -> Self {
        Self { text: None }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::new(s)
    }
}

impl From<Option<&str>> for Cell {
    fn from(s: Option<&str>) -> Self {
        Self {
            text: s.map(str::to_string),
        }
    }
}

/// Positional reference to a cell within a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CellRef {
    /// `Input` or `Output`
    pub kind: ColumnKind,
    /// Position within the entries of that kind
    pub index: usize,
}

impl CellRef {
    pub fn input(index: usize) -> Self {
        Self {
            kind: ColumnKind::Input,
            index,
        }
    }

    pub fn output(index: usize) -> Self {
        Self {
            kind: ColumnKind::Output,
            index,
        }
    }
}

/// A row of a decision table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    /// Rule identifier
    pub id: String,

    /// Input entries, aligned with the table's input clauses
    #[serde(default, alias = "inputEntries")]
    pub input_entries: Vec<Cell>,

    /// Output entries, aligned with the table's output clauses
    #[serde(default, alias = "outputEntries")]
    pub output_entries: Vec<Cell>,

    /// Free-text annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Rule {
    /// Get a cell by reference
    pub fn cell(&self, cell: CellRef) -> Option<&Cell> {
        match cell.kind {
            ColumnKind::Input => self.input_entries.get(cell.index),
            ColumnKind::Output => self.output_entries.get(cell.index),
            ColumnKind::Annotation => None,
        }
    }

    /// Get a mutable cell by reference
    pub fn cell_mut(&mut self, cell: CellRef) -> Option<&mut Cell> {
        match cell.kind {
            ColumnKind::Input => self.input_entries.get_mut(cell.index),
            ColumnKind::Output => self.output_entries.get_mut(cell.index),
            ColumnKind::Annotation => None,
        }
    }
}

/// A decision table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Decision Table", description = "Decision table searched by dmn-search")]
#[serde(deny_unknown_fields)]
pub struct DecisionTable {
    /// Unique identifier
    pub id: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Input clauses
    #[serde(default)]
    pub inputs: Vec<InputClause>,

    /// Output clauses
    #[serde(default)]
    pub outputs: Vec<OutputClause>,

    /// Rule rows
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl DecisionTable {
    /// Parse a table from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Serialize the table to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_norway::to_string(self).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Parse a table from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Serialize the table to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Searchable columns of this table
    pub fn columns(&self) -> Vec<Column> {
        derive_columns(&self.inputs, &self.outputs)
    }

    /// Get a rule by ID
    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Get a mutable rule by ID
    pub fn rule_mut(&mut self, id: &str) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|r| r.id == id)
    }
}

/// A set of decision tables (one DMN model)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DecisionModel {
    /// Model identifier
    pub id: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Decision tables of the model
    pub tables: Vec<DecisionTable>,
}

/// On-disk document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension (YAML unless `.json`)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// A document holding either a whole model or a single table
///
/// A document with a top-level `tables` key is a model. Fields the types do
/// not know are rejected, so rendering a parsed document never drops data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableDocument {
    Model(DecisionModel),
    Table(DecisionTable),
}

impl TableDocument {
    /// Parse a document in the given format
    pub fn parse(content: &str, format: DocumentFormat) -> Result<Self> {
        let document = match format {
            DocumentFormat::Yaml => Self::parse_yaml(content),
            DocumentFormat::Json => Self::parse_json(content),
        };
        document.map_err(Error::TableParse)
    }

    fn parse_yaml(content: &str) -> std::result::Result<Self, String> {
        let value: serde_norway::Value =
            serde_norway::from_str(content).map_err(|e| e.to_string())?;
        let document = if value.get("tables").is_some() {
            serde_norway::from_str(content).map(TableDocument::Model)
        } else {
            serde_norway::from_str(content).map(TableDocument::Table)
        };
        document.map_err(|e| e.to_string())
    }

    fn parse_json(content: &str) -> std::result::Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        let document = if value.get("tables").is_some() {
            serde_json::from_str(content).map(TableDocument::Model)
        } else {
            serde_json::from_str(content).map(TableDocument::Table)
        };
        document.map_err(|e| e.to_string())
    }

    /// Serialize the document in the given format
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Yaml => {
                serde_norway::to_string(self).map_err(|e| Error::TableParse(e.to_string()))
            }
            DocumentFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| Error::TableParse(e.to_string()))
            }
        }
    }

    pub fn tables(&self) -> &[DecisionTable] {
        match self {
            TableDocument::Model(model) => &model.tables,
            TableDocument::Table(table) => std::slice::from_ref(table),
        }
    }

    pub fn tables_mut(&mut self) -> &mut [DecisionTable] {
        match self {
            TableDocument::Model(model) => &mut model.tables,
            TableDocument::Table(table) => std::slice::from_mut(table),
        }
    }
}

/// Parse the tables of a document, whether it holds a model or one table
pub fn load_tables(content: &str, format: DocumentFormat) -> Result<Vec<DecisionTable>> {
    Ok(match TableDocument::parse(content, format)? {
        TableDocument::Model(model) => model.tables,
        TableDocument::Table(table) => vec![table],
    })
}
