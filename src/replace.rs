//! Rule replace
//!
//! Rewrites the cells of a rule whose text contains the `replace_what`
//! string, replacing every match of it with `replace_with`. Edits go through
//! a [`TableEditor`] so a host editor can track and undo them.
//!
//! The returned count is the number of targets touched (cells plus the
//! annotation), not the number of occurrences replaced.
//!
//! ## Pattern Modes
//!
//! | Mode | `replace_what` is | Example: `"a.c"` matches |
//! |------|-------------------|--------------------------|
//! | `Regex` (default) | a case-insensitive regular expression | `"abc"`, `"a.c"` |
//! | `Literal` | escaped, then matched case-insensitively | `"a.c"` only |
//!
//! Replacement text is always inserted literally; `$1` is not expanded.

use crate::column::{Column, ColumnFilter, ColumnKind};
use crate::error::{Error, Result};
use crate::search::{contains_ignore_case, rule_matches, SearchRequest};
use crate::table::{Cell, CellRef, DecisionTable, Rule};
use regex::{NoExpand, Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default compiled pattern size limit (1 MiB)
pub const DEFAULT_SIZE_LIMIT: usize = 1 << 20;

/// A replace applied to the rules of one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReplaceRequest {
    /// Search term selecting the rules shown to the user
    #[serde(default)]
    pub term: Option<String>,

    /// Column the search term is restricted to
    #[serde(default, alias = "columnId")]
    pub column_id: Option<String>,

    /// Text (or pattern) to replace
    #[serde(alias = "replaceWhat")]
    pub replace_what: String,

    /// Replacement text
    #[serde(default, alias = "replaceWith")]
    pub replace_with: String,

    /// Column the replacement is restricted to
    #[serde(default, alias = "replaceColumnId")]
    pub replace_column_id: Option<String>,
}

impl ReplaceRequest {
    pub fn new(replace_what: impl Into<String>, replace_with: impl Into<String>) -> Self {
        Self {
            replace_what: replace_what.into(),
            replace_with: replace_with.into(),
            ..Default::default()
        }
    }

    /// Restrict the replacement to one column
    pub fn in_column(mut self, column_id: impl Into<String>) -> Self {
        self.replace_column_id = Some(column_id.into());
        self
    }

    /// The search selecting which rules are visible for replacement
    pub fn search(&self) -> SearchRequest {
        SearchRequest {
            term: self.term.clone(),
            column_id: self.column_id.clone(),
        }
    }
}

/// How `replace_what` is turned into a pattern
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    /// Used verbatim as a regular expression
    #[default]
    Regex,
    /// Escaped and matched as plain text
    Literal,
}

/// Pattern compilation options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternOptions {
    pub mode: PatternMode,
    pub size_limit: usize,
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self {
            mode: PatternMode::Regex,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

impl From<PatternMode> for PatternOptions {
    fn from(mode: PatternMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

/// Compile `replace_what` into a case-insensitive pattern
pub fn compile_pattern(replace_what: &str, options: PatternOptions) -> Result<Regex> {
    let source = match options.mode {
        PatternMode::Regex => replace_what.to_string(),
        PatternMode::Literal => regex::escape(replace_what),
    };

    RegexBuilder::new(&source)
        .case_insensitive(true)
        .size_limit(options.size_limit)
        .build()
        .map_err(|e| Error::InvalidPattern {
            pattern: replace_what.to_string(),
            reason: e.to_string(),
        })
}

/// The edit pathway used for every mutation of rule text
///
/// Implementations must leave the target holding exactly `text` afterwards.
pub trait TableEditor {
    /// Set the text of one input or output cell
    fn edit_cell_text(&mut self, rule: &mut Rule, cell: CellRef, text: String);

    /// Set the annotation of a rule
    fn edit_annotation(&mut self, rule: &mut Rule, text: String);
}

/// Assigns the fields directly
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectEditor;

impl TableEditor for DirectEditor {
    fn edit_cell_text(&mut self, rule: &mut Rule, cell: CellRef, text: String) {
        if let Some(target) = rule.cell_mut(cell) {
            target.text = Some(text);
        }
    }

    fn edit_annotation(&mut self, rule: &mut Rule, text: String) {
        rule.annotation = Some(text);
    }
}

/// What an edit changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditTarget {
    Cell(CellRef),
    Annotation,
}

/// One applied edit, with the text before and after
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub rule_id: String,
    pub target: EditTarget,
    pub before: Option<String>,
    pub after: Option<String>,
}

impl Edit {
    fn apply(&self, table: &mut DecisionTable, text: Option<String>) -> bool {
        let Some(rule) = table.rule_mut(&self.rule_id) else {
            return false;
        };
        match self.target {
            EditTarget::Cell(cell) => match rule.cell_mut(cell) {
                Some(target) => {
                    target.text = text;
                    true
                }
                None => false,
            },
            EditTarget::Annotation => {
                rule.annotation = text;
                true
            }
        }
    }
}

/// Assigns the fields and keeps an undo/redo log
#[derive(Debug, Clone, Default)]
pub struct RecordingEditor {
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
}

impl RecordingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edits that can be undone, oldest first
    pub fn edits(&self) -> &[Edit] {
        &self.undo_stack
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Revert the most recent edit. Returns false when there is nothing to
    /// undo or the edited rule no longer exists.
    ///
    /// An edit whose target is gone is discarded rather than moved to the
    /// redo stack.
    pub fn undo(&mut self, table: &mut DecisionTable) -> bool {
        let Some(edit) = self.undo_stack.pop() else {
            return false;
        };
        if !edit.apply(table, edit.before.clone()) {
            tracing::debug!(rule = %edit.rule_id, "discarding edit without target");
            return false;
        }
        self.redo_stack.push(edit);
        true
    }

    /// Reapply the most recently undone edit
    pub fn redo(&mut self, table: &mut DecisionTable) -> bool {
        let Some(edit) = self.redo_stack.pop() else {
            return false;
        };
        if !edit.apply(table, edit.after.clone()) {
            tracing::debug!(rule = %edit.rule_id, "discarding edit without target");
            return false;
        }
        self.undo_stack.push(edit);
        true
    }

    fn record(&mut self, edit: Edit) {
        self.redo_stack.clear();
        self.undo_stack.push(edit);
    }
}

impl TableEditor for RecordingEditor {
    fn edit_cell_text(&mut self, rule: &mut Rule, cell: CellRef, text: String) {
        let Some(target) = rule.cell_mut(cell) else {
            return;
        };
        let before = target.text.replace(text.clone());
        self.record(Edit {
            rule_id: rule.id.clone(),
            target: EditTarget::Cell(cell),
            before,
            after: Some(text),
        });
    }

    fn edit_annotation(&mut self, rule: &mut Rule, text: String) {
        let before = rule.annotation.replace(text.clone());
        self.record(Edit {
            rule_id: rule.id.clone(),
            target: EditTarget::Annotation,
            before,
            after: Some(text),
        });
    }
}

/// Cells of a rule that a replace would touch
struct Targets {
    cells: Vec<CellRef>,
    annotation: bool,
}

impl Targets {
    fn collect(rule: &Rule, filter: &ColumnFilter, what: &str) -> Self {
        let what = Some(what);
        let qualifying = |kind: ColumnKind, cells: &[Cell]| -> Vec<CellRef> {
            cells
                .iter()
                .enumerate()
                .filter(|(i, cell)| {
                    filter.accepts(Some(*i), kind) && contains_ignore_case(cell.text(), what)
                })
                .map(|(i, _)| CellRef { kind, index: i })
                .collect()
        };

        let mut cells = qualifying(ColumnKind::Input, &rule.input_entries);
        cells.extend(qualifying(ColumnKind::Output, &rule.output_entries));
        let annotation = filter.accepts(None, ColumnKind::Annotation)
            && contains_ignore_case(rule.annotation.as_deref(), what);

        Self { cells, annotation }
    }

    fn is_empty(&self) -> bool {
        self.cells.is_empty() && !self.annotation
    }

    fn count(&self) -> usize {
        self.cells.len() + usize::from(self.annotation)
    }
}

/// Replace `replace_what` with `replace_with` in the cells of one rule
///
/// A cell qualifies when it lies inside `replace_column_id` and its text
/// contains `replace_what` case-insensitively. Returns the number of
/// qualifying targets. An empty `replace_what` qualifies nothing. The
/// pattern is compiled before any edit, so an invalid pattern leaves the
/// rule untouched.
pub fn replace_in_rule<E: TableEditor + ?Sized>(
    rule: &mut Rule,
    columns: &[Column],
    request: &ReplaceRequest,
    editor: &mut E,
    options: PatternOptions,
) -> Result<usize> {
    if request.replace_what.is_empty() {
        return Ok(0);
    }

    let filter = ColumnFilter::resolve(request.replace_column_id.as_deref(), columns);
    let targets = Targets::collect(rule, &filter, &request.replace_what);
    if targets.is_empty() {
        return Ok(0);
    }

    let pattern = compile_pattern(&request.replace_what, options)?;
    Ok(apply_targets(rule, &targets, &pattern, request, editor))
}

/// Replace with an already compiled pattern
fn replace_in_rule_with<E: TableEditor + ?Sized>(
    rule: &mut Rule,
    filter: &ColumnFilter,
    request: &ReplaceRequest,
    editor: &mut E,
    pattern: &Regex,
) -> usize {
    let targets = Targets::collect(rule, filter, &request.replace_what);
    if targets.is_empty() {
        return 0;
    }
    apply_targets(rule, &targets, pattern, request, editor)
}

fn apply_targets<E: TableEditor + ?Sized>(
    rule: &mut Rule,
    targets: &Targets,
    pattern: &Regex,
    request: &ReplaceRequest,
    editor: &mut E,
) -> usize {
    let with = request.replace_with.as_str();

    for cell in &targets.cells {
        let Some(text) = rule.cell(*cell).and_then(|c| c.text()) else {
            continue;
        };
        let replaced = pattern.replace_all(text, NoExpand(with)).into_owned();
        tracing::trace!(
            rule = %rule.id,
            kind = %cell.kind,
            index = cell.index,
            "replacing cell text"
        );
        editor.edit_cell_text(rule, *cell, replaced);
    }

    if targets.annotation {
        if let Some(text) = rule.annotation.as_deref() {
            let replaced = pattern.replace_all(text, NoExpand(with)).into_owned();
            tracing::trace!(rule = %rule.id, "replacing annotation");
            editor.edit_annotation(rule, replaced);
        }
    }

    let count = targets.count();
    tracing::debug!(rule = %rule.id, count, "replaced in rule");
    count
}

/// Result of a replace across several rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReplaceSummary {
    /// Total targets touched
    pub count: usize,
    /// Ids of rules with at least one touched target, in table order
    pub rules: Vec<String>,
}

/// Replace in every rule selected by the request's search term
///
/// Rules hidden by `term`/`column_id` are not touched. An empty term selects
/// every rule. The pattern is compiled once up front, so an invalid pattern
/// fails the call before any rule is inspected.
pub fn replace_in_rules<E: TableEditor + ?Sized>(
    rules: &mut [Rule],
    columns: &[Column],
    request: &ReplaceRequest,
    editor: &mut E,
    options: PatternOptions,
) -> Result<ReplaceSummary> {
    let mut summary = ReplaceSummary::default();
    if request.replace_what.is_empty() {
        return Ok(summary);
    }

    let pattern = compile_pattern(&request.replace_what, options)?;
    let replace_filter = ColumnFilter::resolve(request.replace_column_id.as_deref(), columns);

    let search = request.search();
    let needle = search.needle();
    let filter = ColumnFilter::resolve(search.column_id.as_deref(), columns);

    for rule in rules.iter_mut() {
        let visible = match needle.as_deref() {
            Some(needle) => rule_matches(rule, &filter, needle),
            None => true,
        };
        if !visible {
            continue;
        }

        let count = replace_in_rule_with(rule, &replace_filter, request, editor, &pattern);
        if count > 0 {
            summary.count += count;
            summary.rules.push(rule.id.clone());
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::derive_columns;
    use crate::table::{InputClause, OutputClause};
    use pretty_assertions::assert_eq;

    fn columns() -> Vec<Column> {
        derive_columns(
            &[InputClause {
                id: "i0".into(),
                label: None,
                expression_text: "word".into(),
            }],
            &[OutputClause {
                id: "o0".into(),
                name: None,
            }],
        )
    }

    fn rule() -> Rule {
        Rule {
            id: "r2".into(),
            input_entries: vec![Cell::new("Huch")],
            output_entries: vec![Cell::new("Eintrag2")],
            annotation: Some("Ne Annotation".into()),
        }
    }

    #[test]
    fn test_count_targets_not_occurrences() {
        let mut rule = rule();
        let request = ReplaceRequest::new("n", "TREFFER");
        let count = replace_in_rule(
            &mut rule,
            &columns(),
            &request,
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(rule.input_entries[0].text(), Some("Huch"));
        assert_eq!(rule.output_entries[0].text(), Some("EiTREFFERtrag2"));
        assert_eq!(
            rule.annotation.as_deref(),
            Some("TREFFERe ATREFFERTREFFERotatioTREFFER")
        );
    }

    #[test]
    fn test_whole_and_partial_word() {
        let mut rule = rule();
        let count = replace_in_rule(
            &mut rule,
            &columns(),
            &ReplaceRequest::new("Huch", "Was"),
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(rule.input_entries[0].text(), Some("Was"));

        let mut rule = self::rule();
        replace_in_rule(
            &mut rule,
            &columns(),
            &ReplaceRequest::new("uch", "Was"),
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(rule.input_entries[0].text(), Some("HWas"));
    }

    #[test]
    fn test_replace_column_restriction() {
        let mut rule = rule();
        let request = ReplaceRequest::new("n", "X").in_column("description");
        let count = replace_in_rule(
            &mut rule,
            &columns(),
            &request,
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(rule.output_entries[0].text(), Some("Eintrag2"));
        assert_eq!(rule.annotation.as_deref(), Some("Xe AXXotatioX"));
    }

    #[test]
    fn test_no_targets_skips_pattern() {
        let mut rule = rule();
        // Unbalanced, but never compiled because nothing contains it
        let request = ReplaceRequest::new("zz(", "x");
        let count = replace_in_rule(
            &mut rule,
            &columns(),
            &request,
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(count, 0);
        assert_eq!(rule, self::rule());
    }

    #[test]
    fn test_empty_replace_what() {
        let mut rule = rule();
        let count = replace_in_rule(
            &mut rule,
            &columns(),
            &ReplaceRequest::new("", "x"),
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(count, 0);
        assert_eq!(rule, self::rule());
    }

    #[test]
    fn test_invalid_pattern_leaves_rule_untouched() {
        let mut rule = rule();
        rule.input_entries[0] = Cell::new("f(x");
        let before = rule.clone();
        let err = replace_in_rule(
            &mut rule,
            &columns(),
            &ReplaceRequest::new("(", "y"),
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert_eq!(rule, before);
    }

    #[test]
    fn test_literal_mode() {
        let mut rule = rule();
        rule.input_entries[0] = Cell::new("a.c abc");
        let count = replace_in_rule(
            &mut rule,
            &columns(),
            &ReplaceRequest::new("A.C", "_"),
            &mut DirectEditor,
            PatternMode::Literal.into(),
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(rule.input_entries[0].text(), Some("_ abc"));
    }

    #[test]
    fn test_replacement_not_expanded() {
        let mut rule = rule();
        replace_in_rule(
            &mut rule,
            &columns(),
            &ReplaceRequest::new("uch", "$0!"),
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(rule.input_entries[0].text(), Some("H$0!"));
    }

    #[test]
    fn test_recording_editor_undo_redo() {
        let mut table = DecisionTable {
            id: "t".into(),
            rules: vec![rule()],
            ..Default::default()
        };
        let columns = columns();
        let mut editor = RecordingEditor::new();

        let count = replace_in_rule(
            &mut table.rules[0],
            &columns,
            &ReplaceRequest::new("n", "TREFFER"),
            &mut editor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(count, editor.edits().len());

        assert!(editor.undo(&mut table));
        assert!(editor.undo(&mut table));
        assert!(!editor.undo(&mut table));
        assert_eq!(table.rules[0], rule());

        assert!(editor.redo(&mut table));
        assert_eq!(table.rules[0].output_entries[0].text(), Some("EiTREFFERtrag2"));
        assert!(editor.can_redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut table = DecisionTable {
            id: "t".into(),
            rules: vec![rule()],
            ..Default::default()
        };
        let mut editor = RecordingEditor::new();
        editor.edit_annotation(&mut table.rules[0], "one".into());
        assert!(editor.undo(&mut table));
        assert!(editor.can_redo());

        editor.edit_annotation(&mut table.rules[0], "two".into());
        assert!(!editor.can_redo());
        assert_eq!(table.rules[0].annotation.as_deref(), Some("two"));
    }

    #[test]
    fn test_replace_in_visible_rules_only() {
        let mut other = rule();
        other.id = "r9".into();
        other.input_entries[0] = Cell::new("Hallo");
        let mut rules = vec![rule(), other];

        let request = ReplaceRequest {
            term: Some("huch".into()),
            ..ReplaceRequest::new("h", "#")
        };
        let summary = replace_in_rules(
            &mut rules,
            &columns(),
            &request,
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.rules, vec!["r2".to_string()]);
        assert_eq!(summary.count, 1);
        assert_eq!(rules[0].input_entries[0].text(), Some("#uc#"));
        assert_eq!(rules[1].input_entries[0].text(), Some("Hallo"));
    }

    #[test]
    fn test_invalid_pattern_fails_across_rules_without_targets() {
        let mut rules = vec![rule()];
        let err = replace_in_rules(
            &mut rules,
            &columns(),
            &ReplaceRequest::new("zz(", "x"),
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert_eq!(rules, vec![rule()]);
    }

    #[test]
    fn test_empty_replace_what_across_rules() {
        let mut rules = vec![rule()];
        let summary = replace_in_rules(
            &mut rules,
            &columns(),
            &ReplaceRequest::new("", "("),
            &mut DirectEditor,
            PatternOptions::default(),
        )
        .unwrap();
        assert_eq!(summary, ReplaceSummary::default());
    }

    #[test]
    fn test_undo_of_missing_rule_is_discarded() {
        let mut table = DecisionTable {
            id: "t".into(),
            rules: vec![rule()],
            ..Default::default()
        };
        let mut editor = RecordingEditor::new();
        editor.edit_annotation(&mut table.rules[0], "one".into());
        table.rules.clear();

        assert!(!editor.undo(&mut table));
        assert!(!editor.can_undo());
        assert!(!editor.can_redo());
    }

    #[test]
    fn test_redo_of_missing_rule_is_discarded() {
        let mut table = DecisionTable {
            id: "t".into(),
            rules: vec![rule()],
            ..Default::default()
        };
        let mut editor = RecordingEditor::new();
        editor.edit_annotation(&mut table.rules[0], "one".into());
        editor.edit_annotation(&mut table.rules[0], "two".into());
        assert!(editor.undo(&mut table));
        table.rules[0].id = "renamed".into();

        assert!(!editor.redo(&mut table));
        assert!(!editor.can_redo());
        assert_eq!(editor.edits().len(), 1);
        assert_eq!(table.rules[0].annotation.as_deref(), Some("one"));
    }
}
