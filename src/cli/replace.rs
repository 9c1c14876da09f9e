//! Replace CLI command

use super::util::{
    check_column, flag_value, has_flag, load_document, parse_output_arg, positional, write_output,
};
use dmn_search::*;

pub fn cmd_replace(args: &[String]) -> Result<()> {
    let files = positional(args);
    let (Some(path), Some(what)) = (files.first(), flag_value(args, &["--what"])) else {
        return Err("Usage: dmnsearch replace <table.yaml> --what <pattern> --with <text> \
                    [--term <t>] [--column <id>] [--replace-column <id>] [--literal] \
                    [--output <file>]"
            .into());
    };

    let request = ReplaceRequest {
        term: flag_value(args, &["--term"]),
        column_id: flag_value(args, &["--column", "-c"]),
        replace_what: what,
        replace_with: flag_value(args, &["--with"]).unwrap_or_default(),
        replace_column_id: flag_value(args, &["--replace-column"]),
    };

    let current_dir = std::env::current_dir().map_err(Error::Io)?;
    let mut options = SearchConfig::discover(&current_dir)?.pattern_options();
    if has_flag(args, "--literal") {
        options.mode = PatternMode::Literal;
    }

    let (mut document, format) = load_document(path)?;
    check_column(&document, request.column_id.as_deref())?;
    check_column(&document, request.replace_column_id.as_deref())?;

    let mut editor = DirectEditor;
    let mut total = 0;
    for table in document.tables_mut() {
        let columns = table.columns();
        let summary = replace_in_rules(&mut table.rules, &columns, &request, &mut editor, options)?;
        if summary.count > 0 {
            eprintln!(
                "{}: replaced in {} target(s) across rule(s) {}",
                table.id,
                summary.count,
                summary.rules.join(", ")
            );
        }
        total += summary.count;
    }
    eprintln!("✓ {} target(s) replaced", total);

    write_output(&parse_output_arg(args), &document.render(format)?)
}
