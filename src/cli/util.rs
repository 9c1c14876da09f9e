//! CLI utility helpers

use dmn_search::{DocumentFormat, Error, Result, TableDocument};
use std::fs;
use std::path::{Path, PathBuf};

/// Flags that take a value
const VALUE_FLAGS: &[&str] = &[
    "--column",
    "-c",
    "--what",
    "--with",
    "--term",
    "--replace-column",
    "--output",
    "-o",
];

/// Flags that stand alone
const BOOL_FLAGS: &[&str] = &["--negate", "--json", "--literal"];

/// Marks the end of options; everything after it is positional
const END_OF_OPTIONS: &str = "--";

/// Arguments before the end-of-options marker
fn options(args: &[String]) -> &[String] {
    match args.iter().position(|a| a == END_OF_OPTIONS) {
        Some(end) => &args[..end],
        None => args,
    }
}

/// Value following the first of `names` in `args`
pub fn flag_value(args: &[String], names: &[&str]) -> Option<String> {
    let args = options(args);
    for (i, arg) in args.iter().enumerate() {
        if names.contains(&arg.as_str()) {
            if let Some(value) = args.get(i + 1) {
                return Some(value.clone());
            }
        }
    }
    None
}

/// Whether a boolean flag is present
pub fn has_flag(args: &[String], name: &str) -> bool {
    options(args).iter().any(|a| a == name)
}

/// Arguments that are neither known flags nor flag values
///
/// Anything that is not a known flag is kept, so a term like `-5` stays
/// positional. Arguments after `--` are never read as flags.
pub fn positional(args: &[String]) -> Vec<&str> {
    let mut result = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let arg = arg.as_str();
        if arg == END_OF_OPTIONS {
            result.extend(iter.map(String::as_str));
            break;
        }
        if VALUE_FLAGS.contains(&arg) {
            iter.next();
        } else if !BOOL_FLAGS.contains(&arg) {
            result.push(arg);
        }
    }
    result
}

/// Parse --output argument to determine output file path
pub fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    flag_value(args, &["--output", "-o"]).map(PathBuf::from)
}

/// Read a table or model document
pub fn load_document(path: &str) -> Result<(TableDocument, DocumentFormat)> {
    let format = DocumentFormat::from_path(Path::new(path));
    let content = fs::read_to_string(path).map_err(Error::Io)?;
    let document = TableDocument::parse(&content, format)
        .map_err(|e| Error::TableParse(format!("{}: {}", path, e)))?;
    Ok((document, format))
}

/// Fail when no table of the document has a column with this id
pub fn check_column(document: &TableDocument, column_id: Option<&str>) -> Result<()> {
    let Some(id) = column_id else {
        return Ok(());
    };
    let known = document
        .tables()
        .iter()
        .any(|t| t.columns().iter().any(|c| c.id == id));
    if known {
        Ok(())
    } else {
        Err(Error::UnknownColumn(id.to_string()))
    }
}

/// Write content to file or stdout
pub fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content).map_err(Error::Io)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
