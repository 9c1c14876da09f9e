//! Config and schema CLI commands

use dmn_search::*;

pub fn cmd_config(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: dmnsearch config <show|check>".into());
    }

    let current_dir = std::env::current_dir().map_err(Error::Io)?;
    match args[0].as_str() {
        "show" => {
            let config = SearchConfig::discover(&current_dir)?;
            let yaml = serde_norway::to_string(&config)
                .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
            print!("{}", yaml);
            Ok(())
        }
        "check" => match SearchConfig::load_from_dir(&current_dir)? {
            Some(_) => {
                println!("✓ {} is valid", config::CONFIG_FILE);
                Ok(())
            }
            None => {
                println!("No {} in {}", config::CONFIG_FILE, current_dir.display());
                Ok(())
            }
        },
        sub => Err(format!("Unknown config command: {}", sub).into()),
    }
}

pub fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: table, column, search, replace, summary, config");
            Ok(())
        }
        "table" => print_schema::<DecisionTable>(),
        "column" => print_schema::<Column>(),
        "search" => print_schema::<SearchRequest>(),
        "replace" => print_schema::<ReplaceRequest>(),
        "summary" => print_schema::<ReplaceSummary>(),
        "config" => print_schema::<SearchConfig>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
